//! Responsibility-ownership lookup.

use crate::error::Result;
use crate::model::OwnershipKind;
use crate::storage::DirectoryStore;
use crate::strategy::{RawMatch, Strategy};

pub const PRIMARY_SCORE: f32 = 0.9;
pub const BACKUP_SCORE: f32 = 0.6;
pub const ESCALATION_SCORE: f32 = 0.5;

pub struct OwnershipLookup {
    pub phrase: String,
}

impl Strategy for OwnershipLookup {
    fn execute(&self, store: &DirectoryStore<'_>) -> Result<Vec<RawMatch>> {
        // Store returns rows ordered primary, backup, escalation, then name.
        Ok(store
            .owners_by_area(&self.phrase)?
            .into_iter()
            .map(|record| {
                let (score, label) = match record.kind {
                    OwnershipKind::Primary => (PRIMARY_SCORE, "Primary owner of"),
                    OwnershipKind::Backup => (BACKUP_SCORE, "Backup owner of"),
                    OwnershipKind::Escalation => (ESCALATION_SCORE, "Escalation contact for"),
                };
                let mut m = RawMatch::new(
                    record.employee,
                    score,
                    format!("{label}: {}", record.responsibility_area),
                );
                m.ownership = Some(record.kind);
                m
            })
            .collect())
    }

    fn name(&self) -> &'static str {
        "ownership"
    }
}
