//! Substring match on one organizational label field.

use crate::error::Result;
use crate::storage::directory::LabelField;
use crate::storage::DirectoryStore;
use crate::strategy::{RawMatch, Strategy};

pub const PATTERN_SCORE: f32 = 0.8;

pub struct LabelPattern {
    pub field: LabelField,
    pub value: String,
}

impl Strategy for LabelPattern {
    fn execute(&self, store: &DirectoryStore<'_>) -> Result<Vec<RawMatch>> {
        // Store orders by name; all matches score equally.
        let reason = match self.field {
            LabelField::Team => format!("Member of team matching '{}'", self.value),
            LabelField::Function => format!("Works in function matching '{}'", self.value),
            LabelField::Location => format!("Based at location matching '{}'", self.value),
            LabelField::Title => format!("Role title matches '{}'", self.value),
        };
        Ok(store
            .employees_by_label(self.field, &self.value)?
            .into_iter()
            .map(|employee| RawMatch::new(employee, PATTERN_SCORE, reason.clone()))
            .collect())
    }

    fn name(&self) -> &'static str {
        "label_pattern"
    }
}
