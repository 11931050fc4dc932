//! Retrieval strategies.
//!
//! One executable procedure per query category, each a pure read against the
//! directory store behind a common contract. Zero matches is an empty list,
//! never an error.

pub mod exact;
pub mod fulltext;
pub mod ownership;
pub mod pattern;
pub mod skill;

pub use exact::ExactEmail;
pub use fulltext::FulltextSearch;
pub use ownership::OwnershipLookup;
pub use pattern::LabelPattern;
pub use skill::{SkillAsk, SkillQuery, SkillWeighted};

use crate::error::Result;
use crate::model::{Employee, OwnershipKind};
use crate::storage::DirectoryStore;

/// One candidate as produced by a strategy, before merging and ranking.
#[derive(Debug, Clone)]
pub struct RawMatch {
    pub employee: Employee,
    pub raw_score: f32,
    pub reasons: Vec<String>,
    pub ownership: Option<OwnershipKind>,
}

impl RawMatch {
    pub fn new(employee: Employee, raw_score: f32, reason: impl Into<String>) -> Self {
        Self {
            employee,
            raw_score,
            reasons: vec![reason.into()],
            ownership: None,
        }
    }
}

pub trait Strategy {
    fn execute(&self, store: &DirectoryStore<'_>) -> Result<Vec<RawMatch>>;
    fn name(&self) -> &'static str;
}
