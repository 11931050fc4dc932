//! Exact-key lookup on email.

use crate::error::Result;
use crate::storage::DirectoryStore;
use crate::strategy::{RawMatch, Strategy};

pub const EXACT_SCORE: f32 = 1.0;

pub struct ExactEmail {
    pub email: String,
}

impl Strategy for ExactEmail {
    fn execute(&self, store: &DirectoryStore<'_>) -> Result<Vec<RawMatch>> {
        Ok(store
            .employee_by_email(&self.email)?
            .map(|employee| RawMatch::new(employee, EXACT_SCORE, "Exact email match"))
            .into_iter()
            .collect())
    }

    fn name(&self) -> &'static str {
        "exact_email"
    }
}
