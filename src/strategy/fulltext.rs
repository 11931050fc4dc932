//! Ranked full-text fallback over the indexed employee fields.

use crate::error::Result;
use crate::storage::DirectoryStore;
use crate::strategy::{RawMatch, Strategy};

/// Ceiling for full-text scores. Keeps a keyword hit from ever outranking a
/// direct, ownership, or pattern match for the same candidate.
pub const FULLTEXT_CEILING: f32 = 0.5;

pub struct FulltextSearch {
    pub query: String,
    pub limit: usize,
}

impl Strategy for FulltextSearch {
    fn execute(&self, store: &DirectoryStore<'_>) -> Result<Vec<RawMatch>> {
        let hits = store.fulltext(&self.query, self.limit)?;
        Ok(hits
            .into_iter()
            .enumerate()
            .map(|(position, employee)| {
                // Derived from the index's native rank order, decaying with
                // position and bounded by the ceiling.
                let raw = FULLTEXT_CEILING / (1.0 + position as f32);
                RawMatch::new(employee, raw, "Keyword match in profile")
            })
            .collect())
    }

    fn name(&self) -> &'static str {
        "fulltext"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scores_decay_with_rank_and_stay_bounded() {
        let scores: Vec<f32> = (0..5)
            .map(|position| FULLTEXT_CEILING / (1.0 + position as f32))
            .collect();
        assert_eq!(scores[0], FULLTEXT_CEILING);
        for pair in scores.windows(2) {
            assert!(pair[0] > pair[1]);
        }
        assert!(scores.iter().all(|s| *s > 0.0 && *s <= FULLTEXT_CEILING));
    }
}
