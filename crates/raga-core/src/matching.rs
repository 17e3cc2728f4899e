//! Raga matching and ranking
//!
//! Every catalogue entry is scored against the swaras heard in the
//! performance. Foreign swaras are penalised far more heavily than swaras
//! the raga allows but the recording never reached.

use crate::swara::swara_name;
use raga_catalog::{Catalogue, RagaDefinition, SwaraSet};
use serde::Serialize;


/// Penalty per swara heard that the raga does not allow
pub const FOREIGN_SWARA_PENALTY: u32 = 100;

/// Penalty per allowed swara that was not heard
pub const MISSING_SWARA_PENALTY: u32 = 1;

/// Number of candidates returned by default
pub const DEFAULT_TOP_N: usize = 3;

/// One ranked candidate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchResult {
    /// Raga name
    pub raga: String,
    /// Lower is better
    pub score: u32,
    /// Names of swaras heard that the raga does not allow
    pub non_raga_notes: Vec<&'static str>,
    /// Number of allowed swaras that were not heard
    pub missing_notes_count: usize,
    #[serde(skip)]
    pub foreign: SwaraSet,
    #[serde(skip)]
    pub missing: SwaraSet,
}

impl MatchResult {
    /// Score a single raga against the swaras present
    pub fn score(present: &SwaraSet, raga: &RagaDefinition) -> Self {
        let foreign = present.difference(&raga.allowed);
        let missing = raga.allowed.difference(present);
        let score = FOREIGN_SWARA_PENALTY * foreign.len() as u32
            + MISSING_SWARA_PENALTY * missing.len() as u32;

        Self {
            raga: raga.name.clone(),
            score,
            non_raga_notes: foreign.iter().map(swara_name).collect(),
            missing_notes_count: missing.len(),
            foreign,
            missing,
        }
    }
}

/// Ranks catalogue ragas against a swara set.
///
/// Ties keep catalogue order. That order is arbitrary: two candidates with
/// equal scores are equally good, whatever position they land in.
#[derive(Debug, Clone)]
pub struct RagaMatcher {
    top_n: usize,
}

impl RagaMatcher {
    pub fn new(top_n: usize) -> Self {
        Self { top_n }
    }

    /// Every raga in the catalogue, best first
    pub fn rank_all(&self, present: &SwaraSet, catalogue: &Catalogue) -> Vec<MatchResult> {
        let mut results: Vec<MatchResult> = catalogue
            .iter()
            .map(|raga| {
                let result = MatchResult::score(present, raga);
                log::trace!(
                    "{}: score {} (foreign {:?}, missing {:?})",
                    result.raga,
                    result.score,
                    result.foreign,
                    result.missing
                );
                result
            })
            .collect();

        // stable: equal scores keep catalogue order
        results.sort_by_key(|r| r.score);
        results
    }

    /// The best `top_n` ragas, best first
    pub fn rank(&self, present: &SwaraSet, catalogue: &Catalogue) -> Vec<MatchResult> {
        let mut results = self.rank_all(present, catalogue);
        results.truncate(self.top_n);

        log::debug!(
            "Ranked {} ragas against {:?}, best: {}",
            catalogue.len(),
            present,
            results
                .first()
                .map(|r| format!("{} ({})", r.raga, r.score))
                .unwrap_or_else(|| "none".to_string())
        );

        results
    }
}

impl Default for RagaMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_TOP_N)
    }
}
