use crate::catalog::{Dimension, Statement, statement_by_id};
use crate::error::FivefoldError;
use std::collections::BTreeMap;

/// Neutral Likert midpoint substituted for unanswered statements so totals
/// are always defined, even for a partially completed session.
pub const MIDPOINT: u8 = 3;

/// Per-dimension sum of effective scores. For a dimension with `n` items the
/// total is always in `[n, 5n]`.
pub type DimensionTotals = BTreeMap<Dimension, u32>;

/// Responses recorded so far, keyed by statement id. Last write wins; at most
/// one entry per statement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Responses {
    values: BTreeMap<u32, u8>,
}

impl Responses {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store or overwrite the response for one statement.
    pub fn record(&mut self, statement_id: u32, value: u8) -> Result<(), FivefoldError> {
        if !(1..=5).contains(&value) {
            return Err(FivefoldError::InvalidResponseValue {
                statement_id,
                value,
            });
        }
        if statement_by_id(statement_id).is_none() {
            return Err(FivefoldError::UnknownStatement(statement_id));
        }
        self.values.insert(statement_id, value);
        Ok(())
    }

    pub fn get(&self, statement_id: u32) -> Option<u8> {
        self.values.get(&statement_id).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn unanswered_count(&self, catalog: &[Statement]) -> usize {
        catalog
            .iter()
            .filter(|s| !self.values.contains_key(&s.id))
            .count()
    }

    #[cfg(test)]
    pub(crate) fn from_pairs(pairs: &[(u32, u8)]) -> Self {
        Self {
            values: pairs.iter().copied().collect(),
        }
    }
}

/// Score of one statement after reversal. Always in `[1, 5]`.
pub fn effective_score(statement: &Statement, response: u8) -> u8 {
    if statement.reversed {
        6 - response
    } else {
        response
    }
}

/// Sum effective scores per dimension over the full catalog. Every statement
/// contributes exactly once; a statement with no recorded response counts as
/// the neutral midpoint. Pure and independent of presentation order.
pub fn compute_totals(catalog: &[Statement], responses: &Responses) -> DimensionTotals {
    let mut totals = DimensionTotals::new();
    for statement in catalog {
        let response = responses.get(statement.id).unwrap_or(MIDPOINT);
        let score = effective_score(statement, response) as u32;
        *totals.entry(statement.dimension).or_insert(0) += score;
    }
    totals
}
