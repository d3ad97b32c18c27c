use crate::domain::model::{Query, ResultRow};
use std::collections::HashMap;

/// Cell value for a domain that never appeared in the top results.
pub const MISSING_PLACEHOLDER: &str = "-";

/// Zero-based occurrence positions of every domain seen for one query.
///
/// Keys are unordered; each position list is strictly increasing because
/// positions are recorded from a single monotonic counter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RankIndex {
    positions: HashMap<String, Vec<usize>>,
    total: usize,
}

impl RankIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, domain: impl Into<String>, position: usize) {
        let list = self.positions.entry(domain.into()).or_default();
        debug_assert!(list.last().map_or(true, |last| *last < position));
        list.push(position);
        self.total += 1;
    }

    /// Empty when the domain never occurred.
    pub fn positions_of(&self, domain: &str) -> &[usize] {
        self.positions.get(domain).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of positions recorded across all domains.
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn domain_count(&self) -> usize {
        self.positions.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[usize])> {
        self.positions
            .iter()
            .map(|(domain, positions)| (domain.as_str(), positions.as_slice()))
    }

    /// One-based positions joined with ", ", or the placeholder.
    pub fn render_cell(&self, domain: &str) -> String {
        format_positions(self.positions_of(domain))
    }

    pub fn to_row(&self, query: &Query, domains: &[String]) -> ResultRow {
        let mut cells = Vec::with_capacity(domains.len() + 1);
        cells.push(query.text.clone());
        cells.extend(domains.iter().map(|domain| self.render_cell(domain)));

        ResultRow {
            query_index: query.index,
            cells,
        }
    }
}

pub fn format_positions(positions: &[usize]) -> String {
    if positions.is_empty() {
        return MISSING_PLACEHOLDER.to_string();
    }

    positions
        .iter()
        .map(|p| (p + 1).to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
