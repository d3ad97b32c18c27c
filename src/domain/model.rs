use crate::utils::error::{RankError, Result};

/// Leading header cell of the result matrix.
pub const QUERIES_HEADER: &str = "queries";

/// A search query together with its 1-based position in the input list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub index: usize,
    pub text: String,
}

impl Query {
    pub fn new(index: usize, text: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
        }
    }

    /// Numbers queries from 1 in input order.
    pub fn enumerate<I, S>(texts: I) -> Vec<Query>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        texts
            .into_iter()
            .enumerate()
            .map(|(i, text)| Query::new(i + 1, text))
            .collect()
    }
}

/// One output line: the query text followed by one cell per target domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRow {
    pub query_index: usize,
    pub cells: Vec<String>,
}

/// Header row plus one row per query, in query order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultMatrix {
    rows: Vec<Vec<String>>,
}

impl ResultMatrix {
    pub fn header_for(domains: &[String]) -> Vec<String> {
        std::iter::once(QUERIES_HEADER.to_string())
            .chain(domains.iter().cloned())
            .collect()
    }

    /// Assembles the matrix from index-addressed slots. Slot 0 is the header,
    /// slot `i` holds the row of the query with index `i`. Every slot must be filled.
    pub fn from_slots(slots: Vec<Option<Vec<String>>>) -> Result<Self> {
        let rows = slots
            .into_iter()
            .enumerate()
            .map(|(i, slot)| {
                slot.ok_or_else(|| RankError::TaskFailed {
                    message: format!("no result was recorded for row {}", i),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { rows })
    }

    pub fn header(&self) -> &[String] {
        self.rows.first().map(Vec::as_slice).unwrap_or(&[])
    }

    /// All rows, header first.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn query_rows(&self) -> &[Vec<String>] {
        self.rows.get(1..).unwrap_or(&[])
    }

    pub fn into_rows(self) -> Vec<Vec<String>> {
        self.rows
    }

    pub fn to_delimited(&self, delimiter: u8) -> Result<Vec<u8>> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .from_writer(Vec::new());

        for row in &self.rows {
            writer.write_record(row)?;
        }

        writer.into_inner().map_err(|e| {
            RankError::IoError(std::io::Error::new(e.error().kind(), e.to_string()))
        })
    }
}
