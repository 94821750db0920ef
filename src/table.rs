use serde::Serialize;

use crate::cluster::Row;
use crate::token::Token;

/// Rows of cell text, top to bottom. Rows may differ in length.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Table {
    rows: Vec<Vec<String>>,
}

impl Table {
    #[must_use]
    pub fn from_rows(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Length of the longest row.
    #[must_use]
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    #[must_use]
    pub fn is_ragged(&self) -> bool {
        let width = self.width();
        self.rows.iter().any(|row| row.len() != width)
    }

    /// Integer column labels `0..width`, as written above exported tables.
    #[must_use]
    pub fn column_header(&self) -> Vec<String> {
        (0..self.width()).map(|index| index.to_string()).collect()
    }
}

/// Drops geometry and confidence, keeping only each row's text in order.
#[must_use]
pub fn assemble_table(rows: Vec<Row>) -> Table {
    let rows = rows
        .into_iter()
        .map(|row| row.into_tokens().into_iter().map(Token::into_text).collect())
        .collect();
    Table { rows }
}
