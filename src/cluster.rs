use std::cmp::Ordering;

use crate::error::LayoutError;
use crate::token::Token;

/// Tokens judged to sit on one horizontal text line.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    anchor_y: f64,
    tokens: Vec<Token>,
}

impl Row {
    fn open(token: Token) -> Self {
        Self {
            anchor_y: token.anchor_y(),
            tokens: vec![token],
        }
    }

    /// The y of the token that opened this row.
    #[must_use]
    pub fn anchor_y(&self) -> f64 {
        self.anchor_y
    }

    #[must_use]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub(crate) fn tokens_mut(&mut self) -> &mut Vec<Token> {
        &mut self.tokens
    }

    #[must_use]
    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }
}

fn reading_order(left: &Token, right: &Token) -> Ordering {
    left.anchor_y()
        .total_cmp(&right.anchor_y())
        .then_with(|| left.anchor_x().total_cmp(&right.anchor_x()))
}

/// Groups tokens into rows by top-left y.
///
/// Tokens are sorted by `(y, x)` and scanned once. A token whose y exceeds the
/// current row's opening y by more than `row_threshold_px` starts a new row;
/// otherwise it joins the current row. The opening y never moves while a row
/// is open, so a slow drift in y cannot chain several lines together.
pub fn cluster_rows(mut tokens: Vec<Token>, row_threshold_px: f64) -> Result<Vec<Row>, LayoutError> {
    if tokens.is_empty() {
        return Err(LayoutError::EmptyInput);
    }

    tokens.sort_by(reading_order);

    let rows = tokens.into_iter().fold(Vec::<Row>::new(), |mut rows, token| {
        match rows.last_mut() {
            Some(current) if token.anchor_y() - current.anchor_y <= row_threshold_px => {
                current.tokens.push(token);
            }
            _ => rows.push(Row::open(token)),
        }
        rows
    });

    Ok(rows)
}
