//! # Calculator
//!
//! Thin wrapper over `num_parser`. There is no parser of our own here:
//! the expression goes straight to the evaluator and the result (or the
//! evaluator's error) is recorded in a short history.

use std::fmt;

/// Oldest history lines are dropped past this point.
pub const MAX_HISTORY: usize = 50;

#[derive(Debug, Clone, PartialEq)]
pub enum CalcError {
    /// Nothing to evaluate.
    Empty,
    /// The evaluator rejected the expression.
    Eval(String),
}

impl fmt::Display for CalcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalcError::Empty => write!(f, "empty expression"),
            CalcError::Eval(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for CalcError {}

/// Evaluate a single expression and format the result.
pub fn evaluate(expression: &str) -> Result<String, CalcError> {
    let trimmed = expression.trim();
    if trimmed.is_empty() {
        return Err(CalcError::Empty);
    }
    num_parser::eval(trimmed)
        .map(|value| value.to_string())
        .map_err(|e| CalcError::Eval(e.to_string()))
}

/// One evaluated line: what was typed and what came back.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub expression: String,
    pub outcome: Result<String, CalcError>,
}

impl HistoryEntry {
    pub fn display(&self) -> String {
        match &self.outcome {
            Ok(value) => format!("{} = {}", self.expression, value),
            Err(e) => format!("{} → error: {}", self.expression, e),
        }
    }
}

#[derive(Debug, Default)]
pub struct Calculator {
    pub history: Vec<HistoryEntry>,
}

impl Calculator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluate and remember. Returns the line to show in the status bar.
    pub fn submit(&mut self, expression: &str) -> String {
        let outcome = evaluate(expression);
        let entry = HistoryEntry {
            expression: expression.trim().to_string(),
            outcome,
        };
        let line = entry.display();
        self.history.push(entry);
        if self.history.len() > MAX_HISTORY {
            let overflow = self.history.len() - MAX_HISTORY;
            self.history.drain(..overflow);
        }
        line
    }

    pub fn last_result(&self) -> Option<&str> {
        self.history
            .iter()
            .rev()
            .find_map(|entry| entry.outcome.as_ref().ok().map(String::as_str))
    }

    pub fn clear(&mut self) {
        self.history.clear();
    }
}
