//! Editor-field text parsing.
//!
//! Panels hand the engine raw text. Malformed numbers never fail the edit:
//! callers take the `*_or` helpers, which log and fall back to a default.

#[cfg(test)]
#[path = "entry_test.rs"]
mod entry_test;

use crate::doc::FunctionForm;
use crate::geometry::Quadratic;

/// Errors produced while parsing editor text.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EntryError {
    /// The text is not a finite decimal number.
    #[error("not a finite number: {0:?}")]
    Number(String),
    /// The text is not a linear factor such as `(x+3)` or `(x-2)`.
    #[error("not a linear factor: {0:?}")]
    Factor(String),
}

/// Raw text of a function-curve editor, one variant per entry mode.
#[derive(Debug, Clone, PartialEq)]
pub enum FunctionEntry {
    /// `y = m·x + b`.
    Linear { slope: String, intercept: String },
    /// `y = a·x² + b·x + c`.
    Quadratic { a: String, b: String, c: String },
    /// Monic quadratic through two roots.
    Roots { r1: String, r2: String },
    /// Monic quadratic from two factors, e.g. `(x+3)` and `(x-2)`.
    Factored { f1: String, f2: String },
}

/// Parse a finite decimal number, ignoring surrounding whitespace.
///
/// # Errors
///
/// Returns [`EntryError::Number`] for empty, malformed, or non-finite text.
pub fn parse_number(text: &str) -> Result<f64, EntryError> {
    match text.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(EntryError::Number(text.to_owned())),
    }
}

/// [`parse_number`], falling back to `default` on malformed text.
#[must_use]
pub fn number_or(text: &str, default: f64) -> f64 {
    parse_number(text).unwrap_or_else(|e| {
        log::warn!("{e}; using {default}");
        default
    })
}

/// Root of a linear factor: `(x+p)` gives `-p`, `(x-q)` gives `q`.
///
/// Whitespace and the parentheses are optional; a bare `x` is a root at 0.
///
/// # Errors
///
/// Returns [`EntryError::Factor`] when the text is not of that shape.
pub fn parse_factor_root(text: &str) -> Result<f64, EntryError> {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    let inner = compact
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .unwrap_or(compact.as_str());
    let Some(rest) = inner.strip_prefix('x').or_else(|| inner.strip_prefix('X')) else {
        return Err(EntryError::Factor(text.to_owned()));
    };
    if rest.is_empty() {
        return Ok(0.0);
    }
    let (sign, digits) = if let Some(d) = rest.strip_prefix('+') {
        (-1.0, d)
    } else if let Some(d) = rest.strip_prefix('-') {
        (1.0, d)
    } else {
        return Err(EntryError::Factor(text.to_owned()));
    };
    match parse_number(digits) {
        Ok(v) if !digits.starts_with(['+', '-']) => Ok(sign * v),
        _ => Err(EntryError::Factor(text.to_owned())),
    }
}

/// [`parse_factor_root`], falling back to a root at 0.
#[must_use]
pub fn factor_root_or_zero(text: &str) -> f64 {
    parse_factor_root(text).unwrap_or_else(|e| {
        log::warn!("{e}; using root 0");
        0.0
    })
}

/// Convert editor text into the coefficient form it describes.
#[must_use]
pub fn form_from_entry(entry: &FunctionEntry) -> FunctionForm {
    match entry {
        FunctionEntry::Linear { slope, intercept } => {
            FunctionForm::Linear { slope: number_or(slope, 0.0), intercept: number_or(intercept, 0.0) }
        }
        FunctionEntry::Quadratic { a, b, c } => FunctionForm::Quadratic(Quadratic {
            a: number_or(a, 0.0),
            b: number_or(b, 0.0),
            c: number_or(c, 0.0),
        }),
        FunctionEntry::Roots { r1, r2 } => {
            FunctionForm::Quadratic(Quadratic::from_roots(number_or(r1, 0.0), number_or(r2, 0.0)))
        }
        FunctionEntry::Factored { f1, f2 } => {
            FunctionForm::Quadratic(Quadratic::from_roots(factor_root_or_zero(f1), factor_root_or_zero(f2)))
        }
    }
}

/// Truncate `text` to at most `max` characters (not bytes).
#[must_use]
pub fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
