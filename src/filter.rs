//! Input Filter - Edit validation for the pin field.
//!
//! Every candidate edit (typed character, backspace, programmatic
//! replacement) is expressed as a range substitution against the current
//! text and run through [`InputFilter::accept`] before it is committed.
//! Rejection is a normal outcome, not an error: the host simply keeps the
//! previous text.
//!
//! The filter is pure and stateless - it holds only the slot count it was
//! built with.

use std::ops::Range;

/// Validates candidate text replacements: digits only, never longer than the
/// slot count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputFilter {
    max_len: usize,
}

impl InputFilter {
    /// Create a filter capped at `max_len` characters (the slot count).
    pub const fn new(max_len: usize) -> Self {
        Self { max_len }
    }

    /// Maximum accepted length.
    pub const fn max_len(&self) -> usize {
        self.max_len
    }

    /// Decide whether replacing `range` (in characters) of `current` with
    /// `replacement` produces an acceptable value.
    ///
    /// Rejects when the replacement contains any non-decimal-digit character
    /// or when the resulting length would exceed the slot count. Ranges
    /// beyond the current text are clamped, so an out-of-range insertion
    /// behaves as an append.
    pub fn accept(&self, current: &str, range: Range<usize>, replacement: &str) -> bool {
        if !replacement.chars().all(|c| c.is_ascii_digit()) {
            return false;
        }

        let current_len = current.chars().count();
        let start = range.start.min(current_len);
        let end = range.end.clamp(start, current_len);

        let result_len = current_len - (end - start) + replacement.chars().count();
        result_len <= self.max_len
    }

    /// Apply the substitution and return the resulting string.
    ///
    /// Callers are expected to have passed the edit through [`accept`]
    /// first; `apply` itself only clamps the range.
    ///
    /// [`accept`]: InputFilter::accept
    pub fn apply(current: &str, range: Range<usize>, replacement: &str) -> String {
        let chars: Vec<char> = current.chars().collect();
        let start = range.start.min(chars.len());
        let end = range.end.clamp(start, chars.len());

        let mut out = String::with_capacity(current.len() + replacement.len());
        out.extend(&chars[..start]);
        out.push_str(replacement);
        out.extend(&chars[end..]);
        out
    }
}

// =============================================================================
// Tests
// =============================================================================
