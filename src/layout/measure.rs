//! Glyph Measurement
//!
//! The engine centers each digit inside its slot, which requires knowing how
//! wide the digit renders. That knowledge belongs to the host, so it comes
//! in through the [`GlyphMeasure`] seam.
//!
//! Terminal cell widths depend on Unicode character classes:
//! - ASCII printable: 1 cell
//! - CJK characters: 2 cells (fullwidth)
//! - Emoji: 2 cells (most)
//! - Control characters: 0 cells
//!
//! [`CellMeasure`] implements the seam for cell-grid hosts using that
//! approximation. A pin field only ever holds ASCII digits, but the
//! measurement path stays honest about width anyway.

/// Per-character width oracle for the entered text.
///
/// `index` addresses characters of the committed text. `None` means the
/// host cannot measure that glyph (typically: index out of range); the
/// engine degrades the missing width to `0.0` and keeps going.
pub trait GlyphMeasure {
    /// Rendered width of the character at `index`, in container units.
    fn glyph_width(&self, index: usize) -> Option<f32>;
}

/// Adapts a closure into a measurement oracle, which keeps hosts and tests
/// terse.
pub struct FnMeasure<F>(pub F);

impl<F> GlyphMeasure for FnMeasure<F>
where
    F: Fn(usize) -> Option<f32>,
{
    fn glyph_width(&self, index: usize) -> Option<f32> {
        (self.0)(index)
    }
}

/// Display width of a single character in terminal cells.
pub fn char_cell_width(c: char) -> u16 {
    if c.is_ascii() {
        if c.is_ascii_control() {
            return 0; // Control characters have no width
        }
        return 1;
    }

    // Approximation for non-ASCII: CJK and emoji are typically 2 cells
    let code = c as u32;
    if (0x1100..=0x115F).contains(&code)     // Hangul Jamo
        || (0x2E80..=0x9FFF).contains(&code)   // CJK
        || (0xAC00..=0xD7A3).contains(&code)   // Hangul Syllables
        || (0xF900..=0xFAFF).contains(&code)   // CJK Compatibility
        || (0xFF00..=0xFF60).contains(&code)   // Fullwidth Forms
        || (0x1F300..=0x1F9FF).contains(&code) // Emoji
    {
        2
    } else {
        1
    }
}

/// Display width of a string in terminal cells.
pub fn string_width(s: &str) -> u16 {
    s.chars()
        .fold(0u16, |w, c| w.saturating_add(char_cell_width(c)))
}

/// Cell-grid measurement over a snapshot of the entered text.
///
/// `cell_width` scales terminal cells into container units; a host whose
/// container coordinates *are* cells passes `1.0`.
#[derive(Debug, Clone, Copy)]
pub struct CellMeasure<'a> {
    text: &'a str,
    cell_width: f32,
}

impl<'a> CellMeasure<'a> {
    /// Measure over `text` with one terminal cell = `cell_width` units.
    pub fn new(text: &'a str, cell_width: f32) -> Self {
        Self { text, cell_width }
    }
}

impl GlyphMeasure for CellMeasure<'_> {
    fn glyph_width(&self, index: usize) -> Option<f32> {
        self.text
            .chars()
            .nth(index)
            .map(|c| char_cell_width(c) as f32 * self.cell_width)
    }
}

// =============================================================================
// Tests
// =============================================================================
