//! pin-field - Layout Module
//!
//! Slot geometry and per-character spacing for the pin field.
//!
//! # Architecture
//!
//! The layout module owns the one interesting computation in this crate:
//! given a container and a slot configuration, where do the N underline
//! borders sit, which of them count as filled, and how much trailing space
//! does each typed digit need to land centered over its slot.
//!
//! 1. [`SlotLayoutEngine`] derives slot rects from container bounds
//! 2. On every length change it updates border colors (one or two slots,
//!    never a full rescan)
//! 3. It emits kerning deltas for the last one or two characters plus the
//!    leading inset that positions the first digit
//!
//! Glyph widths come in through the [`GlyphMeasure`] seam so the engine
//! never touches the host's text machinery directly.

mod measure;
mod slots;

pub use measure::{char_cell_width, string_width, CellMeasure, FnMeasure, GlyphMeasure};
pub use slots::{
    ConfigError, LengthUpdate, Slot, SlotConfig, SlotLayoutEngine, DIGIT_TO_BORDER_SPACE,
    OUTER_PADDING,
};
