//! # pin-field
//!
//! A one-line pin code entry field for terminal UIs.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals): the
//! entered value is a reactive `Signal<String>` the embedding app can read
//! and subscribe to.
//!
//! ## Architecture
//!
//! The field is split along a measurement seam. [`field::PinField`] owns the
//! value, the digit filter, and the slot layout engine; everything visual
//! goes through the [`field::TextHost`] trait, which also answers glyph
//! width queries. The engine works in continuous container units and never
//! inspects the text itself, only its length and per-glyph widths:
//! ```text
//! KeyInput → InputFilter → Signal<String> → SlotLayoutEngine → TextHost
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Core types (Rgba, Rect, Attr, Cell)
//! - [`filter`] - Digit-only, length-capped input filtering
//! - [`layout`] - Slot geometry, border colors, kerning and leading inset
//! - [`field`] - The field itself and the host seam
//! - [`host`] - Reference cell-grid host with crossterm bindings

pub mod field;
pub mod filter;
pub mod host;
pub mod layout;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use field::{
    ChangeCallback, CompleteCallback, KeyInput, PinField, PinFieldProps, TextHost,
};

pub use filter::InputFilter;

pub use layout::{
    char_cell_width, string_width, CellMeasure, ConfigError, FnMeasure, GlyphMeasure,
    LengthUpdate, Slot, SlotConfig, SlotLayoutEngine,
    DIGIT_TO_BORDER_SPACE, OUTER_PADDING,
};

pub use host::{CellBuffer, CellHost};
