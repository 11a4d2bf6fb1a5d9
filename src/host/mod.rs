//! Host Layer - Realizing the field on a terminal cell grid.
//!
//! The field core is host-agnostic; this module is the reference binding.
//! [`CellHost`] implements [`crate::field::TextHost`] over a [`CellBuffer`],
//! and [`term`] connects both ends to crossterm: key events in, escape
//! sequences out.

mod buffer;
pub mod term;

pub use buffer::{CellBuffer, CellHost};
