//! Slot Layout Engine - Geometry, border colors, and kerning.
//!
//! The engine owns the slot configuration and the derived slot set. It
//! answers three questions:
//!
//! - where the underline borders sit ([`SlotLayoutEngine::layout`])
//! - which borders are filled vs empty after a length change
//! - how much trailing space each typed character needs so it lands
//!   centered over its slot ([`SlotLayoutEngine::on_length_changed`])
//!
//! Border colors are updated incrementally: a length change touches at most
//! the one or two affected slots, never a full rescan. The persisted color
//! state therefore has to stay consistent with the entered length across any
//! sequence of keystrokes and deletions - that is an invariant the tests
//! walk, not an optimization.
//!
//! Kerning is equally incremental: only the last and second-to-last
//! trailing offsets are ever recomputed. Earlier offsets are never
//! revisited. A geometry change mid-entry would strand them, which is why
//! every geometry-affecting reconfiguration clears the entered text first.

use std::error::Error;
use std::fmt;

use crate::layout::measure::GlyphMeasure;
use crate::types::{Rect, Rgba};

/// Fixed margin between the container edge and the first/last slot.
pub const OUTER_PADDING: f32 = 20.0;

/// Vertical clearance between the digit glyphs and the underline borders,
/// used when deriving the field's intrinsic height.
pub const DIGIT_TO_BORDER_SPACE: f32 = 10.0;

// =============================================================================
// Configuration
// =============================================================================

/// Immutable slot configuration snapshot.
///
/// Replacing any field re-derives the whole slot set and clears the entered
/// text; the engine never patches slots in place across a config change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotConfig {
    /// Number of digit slots. Must be positive.
    pub slot_count: u32,
    /// Height of each underline border.
    pub border_height: f32,
    /// Horizontal gap between adjacent slots.
    pub slot_spacing: f32,
    /// Border color for slots whose digit has been entered.
    pub filled_color: Rgba,
    /// Border color for slots still waiting for a digit.
    pub empty_color: Rgba,
}

impl Default for SlotConfig {
    fn default() -> Self {
        Self {
            slot_count: 4,
            border_height: 4.0,
            slot_spacing: 10.0,
            filled_color: Rgba::LIGHT_GRAY,
            empty_color: Rgba::RED,
        }
    }
}

/// Configuration rejected before any slot is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// `slot_count` was zero.
    InvalidSlotCount,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSlotCount => write!(f, "slot count must be positive"),
        }
    }
}

impl Error for ConfigError {}

// =============================================================================
// Slot
// =============================================================================

/// One digit position: its underline rectangle and current border color.
///
/// Slots are derived state. The whole set is destroyed and rebuilt whenever
/// the configuration or the container bounds change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slot {
    pub index: usize,
    pub rect: Rect,
    pub color: Rgba,
}

// =============================================================================
// Length update
// =============================================================================

/// Deltas produced by a length change.
///
/// Everything here is a delta against previously applied state: only the
/// slots and characters that changed appear.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LengthUpdate {
    /// Slot border colors that changed: `(slot_index, color)`.
    pub colors: Vec<(usize, Rgba)>,
    /// Trailing offsets recomputed this call: `(char_index, offset)`.
    /// At most the last two characters.
    pub kerning: Vec<(usize, f32)>,
    /// New leading inset, when the rule produces one (lengths 0 and 1).
    /// `None` means: leave whatever was set at length 1 untouched.
    pub leading_inset: Option<f32>,
}

// =============================================================================
// Engine
// =============================================================================

/// Owns the slot configuration and derived slot set; computes color and
/// kerning deltas on every text mutation and slot rects on every resize.
#[derive(Debug, Clone)]
pub struct SlotLayoutEngine {
    config: SlotConfig,
    slots: Vec<Slot>,
    container_width: f32,
    container_height: f32,
}

impl SlotLayoutEngine {
    /// Create an engine with the given configuration.
    pub fn new(config: SlotConfig) -> Result<Self, ConfigError> {
        let mut engine = Self {
            config: SlotConfig::default(),
            slots: Vec::new(),
            container_width: 0.0,
            container_height: 0.0,
        };
        engine.configure(config)?;
        Ok(engine)
    }

    /// Replace the configuration.
    ///
    /// Rebuilds the slot set to `slot_count` entries, all `empty_color`.
    /// The caller is responsible for discarding the entered text - every
    /// configuration change invalidates it (and with it, the kerning plan).
    pub fn configure(&mut self, config: SlotConfig) -> Result<(), ConfigError> {
        if config.slot_count == 0 {
            return Err(ConfigError::InvalidSlotCount);
        }

        self.config = config;
        self.rebuild_slots();
        Ok(())
    }

    /// Current configuration snapshot.
    pub fn config(&self) -> &SlotConfig {
        &self.config
    }

    /// Current slot set (rects from the last layout pass, live colors).
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Record new container bounds and rebuild slot rects wholesale.
    ///
    /// Colors persist across a resize; only geometry is re-derived.
    pub fn layout(&mut self, container_width: f32, container_height: f32) -> &[Slot] {
        self.container_width = container_width;
        self.container_height = container_height;

        let rects = Self::compute_slot_rects(&self.config, container_width, container_height);
        for (slot, rect) in self.slots.iter_mut().zip(rects) {
            slot.rect = rect;
        }
        &self.slots
    }

    /// Pure slot geometry: same config and bounds, same rects.
    ///
    /// Each slot is `(container_width - 2*OUTER_PADDING -
    /// (slot_count-1)*slot_spacing) / slot_count` wide, placed left to
    /// right with `slot_spacing` gaps, pinned to the container bottom with
    /// height `border_height`.
    pub fn compute_slot_rects(
        config: &SlotConfig,
        container_width: f32,
        container_height: f32,
    ) -> Vec<Rect> {
        let count = config.slot_count as usize;
        let width = Self::slot_width_for(config, container_width);
        let y = container_height - config.border_height;

        (0..count)
            .map(|i| {
                let x = OUTER_PADDING + (width + config.slot_spacing) * i as f32;
                Rect::new(x, y, width, config.border_height)
            })
            .collect()
    }

    /// Width of a single slot at the last known container width.
    pub fn slot_width(&self) -> f32 {
        Self::slot_width_for(&self.config, self.container_width)
    }

    /// Intrinsic field height for a given text line height: room for the
    /// glyphs, the borders, and the clearance between them.
    pub fn intrinsic_height(&self, text_height: f32) -> f32 {
        text_height + self.config.border_height * 2.0 + DIGIT_TO_BORDER_SPACE
    }

    /// React to the entered text reaching `new_len` characters.
    ///
    /// Updates the persisted border colors (at most two slots) and returns
    /// the deltas the host applies: changed colors, recomputed trailing
    /// offsets for the last one or two characters, and the leading inset
    /// when the rule yields one.
    pub fn on_length_changed(
        &mut self,
        new_len: usize,
        measure: &dyn GlyphMeasure,
    ) -> LengthUpdate {
        let count = self.config.slot_count as usize;
        let new_len = new_len.min(count);

        let mut update = LengthUpdate {
            colors: self.update_border_colors(new_len),
            kerning: Vec::new(),
            leading_inset: self.leading_inset(new_len, measure),
        };

        if new_len == 0 {
            // The host discards the text; kerning goes with it.
            return update;
        }

        let spacing = self.config.slot_spacing;

        // The just-typed character clears its own centering gap, plus the
        // inter-slot gap unless it filled the last slot.
        let next_gap = if new_len == count { 0.0 } else { spacing };
        let last = self.center_gap(new_len - 1, measure) + next_gap;
        if new_len > 1 {
            // The previous character must now also clear the gap before the
            // newly typed one.
            let prev = self.center_gap(new_len - 2, measure)
                + self.center_gap(new_len - 1, measure)
                + spacing;
            update.kerning.push((new_len - 2, prev));
        }
        update.kerning.push((new_len - 1, last));

        update
    }

    /// Swap the color pair without touching geometry or the entered text.
    ///
    /// Unlike [`configure`], this keeps the slot set and the kerning plan:
    /// colors are not geometry, so nothing can go stale. Callers follow up
    /// with [`restyle_borders`] to repaint from the current length.
    ///
    /// [`configure`]: SlotLayoutEngine::configure
    /// [`restyle_borders`]: SlotLayoutEngine::restyle_borders
    pub fn set_colors(&mut self, filled: Rgba, empty: Rgba) {
        self.config.filled_color = filled;
        self.config.empty_color = empty;
    }

    /// Restyle every border from an absolute length: slot `i` is filled iff
    /// `i < len`. Used when only the colors changed (no geometry, text
    /// kept), where the incremental rule does not apply.
    pub fn restyle_borders(&mut self, len: usize) {
        let filled = self.config.filled_color;
        let empty = self.config.empty_color;
        for slot in &mut self.slots {
            slot.color = if slot.index < len { filled } else { empty };
        }
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn slot_width_for(config: &SlotConfig, container_width: f32) -> f32 {
        let total_spacing = (config.slot_count - 1) as f32 * config.slot_spacing;
        (container_width - OUTER_PADDING * 2.0 - total_spacing) / config.slot_count as f32
    }

    fn rebuild_slots(&mut self) {
        let rects =
            Self::compute_slot_rects(&self.config, self.container_width, self.container_height);
        self.slots = rects
            .into_iter()
            .enumerate()
            .map(|(index, rect)| Slot {
                index,
                rect,
                color: self.config.empty_color,
            })
            .collect();
    }

    /// Space needed on each side of character `i` to center it in a slot.
    /// A glyph the host cannot measure degrades to width 0.
    fn center_gap(&self, index: usize, measure: &dyn GlyphMeasure) -> f32 {
        let glyph = measure.glyph_width(index).unwrap_or(0.0);
        (self.slot_width() - glyph) / 2.0
    }

    /// Apply the incremental color rule; returns the slots that changed.
    fn update_border_colors(&mut self, new_len: usize) -> Vec<(usize, Rgba)> {
        let count = self.config.slot_count as usize;
        let filled = self.config.filled_color;
        let empty = self.config.empty_color;

        let mut changed = Vec::new();
        let mut set = |slots: &mut [Slot], index: usize, color: Rgba| {
            if slots[index].color != color {
                slots[index].color = color;
                changed.push((index, color));
            }
        };

        if new_len == 0 {
            // Reset: everything back to empty.
            for i in 0..count {
                set(&mut self.slots, i, empty);
            }
        } else if new_len == count {
            set(&mut self.slots, count - 1, filled);
        } else {
            // The upcoming slot opens, the just-completed slot closes.
            set(&mut self.slots, new_len, empty);
            set(&mut self.slots, new_len - 1, filled);
        }

        changed.sort_by_key(|(i, _)| *i);
        changed
    }

    /// The leading-inset rule: a fixed margin when empty, a centering inset
    /// once the first digit lands, untouched afterwards.
    fn leading_inset(&self, new_len: usize, measure: &dyn GlyphMeasure) -> Option<f32> {
        match new_len {
            0 => Some(OUTER_PADDING),
            1 => Some(self.center_gap(0, measure) + OUTER_PADDING),
            _ => None,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
