//! Pin Field - The host binding.
//!
//! [`PinField`] wires the slot layout engine and the input filter to a host
//! text widget through the [`TextHost`] trait. The host renders; the field
//! decides what to render.
//!
//! # Control flow
//!
//! Per keystroke, strictly sequential:
//!
//! ```text
//! edit event -> InputFilter -> commit (Signal<String>) ->
//!     SlotLayoutEngine::on_length_changed -> apply to host
//! ```
//!
//! # Features
//!
//! - Two-way value binding via Signal
//! - Digits-only, max-length filtering of every candidate edit
//! - Border colors, leading inset, and per-character kerning pushed to the
//!   host after each accepted edit
//! - `on_change` / `on_complete` callbacks
//! - Reconfigurable at runtime: count/height/spacing setters clear the
//!   entry and rebuild the slots; color setters restyle in place
//!
//! # Example
//!
//! ```ignore
//! use pin_field::{PinField, PinFieldProps};
//! use spark_signals::signal;
//!
//! let value = signal(String::new());
//! let mut field = PinField::new(host, PinFieldProps::new(value.clone()))?;
//!
//! field.layout(110.0, 40.0);
//! field.handle_key(&KeyInput::Char('1'));
//! assert_eq!(value.get(), "1");
//! ```

use std::rc::Rc;

use spark_signals::Signal;

use crate::filter::InputFilter;
use crate::layout::{ConfigError, FnMeasure, LengthUpdate, Slot, SlotConfig, SlotLayoutEngine};
use crate::types::Rgba;

// =============================================================================
// Host seam
// =============================================================================

/// The visual surface of the host text widget.
///
/// The field pushes engine output through this trait; it never reaches into
/// the host's rendering machinery directly. Glyph measurement lives here too
/// because only the host knows how wide its glyphs draw.
pub trait TextHost {
    /// Rendered width of `ch` in container units, `None` if the host
    /// cannot measure it.
    fn measure_glyph(&self, ch: char) -> Option<f32>;

    /// Set the blank spacer region before the first character.
    fn set_leading_inset(&mut self, inset: f32);

    /// Set the extra horizontal space after the character at `index`.
    fn set_char_trailing_offset(&mut self, index: usize, offset: f32);

    /// Replace the slot border layer wholesale: rects plus current colors.
    fn set_slot_borders(&mut self, slots: &[Slot]);
}

// =============================================================================
// Key input
// =============================================================================

/// A key event as the field understands it.
///
/// Hosts translate their native key events into this before calling
/// [`PinField::handle_key`]; `host::term` does so for crossterm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    /// A printable character (the filter decides whether it is a digit).
    Char(char),
    /// Delete the last entered digit.
    Backspace,
}

// =============================================================================
// Props
// =============================================================================

/// Value change callback, fired on every accepted edit.
pub type ChangeCallback = Rc<dyn Fn(&str)>;

/// Completion callback, fired when every slot holds a digit.
pub type CompleteCallback = Rc<dyn Fn(&str)>;

/// Properties for creating a [`PinField`].
pub struct PinFieldProps {
    /// Slot configuration (count, border geometry, colors).
    pub config: SlotConfig,
    /// The entered value (required, two-way bound). Cleared on creation:
    /// a fresh configuration never starts with stale digits.
    pub value: Signal<String>,
    /// Called with the new value after each accepted edit.
    pub on_change: Option<ChangeCallback>,
    /// Called once the value fills every slot.
    pub on_complete: Option<CompleteCallback>,
}

impl PinFieldProps {
    /// Props with the default configuration and no callbacks.
    pub fn new(value: Signal<String>) -> Self {
        Self {
            config: SlotConfig::default(),
            value,
            on_change: None,
            on_complete: None,
        }
    }
}

// =============================================================================
// PinField
// =============================================================================

/// The pin-code input component: filter, engine, and host glued together.
pub struct PinField<H: TextHost> {
    host: H,
    engine: SlotLayoutEngine,
    filter: InputFilter,
    value: Signal<String>,
    on_change: Option<ChangeCallback>,
    on_complete: Option<CompleteCallback>,
}

impl<H: TextHost> PinField<H> {
    /// Create the field, configure the engine, and apply the empty-state
    /// visuals to the host.
    pub fn new(host: H, props: PinFieldProps) -> Result<Self, ConfigError> {
        let engine = SlotLayoutEngine::new(props.config)?;
        let filter = InputFilter::new(props.config.slot_count as usize);

        let mut field = Self {
            host,
            engine,
            filter,
            value: props.value,
            on_change: props.on_change,
            on_complete: props.on_complete,
        };

        field.value.set(String::new());
        field.refresh_length();
        Ok(field)
    }

    /// The reactive value binding.
    pub fn value(&self) -> Signal<String> {
        self.value.clone()
    }

    /// Entered length, in characters.
    pub fn len(&self) -> usize {
        self.value.get().chars().count()
    }

    /// True when nothing has been entered.
    pub fn is_empty(&self) -> bool {
        self.value.get().is_empty()
    }

    /// Current slot configuration.
    pub fn config(&self) -> &SlotConfig {
        self.engine.config()
    }

    /// Borrow the host.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Borrow the host mutably.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Intrinsic field height for a given text line height.
    pub fn intrinsic_height(&self, text_height: f32) -> f32 {
        self.engine.intrinsic_height(text_height)
    }

    // =========================================================================
    // Layout
    // =========================================================================

    /// Size-affecting layout pass: recompute slot rects for the new
    /// container bounds and push them (with current colors) to the host.
    pub fn layout(&mut self, container_width: f32, container_height: f32) {
        self.engine.layout(container_width, container_height);
        self.host.set_slot_borders(self.engine.slots());
        // Slot width changed, so the inset and kerning derived from it are
        // re-derived for the visible text.
        self.refresh_length();
    }

    // =========================================================================
    // Editing
    // =========================================================================

    /// Run a candidate edit through the filter; commit and re-render when
    /// accepted. Returns whether the edit was accepted.
    pub fn edit(&mut self, range: std::ops::Range<usize>, replacement: &str) -> bool {
        let current = self.value.get();
        if !self.filter.accept(&current, range.clone(), replacement) {
            return false;
        }

        let new_value = InputFilter::apply(&current, range, replacement);
        self.value.set(new_value.clone());

        let new_len = new_value.chars().count();
        let update = self.recompute(&new_value, new_len);
        self.apply(&update);

        if let Some(ref cb) = self.on_change {
            cb(&new_value);
        }
        if new_len == self.engine.config().slot_count as usize {
            if let Some(ref cb) = self.on_complete {
                cb(&new_value);
            }
        }
        true
    }

    /// Route a key event through the edit path.
    ///
    /// Characters append (the filter rejects non-digits and overflow);
    /// backspace deletes the last digit. Returns true when the event was
    /// consumed.
    pub fn handle_key(&mut self, key: &KeyInput) -> bool {
        match key {
            KeyInput::Char(c) => {
                let len = self.len();
                self.edit(len..len, c.encode_utf8(&mut [0u8; 4]))
            }
            KeyInput::Backspace => {
                let len = self.len();
                if len > 0 {
                    self.edit(len - 1..len, "");
                }
                // Backspace is always directed at the field.
                true
            }
        }
    }

    /// Discard the entered text and restore the empty-state visuals.
    pub fn clear(&mut self) {
        self.value.set(String::new());
        self.refresh_length();
    }

    /// Focus returned to the field. Re-applies the leading-inset rule for
    /// the current length (a reopened, partially filled field keeps the
    /// inset it computed at length 1). Returns true to accept focus.
    pub fn focus_gained(&mut self) -> bool {
        let text = self.value.get();
        let len = text.chars().count();
        if len <= 1 {
            let update = self.recompute(&text, len);
            self.apply(&update);
        }
        true
    }

    // =========================================================================
    // Reconfiguration setters
    // =========================================================================

    /// Change the slot count. Clears the entry and rebuilds the slots.
    pub fn set_slot_count(&mut self, slot_count: u32) -> Result<(), ConfigError> {
        self.reconfigure(SlotConfig {
            slot_count,
            ..*self.engine.config()
        })
    }

    /// Change the border height. Clears the entry and rebuilds the slots.
    pub fn set_border_height(&mut self, border_height: f32) {
        // Geometry only; cannot fail.
        let _ = self.reconfigure(SlotConfig {
            border_height,
            ..*self.engine.config()
        });
    }

    /// Change the inter-slot spacing. Clears the entry and rebuilds the
    /// slots - spacing feeds every kerning offset, and older offsets are
    /// never recomputed, so the entry cannot survive.
    pub fn set_slot_spacing(&mut self, slot_spacing: f32) {
        let _ = self.reconfigure(SlotConfig {
            slot_spacing,
            ..*self.engine.config()
        });
    }

    /// Change the filled-border color. Restyles in place; the entry and
    /// its kerning stay.
    pub fn set_filled_color(&mut self, color: Rgba) {
        let empty = self.engine.config().empty_color;
        self.set_colors(color, empty);
    }

    /// Change the empty-border color. Restyles in place; the entry and
    /// its kerning stay.
    pub fn set_empty_color(&mut self, color: Rgba) {
        let filled = self.engine.config().filled_color;
        self.set_colors(filled, color);
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Full reconfiguration: text cleared first, then slots rebuilt, then
    /// empty-state visuals applied. The ordering is what keeps the
    /// last-two-only kerning rule sound.
    fn reconfigure(&mut self, config: SlotConfig) -> Result<(), ConfigError> {
        self.value.set(String::new());
        self.engine.configure(config)?;
        self.filter = InputFilter::new(config.slot_count as usize);
        self.host.set_slot_borders(self.engine.slots());
        self.refresh_length();
        Ok(())
    }

    fn set_colors(&mut self, filled: Rgba, empty: Rgba) {
        self.engine.set_colors(filled, empty);
        let len = self.len();
        self.engine.restyle_borders(len);
        self.host.set_slot_borders(self.engine.slots());
    }

    /// Re-run the length-changed rules for the current text and push the
    /// result to the host.
    fn refresh_length(&mut self) {
        let text = self.value.get();
        let len = text.chars().count();
        let update = self.recompute(&text, len);
        self.apply(&update);
    }

    fn recompute(&mut self, text: &str, new_len: usize) -> LengthUpdate {
        let host = &self.host;
        let measure = FnMeasure(|index: usize| {
            text.chars()
                .nth(index)
                .and_then(|c| host.measure_glyph(c))
        });
        self.engine.on_length_changed(new_len, &measure)
    }

    fn apply(&mut self, update: &LengthUpdate) {
        if !update.colors.is_empty() {
            self.host.set_slot_borders(self.engine.slots());
        }
        if let Some(inset) = update.leading_inset {
            self.host.set_leading_inset(inset);
        }
        for &(index, offset) in &update.kerning {
            self.host.set_char_trailing_offset(index, offset);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::OUTER_PADDING;
    use spark_signals::signal;
    use std::cell::{Cell, RefCell};
    use std::collections::BTreeMap;

    /// Host that records everything the field applies.
    #[derive(Default)]
    struct RecordingHost {
        leading_inset: Option<f32>,
        offsets: BTreeMap<usize, f32>,
        borders: Vec<Slot>,
        border_pushes: usize,
    }

    impl TextHost for RecordingHost {
        fn measure_glyph(&self, ch: char) -> Option<f32> {
            // Fixed-advance font: every glyph 2 units wide.
            let _ = ch;
            Some(2.0)
        }

        fn set_leading_inset(&mut self, inset: f32) {
            self.leading_inset = Some(inset);
        }

        fn set_char_trailing_offset(&mut self, index: usize, offset: f32) {
            self.offsets.insert(index, offset);
        }

        fn set_slot_borders(&mut self, slots: &[Slot]) {
            self.borders = slots.to_vec();
            self.border_pushes += 1;
        }
    }

    /// Field laid out at 110x40: slot width 10, center gap (10-2)/2 = 4.
    fn make_field() -> PinField<RecordingHost> {
        let value = signal(String::new());
        let mut field = PinField::new(RecordingHost::default(), PinFieldProps::new(value)).unwrap();
        field.layout(110.0, 40.0);
        field
    }

    fn border_colors(field: &PinField<RecordingHost>) -> Vec<Rgba> {
        field.host().borders.iter().map(|s| s.color).collect()
    }

    fn expect_colors(field: &PinField<RecordingHost>, len: usize) {
        let cfg = *field.config();
        let expected: Vec<Rgba> = (0..cfg.slot_count as usize)
            .map(|i| {
                if i < len {
                    cfg.filled_color
                } else {
                    cfg.empty_color
                }
            })
            .collect();
        assert_eq!(border_colors(field), expected, "colors wrong at len {len}");
    }

    // =========================================================================
    // Construction
    // =========================================================================

    #[test]
    fn test_new_applies_empty_state() {
        let field = make_field();
        assert!(field.is_empty());
        assert_eq!(field.host().leading_inset, Some(OUTER_PADDING));
        expect_colors(&field, 0);
        assert_eq!(field.host().borders.len(), 4);
    }

    #[test]
    fn test_new_clears_prefilled_value() {
        let value = signal("99".to_string());
        let field =
            PinField::new(RecordingHost::default(), PinFieldProps::new(value.clone())).unwrap();
        assert_eq!(value.get(), "");
        assert!(field.is_empty());
    }

    #[test]
    fn test_new_rejects_zero_slot_count() {
        let props = PinFieldProps {
            config: SlotConfig {
                slot_count: 0,
                ..SlotConfig::default()
            },
            ..PinFieldProps::new(signal(String::new()))
        };
        assert!(PinField::new(RecordingHost::default(), props).is_err());
    }

    // =========================================================================
    // Typing end to end
    // =========================================================================

    #[test]
    fn test_typing_first_digit() {
        let mut field = make_field();
        assert!(field.handle_key(&KeyInput::Char('1')));

        assert_eq!(field.value().get(), "1");
        expect_colors(&field, 1);
        // (10 - 2) / 2 + 20
        assert_eq!(field.host().leading_inset, Some(24.0));
        // center gap 4 + spacing 10
        assert_eq!(field.host().offsets.get(&0), Some(&14.0));
    }

    #[test]
    fn test_typing_full_code() {
        let mut field = make_field();
        for c in ['1', '2', '3', '4'] {
            assert!(field.handle_key(&KeyInput::Char(c)));
        }

        assert_eq!(field.value().get(), "1234");
        expect_colors(&field, 4);
        // Inset frozen at the length-1 value
        assert_eq!(field.host().leading_inset, Some(24.0));
        // Interior characters clear both gaps plus spacing: 4 + 4 + 10
        assert_eq!(field.host().offsets.get(&0), Some(&18.0));
        assert_eq!(field.host().offsets.get(&1), Some(&18.0));
        assert_eq!(field.host().offsets.get(&2), Some(&18.0));
        // Final digit fills the last slot: no next gap
        assert_eq!(field.host().offsets.get(&3), Some(&4.0));
    }

    #[test]
    fn test_rejects_non_digit_and_overflow() {
        let mut field = make_field();
        assert!(!field.handle_key(&KeyInput::Char('a')));
        assert!(field.is_empty());

        for c in ['1', '2', '3', '4'] {
            field.handle_key(&KeyInput::Char(c));
        }
        assert!(!field.handle_key(&KeyInput::Char('5')));
        assert_eq!(field.value().get(), "1234");
    }

    #[test]
    fn test_rejected_edit_leaves_visuals_untouched() {
        let mut field = make_field();
        field.handle_key(&KeyInput::Char('7'));
        let inset = field.host().leading_inset;
        let colors = border_colors(&field);

        assert!(!field.edit(1..1, "x"));
        assert_eq!(field.host().leading_inset, inset);
        assert_eq!(border_colors(&field), colors);
    }

    // =========================================================================
    // Deletion
    // =========================================================================

    #[test]
    fn test_backspace_moves_highlight_back() {
        let mut field = make_field();
        for c in ['1', '2', '3'] {
            field.handle_key(&KeyInput::Char(c));
        }
        expect_colors(&field, 3);

        assert!(field.handle_key(&KeyInput::Backspace));
        assert_eq!(field.value().get(), "12");
        expect_colors(&field, 2);

        field.handle_key(&KeyInput::Backspace);
        field.handle_key(&KeyInput::Backspace);
        assert!(field.is_empty());
        expect_colors(&field, 0);
        assert_eq!(field.host().leading_inset, Some(OUTER_PADDING));
    }

    #[test]
    fn test_backspace_on_empty_consumed_noop() {
        let mut field = make_field();
        assert!(field.handle_key(&KeyInput::Backspace));
        assert!(field.is_empty());
    }

    // =========================================================================
    // Callbacks
    // =========================================================================

    #[test]
    fn test_on_change_fires_per_accepted_edit() {
        let changes = Rc::new(RefCell::new(Vec::new()));
        let changes_cb = changes.clone();

        let mut props = PinFieldProps::new(signal(String::new()));
        props.on_change = Some(Rc::new(move |v: &str| {
            changes_cb.borrow_mut().push(v.to_string());
        }));

        let mut field = PinField::new(RecordingHost::default(), props).unwrap();
        field.layout(110.0, 40.0);

        field.handle_key(&KeyInput::Char('1'));
        field.handle_key(&KeyInput::Char('x')); // rejected
        field.handle_key(&KeyInput::Char('2'));
        field.handle_key(&KeyInput::Backspace);

        assert_eq!(*changes.borrow(), vec!["1", "12", "1"]);
    }

    #[test]
    fn test_on_complete_fires_when_full() {
        let completed = Rc::new(Cell::new(0usize));
        let completed_cb = completed.clone();

        let mut props = PinFieldProps::new(signal(String::new()));
        props.on_complete = Some(Rc::new(move |v: &str| {
            assert_eq!(v, "1234");
            completed_cb.set(completed_cb.get() + 1);
        }));

        let mut field = PinField::new(RecordingHost::default(), props).unwrap();
        field.layout(110.0, 40.0);

        for c in ['1', '2', '3'] {
            field.handle_key(&KeyInput::Char(c));
        }
        assert_eq!(completed.get(), 0);
        field.handle_key(&KeyInput::Char('4'));
        assert_eq!(completed.get(), 1);
    }

    // =========================================================================
    // Focus
    // =========================================================================

    #[test]
    fn test_focus_gained_reapplies_inset() {
        let mut field = make_field();
        field.handle_key(&KeyInput::Char('5'));

        // Host forgets its inset (widget rebuilt between sessions).
        field.host_mut().leading_inset = None;
        assert!(field.focus_gained());
        assert_eq!(field.host().leading_inset, Some(24.0));
    }

    #[test]
    fn test_focus_gained_leaves_longer_entries_alone() {
        let mut field = make_field();
        field.handle_key(&KeyInput::Char('5'));
        field.handle_key(&KeyInput::Char('6'));

        field.host_mut().leading_inset = None;
        assert!(field.focus_gained());
        // Length > 1: the rule never recenters, so nothing is re-applied.
        assert_eq!(field.host().leading_inset, None);
    }

    // =========================================================================
    // Reconfiguration
    // =========================================================================

    #[test]
    fn test_set_slot_count_clears_and_rebuilds() {
        let mut field = make_field();
        for c in ['1', '2'] {
            field.handle_key(&KeyInput::Char(c));
        }

        field.set_slot_count(6).unwrap();
        assert!(field.is_empty());
        assert_eq!(field.host().borders.len(), 6);
        expect_colors(&field, 0);
        assert_eq!(field.host().leading_inset, Some(OUTER_PADDING));
    }

    #[test]
    fn test_set_slot_count_zero_fails() {
        let mut field = make_field();
        assert!(field.set_slot_count(0).is_err());
        assert_eq!(field.host().borders.len(), 4);
    }

    #[test]
    fn test_set_spacing_clears_entry() {
        let mut field = make_field();
        field.handle_key(&KeyInput::Char('9'));
        field.set_slot_spacing(6.0);
        assert!(field.is_empty());
        assert_eq!(field.config().slot_spacing, 6.0);
    }

    #[test]
    fn test_color_setters_keep_entry() {
        let mut field = make_field();
        for c in ['1', '2'] {
            field.handle_key(&KeyInput::Char(c));
        }

        field.set_filled_color(Rgba::GREEN);
        field.set_empty_color(Rgba::GRAY);

        // Entry survives, borders restyled from the current length.
        assert_eq!(field.value().get(), "12");
        assert_eq!(
            border_colors(&field),
            vec![Rgba::GREEN, Rgba::GREEN, Rgba::GRAY, Rgba::GRAY]
        );
    }

    // =========================================================================
    // Layout passes
    // =========================================================================

    #[test]
    fn test_layout_pushes_rects_and_rederives_spacing() {
        let mut field = make_field();
        field.handle_key(&KeyInput::Char('1'));

        field.layout(210.0, 40.0);
        // (210 - 40 - 30) / 4 = 35
        assert_eq!(field.host().borders[0].rect.width, 35.0);
        // Inset re-derived for the new slot width: (35 - 2) / 2 + 20
        assert_eq!(field.host().leading_inset, Some(36.5));
        expect_colors(&field, 1);
    }

    #[test]
    fn test_clear_restores_empty_state() {
        let mut field = make_field();
        for c in ['1', '2', '3'] {
            field.handle_key(&KeyInput::Char(c));
        }

        field.clear();
        assert!(field.is_empty());
        expect_colors(&field, 0);
        assert_eq!(field.host().leading_inset, Some(OUTER_PADDING));
    }

    #[test]
    fn test_intrinsic_height() {
        let field = make_field();
        assert_eq!(field.intrinsic_height(12.0), 30.0);
    }
}
