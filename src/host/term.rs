//! Terminal I/O - Crossterm bindings for the cell host.
//!
//! Two thin adapters: [`key_input`] folds crossterm key events down to the
//! field's [`KeyInput`] alphabet, and [`flush_buffer`] writes a rendered
//! [`CellBuffer`] to any `io::Write` with queued crossterm commands.

use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::queue;
use crossterm::style::{
    Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor,
    SetForegroundColor,
};

use crate::field::KeyInput;
use crate::host::CellBuffer;
use crate::types::{Attr, Rgba};

// =============================================================================
// Key Mapping
// =============================================================================

/// Map a crossterm key event to a field key, if it is one.
///
/// Release/repeat events and chorded keys (ctrl/alt held) are not field
/// input and return `None`. Shift is allowed through so shifted layouts
/// still type.
pub fn key_input(event: &KeyEvent) -> Option<KeyInput> {
    if event.kind == KeyEventKind::Release {
        return None;
    }
    if event
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
    {
        return None;
    }

    match event.code {
        KeyCode::Char(c) => Some(KeyInput::Char(c)),
        KeyCode::Backspace => Some(KeyInput::Backspace),
        _ => None,
    }
}

// =============================================================================
// Flushing
// =============================================================================

fn convert_color(color: Rgba) -> Option<Color> {
    if color.is_terminal_default() {
        None
    } else {
        Some(Color::Rgb {
            r: color.r as u8,
            g: color.g as u8,
            b: color.b as u8,
        })
    }
}

fn queue_attrs<W: Write>(out: &mut W, attrs: Attr) -> io::Result<()> {
    if attrs.contains(Attr::BOLD) {
        queue!(out, SetAttribute(Attribute::Bold))?;
    }
    if attrs.contains(Attr::DIM) {
        queue!(out, SetAttribute(Attribute::Dim))?;
    }
    if attrs.contains(Attr::UNDERLINE) {
        queue!(out, SetAttribute(Attribute::Underlined))?;
    }
    if attrs.contains(Attr::INVERSE) {
        queue!(out, SetAttribute(Attribute::Reverse))?;
    }
    if attrs.contains(Attr::HIDDEN) {
        queue!(out, SetAttribute(Attribute::Hidden))?;
    }
    Ok(())
}

/// Write a whole buffer at origin `(col, row)`, resetting color state per
/// cell run. One final `flush` pushes everything out.
pub fn flush_buffer<W: Write>(
    out: &mut W,
    buffer: &CellBuffer,
    col: u16,
    row: u16,
) -> io::Result<()> {
    for y in 0..buffer.height() {
        queue!(out, MoveTo(col, row + y))?;
        for x in 0..buffer.width() {
            let Some(cell) = buffer.get(x, y) else { continue };

            queue!(out, SetAttribute(Attribute::Reset), ResetColor)?;
            if let Some(fg) = convert_color(cell.fg) {
                queue!(out, SetForegroundColor(fg))?;
            }
            if let Some(bg) = convert_color(cell.bg) {
                queue!(out, SetBackgroundColor(bg))?;
            }
            queue_attrs(out, cell.attrs)?;

            let ch = char::from_u32(cell.char).unwrap_or(' ');
            queue!(out, Print(ch))?;
        }
    }
    queue!(out, SetAttribute(Attribute::Reset), ResetColor)?;
    out.flush()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Cell;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_char_key_maps() {
        assert_eq!(
            key_input(&press(KeyCode::Char('7'), KeyModifiers::NONE)),
            Some(KeyInput::Char('7'))
        );
        // Non-digit chars still map; the field's filter rejects them
        assert_eq!(
            key_input(&press(KeyCode::Char('a'), KeyModifiers::NONE)),
            Some(KeyInput::Char('a'))
        );
    }

    #[test]
    fn test_backspace_maps() {
        assert_eq!(
            key_input(&press(KeyCode::Backspace, KeyModifiers::NONE)),
            Some(KeyInput::Backspace)
        );
    }

    #[test]
    fn test_chorded_keys_ignored() {
        assert_eq!(
            key_input(&press(KeyCode::Char('1'), KeyModifiers::CONTROL)),
            None
        );
        assert_eq!(
            key_input(&press(KeyCode::Char('1'), KeyModifiers::ALT)),
            None
        );
        // Shift passes through
        assert_eq!(
            key_input(&press(KeyCode::Char('1'), KeyModifiers::SHIFT)),
            Some(KeyInput::Char('1'))
        );
    }

    #[test]
    fn test_navigation_keys_ignored() {
        assert_eq!(key_input(&press(KeyCode::Enter, KeyModifiers::NONE)), None);
        assert_eq!(key_input(&press(KeyCode::Left, KeyModifiers::NONE)), None);
        assert_eq!(key_input(&press(KeyCode::Esc, KeyModifiers::NONE)), None);
    }

    #[test]
    fn test_release_events_ignored() {
        let mut event = press(KeyCode::Char('1'), KeyModifiers::NONE);
        event.kind = KeyEventKind::Release;
        assert_eq!(key_input(&event), None);
    }

    #[test]
    fn test_flush_emits_cell_content() {
        let mut buf = CellBuffer::new(3, 1);
        buf.set(
            1,
            0,
            Cell {
                char: '9' as u32,
                fg: Rgba::rgb(255, 0, 0),
                bg: Rgba::TERMINAL_DEFAULT,
                attrs: Attr::BOLD,
            },
        );

        let mut out: Vec<u8> = Vec::new();
        flush_buffer(&mut out, &buf, 0, 0).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains('9'));
        // Truecolor foreground sequence for the red cell
        assert!(text.contains("38;2;255;0;0"));
    }

    #[test]
    fn test_flush_default_colors_stay_reset() {
        let buf = CellBuffer::new(2, 1);
        let mut out: Vec<u8> = Vec::new();
        flush_buffer(&mut out, &buf, 0, 0).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(!text.contains("38;2;"));
        assert!(!text.contains("48;2;"));
    }
}
