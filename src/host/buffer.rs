//! Cell Buffer Host - The reference `TextHost` for cell-grid rendering.
//!
//! [`CellBuffer`] is a plain grid of [`Cell`]s. [`CellHost`] implements the
//! [`TextHost`] seam on top of it: it records the leading inset, the
//! per-character trailing offsets, and the slot border layer the field
//! applies, and realizes them as cells on demand.
//!
//! The engine works in continuous container units; this host rounds to
//! whole cells at the boundary. `cell_width` scales between the two - a
//! host whose container coordinates are cells passes `1.0`.

use crate::field::TextHost;
use crate::layout::{char_cell_width, Slot};
use crate::types::{Attr, Cell, Rgba, SpacedChar};

// =============================================================================
// CellBuffer
// =============================================================================

/// A fixed-size grid of terminal cells.
#[derive(Debug, Clone, PartialEq)]
pub struct CellBuffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl CellBuffer {
    /// Create a buffer of default (blank) cells.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); width as usize * height as usize],
        }
    }

    /// Buffer width in cells.
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Buffer height in cells.
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Get the cell at (x, y), if in bounds.
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        if x < self.width && y < self.height {
            Some(&self.cells[y as usize * self.width as usize + x as usize])
        } else {
            None
        }
    }

    /// Set the cell at (x, y). Out-of-bounds writes are dropped.
    pub fn set(&mut self, x: u16, y: u16, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y as usize * self.width as usize + x as usize] = cell;
        }
    }

    /// Reset every cell to the default blank.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::default());
    }

    /// Resize the buffer, discarding previous content.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.cells = vec![Cell::default(); width as usize * height as usize];
    }

    /// The characters of row `y` as a string (diagnostics and tests).
    pub fn row_text(&self, y: u16) -> String {
        (0..self.width)
            .filter_map(|x| self.get(x, y))
            .filter_map(|cell| char::from_u32(cell.char))
            .collect()
    }
}

// =============================================================================
// CellHost
// =============================================================================

/// Reference host: realizes the field's visual contract on a [`CellBuffer`].
///
/// Borders are drawn as background-colored runs in the rows their rects
/// cover; digits are laid out left to right from the leading inset, each
/// followed by its trailing offset.
#[derive(Debug, Clone)]
pub struct CellHost {
    buffer: CellBuffer,
    cell_width: f32,
    leading_inset: f32,
    offsets: Vec<f32>,
    slots: Vec<Slot>,
}

impl CellHost {
    /// Host over a `width` x `height` cell grid, one container unit per
    /// cell.
    pub fn new(width: u16, height: u16) -> Self {
        Self::with_cell_width(width, height, 1.0)
    }

    /// Host with an explicit container-units-per-cell scale.
    pub fn with_cell_width(width: u16, height: u16, cell_width: f32) -> Self {
        Self {
            buffer: CellBuffer::new(width, height),
            cell_width,
            leading_inset: 0.0,
            offsets: Vec::new(),
            slots: Vec::new(),
        }
    }

    /// The rendered grid.
    pub fn buffer(&self) -> &CellBuffer {
        &self.buffer
    }

    /// Container width in units (what the field's layout pass should use).
    pub fn container_width(&self) -> f32 {
        self.buffer.width as f32 * self.cell_width
    }

    /// Container height in units.
    pub fn container_height(&self) -> f32 {
        self.buffer.height as f32 * self.cell_width
    }

    /// Resize the grid. The caller re-runs the field's layout pass with the
    /// new container bounds afterwards.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.buffer.resize(width, height);
    }

    /// Redraw the whole field: borders from the slot layer, then `text`
    /// spaced by the recorded inset and offsets. Wholesale every time -
    /// the grid is cheap and partial patching is where stale state hides.
    pub fn render(&mut self, text: &str) -> &CellBuffer {
        self.buffer.clear();
        self.draw_borders();
        self.draw_text(text);
        &self.buffer
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn to_cells(&self, units: f32) -> i32 {
        (units / self.cell_width).round() as i32
    }

    fn draw_borders(&mut self) {
        let slots = std::mem::take(&mut self.slots);
        for slot in &slots {
            let x0 = self.to_cells(slot.rect.x);
            let x1 = self.to_cells(slot.rect.max_x());
            let y0 = self.to_cells(slot.rect.y);
            // A border thinner than one cell still paints one row.
            let y1 = (y0 + 1).max(self.to_cells(slot.rect.y + slot.rect.height));

            for y in y0..y1 {
                for x in x0..x1 {
                    if x >= 0 && y >= 0 {
                        self.buffer.set(
                            x as u16,
                            y as u16,
                            Cell {
                                char: b' ' as u32,
                                fg: Rgba::TERMINAL_DEFAULT,
                                bg: slot.color,
                                attrs: Attr::UNDERLINE,
                            },
                        );
                    }
                }
            }
        }
        self.slots = slots;
    }

    /// The entered text as an attributed run with the recorded trailing
    /// offsets merged in.
    pub fn spaced_run(&self, text: &str) -> Vec<SpacedChar> {
        text.chars()
            .enumerate()
            .map(|(i, ch)| SpacedChar {
                ch,
                trailing_offset: self.offsets.get(i).copied().unwrap_or(0.0),
                attrs: Attr::BOLD,
            })
            .collect()
    }

    fn draw_text(&mut self, text: &str) {
        let run = self.spaced_run(text);
        let mut x = self.to_cells(self.leading_inset);
        for sc in &run {
            if x >= 0 {
                self.buffer.set(
                    x as u16,
                    0,
                    Cell {
                        char: sc.ch as u32,
                        fg: Rgba::TERMINAL_DEFAULT,
                        bg: Rgba::TERMINAL_DEFAULT,
                        attrs: sc.attrs,
                    },
                );
            }
            x += char_cell_width(sc.ch) as i32 + self.to_cells(sc.trailing_offset);
        }
    }
}

impl TextHost for CellHost {
    fn measure_glyph(&self, ch: char) -> Option<f32> {
        Some(char_cell_width(ch) as f32 * self.cell_width)
    }

    fn set_leading_inset(&mut self, inset: f32) {
        self.leading_inset = inset;
    }

    fn set_char_trailing_offset(&mut self, index: usize, offset: f32) {
        if self.offsets.len() <= index {
            self.offsets.resize(index + 1, 0.0);
        }
        self.offsets[index] = offset;
    }

    fn set_slot_borders(&mut self, slots: &[Slot]) {
        self.slots = slots.to_vec();
    }
}

// =============================================================================
// Tests
// =============================================================================
