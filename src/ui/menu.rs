//! Paged menu selection driven by the rotary knob.
//!
//! The item list is partitioned into pages of 3 rows (when a title line
//! is shown) or 4 rows (when not).  The knob counter is bound to the
//! full item range; turning it moves a cursor whose page and row are
//! derived on demand, and pressing the button confirms the item under
//! the cursor.

use heapless::String;

use crate::config::{GLYPH_CURSOR, POLL_PERIOD_MS};
use crate::error::Error;
use crate::traits::{Context, Delay, RotaryKnob, TextDisplay};
use crate::ui::render::put_line;
use crate::ui::MenuItem;

/// Items per page: a title line costs one row.
pub fn page_size(has_title: bool) -> usize {
    if has_title {
        3
    } else {
        4
    }
}

/// Page holding `cursor`.
pub fn page_of(cursor: usize, page_size: usize) -> usize {
    cursor / page_size
}

/// Row of `cursor` within its page.
pub fn row_of(cursor: usize, page_size: usize) -> usize {
    cursor % page_size
}

/// Redraw the page containing `cursor`, marking the cursor row.
fn render_page<D: TextDisplay>(
    display: &mut D,
    items: &[MenuItem],
    title: Option<&str>,
    cursor: usize,
) {
    let size = page_size(title.is_some());
    let selected = row_of(cursor, size);
    let start = page_of(cursor, size) * size;

    display.clear();
    let mut row = 0u8;
    if let Some(text) = title {
        put_line(display, 0, text);
        row = 1;
    }
    for (offset, item) in items.iter().skip(start).take(size).enumerate() {
        let mut line: String<40> = String::new();
        let _ = line.push(if offset == selected { GLYPH_CURSOR } else { ' ' });
        let _ = line.push_str(&item.render());
        put_line(display, row, &line);
        row += 1;
    }
}

impl<D, R, S, W, P, T> Context<D, R, S, W, P, T>
where
    D: TextDisplay,
    R: RotaryKnob,
    T: Delay,
{
    /// Run a menu over `items` and return the confirmed selection.
    ///
    /// The caller must hand in at least one item; an empty list is a
    /// flow bug and reports as [`Error::EmptyMenu`].  Returns a
    /// reference into `items` so callers can branch on the variant.
    pub fn select<'a>(
        &mut self,
        items: &'a [MenuItem],
        title: Option<&str>,
    ) -> Result<&'a MenuItem, Error> {
        if items.is_empty() {
            return Err(Error::EmptyMenu);
        }

        render_page(&mut self.display, items, title, 0);
        self.knob.set_range(0, (items.len() - 1) as u16, 0);
        let mut current = self.knob.value();

        loop {
            let value = self.knob.value();
            if value != current {
                current = value;
                render_page(&mut self.display, items, title, current as usize);
            }
            if self.knob.button_pressed() {
                // Confirm whatever the counter says *now*, even if the
                // turn and the press landed on the same tick.
                let chosen = &items[current as usize];
                self.wait_release();
                return Ok(chosen);
            }
            self.delay.sleep_ms(POLL_PERIOD_MS);
        }
    }
}
