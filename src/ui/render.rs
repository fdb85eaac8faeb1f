//! Shared text rendering helpers over the display sink.
//!
//! Nothing here knows about screens or flows; these are the line-level
//! primitives every view is built from.  All output truncates to the
//! sink's column width.

use heapless::String;

use crate::config::LCD_COLS;
use crate::traits::TextDisplay;

/// Longest line any helper will emit in one write.
const LINE_MAX: usize = 48;

/// Write `text` at the start of `row`, truncated to the display width.
pub fn put_line<D: TextDisplay>(display: &mut D, row: u8, text: &str) {
    let (cols, _) = display.size();
    let mut line: String<LINE_MAX> = String::new();
    for c in text.chars().take((cols as usize).min(LINE_MAX)) {
        let _ = line.push(c);
    }
    display.move_to(0, row);
    display.put_str(&line);
}

/// Pad `text` on both sides to the nominal display width.
///
/// Full-width padding matters: tracking loops overwrite the price row in
/// place without clearing, so a shorter value must blank the remainder
/// of the previous one.
pub fn centered(text: &str) -> String<LCD_COLS> {
    let mut out: String<LCD_COLS> = String::new();
    let len = text.chars().count().min(LCD_COLS);
    let lead = (LCD_COLS - len) / 2;
    for _ in 0..lead {
        let _ = out.push(' ');
    }
    for c in text.chars().take(len) {
        let _ = out.push(c);
    }
    while out.len() < LCD_COLS {
        let _ = out.push(' ');
    }
    out
}

/// Clear the screen and show `text`, wrapped across rows.
pub fn status<D: TextDisplay>(display: &mut D, text: &str) {
    display.clear();
    let (cols, rows) = display.size();
    let cols = (cols as usize).min(LINE_MAX);
    let mut line: String<LINE_MAX> = String::new();
    let mut row = 0u8;
    for c in text.chars() {
        let _ = line.push(c);
        if line.len() == cols {
            display.move_to(0, row);
            display.put_str(&line);
            line.clear();
            row += 1;
            if row >= rows {
                return;
            }
        }
    }
    if !line.is_empty() {
        display.move_to(0, row);
        display.put_str(&line);
    }
}

/// Star-framed two-line banner, the device's "big message" format.
pub fn banner<D: TextDisplay>(display: &mut D, upper: &str, lower: &str) {
    display.clear();
    put_line(display, 0, "********************");
    put_line(display, 1, &framed(upper));
    put_line(display, 2, &framed(lower));
    put_line(display, 3, "********************");
}

fn framed(text: &str) -> String<LCD_COLS> {
    let row = centered(text);
    // Stamp the frame over the outermost padding columns.
    let mut out: String<LCD_COLS> = String::new();
    let _ = out.push('*');
    for c in row.chars().skip(1).take(LCD_COLS - 2) {
        let _ = out.push(c);
    }
    let _ = out.push('*');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::MockDisplay;

    #[test]
    fn centered_pads_both_sides_to_full_width() {
        let line = centered("42.5 USD");
        assert_eq!(line.len(), LCD_COLS);
        assert_eq!(line.as_str(), "      42.5 USD      ");
    }

    #[test]
    fn centered_truncates_overlong_text() {
        let line = centered("0123456789012345678901234");
        assert_eq!(line.as_str(), "01234567890123456789");
    }

    #[test]
    fn put_line_truncates_to_display_width() {
        let mut d = MockDisplay::new();
        put_line(&mut d, 1, "abcdefghijklmnopqrstuvwxyz");
        assert_eq!(d.row_text(1), "abcdefghijklmnopqrst");
    }

    #[test]
    fn status_wraps_across_rows() {
        let mut d = MockDisplay::new();
        status(&mut d, "Couldn't connect to the internet!");
        assert_eq!(d.row_text(0), "Couldn't connect to ");
        assert_eq!(d.row_text(1), "the internet!");
    }

    #[test]
    fn banner_is_star_framed() {
        let mut d = MockDisplay::new();
        banner(&mut d, "LOADING", "CONFIG");
        assert_eq!(d.row_text(0), "********************");
        assert!(d.row_text(1).starts_with('*') && d.row_text(1).ends_with('*'));
        assert!(d.row_text(1).contains("LOADING"));
        assert!(d.row_text(2).contains("CONFIG"));
    }
}
