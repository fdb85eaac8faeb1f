//! Free-text entry with the rotary knob.
//!
//! The knob sweeps over a generated alphabet shown one token at a time;
//! the button commits the highlighted token into a bounded input
//! buffer.  Three control tokens close the loop: SPACE appends a blank,
//! DELETE drops the last character, ENTER returns the buffer.
//!
//! Alphabet construction is deterministic: the token order for a given
//! class configuration never changes between runs.

use heapless::{String, Vec};

use crate::config::{GLYPH_CURSOR, INPUT_MAX, POLL_PERIOD_MS};
use crate::error::Error;
use crate::traits::{Context, Delay, RotaryKnob, TextDisplay};
use crate::ui::render::put_line;

/// Upper bound on alphabet length (all classes enabled = 97 tokens).
pub const ALPHABET_MAX: usize = 104;

/// One selectable token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Token {
    Space,
    Char(char),
    Delete,
    Enter,
}

impl Token {
    /// Caption shown on the token row.
    pub fn caption(&self) -> String<8> {
        let mut out = String::new();
        let _ = match self {
            Token::Space => out.push_str("(SPACE)"),
            Token::Delete => out.push_str("(DELETE)"),
            Token::Enter => out.push_str("(ENTER)"),
            Token::Char(c) => out.push(*c).map_err(|_| ()),
        };
        out
    }
}

/// Which symbol characters the alphabet offers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymbolSet {
    /// No symbols at all.
    None,
    /// The full built-in symbol ordering.
    Default,
    /// Only the listed characters, in the listed order, each of which
    /// must be a member of the default set.
    Subset(String<16>),
}

/// Character classes enabled for one text-entry session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharClasses {
    pub space: bool,
    pub upper: bool,
    pub lower: bool,
    pub digits: bool,
    pub symbols: SymbolSet,
}

impl CharClasses {
    /// Everything on - the passphrase-entry configuration.
    pub fn all() -> Self {
        Self {
            space: true,
            upper: true,
            lower: true,
            digits: true,
            symbols: SymbolSet::Default,
        }
    }

    /// Everything on, but symbols restricted to `subset`.
    pub fn with_symbol_subset(subset: &str) -> Self {
        let mut s: String<16> = String::new();
        for c in subset.chars().take(16) {
            let _ = s.push(c);
        }
        Self {
            symbols: SymbolSet::Subset(s),
            ..Self::all()
        }
    }
}

/// Membership test for the default symbol set.
fn is_default_symbol(c: char) -> bool {
    matches!(c as u32, 33..=47 | 58..=64 | 91..=96 | 123..=126)
}

/// Default symbol ordering: two descending ASCII runs, then two
/// ascending ones.  Historical, but fixed - changing it would reshuffle
/// the knob positions users have learned.
fn default_symbols() -> impl Iterator<Item = char> {
    (33..=47u8)
        .rev()
        .chain((58..=64u8).rev())
        .chain(91..=96u8)
        .chain(123..=126u8)
        .map(|b| b as char)
}

/// Build the token sequence for `classes`.
///
/// Order: SPACE, A-Z, a-z, 0-9, symbols, DELETE, ENTER - with disabled
/// classes skipped.  DELETE and ENTER are always present so every
/// session can edit and terminate.
pub fn build_alphabet(classes: &CharClasses) -> Vec<Token, ALPHABET_MAX> {
    let mut out: Vec<Token, ALPHABET_MAX> = Vec::new();
    if classes.space {
        let _ = out.push(Token::Space);
    }
    if classes.upper {
        for c in 'A'..='Z' {
            let _ = out.push(Token::Char(c));
        }
    }
    if classes.lower {
        for c in 'a'..='z' {
            let _ = out.push(Token::Char(c));
        }
    }
    if classes.digits {
        for c in '0'..='9' {
            let _ = out.push(Token::Char(c));
        }
    }
    match &classes.symbols {
        SymbolSet::None => {}
        SymbolSet::Default => {
            for c in default_symbols() {
                let _ = out.push(Token::Char(c));
            }
        }
        SymbolSet::Subset(subset) => {
            for c in subset.chars() {
                if is_default_symbol(c) {
                    let _ = out.push(Token::Char(c));
                }
            }
        }
    }
    let _ = out.push(Token::Delete);
    let _ = out.push(Token::Enter);
    out
}

/// Apply one committed token to the buffer.
///
/// Returns true when the token ends the session (ENTER).  DELETE on an
/// empty buffer is a no-op; appends beyond [`INPUT_MAX`] are dropped.
pub fn apply_token(buf: &mut String<INPUT_MAX>, token: &Token) -> bool {
    match token {
        Token::Enter => return true,
        Token::Delete => {
            let _ = buf.pop();
        }
        Token::Space => {
            if buf.len() < INPUT_MAX {
                let _ = buf.push(' ');
            }
        }
        Token::Char(c) => {
            if buf.len() < INPUT_MAX {
                let _ = buf.push(*c);
            }
        }
    }
    false
}

/// Redraw prompt and buffer preview (rows 0-1) and the token prompt
/// anchor (row 3).
fn render_editor<D: TextDisplay>(display: &mut D, prompt: &str, buf: &str) {
    display.clear();
    put_line(display, 0, prompt);

    // Cursor glyph plus the tail of the buffer that fits next to it.
    let (cols, _) = display.size();
    let avail = (cols as usize).saturating_sub(1);
    let tail_start = buf.len().saturating_sub(avail);
    let mut line: String<48> = String::new();
    let _ = line.push(GLYPH_CURSOR);
    let _ = line.push_str(&buf[tail_start..]);
    put_line(display, 1, &line);

    display.move_to(0, 3);
    display.put_str("> ");
}

/// Replace the caption on the token row.
fn render_token<D: TextDisplay>(display: &mut D, token: &Token) {
    display.move_to(2, 3);
    display.put_str("                  ");
    display.move_to(2, 3);
    display.put_str(&token.caption());
}

impl<D, R, S, W, P, T> Context<D, R, S, W, P, T>
where
    D: TextDisplay,
    R: RotaryKnob,
    T: Delay,
{
    /// Run a text-entry session and return the committed line.
    ///
    /// Returns the empty string when the user selects ENTER right away.
    pub fn read_line(
        &mut self,
        prompt: &str,
        classes: &CharClasses,
    ) -> Result<String<INPUT_MAX>, Error> {
        let alphabet = build_alphabet(classes);
        let mut buf: String<INPUT_MAX> = String::new();

        render_editor(&mut self.display, prompt, &buf);
        self.knob.set_range(0, (alphabet.len() - 1) as u16, 0);
        let mut current = self.knob.value();
        render_token(&mut self.display, &alphabet[current as usize]);

        loop {
            let value = self.knob.value();
            if value != current {
                current = value;
                render_token(&mut self.display, &alphabet[current as usize]);
            }
            if self.knob.button_pressed() {
                let token = alphabet[current as usize];
                let commit = apply_token(&mut buf, &token);
                self.wait_release();
                if commit {
                    return Ok(buf);
                }
                render_editor(&mut self.display, prompt, &buf);
                render_token(&mut self.display, &token);
            }
            self.delay.sleep_ms(POLL_PERIOD_MS);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{ctx, ScriptKnob};

    #[test]
    fn alphabet_is_deterministic() {
        let a = build_alphabet(&CharClasses::all());
        let b = build_alphabet(&CharClasses::all());
        assert_eq!(a, b);
    }

    #[test]
    fn alphabet_full_ordering() {
        let tokens = build_alphabet(&CharClasses::all());
        // SPACE + 26 + 26 + 10 + 32 symbols + DELETE + ENTER
        assert_eq!(tokens.len(), 97);
        assert_eq!(tokens[0], Token::Space);
        assert_eq!(tokens[1], Token::Char('A'));
        assert_eq!(tokens[26], Token::Char('Z'));
        assert_eq!(tokens[27], Token::Char('a'));
        assert_eq!(tokens[53], Token::Char('0'));
        assert_eq!(tokens[63], Token::Char('/')); // first default symbol
        assert_eq!(tokens[95], Token::Delete);
        assert_eq!(tokens[96], Token::Enter);
    }

    #[test]
    fn alphabet_skips_disabled_classes() {
        let classes = CharClasses {
            space: false,
            upper: false,
            lower: true,
            digits: false,
            symbols: SymbolSet::None,
        };
        let tokens = build_alphabet(&classes);
        assert_eq!(tokens.len(), 28);
        assert_eq!(tokens[0], Token::Char('a'));
        assert_eq!(tokens[26], Token::Delete);
        assert_eq!(tokens[27], Token::Enter);
    }

    #[test]
    fn symbol_subset_keeps_order_and_drops_non_members() {
        let classes = CharClasses {
            space: false,
            upper: false,
            lower: false,
            digits: false,
            symbols: SymbolSet::Subset({
                let mut s: String<16> = String::new();
                s.push_str("-a.?").unwrap();
                s
            }),
        };
        let tokens = build_alphabet(&classes);
        // 'a' is not a symbol and is dropped; order of the rest holds.
        assert_eq!(
            &tokens[..3],
            &[Token::Char('-'), Token::Char('.'), Token::Char('?')]
        );
        assert_eq!(tokens.len(), 5);
    }

    #[test]
    fn buffer_never_exceeds_max() {
        let mut buf: String<INPUT_MAX> = String::new();
        for _ in 0..INPUT_MAX + 10 {
            apply_token(&mut buf, &Token::Char('x'));
        }
        assert_eq!(buf.len(), INPUT_MAX);
        apply_token(&mut buf, &Token::Space);
        assert_eq!(buf.len(), INPUT_MAX);
    }

    #[test]
    fn delete_on_empty_is_a_noop() {
        let mut buf: String<INPUT_MAX> = String::new();
        assert!(!apply_token(&mut buf, &Token::Delete));
        assert!(buf.is_empty());
        apply_token(&mut buf, &Token::Char('q'));
        apply_token(&mut buf, &Token::Delete);
        apply_token(&mut buf, &Token::Delete);
        assert!(buf.is_empty());
    }

    #[test]
    fn immediate_enter_returns_empty_string() {
        let mut c = ctx();
        let enter_index = (build_alphabet(&CharClasses::all()).len() - 1) as u16;
        c.knob = ScriptKnob::new(&[0, enter_index], &[true, false]);
        let line = c.read_line("Input:", &CharClasses::all()).unwrap();
        assert_eq!(line.as_str(), "");
    }

    #[test]
    fn typed_characters_commit_in_order() {
        let mut c = ctx();
        let alphabet = build_alphabet(&CharClasses::all());
        let enter_index = (alphabet.len() - 1) as u16;
        // 'A' is index 1, 'b' is index 28.
        c.knob = ScriptKnob::new(
            &[0, 1, 1, 28, 28, enter_index, enter_index],
            &[false, true, false, false, true, false, false, true, false],
        );
        let line = c.read_line("Input:", &CharClasses::all()).unwrap();
        assert_eq!(line.as_str(), "Ab");
        // Prompt and buffer preview were re-rendered after each commit.
        assert_eq!(c.display.row_text(0), "Input:");
        assert_eq!(c.display.row_text(1), "\u{0}Ab");
    }

    #[test]
    fn token_row_shows_current_caption() {
        let mut c = ctx();
        let enter_index = (build_alphabet(&CharClasses::all()).len() - 1) as u16;
        c.knob = ScriptKnob::new(&[0, enter_index], &[false, true, false]);
        c.read_line("Input:", &CharClasses::all()).unwrap();
        // Last caption drawn before commit was ENTER's.
        assert_eq!(c.display.row_text(3), "> (ENTER)");
    }
}
