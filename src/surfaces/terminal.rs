//! [`TerminalSurface`]: draws the effect on a single terminal line.

use crate::surface::Surface;
use crossterm::cursor::MoveToColumn;
use crossterm::queue;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};
use std::io::{self, Write};
use std::time::Duration;

struct Caret {
    glyph: String,
    displayed: bool,
    lit: bool,
}

/// Renders onto one line of an ANSI terminal, stdout by default.
///
/// Every change clears the line and redraws the colored text followed by
/// the cursor glyph.
pub struct TerminalSurface {
    out: Box<dyn Write + Send>,
    text: String,
    color: Option<Color>,
    caret: Option<Caret>,
}

impl TerminalSurface {
    /// A surface drawing to stdout.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    /// A surface drawing to an arbitrary writer.
    pub fn new(out: impl Write + Send + 'static) -> Self {
        Self {
            out: Box::new(out),
            text: String::new(),
            color: None,
            caret: None,
        }
    }

    /// Seed the surface with text that is considered already on screen.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    fn redraw(&mut self) -> io::Result<()> {
        queue!(self.out, MoveToColumn(0), Clear(ClearType::CurrentLine))?;
        match self.color {
            Some(color) => queue!(
                self.out,
                SetForegroundColor(color),
                Print(&self.text),
                ResetColor
            )?,
            None => queue!(self.out, Print(&self.text))?,
        }
        if let Some(caret) = self.caret.as_ref().filter(|caret| caret.displayed) {
            if caret.lit {
                queue!(self.out, Print(&caret.glyph))?;
            } else {
                // Keep the line width stable while the glyph is dark.
                let blank = " ".repeat(caret.glyph.chars().count());
                queue!(self.out, Print(blank))?;
            }
        }
        self.out.flush()
    }

    fn refresh(&mut self) {
        if let Err(err) = self.redraw() {
            tracing::warn!(%err, "terminal redraw failed");
        }
    }
}

impl Surface for TerminalSurface {
    fn text(&self) -> String {
        self.text.clone()
    }

    fn set_text(&mut self, text: &str) {
        self.text = text.to_owned();
        self.refresh();
    }

    fn set_color(&mut self, color: &str) {
        self.color = parse_color(color);
        self.refresh();
    }

    fn attach_cursor(&mut self, glyph: &str, _blink: Duration) {
        self.caret = Some(Caret {
            glyph: glyph.to_owned(),
            displayed: true,
            lit: true,
        });
        self.refresh();
    }

    fn set_cursor_displayed(&mut self, displayed: bool) {
        if let Some(caret) = self.caret.as_mut() {
            caret.displayed = displayed;
            self.refresh();
        }
    }

    fn set_cursor_lit(&mut self, lit: bool) {
        if let Some(caret) = self.caret.as_mut() {
            caret.lit = lit;
            self.refresh();
        }
    }

    fn detach_cursor(&mut self) {
        if self.caret.take().is_some() {
            self.refresh();
        }
    }
}

/// Map a color descriptor onto a terminal [`Color`].
///
/// Supports the eight basic color names, their `bright-` variants,
/// `#rrggbb` and `rgb(r, g, b)`. `inherit` and anything unrecognised yield
/// `None`, leaving the terminal's own color in place.
pub fn parse_color(spec: &str) -> Option<Color> {
    let spec = spec.trim().to_ascii_lowercase();
    if let Some(hex) = spec.strip_prefix('#') {
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        return Some(Color::Rgb {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
        });
    }
    if let Some(body) = spec.strip_prefix("rgb(").and_then(|s| s.strip_suffix(')')) {
        let mut parts = body.split(',').map(|part| part.trim().parse::<u8>());
        let (r, g, b) = (parts.next()?.ok()?, parts.next()?.ok()?, parts.next()?.ok()?);
        if parts.next().is_some() {
            return None;
        }
        return Some(Color::Rgb { r, g, b });
    }

    let color = match spec.as_str() {
        "black" => Color::Black,
        "red" => Color::DarkRed,
        "green" => Color::DarkGreen,
        "yellow" => Color::DarkYellow,
        "blue" => Color::DarkBlue,
        "magenta" => Color::DarkMagenta,
        "cyan" => Color::DarkCyan,
        "white" => Color::Grey,
        "bright-black" => Color::DarkGrey,
        "bright-red" => Color::Red,
        "bright-green" => Color::Green,
        "bright-yellow" => Color::Yellow,
        "bright-blue" => Color::Blue,
        "bright-magenta" => Color::Magenta,
        "bright-cyan" => Color::Cyan,
        "bright-white" => Color::White,
        _ => return None,
    };
    Some(color)
}
