use crossterm::{
    Command, cursor as ccursor,
    style::{self, Attribute, SetAttribute},
    terminal,
};

use super::{Cap, Capabilities};
use crate::style::Attr;

/// Capabilities of an ANSI/xterm-compatible terminal. Cursor, screen and
/// color operations are compiled through crossterm's command set; scroll
/// region and line insertion use their standard CSI sequences.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnsiCaps;

/// Render a crossterm command into its ANSI string.
fn ansi(cmd: impl Command) -> Vec<u8> {
    let mut s = String::new();
    // Writing into a String cannot fail.
    drop(cmd.write_ansi(&mut s));
    s.into_bytes()
}

/// Clamp a count or coordinate into crossterm's u16 range.
fn u16c(v: u32) -> u16 {
    v.min(u32::from(u16::MAX)) as u16
}

/// Compile a packed attribute word: reset, then colors, then flags.
fn attr(a: Attr) -> Vec<u8> {
    let mut out = ansi(SetAttribute(Attribute::Reset));
    if let Some(fg) = a.fg() {
        out.extend(ansi(style::SetForegroundColor(style::Color::AnsiValue(fg))));
    }
    if let Some(bg) = a.bg() {
        out.extend(ansi(style::SetBackgroundColor(style::Color::AnsiValue(bg))));
    }
    let s = a.attrs();
    let flags = [
        (s.bold, Attribute::Bold),
        (s.dim, Attribute::Dim),
        (s.italic, Attribute::Italic),
        (s.underline, Attribute::Underlined),
        (s.crossedout, Attribute::CrossedOut),
        (s.inverse, Attribute::Reverse),
    ];
    for (on, at) in flags {
        if on {
            out.extend(ansi(SetAttribute(at)));
        }
    }
    out
}

impl Capabilities for AnsiCaps {
    fn compile(&self, cap: &Cap) -> Option<Vec<u8>> {
        Some(match *cap {
            Cap::CursorTo { x, y } => ansi(ccursor::MoveTo(u16c(x), u16c(y))),
            Cap::CursorUp(n) => ansi(ccursor::MoveUp(u16c(n))),
            Cap::CursorDown(n) => ansi(ccursor::MoveDown(u16c(n))),
            Cap::CursorLeft(n) => ansi(ccursor::MoveLeft(u16c(n))),
            Cap::CursorRight(n) => ansi(ccursor::MoveRight(u16c(n))),
            Cap::InsertLines(n) => format!("\x1b[{n}L").into_bytes(),
            Cap::DeleteLines(n) => format!("\x1b[{n}M").into_bytes(),
            Cap::SetScrollRegion { top, bottom } => {
                format!("\x1b[{};{}r", top + 1, bottom + 1).into_bytes()
            }
            Cap::ResetScrollRegion => b"\x1b[r".to_vec(),
            Cap::Attr(a) => attr(a),
            Cap::EnterAltScreen => ansi(terminal::EnterAlternateScreen),
            Cap::ExitAltScreen => ansi(terminal::LeaveAlternateScreen),
            Cap::ShowCursor => ansi(ccursor::Show),
            Cap::HideCursor => ansi(ccursor::Hide),
            Cap::Clear => ansi(terminal::Clear(terminal::ClearType::All)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{AttrSet, Attribute as A, Color};

    fn s(cap: Cap) -> String {
        String::from_utf8(AnsiCaps.compile(&cap).unwrap()).unwrap()
    }

    #[test]
    fn sequences() {
        assert_eq!(s(Cap::CursorTo { x: 0, y: 0 }), "\x1b[1;1H");
        assert_eq!(s(Cap::CursorTo { x: 4, y: 2 }), "\x1b[3;5H");
        assert_eq!(s(Cap::CursorRight(3)), "\x1b[3C");
        assert_eq!(s(Cap::DeleteLines(2)), "\x1b[2M");
        assert_eq!(s(Cap::InsertLines(1)), "\x1b[1L");
        assert_eq!(s(Cap::SetScrollRegion { top: 1, bottom: 5 }), "\x1b[2;6r");
        assert_eq!(s(Cap::ResetScrollRegion), "\x1b[r");
        assert!(AnsiCaps.scroll_region());
    }

    #[test]
    fn attributes() {
        assert_eq!(s(Cap::Attr(Attr::default())), "\x1b[0m");
        let a = Attr::new(Color::AnsiValue(196), Color::Default, AttrSet::new(A::Bold));
        let out = s(Cap::Attr(a));
        assert!(out.starts_with("\x1b[0m"));
        assert!(out.contains("196"));
        assert!(out.ends_with("\x1b[1m"));
    }
}
