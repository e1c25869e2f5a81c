use std::{
    io::{self, Stderr, Write},
    sync::mpsc,
    thread,
};

use crossterm::{ExecutableCommand, cursor as ccursor, event as cevent, terminal};

use super::Terminal;
use crate::{
    error::Result,
    event::{Event, key, mouse},
    geom::{Expanse, Point},
    runloop::ChannelSource,
};

/// A terminal on stderr, driven through crossterm.
#[derive(Debug)]
pub struct CrosstermTerminal {
    /// Output handle.
    fp: Stderr,
    /// Capture mouse input while started.
    mouse: bool,
    /// Is raw mode active?
    started: bool,
}

impl CrosstermTerminal {
    /// A terminal on stderr. With `mouse`, mouse capture is enabled while
    /// the terminal is started.
    pub fn new(mouse: bool) -> Self {
        Self {
            fp: io::stderr(),
            mouse,
            started: false,
        }
    }

    /// Enter raw mode and enable mouse capture.
    fn enter(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        if self.mouse {
            self.fp.execute(cevent::EnableMouseCapture)?;
        }
        Ok(())
    }

    /// Disable mouse capture and leave raw mode.
    fn exit(&mut self) -> io::Result<()> {
        if self.mouse {
            self.fp.execute(cevent::DisableMouseCapture)?;
        }
        terminal::disable_raw_mode()?;
        Ok(())
    }
}

impl Default for CrosstermTerminal {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Terminal for CrosstermTerminal {
    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        Ok(self.fp.write_all(bytes)?)
    }

    fn flush(&mut self) -> Result<()> {
        Ok(self.fp.flush()?)
    }

    fn size(&self) -> Result<Expanse> {
        let (w, h) = terminal::size()?;
        Ok(Expanse::new(w.into(), h.into()))
    }

    fn cursor(&mut self) -> Result<Point> {
        let (x, y) = ccursor::position()?;
        Ok(Point {
            x: x.into(),
            y: y.into(),
        })
    }

    fn start(&mut self) -> Result<()> {
        if !self.started {
            self.enter()?;
            self.started = true;
        }
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        if self.started {
            self.started = false;
            self.exit()?;
        }
        Ok(())
    }
}

/// Modifier state from crossterm's bitflags.
fn mods(m: cevent::KeyModifiers) -> key::Mods {
    key::Mods {
        shift: m.contains(cevent::KeyModifiers::SHIFT),
        ctrl: m.contains(cevent::KeyModifiers::CONTROL),
        alt: m.contains(cevent::KeyModifiers::ALT),
    }
}

fn button(b: cevent::MouseButton) -> mouse::Button {
    match b {
        cevent::MouseButton::Left => mouse::Button::Left,
        cevent::MouseButton::Right => mouse::Button::Right,
        cevent::MouseButton::Middle => mouse::Button::Middle,
    }
}

/// Map a crossterm key. Keys with no counterpart are dropped.
fn key_code(k: cevent::KeyCode) -> Option<key::KeyCode> {
    use key::KeyCode as K;
    let code = match k {
        cevent::KeyCode::Char(c) => K::Char(c),
        cevent::KeyCode::F(n) => K::F(n),
        cevent::KeyCode::Enter => K::Enter,
        cevent::KeyCode::Esc => K::Esc,
        cevent::KeyCode::Tab => K::Tab,
        cevent::KeyCode::BackTab => K::BackTab,
        cevent::KeyCode::Backspace => K::Backspace,
        cevent::KeyCode::Delete => K::Delete,
        cevent::KeyCode::Insert => K::Insert,
        cevent::KeyCode::Up => K::Up,
        cevent::KeyCode::Down => K::Down,
        cevent::KeyCode::Left => K::Left,
        cevent::KeyCode::Right => K::Right,
        cevent::KeyCode::Home => K::Home,
        cevent::KeyCode::End => K::End,
        cevent::KeyCode::PageUp => K::PageUp,
        cevent::KeyCode::PageDown => K::PageDown,
        _ => return None,
    };
    Some(code)
}

/// Map a crossterm mouse action. Horizontal wheel motion is dropped.
fn mouse_kind(k: cevent::MouseEventKind) -> Option<mouse::MouseKind> {
    use mouse::MouseKind as M;
    Some(match k {
        cevent::MouseEventKind::Down(b) => M::Press(button(b)),
        cevent::MouseEventKind::Up(b) => M::Release(button(b)),
        cevent::MouseEventKind::Drag(b) => M::Drag(button(b)),
        cevent::MouseEventKind::Moved => M::Move,
        cevent::MouseEventKind::ScrollDown => M::Wheel(1),
        cevent::MouseEventKind::ScrollUp => M::Wheel(-1),
        cevent::MouseEventKind::ScrollLeft | cevent::MouseEventKind::ScrollRight => return None,
    })
}

/// Convert a crossterm event. Key releases, focus changes and pastes yield
/// nothing.
fn translate_event(e: cevent::Event) -> Option<Event> {
    Some(match e {
        cevent::Event::Key(k) if k.kind == cevent::KeyEventKind::Release => return None,
        cevent::Event::Key(k) => Event::Key(key::Key {
            mods: mods(k.modifiers),
            key: key_code(k.code)?,
        }),
        cevent::Event::Mouse(m) => Event::Mouse(mouse::MouseEvent {
            kind: mouse_kind(m.kind)?,
            mods: mods(m.modifiers),
            at: Point {
                x: m.column.into(),
                y: m.row.into(),
            },
        }),
        cevent::Event::Resize(x, y) => Event::Resize(Expanse::new(x.into(), y.into())),
        cevent::Event::FocusGained | cevent::Event::FocusLost | cevent::Event::Paste(_) => {
            return None;
        }
    })
}

/// Start reading terminal input on a background thread. Events arrive
/// through the returned source. The thread ends when the source is dropped
/// or reading fails.
pub fn events() -> ChannelSource {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        loop {
            let raw = match cevent::read() {
                Ok(raw) => raw,
                Err(e) => {
                    tracing::error!(error = %e, "terminal input failed");
                    return;
                }
            };
            if let Some(evt) = translate_event(raw)
                && tx.send(evt).is_err()
            {
                return;
            }
        }
    });
    ChannelSource::new(rx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{key::KeyCode, mouse::MouseKind};

    #[test]
    fn keys_translate() {
        let e = cevent::Event::Key(cevent::KeyEvent::new(
            cevent::KeyCode::Char('c'),
            cevent::KeyModifiers::CONTROL,
        ));
        assert_eq!(translate_event(e), Some(Event::Key(key::Key::ctrl('c'))));

        let e = cevent::Event::Key(cevent::KeyEvent::new(
            cevent::KeyCode::CapsLock,
            cevent::KeyModifiers::NONE,
        ));
        assert_eq!(translate_event(e), None);

        let e = cevent::Event::Key(cevent::KeyEvent::new(
            cevent::KeyCode::PageDown,
            cevent::KeyModifiers::NONE,
        ));
        assert_eq!(translate_event(e), Some(Event::Key(KeyCode::PageDown.into())));
    }

    #[test]
    fn wheel_and_clicks_translate() {
        let raw = |kind| {
            cevent::Event::Mouse(cevent::MouseEvent {
                kind,
                column: 4,
                row: 2,
                modifiers: cevent::KeyModifiers::NONE,
            })
        };
        assert_eq!(
            translate_event(raw(cevent::MouseEventKind::ScrollUp)),
            Some(Event::Mouse(mouse::MouseEvent::new(MouseKind::Wheel(-1), 4, 2)))
        );
        assert_eq!(
            translate_event(raw(cevent::MouseEventKind::Down(cevent::MouseButton::Left))),
            Some(Event::Mouse(mouse::MouseEvent::new(
                MouseKind::Press(mouse::Button::Left),
                4,
                2
            )))
        );
        assert_eq!(translate_event(raw(cevent::MouseEventKind::ScrollLeft)), None);
        assert_eq!(translate_event(cevent::Event::FocusLost), None);
    }
}
