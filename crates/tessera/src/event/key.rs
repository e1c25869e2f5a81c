//! Keystrokes as delivered to nodes.
use std::fmt;

/// Modifier keys held while a key or mouse event happened.
#[derive(Default, Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Mods {
    /// Shift.
    pub shift: bool,
    /// Control.
    pub ctrl: bool,
    /// Alt or meta.
    pub alt: bool,
}

impl Mods {
    /// Nothing held.
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
    };
    /// Shift alone.
    pub const SHIFT: Self = Self {
        shift: true,
        ..Self::NONE
    };
    /// Control alone.
    pub const CTRL: Self = Self {
        ctrl: true,
        ..Self::NONE
    };
    /// Alt alone.
    pub const ALT: Self = Self {
        alt: true,
        ..Self::NONE
    };

    /// True when no modifier is held.
    pub fn is_empty(self) -> bool {
        self == Self::NONE
    }
}

/// The key that was pressed, independent of modifiers.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum KeyCode {
    /// A printable character.
    Char(char),
    /// Function key, numbered from 1.
    F(u8),
    /// Enter or return.
    Enter,
    /// Escape.
    Esc,
    /// Tab.
    Tab,
    /// Shift+Tab, as most terminals report it.
    BackTab,
    /// Backspace.
    Backspace,
    /// Forward delete.
    Delete,
    /// Insert.
    Insert,
    /// Arrow up.
    Up,
    /// Arrow down.
    Down,
    /// Arrow left.
    Left,
    /// Arrow right.
    Right,
    /// Home.
    Home,
    /// End.
    End,
    /// Page up.
    PageUp,
    /// Page down.
    PageDown,
}

impl From<char> for KeyCode {
    fn from(c: char) -> Self {
        Self::Char(c)
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Char(' ') => f.write_str("space"),
            Self::Char(c) => write!(f, "{c}"),
            Self::F(n) => write!(f, "f{n}"),
            Self::Enter => f.write_str("enter"),
            Self::Esc => f.write_str("esc"),
            Self::Tab => f.write_str("tab"),
            Self::BackTab => f.write_str("backtab"),
            Self::Backspace => f.write_str("backspace"),
            Self::Delete => f.write_str("delete"),
            Self::Insert => f.write_str("insert"),
            Self::Up => f.write_str("up"),
            Self::Down => f.write_str("down"),
            Self::Left => f.write_str("left"),
            Self::Right => f.write_str("right"),
            Self::Home => f.write_str("home"),
            Self::End => f.write_str("end"),
            Self::PageUp => f.write_str("pageup"),
            Self::PageDown => f.write_str("pagedown"),
        }
    }
}

/// A key press with its modifiers.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Key {
    /// Held modifiers.
    pub mods: Mods,
    /// The key itself.
    pub key: KeyCode,
}

impl Key {
    /// A key with the given modifiers.
    pub fn new(mods: Mods, key: impl Into<KeyCode>) -> Self {
        Self {
            mods,
            key: key.into(),
        }
    }

    /// Control plus `key`.
    pub fn ctrl(key: impl Into<KeyCode>) -> Self {
        Self::new(Mods::CTRL, key)
    }

    /// Alt plus `key`.
    pub fn alt(key: impl Into<KeyCode>) -> Self {
        Self::new(Mods::ALT, key)
    }

    /// Is this `code` with no modifiers held?
    pub fn is(&self, code: impl Into<KeyCode>) -> bool {
        self.mods.is_empty() && self.key == code.into()
    }
}

/// Comparing against a bare code or character only matches unmodified keys.
impl PartialEq<KeyCode> for Key {
    fn eq(&self, c: &KeyCode) -> bool {
        self.is(*c)
    }
}

impl PartialEq<char> for Key {
    fn eq(&self, c: &char) -> bool {
        self.is(*c)
    }
}

impl From<KeyCode> for Key {
    fn from(k: KeyCode) -> Self {
        Self::new(Mods::NONE, k)
    }
}

impl From<char> for Key {
    fn from(c: char) -> Self {
        Self::new(Mods::NONE, c)
    }
}

/// Renders as `ctrl-alt-shift-x`.
impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (held, name) in [
            (self.mods.ctrl, "ctrl-"),
            (self.mods.alt, "alt-"),
            (self.mods.shift, "shift-"),
        ] {
            if held {
                f.write_str(name)?;
            }
        }
        write!(f, "{}", self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modifiers_block_plain_match() {
        assert_eq!(Key::from('q'), 'q');
        assert!(Key::ctrl('q') != 'q');
        assert_eq!(Key::from(KeyCode::Up), KeyCode::Up);
        assert!(Key::new(Mods::SHIFT, KeyCode::Tab).mods.shift);
    }

    #[test]
    fn display() {
        assert_eq!(Key::ctrl('c').to_string(), "ctrl-c");
        assert_eq!(Key::alt(KeyCode::PageDown).to_string(), "alt-pagedown");
        assert_eq!(Key::from(' ').to_string(), "space");
        assert_eq!(Key::from(KeyCode::F(5)).to_string(), "f5");
    }
}
