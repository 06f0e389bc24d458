/// Events delivered to nodes of a rendering surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Pointer click / activation
    Click,
    /// Node lost focus
    Blur,
    /// Key press, targeted at the focused node
    Key(Key),
    /// Pointer button pressed at horizontal position `x`
    PointerDown { x: i32 },
    /// Pointer moved while tracked
    PointerMove { x: i32 },
    /// Pointer button released
    PointerUp { x: i32 },
    /// Application-level notification (e.g. `row-expand`)
    Custom { name: String, detail: String },
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Click => EventKind::Click,
            Event::Blur => EventKind::Blur,
            Event::Key(_) => EventKind::Key,
            Event::PointerDown { .. } => EventKind::PointerDown,
            Event::PointerMove { .. } => EventKind::PointerMove,
            Event::PointerUp { .. } => EventKind::PointerUp,
            Event::Custom { .. } => EventKind::Custom,
        }
    }

    pub fn custom(name: impl Into<String>, detail: impl Into<String>) -> Self {
        Event::Custom {
            name: name.into(),
            detail: detail.into(),
        }
    }
}

/// Discriminant used to register listeners
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    Blur,
    Key,
    PointerDown,
    PointerMove,
    PointerUp,
    Custom,
}

/// Simplified key representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Enter,
    Escape,
    Tab,
    BackTab,
    Backspace,
    Delete,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    Other,
}

impl From<crossterm::event::KeyCode> for Key {
    fn from(code: crossterm::event::KeyCode) -> Self {
        use crossterm::event::KeyCode;
        match code {
            KeyCode::Char(c) => Key::Char(c),
            KeyCode::Enter => Key::Enter,
            KeyCode::Esc => Key::Escape,
            KeyCode::Tab => Key::Tab,
            KeyCode::BackTab => Key::BackTab,
            KeyCode::Backspace => Key::Backspace,
            KeyCode::Delete => Key::Delete,
            KeyCode::Up => Key::Up,
            KeyCode::Down => Key::Down,
            KeyCode::Left => Key::Left,
            KeyCode::Right => Key::Right,
            KeyCode::Home => Key::Home,
            KeyCode::End => Key::End,
            KeyCode::PageUp => Key::PageUp,
            KeyCode::PageDown => Key::PageDown,
            _ => Key::Other,
        }
    }
}

impl From<crossterm::event::KeyEvent> for Event {
    fn from(key: crossterm::event::KeyEvent) -> Self {
        Event::Key(key.code.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    #[test]
    fn crossterm_keys_convert() {
        assert_eq!(Key::from(KeyCode::Enter), Key::Enter);
        assert_eq!(Key::from(KeyCode::Esc), Key::Escape);
        assert_eq!(Key::from(KeyCode::Char('q')), Key::Char('q'));
        assert_eq!(Key::from(KeyCode::F(5)), Key::Other);

        let ev: Event = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE).into();
        assert_eq!(ev, Event::Key(Key::Enter));
        assert_eq!(ev.kind(), EventKind::Key);
    }
}
