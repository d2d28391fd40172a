//! Roving keyboard navigation shared by both tab bars
//!
//! ```text
//! ArrowLeft / ArrowUp     previous, wrapping to the last
//! ArrowRight / ArrowDown  next, wrapping to the first
//! Home / End              first / last
//! Enter / Space           activate the focused tab
//! ```

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowLeft,
    ArrowUp,
    ArrowRight,
    ArrowDown,
    Home,
    End,
    Enter,
    Space,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value. Unhandled keys return `None` and
    /// keep their default browser behavior.
    pub fn from_dom(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" => Some(Key::ArrowLeft),
            "ArrowUp" => Some(Key::ArrowUp),
            "ArrowRight" => Some(Key::ArrowRight),
            "ArrowDown" => Some(Key::ArrowDown),
            "Home" => Some(Key::Home),
            "End" => Some(Key::End),
            "Enter" => Some(Key::Enter),
            " " => Some(Key::Space),
            _ => None,
        }
    }

    /// Resolve the key against the focused tab at `current` of `len` tabs.
    pub fn resolve(self, current: usize, len: usize) -> Option<KeyCommand> {
        if len == 0 || current >= len {
            return None;
        }
        let last = len - 1;

        let target = match self {
            Key::ArrowLeft | Key::ArrowUp => {
                if current > 0 {
                    current - 1
                } else {
                    last
                }
            }
            Key::ArrowRight | Key::ArrowDown => {
                if current < last {
                    current + 1
                } else {
                    0
                }
            }
            Key::Home => 0,
            Key::End => last,
            Key::Enter | Key::Space => return Some(KeyCommand::Activate(current)),
        };

        Some(KeyCommand::Focus(target))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    /// Move focus to the tab at this index without activating it
    Focus(usize),
    /// Activate the tab at this index
    Activate(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arrows_wrap() {
        assert_eq!(Key::ArrowLeft.resolve(0, 4), Some(KeyCommand::Focus(3)));
        assert_eq!(Key::ArrowUp.resolve(2, 4), Some(KeyCommand::Focus(1)));
        assert_eq!(Key::ArrowRight.resolve(3, 4), Some(KeyCommand::Focus(0)));
        assert_eq!(Key::ArrowDown.resolve(1, 4), Some(KeyCommand::Focus(2)));
    }

    #[test]
    fn test_home_end_and_activation() {
        assert_eq!(Key::Home.resolve(2, 4), Some(KeyCommand::Focus(0)));
        assert_eq!(Key::End.resolve(0, 4), Some(KeyCommand::Focus(3)));
        assert_eq!(Key::Enter.resolve(3, 4), Some(KeyCommand::Activate(3)));
        assert_eq!(Key::Space.resolve(1, 4), Some(KeyCommand::Activate(1)));
    }

    #[test]
    fn test_from_dom() {
        assert_eq!(Key::from_dom(" "), Some(Key::Space));
        assert_eq!(Key::from_dom("End"), Some(Key::End));
        assert_eq!(Key::from_dom("Tab"), None);
        assert_eq!(Key::from_dom("a"), None);
    }

    #[test]
    fn test_out_of_range_focus() {
        assert_eq!(Key::Home.resolve(0, 0), None);
        assert_eq!(Key::End.resolve(5, 4), None);
    }
}
