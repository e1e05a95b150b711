/// Keyboard and voice navigation over the displayed cards.
///
/// Keeps a focus index; arrows and voice commands move it, Enter/Space
/// selects the focused card, Escape clears the selection.

use winit::keyboard::KeyCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationAction {
    Next,
    Previous,
    First,
    Last,
    Select,
    ClearSelection,
}

/// Effect of an action on the gallery
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// Focus moved to this index
    Focus(usize),
    /// Select the card at this index
    Select(usize),
    /// Clear the selection
    Clear,
    /// Nothing to do (no cards, nothing focused)
    Ignored,
}

impl NavigationAction {
    pub fn from_key(key: KeyCode) -> Option<Self> {
        match key {
            KeyCode::ArrowRight | KeyCode::ArrowDown => Some(NavigationAction::Next),
            KeyCode::ArrowLeft | KeyCode::ArrowUp => Some(NavigationAction::Previous),
            KeyCode::Home => Some(NavigationAction::First),
            KeyCode::End => Some(NavigationAction::Last),
            KeyCode::Enter | KeyCode::NumpadEnter | KeyCode::Space => Some(NavigationAction::Select),
            KeyCode::Escape => Some(NavigationAction::ClearSelection),
            _ => None,
        }
    }

    /// Map a recognised voice phrase (case-insensitive)
    pub fn from_voice(command: &str) -> Option<Self> {
        match command.trim().to_lowercase().as_str() {
            "next" | "next card" | "forward" => Some(NavigationAction::Next),
            "previous" | "previous card" | "back" => Some(NavigationAction::Previous),
            "first" | "first card" => Some(NavigationAction::First),
            "last" | "last card" => Some(NavigationAction::Last),
            "select" | "open" | "choose" => Some(NavigationAction::Select),
            "clear" | "deselect" | "close" => Some(NavigationAction::ClearSelection),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct GalleryNavigation {
    focused: Option<usize>,
    card_count: usize,
}

impl GalleryNavigation {
    pub fn new(card_count: usize) -> Self {
        Self { focused: None, card_count }
    }

    /// Card list changed; focus is dropped if it falls outside
    pub fn set_card_count(&mut self, card_count: usize) {
        self.card_count = card_count;
        if self.focused.is_some_and(|i| i >= card_count) {
            self.focused = None;
        }
    }

    pub fn focused(&self) -> Option<usize> {
        self.focused
    }

    pub fn focus(&mut self, index: Option<usize>) {
        self.focused = index.filter(|&i| i < self.card_count);
    }

    /// Apply an action. Next/Previous wrap around.
    pub fn apply(&mut self, action: NavigationAction) -> NavigationOutcome {
        if self.card_count == 0 {
            return NavigationOutcome::Ignored;
        }
        let last = self.card_count - 1;
        let target = match action {
            NavigationAction::Next => match self.focused {
                Some(i) if i < last => i + 1,
                Some(_) => 0,
                None => 0,
            },
            NavigationAction::Previous => match self.focused {
                Some(0) | None => last,
                Some(i) => i - 1,
            },
            NavigationAction::First => 0,
            NavigationAction::Last => last,
            NavigationAction::Select => {
                return match self.focused {
                    Some(i) => NavigationOutcome::Select(i),
                    None => NavigationOutcome::Ignored,
                };
            }
            NavigationAction::ClearSelection => return NavigationOutcome::Clear,
        };
        self.focused = Some(target);
        NavigationOutcome::Focus(target)
    }
}

#[cfg(test)]
#[path = "navigation_tests.rs"]
mod tests;
