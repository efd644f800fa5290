use crate::parse::panel_seed;

/// Keystrokes the modal command input reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelKey {
    Char(char),
    Enter,
    Escape,
    Backspace,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelAction {
    /// The buffer changed; the panel stays open.
    Edited,
    /// Enter: hand the full buffer to the dispatcher.
    Submit(String),
    /// Escape, or Backspace with only the seed left.
    Exit,
}

/// The text state of the modal command input. Rendering belongs to the
/// host; this only tracks the buffer and its terminal keystrokes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelController {
    buffer: String,
}

impl PanelController {
    pub fn new(prompt_char: char) -> Self {
        Self {
            buffer: panel_seed(prompt_char),
        }
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Replace the buffer wholesale, for hosts backed by a native text
    /// field.
    pub fn set_buffer(&mut self, buffer: impl Into<String>) {
        self.buffer = buffer.into();
    }

    pub fn handle_key(&mut self, key: PanelKey) -> PanelAction {
        match key {
            PanelKey::Enter => PanelAction::Submit(self.buffer.clone()),
            PanelKey::Escape => PanelAction::Exit,
            PanelKey::Backspace => {
                if self.buffer.chars().count() <= 2 {
                    return PanelAction::Exit;
                }
                self.buffer.pop();
                PanelAction::Edited
            }
            PanelKey::Char(c) => {
                self.buffer.push(c);
                PanelAction::Edited
            }
        }
    }
}
