use winit::{
    event::{ElementState, KeyEvent},
    keyboard::{Key, NamedKey},
};

/// What a key press asks the scene to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputAction {
    None,
    /// Enter was pressed with text in the buffer. The buffer is kept until the
    /// label was stored.
    Commit(String),
}

/// The text field labels are typed into.
#[derive(Debug, Clone, Default)]
pub struct LabelInput {
    buffer: String,
}

impl LabelInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.buffer
    }

    pub fn push_text(&mut self, text: &str) {
        self.buffer
            .extend(text.chars().filter(|c| !c.is_control()));
    }

    pub fn backspace(&mut self) {
        self.buffer.pop();
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    pub fn commit(&self) -> InputAction {
        if self.buffer.is_empty() {
            InputAction::None
        } else {
            InputAction::Commit(self.buffer.clone())
        }
    }

    pub fn handle_key_event(&mut self, event: &KeyEvent) -> InputAction {
        if event.state != ElementState::Pressed {
            return InputAction::None;
        }
        self.apply_key(&event.logical_key, event.text.as_deref())
    }

    /// Apply one pressed key with the text it produced.
    pub fn apply_key(&mut self, key: &Key, text: Option<&str>) -> InputAction {
        match key {
            Key::Named(NamedKey::Enter) => self.commit(),
            Key::Named(NamedKey::Backspace) => {
                self.backspace();
                InputAction::None
            }
            _ => {
                if let Some(text) = text {
                    self.push_text(text);
                }
                InputAction::None
            }
        }
    }
}
