//! Text-entry collaborator of the draggable label
//!
//! The label never owns a text widget. It talks to whatever is mounted
//! behind a [`TextInputPort`], and every call is a no-op while nothing is.

/// A text-entry widget the label can focus and read
pub trait TextEditTarget {
    fn focus(&mut self);
    fn blur(&mut self);
    fn text(&self) -> String;
}

/// Optional slot for a [`TextEditTarget`]
pub struct TextInputPort {
    target: Option<Box<dyn TextEditTarget>>,
    last_text: String,
}

impl TextInputPort {
    /// An unmounted port that reports `fallback` as its text
    pub fn new(fallback: impl Into<String>) -> Self {
        Self {
            target: None,
            last_text: fallback.into(),
        }
    }

    /// Attach a widget, replacing any previous one
    pub fn mount(&mut self, target: Box<dyn TextEditTarget>) {
        self.target = Some(target);
    }

    /// Detach the widget, remembering its last text
    pub fn unmount(&mut self) -> Option<Box<dyn TextEditTarget>> {
        let target = self.target.take()?;
        self.last_text = target.text();
        Some(target)
    }

    pub fn is_mounted(&self) -> bool {
        self.target.is_some()
    }

    pub fn focus(&mut self) {
        match self.target.as_mut() {
            Some(target) => target.focus(),
            None => tracing::trace!("focus on unmounted text input"),
        }
    }

    pub fn blur(&mut self) {
        match self.target.as_mut() {
            Some(target) => target.blur(),
            None => tracing::trace!("blur on unmounted text input"),
        }
    }

    /// Current text, or the last known text while unmounted
    pub fn text(&self) -> String {
        match &self.target {
            Some(target) => target.text(),
            None => self.last_text.clone(),
        }
    }
}

impl std::fmt::Debug for TextInputPort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextInputPort")
            .field("mounted", &self.is_mounted())
            .field("last_text", &self.last_text)
            .finish()
    }
}

/// In-memory text field, for headless hosts
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextBuffer {
    pub text: String,
    pub focused: bool,
}

impl TextBuffer {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            focused: false,
        }
    }
}

impl TextEditTarget for TextBuffer {
    fn focus(&mut self) {
        self.focused = true;
    }

    fn blur(&mut self) {
        self.focused = false;
    }

    fn text(&self) -> String {
        self.text.clone()
    }
}
