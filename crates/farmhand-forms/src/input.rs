//! A text input that buffers edits until blur.
//!
//! Committing on every keystroke makes sluggish apps: each keypress would
//! round-trip through the owner's state (and possibly the API) before the
//! character shows up. Instead, edits accumulate in a local buffer while the
//! control has focus, and the owner sees a single commit when focus leaves.

/// The edit-buffer state machine behind a single form control.
///
/// While unfocused, the control displays the owner's committed value. On
/// focus it starts buffering local edits; on blur it either hands the buffer
/// to the owner for committing or discards it. The controller never holds
/// state past a blur: the owner is the sole source of truth for the
/// committed value, and must keep re-supplying it to [`display`](Self::display).
#[derive(Debug, Clone, Default)]
pub struct BufferedInput {
    /// The local draft. Only meaningful while editing.
    buffer: String,
    is_editing: bool,
    /// Allow the user to empty out the form control. If unset, the control
    /// resets itself to the previous value on blur.
    allow_empty: bool,
}

impl BufferedInput {
    /// Creates a control that discards empty edits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether blurring with an empty buffer still commits (builder).
    pub fn with_allow_empty(mut self, allow_empty: bool) -> Self {
        self.allow_empty = allow_empty;
        self
    }

    /// Whether the control is currently buffering edits.
    pub fn is_editing(&self) -> bool {
        self.is_editing
    }

    /// The value to render: the draft while editing, the owner's committed
    /// value otherwise.
    pub fn display<'a>(&'a self, committed: &'a str) -> &'a str {
        if self.is_editing { &self.buffer } else { committed }
    }

    /// Called when the control gains focus. Starts editing with the owner's
    /// committed value as the initial draft. A focus event while already
    /// editing keeps the current draft.
    pub fn focus(&mut self, committed: &str) {
        if self.is_editing {
            return;
        }
        self.is_editing = true;
        self.buffer = committed.to_owned();
    }

    /// Called on every edit event. Replaces the draft. Change events outside
    /// an editing session are dropped, matching how focus-driven widgets
    /// deliver events.
    pub fn change(&mut self, text: impl Into<String>) {
        if !self.is_editing {
            return;
        }
        self.buffer = text.into();
    }

    /// Called when the control loses focus.
    ///
    /// Returns `Some(value)` exactly when the owner should commit: the draft
    /// is non-empty, or empty commits are allowed. Returns `None` when the
    /// edit is discarded; since the controller renders the owner's value
    /// whenever it is not editing, the previous value reappears without any
    /// owner involvement.
    #[must_use = "a returned value must be committed by the owner"]
    pub fn blur(&mut self) -> Option<String> {
        if !self.is_editing {
            return None;
        }
        self.is_editing = false;
        let buffer = std::mem::take(&mut self.buffer);

        if !buffer.is_empty() || self.allow_empty {
            Some(buffer)
        } else {
            tracing::trace!("discarding empty edit buffer");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commits_edited_value_once() {
        let mut input = BufferedInput::new();
        let committed = "carrot";

        input.focus(committed);
        input.change("hello");
        assert_eq!(input.blur(), Some("hello".to_owned()));

        // Post-blur the control is idle with an empty buffer, and renders
        // whatever the owner committed.
        assert!(!input.is_editing());
        assert_eq!(input.display("hello"), "hello");
        assert_eq!(input.blur(), None);
    }

    #[test]
    fn empty_edit_is_discarded_by_default() {
        let mut input = BufferedInput::new();

        input.focus("carrot");
        input.change("");
        assert_eq!(input.blur(), None);

        // The owner never committed, so its value is displayed unchanged.
        assert_eq!(input.display("carrot"), "carrot");
    }

    #[test]
    fn empty_edit_commits_with_allow_empty() {
        let mut input = BufferedInput::new().with_allow_empty(true);

        input.focus("carrot");
        input.change("");
        assert_eq!(input.blur(), Some(String::new()));
    }

    #[test]
    fn displays_buffer_while_editing() {
        let mut input = BufferedInput::new();

        input.focus("committed");
        assert_eq!(input.display("committed"), "committed");

        input.change("c");
        assert_eq!(input.display("committed"), "c");

        input.change("ca");
        input.change("car");
        assert_eq!(input.display("committed"), "car");

        // The owner's value never bleeds through mid-edit, even if it
        // changes underneath.
        assert_eq!(input.display("swapped"), "car");
    }

    #[test]
    fn untouched_focus_blur_reverts() {
        // Focusing seeds the buffer with the committed value, so an
        // untouched blur commits that same value back.
        let mut input = BufferedInput::new();
        input.focus("carrot");
        assert_eq!(input.blur(), Some("carrot".to_owned()));
    }

    #[test]
    fn change_without_focus_is_dropped() {
        let mut input = BufferedInput::new();
        input.change("stray");
        assert!(!input.is_editing());
        assert_eq!(input.display("carrot"), "carrot");
        assert_eq!(input.blur(), None);
    }

    #[test]
    fn refocus_keeps_current_draft() {
        let mut input = BufferedInput::new();
        input.focus("carrot");
        input.change("car");
        input.focus("carrot");
        assert_eq!(input.display("carrot"), "car");
    }
}
