//! Key handling: editing keys and the suggestion popup state machine.

use super::{EditorSession, PendingCompletion, Popup};
use crate::types::{EditorKey, Suggestion};
use crate::utils::is_trigger_char;
use std::time::Instant;

impl EditorSession {
    /// Feed one key into the session.
    pub fn handle_key(&mut self, key: EditorKey) {
        self.handle_key_at(key, Instant::now());
    }

    /// Like [`EditorSession::handle_key`] with an explicit clock, so debounce
    /// behavior is observable deterministically.
    pub fn handle_key_at(&mut self, key: EditorKey, now: Instant) {
        // While the popup is open it captures the navigation keys; everything
        // else falls through to normal editing.
        if self.popup_open() {
            match key {
                EditorKey::ArrowDown => {
                    self.move_selection(1);
                    return;
                }
                EditorKey::ArrowUp => {
                    self.move_selection(-1);
                    return;
                }
                EditorKey::Enter | EditorKey::Tab => {
                    let chosen = self.chosen_suggestion();
                    self.popup = Popup::Closed;
                    if let Some(s) = chosen {
                        self.apply_suggestion(&s, now);
                    }
                    return;
                }
                EditorKey::Escape => {
                    self.popup = Popup::Closed;
                    return;
                }
                _ => {}
            }
        }

        match key {
            EditorKey::Char(c) => self.type_char(c, now),
            EditorKey::Enter => self.insert_text("\n", now),
            EditorKey::Tab => self.insert_text("  ", now),
            EditorKey::Backspace => self.backspace(now),
            EditorKey::ArrowLeft => self.set_cursor(self.cursor.saturating_sub(1)),
            EditorKey::ArrowRight => self.set_cursor(self.cursor + 1),
            EditorKey::ArrowUp => self.set_cursor(self.code.offset_above(self.cursor)),
            EditorKey::ArrowDown => self.set_cursor(self.code.offset_below(self.cursor)),
            EditorKey::Escape => {}
        }
    }

    /// Circular selection over the open suggestion list.
    fn move_selection(&mut self, delta: isize) {
        if let Popup::Open { suggestions, selected } = &mut self.popup {
            let len = suggestions.len();
            if len == 0 {
                return;
            }
            *selected = if delta > 0 {
                (*selected + 1) % len
            } else if *selected == 0 {
                len - 1
            } else {
                *selected - 1
            };
        }
    }

    fn chosen_suggestion(&self) -> Option<Suggestion> {
        match &self.popup {
            Popup::Open { suggestions, selected } => suggestions.get(*selected).cloned(),
            Popup::Closed => None,
        }
    }

    /// Insert one typed character, then run the completion trigger policy:
    /// a word character or `:` schedules a debounced request at the new
    /// cursor position; anything else closes the popup.
    fn type_char(&mut self, c: char, now: Instant) {
        if self.loading || !self.active_editable() {
            return;
        }
        let mut s = [0u8; 4];
        self.code.insert(self.cursor, c.encode_utf8(&mut s));
        self.cursor += 1;
        self.register_change(now);

        if self.config.completion_enabled && self.active_is_source() && is_trigger_char(c) {
            self.pending_completion = Some(PendingCompletion {
                deadline: now + self.config.completion_delay(),
                offset: self.cursor,
            });
        } else {
            self.popup = Popup::Closed;
            self.pending_completion = None;
        }
    }

    /// Insert literal text at the cursor (newline, indentation). Never
    /// triggers completion.
    fn insert_text(&mut self, text: &str, now: Instant) {
        if self.loading || !self.active_editable() {
            return;
        }
        self.code.insert(self.cursor, text);
        self.cursor += text.chars().count();
        self.register_change(now);
        self.popup = Popup::Closed;
        self.pending_completion = None;
    }

    /// Delete the character before the cursor. Closes the popup either way.
    fn backspace(&mut self, now: Instant) {
        if self.loading || !self.active_editable() {
            self.popup = Popup::Closed;
            self.pending_completion = None;
            return;
        }
        if self.cursor > 0 {
            self.code.remove(self.cursor - 1, self.cursor);
            self.cursor -= 1;
            self.register_change(now);
        }
        self.popup = Popup::Closed;
        self.pending_completion = None;
    }

    /// Replace the partial word `[word_start, cursor)` with the suggestion's
    /// insert text and put the cursor at its end. One atomic edit: the
    /// workspace and save scheduling see only the final state.
    fn apply_suggestion(&mut self, suggestion: &Suggestion, now: Instant) {
        if self.loading || !self.active_editable() {
            return;
        }
        let start = self.code.word_start(self.cursor);
        let insert = suggestion.insert_text.as_deref().unwrap_or(&suggestion.label);
        self.cursor = self.code.replace(start, self.cursor, insert);
        self.register_change(now);
        self.pending_completion = None;
    }
}
