use crate::turn::ChatTurn;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Widget},
};

/// Result returned when the user interacts with the composer
#[derive(Debug, PartialEq, Eq)]
pub enum ComposerResult {
    /// The text changed; the new content is attached.
    Edited(String),
    /// Enter was pressed.
    Submitted,
    None,
}

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

/// Single-line input with a Send control.
///
/// The text itself lives in [`ChatTurn::input_text`]; the composer only
/// tracks the cursor and turns key presses into edits.
#[derive(Debug, Clone)]
pub struct ConversationComposer {
    cursor: usize,
    placeholder: String,
}

impl ConversationComposer {
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            cursor: 0,
            placeholder: placeholder.into(),
        }
    }

    /// Handle key input against the current text
    pub fn handle_key(&mut self, key: KeyEvent, content: &str) -> ComposerResult {
        if key.kind != KeyEventKind::Press {
            return ComposerResult::None;
        }

        let len = content.chars().count();
        self.cursor = self.cursor.min(len);

        match key.code {
            KeyCode::Enter => return ComposerResult::Submitted,
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                let mut next = content.to_string();
                next.insert(char_to_byte_index(content, self.cursor), c);
                self.cursor += 1;
                return ComposerResult::Edited(next);
            }
            KeyCode::Backspace if self.cursor > 0 => {
                self.cursor -= 1;
                let mut next = content.to_string();
                next.remove(char_to_byte_index(content, self.cursor));
                return ComposerResult::Edited(next);
            }
            KeyCode::Delete if self.cursor < len => {
                let mut next = content.to_string();
                next.remove(char_to_byte_index(content, self.cursor));
                return ComposerResult::Edited(next);
            }
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => self.cursor = (self.cursor + 1).min(len),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = len,
            _ => {}
        }

        ComposerResult::None
    }

    /// Move the cursor back to the start, e.g. after the input is cleared
    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    #[cfg(test)]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Borrow the composer together with the turn it edits, for rendering.
    pub fn view<'a>(&'a self, turn: &'a ChatTurn) -> ComposerView<'a> {
        ComposerView {
            composer: self,
            turn,
        }
    }
}

/// Label shown on the submit control
pub fn send_label(loading: bool) -> &'static str {
    if loading { "Sending..." } else { "Send" }
}

pub struct ComposerView<'a> {
    composer: &'a ConversationComposer,
    turn: &'a ChatTurn,
}

impl Widget for ComposerView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(10), Constraint::Length(16)])
            .split(area);

        self.render_input(chunks[0], buf);
        self.render_button(chunks[1], buf);
    }
}

impl ComposerView<'_> {
    fn render_input(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title("Ask me something")
            .style(if !self.turn.loading {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::Gray)
            });

        let inner = block.inner(area);
        block.render(area, buf);

        let content = &self.turn.input_text;
        if content.is_empty() {
            let placeholder = Line::from(vec![Span::styled(
                self.composer.placeholder.as_str(),
                Style::default().fg(Color::DarkGray),
            )]);
            buf.set_line(inner.x, inner.y, &placeholder, inner.width);
            return;
        }

        let mut shown = content.clone();
        if !self.turn.loading {
            let cursor = self.composer.cursor.min(content.chars().count());
            shown.insert(char_to_byte_index(content, cursor), '▌');
        }

        // Keep the tail visible when the text is wider than the box.
        let width = inner.width as usize;
        let count = shown.chars().count();
        if width > 0 && count > width {
            shown = shown.chars().skip(count - width).collect();
        }

        let line = Line::from(vec![Span::styled(shown, Style::default().fg(Color::White))]);
        buf.set_line(inner.x, inner.y, &line, inner.width);
    }

    fn render_button(&self, area: Rect, buf: &mut Buffer) {
        let style = if self.turn.loading {
            Style::default().fg(Color::Black).bg(Color::Gray)
        } else if self.turn.can_submit() {
            Style::default()
                .fg(Color::White)
                .bg(Color::Green)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let block = Block::default().borders(Borders::ALL).style(style);
        let inner = block.inner(area);
        block.render(area, buf);

        let label = send_label(self.turn.loading);
        let pad = (inner.width as usize).saturating_sub(label.len()) / 2;
        let line = Line::from(vec![Span::styled(label, style)]);
        buf.set_line(inner.x + pad as u16, inner.y, &line, inner.width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::buffer_text;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(composer: &mut ConversationComposer, text: &str) -> String {
        let mut content = String::new();
        for c in text.chars() {
            if let ComposerResult::Edited(next) = composer.handle_key(press(KeyCode::Char(c)), &content) {
                content = next;
            }
        }
        content
    }

    #[test]
    fn typing_builds_content() {
        let mut composer = ConversationComposer::new("");
        assert_eq!(type_text(&mut composer, "héllo"), "héllo");
        assert_eq!(composer.cursor(), 5);
    }

    #[test]
    fn editing_in_the_middle() {
        let mut composer = ConversationComposer::new("");
        let content = type_text(&mut composer, "fes");

        composer.handle_key(press(KeyCode::Left), &content);
        let ComposerResult::Edited(content) = composer.handle_key(press(KeyCode::Char('e')), &content) else {
            panic!("expected an edit");
        };
        assert_eq!(content, "fees");

        composer.handle_key(press(KeyCode::Home), &content);
        let ComposerResult::Edited(content) = composer.handle_key(press(KeyCode::Delete), &content) else {
            panic!("expected an edit");
        };
        assert_eq!(content, "ees");
        assert_eq!(composer.handle_key(press(KeyCode::Backspace), &content), ComposerResult::None);
    }

    #[test]
    fn enter_submits() {
        let mut composer = ConversationComposer::new("");
        assert_eq!(composer.handle_key(press(KeyCode::Enter), "hi"), ComposerResult::Submitted);
    }

    #[test]
    fn control_chords_are_not_text() {
        let mut composer = ConversationComposer::new("");
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(composer.handle_key(key, ""), ComposerResult::None);
    }

    #[test]
    fn cursor_is_clamped_after_external_clear() {
        let mut composer = ConversationComposer::new("");
        type_text(&mut composer, "long message");

        let ComposerResult::Edited(content) = composer.handle_key(press(KeyCode::Char('x')), "") else {
            panic!("expected an edit");
        };
        assert_eq!(content, "x");
    }

    fn rendered(turn: &ChatTurn) -> String {
        let composer = ConversationComposer::new("Ask me something...");
        let area = Rect::new(0, 0, 50, 3);
        let mut buf = Buffer::empty(area);
        composer.view(turn).render(area, &mut buf);
        buffer_text(&buf)
    }

    #[test]
    fn button_label_follows_loading() {
        let mut turn = ChatTurn::new();
        turn.input_text = "hi".to_string();
        assert!(rendered(&turn).contains("Send"));
        assert!(!rendered(&turn).contains("Sending..."));

        turn.loading = true;
        assert!(rendered(&turn).contains("Sending..."));
    }

    #[test]
    fn placeholder_shows_when_empty() {
        assert!(rendered(&ChatTurn::new()).contains("Ask me something..."));
    }
}
