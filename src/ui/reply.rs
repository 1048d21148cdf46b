//! Reply display component

use super::wrap_text;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

const TITLE: &str = "🎓 AskEd Chatbot";

/// Panel showing the most recent backend reply
pub struct ReplyPanel<'a> {
    reply: &'a str,
    loading: bool,
    scroll: u16,
}

impl<'a> ReplyPanel<'a> {
    pub fn new(reply: &'a str, loading: bool) -> Self {
        Self {
            reply,
            loading,
            scroll: 0,
        }
    }

    /// Start drawing this many lines down. Clamped to the last full page.
    pub fn scroll(mut self, offset: u16) -> Self {
        self.scroll = offset;
        self
    }

    /// Largest useful scroll offset when drawn into `area`
    pub fn max_scroll(&self, area: Rect) -> u16 {
        let inner = Block::default().borders(Borders::ALL).inner(area);
        let total = self.lines(inner.width).len();
        total.saturating_sub(inner.height as usize).min(u16::MAX as usize) as u16
    }

    fn lines(&self, width: u16) -> Vec<Line<'static>> {
        let mut lines = Vec::new();

        if self.reply.is_empty() {
            let welcome = [
                (
                    "Hello! I'm AskEd 🤖, your virtual assistant for university student services.",
                    Color::Green,
                ),
                ("", Color::Reset),
                (
                    "Type a question below and press Enter. /help lists commands.",
                    Color::DarkGray,
                ),
            ];
            for (text, color) in welcome {
                for wrapped in wrap_text(text, width as usize) {
                    lines.push(Line::from(vec![Span::styled(wrapped, Style::default().fg(color))]));
                }
            }
        } else {
            lines.push(Line::from(vec![Span::styled(
                "Response:",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )]));
            for paragraph in self.reply.lines() {
                for wrapped in wrap_text(paragraph, width.saturating_sub(2) as usize) {
                    lines.push(Line::from(vec![Span::raw("  "), Span::raw(wrapped)]));
                }
            }
        }

        if self.loading {
            lines.push(Line::from(""));
            lines.push(Line::from(vec![Span::styled(
                "AskEd is thinking...",
                Style::default().fg(Color::Yellow),
            )]));
        }

        lines
    }
}

impl Widget for ReplyPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let max_scroll = self.max_scroll(area);
        let offset = self.scroll.min(max_scroll);

        let title = if max_scroll > 0 {
            format!("{TITLE} ({}/{}) ↑↓ PgUp/PgDn", offset, max_scroll)
        } else {
            TITLE.to_string()
        };
        let block = Block::default().borders(Borders::ALL).title(title);

        let inner = block.inner(area);
        block.render(area, buf);

        Paragraph::new(self.lines(inner.width))
            .scroll((offset, 0))
            .render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::buffer_text;

    fn render_scrolled(reply: &str, loading: bool, scroll: u16) -> String {
        let area = Rect::new(0, 0, 60, 10);
        let mut buf = Buffer::empty(area);
        ReplyPanel::new(reply, loading).scroll(scroll).render(area, &mut buf);
        buffer_text(&buf)
    }

    fn render(reply: &str, loading: bool) -> String {
        render_scrolled(reply, loading, 0)
    }

    fn long_reply() -> String {
        (1..=20)
            .map(|n| format!("Step {n}: do the thing"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn reply_region_only_with_reply() {
        assert!(!render("", false).contains("Response:"));

        let text = render("Fees are due on the 1st.", false);
        assert!(text.contains("Response:"));
        assert!(text.contains("Fees are due on the 1st."));
    }

    #[test]
    fn loading_indicator() {
        assert!(render("", true).contains("AskEd is thinking..."));
    }

    #[test]
    fn long_reply_scrolls_to_its_last_line() {
        let reply = long_reply();

        let top = render(&reply, false);
        assert!(top.contains("Step 1:"));
        assert!(!top.contains("Step 20:"));

        // 21 lines in 8 visible rows.
        let panel = ReplyPanel::new(&reply, false);
        assert_eq!(panel.max_scroll(Rect::new(0, 0, 60, 10)), 13);

        let bottom = render_scrolled(&reply, false, 13);
        assert!(bottom.contains("Step 20:"));
        assert!(!bottom.contains("Step 1:"));
    }

    #[test]
    fn scroll_past_the_end_is_clamped() {
        let text = render_scrolled(&long_reply(), false, u16::MAX);
        assert!(text.contains("Step 20:"));
        assert!(text.contains("(13/13)"));
    }

    #[test]
    fn short_reply_has_no_scroll() {
        let panel = ReplyPanel::new("short", false);
        assert_eq!(panel.max_scroll(Rect::new(0, 0, 60, 10)), 0);
        assert!(render_scrolled("short", false, 5).contains("short"));
    }
}
