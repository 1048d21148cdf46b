//! Non-blocking toast used for errors and short messages

use super::wrap_text;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Widget},
};

/// Ticks a notice stays on screen before it expires on its own
pub const NOTICE_TICKS: u16 = 20;

/// Wrapped message lines shown at most; the rest is cut with an ellipsis
const MAX_NOTICE_LINES: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    remaining: u16,
}

impl Notice {
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Error, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Info, message)
    }

    fn new(kind: NoticeKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            remaining: NOTICE_TICKS,
        }
    }

    /// Count down one tick; returns false once the notice has expired.
    pub fn tick(&mut self) -> bool {
        self.remaining = self.remaining.saturating_sub(1);
        self.remaining > 0
    }

    /// Rows needed to show the message at the given width, borders included
    pub fn height(&self, width: u16) -> u16 {
        let body = wrap_text(&self.message, width.saturating_sub(2) as usize).len() as u16;
        body.min(MAX_NOTICE_LINES as u16) + 2
    }
}

impl Widget for &Notice {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (title, color) = match self.kind {
            NoticeKind::Error => ("❌ Error", Color::Red),
            NoticeKind::Info => ("ℹ Info", Color::Cyan),
        };

        Clear.render(area, buf);
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .style(Style::default().fg(color));
        let inner = block.inner(area);
        block.render(area, buf);

        let width = inner.width as usize;
        let visible = (inner.height as usize).min(MAX_NOTICE_LINES);
        let mut lines = wrap_text(&self.message, width);
        if lines.len() > visible && visible > 0 {
            lines.truncate(visible);
            if let Some(last) = lines.last_mut() {
                let kept: String = last.chars().take(width.saturating_sub(1)).collect();
                *last = format!("{kept}…");
            }
        }

        for (i, text) in lines.into_iter().take(visible).enumerate() {
            let line = Line::from(vec![Span::styled(text, Style::default().fg(Color::White))]);
            buf.set_line(inner.x, inner.y + i as u16, &line, inner.width);
        }
    }
}
