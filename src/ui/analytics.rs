use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// Pretty-printed analytics returned by the backend
pub struct AnalyticsPanel<'a> {
    data: &'a serde_json::Value,
    scroll: u16,
}

impl<'a> AnalyticsPanel<'a> {
    pub fn new(data: &'a serde_json::Value) -> Self {
        Self { data, scroll: 0 }
    }

    pub fn scroll(mut self, offset: u16) -> Self {
        self.scroll = offset;
        self
    }

    /// Largest useful scroll offset when drawn into `area`
    pub fn max_scroll(&self, area: Rect) -> u16 {
        let inner = Block::default().borders(Borders::ALL).inner(area);
        let total = self.pretty().lines().count();
        total.saturating_sub(inner.height as usize).min(u16::MAX as usize) as u16
    }

    fn pretty(&self) -> String {
        serde_json::to_string_pretty(self.data).unwrap_or_else(|_| self.data.to_string())
    }
}

impl Widget for AnalyticsPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let max_scroll = self.max_scroll(area);
        let offset = self.scroll.min(max_scroll);

        let title = if max_scroll > 0 {
            format!("📊 Analytics ({offset}/{max_scroll}) ↑↓ scroll, Esc close")
        } else {
            "📊 Analytics (Esc to close)".to_string()
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .style(Style::default().fg(Color::Blue));
        let inner = block.inner(area);
        block.render(area, buf);

        let pretty = self.pretty();
        let lines: Vec<Line> = pretty
            .lines()
            .map(|text| Line::from(vec![Span::styled(text, Style::default().fg(Color::Gray))]))
            .collect();

        Paragraph::new(lines).scroll((offset, 0)).render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::buffer_text;

    fn render(data: &serde_json::Value, scroll: u16) -> String {
        let area = Rect::new(0, 0, 40, 6);
        let mut buf = Buffer::empty(area);
        AnalyticsPanel::new(data).scroll(scroll).render(area, &mut buf);
        buffer_text(&buf)
    }

    #[test]
    fn shows_json_fields() {
        let data = serde_json::json!({"total_messages": 42});
        assert!(render(&data, 0).contains("\"total_messages\": 42"));
    }

    #[test]
    fn tall_analytics_scroll_to_the_end() {
        let topics: Vec<String> = (1..=10).map(|n| format!("topic-{n}")).collect();
        let data = serde_json::json!({ "top_topics": topics });

        // 14 pretty lines in 4 visible rows.
        let panel = AnalyticsPanel::new(&data);
        assert_eq!(panel.max_scroll(Rect::new(0, 0, 40, 6)), 10);

        assert!(!render(&data, 0).contains("topic-10"));
        assert!(render(&data, 10).contains("topic-10"));
    }
}
