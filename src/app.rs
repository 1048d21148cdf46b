use crate::client::ChatClient;
use crate::config::Config;
use crate::events::AppEvent;
use crate::tui::{self, EventHandler};
use crate::turn::{ChatTurn, TurnEffect, TurnEvent};
use crate::ui::{
    AnalyticsPanel, ComposerResult, ConversationComposer, Notice, ReplyPanel, SlashCommand,
    get_help_text, parse_slash_command,
};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use std::cell::Cell;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// The chat screen: turn state, widgets, and the client requests go through
pub struct App {
    turn: ChatTurn,
    composer: ConversationComposer,
    notice: Option<Notice>,
    analytics: Option<serde_json::Value>,
    client: ChatClient,
    tx: mpsc::UnboundedSender<AppEvent>,
    should_quit: bool,
    reply_scroll: u16,
    analytics_scroll: u16,
    // Filled in by `render`, which knows the panel sizes.
    reply_max_scroll: Cell<u16>,
    analytics_max_scroll: Cell<u16>,
}

/// Lines moved by PageUp/PageDown
const PAGE: u16 = 10;

impl App {
    pub fn new(client: ChatClient, tx: mpsc::UnboundedSender<AppEvent>) -> Self {
        Self {
            turn: ChatTurn::new(),
            composer: ConversationComposer::new("Ask me something..."),
            notice: None,
            analytics: None,
            client,
            tx,
            should_quit: false,
            reply_scroll: 0,
            analytics_scroll: 0,
            reply_max_scroll: Cell::new(0),
            analytics_max_scroll: Cell::new(0),
        }
    }

    pub fn turn(&self) -> &ChatTurn {
        &self.turn
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn analytics(&self) -> Option<&serde_json::Value> {
        self.analytics.as_ref()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    #[cfg(test)]
    pub fn reply_scroll(&self) -> u16 {
        self.reply_scroll
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Key(key) => self.handle_key(key),
            AppEvent::Resize(width, height) => {
                debug!(width, height, "terminal resized");
            }
            AppEvent::Tick => {
                if let Some(notice) = self.notice.as_mut() {
                    if !notice.tick() {
                        self.notice = None;
                    }
                }
            }
            AppEvent::ChatResolved(result) => {
                if result.is_ok() {
                    self.reply_scroll = 0;
                }
                self.apply(TurnEvent::Resolved(result));
                self.composer.reset();
            }
            AppEvent::AnalyticsResolved(Ok(data)) => {
                debug!("analytics received");
                self.analytics = Some(data);
                self.analytics_scroll = 0;
            }
            AppEvent::AnalyticsResolved(Err(err)) => {
                warn!(error = %err, "analytics request failed");
                self.notice = Some(Notice::error(format!("Error: {err}")));
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        // Any key press acknowledges the current notice.
        let had_notice = self.notice.take().is_some();

        if key.code == KeyCode::Esc {
            if !had_notice {
                self.analytics = None;
                self.analytics_scroll = 0;
            }
            return;
        }

        let delta: i32 = match key.code {
            KeyCode::Up => -1,
            KeyCode::Down => 1,
            KeyCode::PageUp => -i32::from(PAGE),
            KeyCode::PageDown => i32::from(PAGE),
            _ => 0,
        };
        if delta != 0 {
            self.scroll_by(delta);
            return;
        }

        if self.turn.loading {
            return;
        }

        match self.composer.handle_key(key, &self.turn.input_text) {
            ComposerResult::Edited(text) => {
                self.apply(TurnEvent::InputChanged(text));
            }
            ComposerResult::Submitted => {
                if let Some(command) = parse_slash_command(&self.turn.input_text) {
                    self.apply(TurnEvent::InputChanged(String::new()));
                    self.composer.reset();
                    self.run_command(command);
                } else {
                    self.apply(TurnEvent::Submit);
                }
            }
            ComposerResult::None => {}
        }
    }

    /// Scroll the analytics panel when it is open, the reply otherwise
    fn scroll_by(&mut self, delta: i32) {
        let (offset, max) = if self.analytics.is_some() {
            (&mut self.analytics_scroll, self.analytics_max_scroll.get())
        } else {
            (&mut self.reply_scroll, self.reply_max_scroll.get())
        };
        *offset = (i32::from(*offset) + delta).clamp(0, i32::from(max)) as u16;
    }

    /// Feed the reducer and carry out whatever it asks for
    fn apply(&mut self, event: TurnEvent) {
        match self.turn.update(event) {
            TurnEffect::None => {}
            TurnEffect::Send(request) => {
                let client = self.client.clone();
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    let result = client
                        .send_message(&request.message, request.conversation_id.as_deref())
                        .await;
                    let _ = tx.send(AppEvent::ChatResolved(result));
                });
            }
            TurnEffect::Notify(message) => {
                self.notice = Some(Notice::error(message));
            }
        }
    }

    fn run_command(&mut self, command: SlashCommand) {
        info!(command = command.command(), "running slash command");
        match command {
            SlashCommand::Analytics => {
                let client = self.client.clone();
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    let result = client.get_analytics().await;
                    let _ = tx.send(AppEvent::AnalyticsResolved(result));
                });
            }
            SlashCommand::Help => {
                self.notice = Some(Notice::info(get_help_text()));
            }
            SlashCommand::Quit => {
                self.should_quit = true;
            }
        }
    }

    pub fn render(&self, frame: &mut Frame) {
        let area = frame.size();
        let analytics_height = if self.analytics.is_some() { 12 } else { 0 };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(5),                   // Reply
                Constraint::Length(analytics_height), // Analytics
                Constraint::Length(3),                // Composer
                Constraint::Length(1),                // Footer
            ])
            .split(area);

        let reply = ReplyPanel::new(&self.turn.reply_text, self.turn.loading);
        self.reply_max_scroll.set(reply.max_scroll(chunks[0]));
        frame.render_widget(reply.scroll(self.reply_scroll), chunks[0]);

        if let Some(data) = &self.analytics {
            let panel = AnalyticsPanel::new(data);
            self.analytics_max_scroll.set(panel.max_scroll(chunks[1]));
            frame.render_widget(panel.scroll(self.analytics_scroll), chunks[1]);
        }

        frame.render_widget(self.composer.view(&self.turn), chunks[2]);
        frame.render_widget(self.footer(), chunks[3]);

        if let Some(notice) = &self.notice {
            let width = chunks[0].width.min(60);
            let height = notice.height(width).min(chunks[0].height);
            let toast = Rect {
                x: chunks[0].x + chunks[0].width - width,
                y: chunks[0].y + chunks[0].height - height,
                width,
                height,
            };
            frame.render_widget(notice, toast);
        }
    }

    fn footer(&self) -> Paragraph<'static> {
        let conversation = match &self.turn.conversation_id {
            Some(id) => format!("conversation {id}"),
            None => "new conversation".to_string(),
        };
        Paragraph::new(Line::from(vec![
            Span::styled(
                " Enter send · ↑↓ PgUp/PgDn scroll · /help · Ctrl+C quit · ",
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(conversation, Style::default().fg(Color::Gray)),
        ]))
    }
}

/// Run the terminal chat UI until the user quits
pub async fn run(config: &Config) -> Result<()> {
    let client = ChatClient::new(&config.backend_url)?;
    info!(backend_url = client.base_url(), "starting chat UI");

    let mut events = EventHandler::new();
    let mut app = App::new(client, events.sender());

    tui::install_panic_hook();
    let mut terminal = tui::init()?;

    let result = async {
        while !app.should_quit() {
            terminal.draw(|frame| app.render(frame))?;
            match events.next().await {
                Some(event) => app.handle_event(event),
                None => break,
            }
        }
        Ok::<_, anyhow::Error>(())
    }
    .await;

    tui::restore()?;
    info!("chat UI closed");
    result
}
