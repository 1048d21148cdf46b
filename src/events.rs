use crate::client::ChatResponse;
use crate::error::ClientError;
use crossterm::event::KeyEvent;

/// Everything the UI loop reacts to, delivered one at a time in arrival order
#[derive(Debug)]
pub enum AppEvent {
    /// Key press event
    Key(KeyEvent),

    /// Terminal resize
    Resize(u16, u16),

    /// Periodic tick for expiring notices
    Tick,

    /// A chat request finished
    ChatResolved(Result<ChatResponse, ClientError>),

    /// An analytics request finished
    AnalyticsResolved(Result<serde_json::Value, ClientError>),
}
