use std::str::FromStr;

use strum::{AsRefStr, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

/// Commands handled locally when a message starts with a leading slash.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, EnumIter, AsRefStr, IntoStaticStr,
)]
#[strum(serialize_all = "kebab-case")]
pub enum SlashCommand {
    /// Fetch and show backend analytics
    Analytics,
    /// Show help
    Help,
    /// Exit the application
    Quit,
}

impl SlashCommand {
    /// User-visible description shown in help.
    pub fn description(self) -> &'static str {
        match self {
            SlashCommand::Analytics => "show usage analytics from the backend",
            SlashCommand::Help => "show available commands",
            SlashCommand::Quit => "exit AskEd",
        }
    }

    /// Command string without the leading '/'.
    pub fn command(self) -> &'static str {
        self.into()
    }
}

/// Parse a slash command from user input.
///
/// Unknown commands return `None` so the text is sent to the backend as-is.
pub fn parse_slash_command(input: &str) -> Option<SlashCommand> {
    let rest = input.trim().strip_prefix('/')?;
    let head = rest.split_whitespace().next()?.to_lowercase();

    SlashCommand::from_str(&head).ok().or_else(|| match head.as_str() {
        "q" | "exit" | "bye" => Some(SlashCommand::Quit),
        "h" | "?" => Some(SlashCommand::Help),
        "stats" => Some(SlashCommand::Analytics),
        _ => None,
    })
}

/// Help text listing every command
pub fn get_help_text() -> String {
    let mut help = String::from("Commands: ");
    let entries: Vec<String> = SlashCommand::iter()
        .map(|c| format!("/{} {}", c.command(), c.description()))
        .collect();
    help.push_str(&entries.join(" · "));
    help.push_str(" · Enter sends, ↑↓ PgUp/PgDn scroll, Esc dismisses, Ctrl+C quits");
    help
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_commands_and_aliases() {
        assert_eq!(parse_slash_command("/analytics"), Some(SlashCommand::Analytics));
        assert_eq!(parse_slash_command("  /HELP  "), Some(SlashCommand::Help));
        assert_eq!(parse_slash_command("/q"), Some(SlashCommand::Quit));
        assert_eq!(parse_slash_command("/exit now"), Some(SlashCommand::Quit));
    }

    #[test]
    fn plain_text_and_unknown_commands_are_messages() {
        assert_eq!(parse_slash_command("how do I pay fees?"), None);
        assert_eq!(parse_slash_command("/enrol in COMP101"), None);
        assert_eq!(parse_slash_command("/"), None);
    }

    #[test]
    fn help_mentions_every_command() {
        let help = get_help_text();
        for command in SlashCommand::iter() {
            assert!(help.contains(&format!("/{}", command.command())));
        }
    }
}
