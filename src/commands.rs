//! Built-in bot commands.

/// Known bot commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Menu,
    Groups,
    Plants,
    Cancel,
    Help,
}

impl Command {
    /// Parse a command from message text. Returns `None` for plain text and
    /// unknown `/` prefixes.
    pub fn parse(text: &str) -> Option<Self> {
        let first = text.split_whitespace().next()?;
        // Strip @botname suffix (e.g. "/help@sprout_bot" → "/help").
        let cmd = first.split('@').next().unwrap_or(first);
        match cmd {
            "/start" => Some(Self::Start),
            "/menu" => Some(Self::Menu),
            "/groups" => Some(Self::Groups),
            "/plants" => Some(Self::Plants),
            "/cancel" => Some(Self::Cancel),
            "/help" => Some(Self::Help),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_commands() {
        assert_eq!(Command::parse("/start"), Some(Command::Start));
        assert_eq!(Command::parse("/menu"), Some(Command::Menu));
        assert_eq!(Command::parse("/groups"), Some(Command::Groups));
        assert_eq!(Command::parse("/plants"), Some(Command::Plants));
        assert_eq!(Command::parse("/cancel"), Some(Command::Cancel));
        assert_eq!(Command::parse("/help"), Some(Command::Help));
    }

    #[test]
    fn test_parse_strips_bot_suffix_and_args() {
        assert_eq!(Command::parse("/start@sprout_bot"), Some(Command::Start));
        assert_eq!(Command::parse("/help me please"), Some(Command::Help));
    }

    #[test]
    fn test_parse_plain_text_and_unknown() {
        assert_eq!(Command::parse("Цветы"), None);
        assert_eq!(Command::parse("/unknown"), None);
        assert_eq!(Command::parse(""), None);
        assert_eq!(Command::parse("   "), None);
    }
}
