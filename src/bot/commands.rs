//! Chat command parsing

/// Commands the bot answers. Portuguese aliases are accepted alongside the English names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    Test,
    Forecast,
}

impl Command {
    /// Parse the leading `/command` (optionally `/command@botname`) of a message
    pub fn parse(text: &str) -> Option<Self> {
        let word = text.split_whitespace().next()?;
        let name = word.strip_prefix('/')?;
        let name = name.split('@').next().unwrap_or(name).to_lowercase();

        match name.as_str() {
            "start" => Some(Command::Start),
            "help" | "ajuda" => Some(Command::Help),
            "test" | "teste" => Some(Command::Test),
            "forecast" | "previsao" => Some(Command::Forecast),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::Start => "start",
            Command::Help => "help",
            Command::Test => "test",
            Command::Forecast => "forecast",
        }
    }
}
