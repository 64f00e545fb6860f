//! Text commands for the terminal driver.
//!
//! One command per line; the first word picks the command, case-insensitive.

use std::str::FromStr;

use crate::error::CommandParseError;

/// Most clicks a single `click N` line may request.
pub const MAX_CLICKS_PER_COMMAND: u32 = 1_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Click `n` times.
    Click(u32),
    /// Buy one level of the named upgrade.
    Buy(String),
    Daily,
    Prestige,
    /// Reset; `true` when the line carried the confirmation word.
    Reset { confirmed: bool },
    Status,
    Upgrades,
    Achievements,
    Save,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = CommandParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let name = words.next().ok_or(CommandParseError::Empty)?.to_ascii_lowercase();
        let arg = words.next();

        match name.as_str() {
            "c" | "click" => {
                let n = match arg {
                    None => 1,
                    Some(text) => text
                        .parse::<u32>()
                        .ok()
                        .filter(|n| (1..=MAX_CLICKS_PER_COMMAND).contains(n))
                        .ok_or_else(|| CommandParseError::InvalidArgument {
                            command: "click",
                            value: text.to_string(),
                        })?,
                };
                Ok(Command::Click(n))
            }
            "b" | "buy" => arg
                .map(|id| Command::Buy(id.to_string()))
                .ok_or(CommandParseError::MissingArgument("buy")),
            "d" | "daily" => Ok(Command::Daily),
            "prestige" => Ok(Command::Prestige),
            "reset" => Ok(Command::Reset {
                confirmed: arg.is_some_and(|a| a.eq_ignore_ascii_case("confirm")),
            }),
            "s" | "status" => Ok(Command::Status),
            "u" | "upgrades" => Ok(Command::Upgrades),
            "a" | "achievements" => Ok(Command::Achievements),
            "save" => Ok(Command::Save),
            "h" | "help" | "?" => Ok(Command::Help),
            "q" | "quit" | "exit" => Ok(Command::Quit),
            _ => Err(CommandParseError::Unknown(name)),
        }
    }
}

/// Help text listing the commands.
pub const HELP: &str = "\
commands:
  click [n]        click n times (default 1)
  buy <upgrade>    buy one level, e.g. `buy clickPower`
  daily            claim the daily reward
  prestige         prestige (not available yet)
  reset confirm    wipe all progress
  status | upgrades | achievements
  save | help | quit";
