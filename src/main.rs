use std::io::{self, BufRead, Write};

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use cosmic_clicker::config::SessionConfig;
use cosmic_clicker::input::{Command, HELP};
use cosmic_clicker::report::{achievement_lines, format_number, status_lines, upgrade_lines};
use cosmic_clicker::session::Session;
use cosmic_clicker::store::FileStore;
use cosmic_clicker::time::SystemClock;

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays the game screen.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let config = SessionConfig::from_env().context("loading configuration")?;
    let store = FileStore::new(&config.save_dir);
    let mut session = Session::start(config, store, SystemClock);

    let mut out = io::stdout().lock();
    writeln!(out, "★ Cosmic Clicker ★  (type `help` for commands)")?;
    if let Some(granted) = session.take_offline_report() {
        writeln!(
            out,
            "Welcome back! You earned {} coins while you were away.",
            format_number(granted)
        )?;
    }
    print_lines(&mut out, &status_lines(session.state(), session.achievement_highlighted()))?;

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("reading command")?;
        session.update();

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                writeln!(out, "{e}")?;
                continue;
            }
        };

        match command {
            Command::Click(n) => {
                for _ in 0..n {
                    session.click();
                }
                writeln!(out, "coins: {}", format_number(session.state().coins.floor()))?;
                if session.achievement_highlighted() {
                    writeln!(out, "🏆 achievement unlocked!")?;
                }
            }
            Command::Buy(id) => match session.buy_upgrade(&id) {
                Ok(bought) => {
                    let level = session.state().upgrade(bought).map_or(0, |u| u.level);
                    writeln!(out, "bought {bought} (level {level})")?;
                }
                Err(e) => writeln!(out, "{e}")?,
            },
            Command::Daily => match session.claim_daily_reward() {
                Ok(reward) => writeln!(out, "daily reward: +{}", format_number(reward))?,
                Err(e) => writeln!(out, "{e}")?,
            },
            Command::Prestige => match session.prestige() {
                Ok(()) => writeln!(out, "prestige complete")?,
                Err(e) => writeln!(out, "{e}")?,
            },
            Command::Reset { confirmed } => {
                if session.reset_game(confirmed) {
                    writeln!(out, "game reset; all progress removed")?;
                } else {
                    writeln!(out, "this wipes all progress; type `reset confirm` to proceed")?;
                }
            }
            Command::Status => print_lines(
                &mut out,
                &status_lines(session.state(), session.achievement_highlighted()),
            )?,
            Command::Upgrades => print_lines(&mut out, &upgrade_lines(session.state()))?,
            Command::Achievements => print_lines(&mut out, &achievement_lines(session.state()))?,
            Command::Save => match session.save() {
                Ok(()) => writeln!(out, "saved")?,
                Err(e) => writeln!(out, "save failed: {e}")?,
            },
            Command::Help => writeln!(out, "{HELP}")?,
            Command::Quit => break,
        }
    }

    session.shutdown().context("writing final save")?;
    writeln!(out, "saved. see you soon!")?;
    Ok(())
}

fn print_lines(out: &mut impl Write, lines: &[String]) -> io::Result<()> {
    for line in lines {
        writeln!(out, "{line}")?;
    }
    Ok(())
}
