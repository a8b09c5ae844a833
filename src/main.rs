mod ui;

use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    time::Instant,
};

use clap::{error::ErrorKind, CommandFactory, Parser, ValueEnum};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use log::debug;
use rand::{rngs::StdRng, SeedableRng};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use typing_arcade::{
    config::{Config, ConfigStore, FileConfigStore},
    corpus::{load_custom_text, normalize_text},
    games::GameId,
    runtime::{
        ArcadeEvent, ArcadeEventSource, CrosstermEventSource, FixedTicker, Runner, TickGate,
        Ticker,
    },
    Arcade, SessionKind,
};

use crate::ui::TerminalRenderer;

/// typing practice plus five arcade mini-games you play by typing
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Type a reference text against the clock, or play one of five arcade games where typing words and letters destroys enemies, whacks moles, chases a thief, catches apples and hops a frog across the river."
)]
pub struct Cli {
    /// what to play
    #[clap(value_enum, default_value_t = Mode::Practice)]
    mode: Mode,

    /// custom practice text
    #[clap(short = 't', long, conflicts_with = "text_file")]
    text: Option<String>,

    /// read the practice text from a plain-text file
    #[clap(short = 'f', long)]
    text_file: Option<PathBuf>,

    /// seed for reproducible spawns and text choice
    #[clap(long)]
    seed: Option<u64>,

    /// milliseconds per game frame
    #[clap(long)]
    tick_rate_ms: Option<u64>,

    /// persist the effective settings as the new defaults
    #[clap(long)]
    save_config: bool,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum, strum_macros::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum Mode {
    Practice,
    SpaceWar,
    MoleHunt,
    PoliceThief,
    AppleCatch,
    FrogCross,
}

impl Mode {
    fn game(&self) -> Option<GameId> {
        match self {
            Mode::Practice => None,
            Mode::SpaceWar => Some(GameId::SpaceWar),
            Mode::MoleHunt => Some(GameId::MoleHunt),
            Mode::PoliceThief => Some(GameId::PoliceThief),
            Mode::AppleCatch => Some(GameId::AppleCatch),
            Mode::FrogCross => Some(GameId::FrogCross),
        }
    }
}

impl Cli {
    /// Stored settings with command-line overrides applied
    fn apply(&self, mut config: Config) -> Config {
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(ms) = self.tick_rate_ms {
            config.tick_rate_ms = ms;
        }
        config
    }

    fn session_kind(&self) -> typing_arcade::Result<SessionKind> {
        if let Some(id) = self.mode.game() {
            return Ok(SessionKind::Game(id));
        }
        let text = match (&self.text, &self.text_file) {
            (Some(raw), _) => Some(normalize_text(raw)?),
            (None, Some(path)) => Some(load_custom_text(path)?),
            (None, None) => None,
        };
        Ok(SessionKind::Practice { text })
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let store = FileConfigStore::new();
    let config = cli.apply(store.load());
    if cli.save_config {
        store.save(&config)?;
        debug!("saved config to {}", store.path().display());
    }

    let kind = cli.session_kind()?;
    let words = config.word_corpus()?;
    let texts = config.practice_corpus()?;
    let seed = config.seed.unwrap_or_else(rand::random);
    debug!("seed {seed}");

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;

    let mut arcade = Arcade::new(
        words,
        texts,
        config.playfield(),
        StdRng::seed_from_u64(seed),
        TerminalRenderer::new(terminal),
        TickGate::new(),
    );
    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::from_millis(config.tick_rate_ms),
    );
    let result = run(&mut arcade, &runner, kind);

    disable_raw_mode()?;
    let terminal = arcade.renderer_mut().terminal_mut();
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run<B, E, T>(
    arcade: &mut Arcade<TerminalRenderer<B>, TickGate>,
    runner: &Runner<E, T>,
    kind: SessionKind,
) -> Result<(), Box<dyn Error>>
where
    B: Backend,
    E: ArcadeEventSource,
    T: Ticker,
{
    arcade.start(kind)?;
    arcade.renderer_mut().take_error()?;

    loop {
        match runner.step() {
            ArcadeEvent::Tick => match arcade.scheduler_mut().take() {
                Some(epoch) => {
                    arcade.on_tick(epoch)?;
                }
                // practice has no frames; redraw so the clock keeps moving
                None => {
                    if arcade.practice().is_some_and(|p| p.tracker().is_running()) {
                        arcade.refresh(Instant::now());
                    }
                }
            },
            ArcadeEvent::Resize => {
                arcade.renderer_mut().terminal_mut().autoresize()?;
                arcade.refresh(Instant::now());
            }
            ArcadeEvent::Quit => break,
            ArcadeEvent::Restart => {
                arcade.restart()?;
            }
            ArcadeEvent::Keystroke(keystroke) => {
                arcade.on_keystroke(&keystroke, Instant::now())?;
            }
        }
        arcade.renderer_mut().take_error()?;
    }

    arcade.exit();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use typing_arcade::matcher::Keystroke;
    use typing_arcade::runtime::TestEventSource;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("typing-arcade").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_cli_defaults_to_practice() {
        let cli = cli(&[]);
        assert_eq!(cli.mode, Mode::Practice);
        assert_eq!(
            cli.session_kind().unwrap(),
            SessionKind::Practice { text: None }
        );
    }

    #[test]
    fn test_cli_game_modes() {
        assert_eq!(
            cli(&["police-thief"]).session_kind().unwrap(),
            SessionKind::Game(GameId::PoliceThief)
        );
        assert_eq!(Mode::FrogCross.to_string(), "frog-cross");
    }

    #[test]
    fn test_cli_custom_text_is_normalised() {
        let kind = cli(&["--text", "  hello \n  world "]).session_kind().unwrap();
        assert_eq!(
            kind,
            SessionKind::Practice {
                text: Some("hello world".to_string())
            }
        );
    }

    #[test]
    fn test_cli_text_and_file_conflict() {
        let result = Cli::try_parse_from(["typing-arcade", "--text", "a", "--text-file", "b"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_overrides_config() {
        let config = cli(&["--seed", "9", "--tick-rate-ms", "40"]).apply(Config::default());
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.tick_rate_ms, 40);
        assert_eq!(config.playfield_width, 800.0);
    }

    #[test]
    fn test_run_loop_practice_until_quit() {
        use ratatui::backend::TestBackend;
        use typing_arcade::corpus::{PracticeCorpus, WordCorpus};
        use typing_arcade::games::Playfield;

        let terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        let mut arcade = Arcade::new(
            WordCorpus::from_words("t", ["apple"]),
            PracticeCorpus::from_texts("t", ["hi"]),
            Playfield::default(),
            StdRng::seed_from_u64(1),
            TerminalRenderer::new(terminal),
            TickGate::new(),
        );

        let (tx, rx) = std::sync::mpsc::channel();
        for c in ['h', 'i'] {
            tx.send(ArcadeEvent::Keystroke(Keystroke::char(c))).unwrap();
        }
        tx.send(ArcadeEvent::Resize).unwrap();
        tx.send(ArcadeEvent::Quit).unwrap();
        let runner = Runner::new(
            TestEventSource::new(rx),
            FixedTicker::new(Duration::from_millis(1)),
        );

        run(&mut arcade, &runner, SessionKind::Practice { text: None }).unwrap();
        assert!(arcade.session().is_none());

        let buffer = arcade.renderer_mut().terminal_mut().backend().buffer().clone();
        let content: String = buffer.content.iter().map(|c| c.symbol()).collect();
        assert!(content.contains("Finished! WPM:"));
    }
}
