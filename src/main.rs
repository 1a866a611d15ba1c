pub mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    error::Error,
    io::{self, stdin, Write},
    path::PathBuf,
};
use tracing::{error, info};

use vedaquiz::{
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    leaderboard::{FileLeaderboardStore, Leaderboard, LeaderboardStore, ScorePolicy},
    logging,
    runtime::{CrosstermEventSource, FixedTicker, Runner},
    session::{Flow, Session},
};

use crate::ui::screen::current_screen;

/// multiple-choice quiz with partial-credit scoring and a persistent leaderboard
#[derive(Parser, Debug, Clone, Default)]
#[clap(
    version,
    about,
    long_about = "A multiple-choice quiz in the terminal. Correct answers earn 2 points, wrong answers cost 0.66, and every result lands on a shared leaderboard."
)]
pub struct Cli {
    /// question bank file (JSON array of {question, options, answer}); overrides --bank
    #[clap(short = 'q', long)]
    questions: Option<PathBuf>,

    /// built-in question bank to play
    #[clap(short = 'b', long)]
    bank: Option<String>,

    /// leaderboard file to read and update
    #[clap(short = 'l', long)]
    leaderboard: Option<PathBuf>,

    /// allow 15 seconds per question and submit automatically when time runs out
    #[clap(short = 't', long)]
    timed: bool,

    /// present the questions in random order
    #[clap(long)]
    shuffle: bool,

    /// keep a returning player's best score instead of their latest one
    #[clap(long)]
    keep_best: bool,

    /// print the leaderboard and exit
    #[clap(long)]
    show_leaderboard: bool,

    /// remember the given options as defaults for later runs
    #[clap(long)]
    save_config: bool,
}

impl Cli {
    /// Layer command line flags over the stored defaults
    fn apply_to(&self, config: &mut Config) {
        if let Some(path) = &self.questions {
            config.questions = Some(path.clone());
        }
        if let Some(bank) = &self.bank {
            config.bank = bank.clone();
            if self.questions.is_none() {
                config.questions = None;
            }
        }
        if let Some(path) = &self.leaderboard {
            config.leaderboard = Some(path.clone());
        }
        if self.timed {
            config.timed = true;
        }
        if self.shuffle {
            config.shuffle = true;
        }
        if self.keep_best {
            config.policy = ScorePolicy::KeepBest;
        }
    }
}

pub struct App {
    pub title: String,
    pub session: Session,
    pub store: Box<dyn LeaderboardStore>,
}

impl App {
    pub fn new(session: Session, store: Box<dyn LeaderboardStore>) -> Self {
        Self {
            title: "Quiz".to_string(),
            session,
            store,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}

fn quiz_title(config: &Config) -> String {
    let name = match &config.questions {
        Some(path) => path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("custom")
            .to_string(),
        None => config.bank.clone(),
    };
    format!("{} quiz", name.replace(['-', '_'], " "))
}

fn print_leaderboard<W: Write>(board: &Leaderboard, out: &mut W) -> io::Result<()> {
    if board.is_empty() {
        return writeln!(out, "No scores yet.");
    }
    writeln!(out, "Leaderboard:")?;
    for entry in board.ranked() {
        writeln!(out, "{}", entry)?;
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    // logging is best effort; the quiz runs without it
    let log_path = AppDirs::log_path();
    if let Err(e) = logging::init_file_logging(&log_path) {
        eprintln!("logging disabled, cannot open {}: {}", log_path.display(), e);
    }

    let config_store = FileConfigStore::new();
    let mut config = config_store.load();
    cli.apply_to(&mut config);

    if cli.save_config {
        config.validate()?;
        config_store.save(&config)?;
        info!(path = %config_store.path().display(), "saved defaults");
    }

    let store = FileLeaderboardStore::with_path(config.leaderboard_path());

    if cli.show_leaderboard {
        print_leaderboard(&store.load()?, &mut io::stdout())?;
        return Ok(());
    }

    // bad question data fails before the terminal is taken over
    let questions = config.load_questions()?;

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let session = Session::new(questions, config.session_config());
    let mut app = App::new(session, Box::new(store)).with_title(quiz_title(&config));

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen,)?;
    terminal.show_cursor()?;

    if let Err(e) = &res {
        error!(error = %e, "session aborted");
    }
    res?;

    if let Some(outcome) = app.session.outcome() {
        println!(
            "{}, your final score is: {}",
            outcome.player,
            outcome.result.display()
        );
    }

    Ok(())
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(CrosstermEventSource::new(), FixedTicker::default());

    loop {
        terminal.draw(|f| ui(app, f))?;

        if runner.advance(&mut app.session, app.store.as_ref())? == Flow::Quit {
            break;
        }
    }

    Ok(())
}

fn ui(app: &mut App, f: &mut Frame) {
    current_screen(app.session.phase()).render(app, f);
}
