pub mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use log::info;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    time::Duration,
};
use trivia::{
    config::{Config, ConfigStore, FileConfigStore},
    provider::{Difficulty, OpenTdbProvider, OpenTdbSettings},
    runtime::{CrosstermEventSource, FixedTicker, QuizEvent, Runner},
    session::{QuizSession, Score, SessionState},
};

const TICK_RATE_MS: u64 = 100;
const MAX_AMOUNT: usize = 50;

/// multiple-choice trivia quiz in your terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A terminal trivia quiz. Questions come from the Open Trivia Database; navigate, answer, mark questions for review and submit for a score."
)]
pub struct Cli {
    /// number of questions to fetch (1-50)
    #[clap(short = 'n', long)]
    amount: Option<usize>,

    /// open trivia database category id
    #[clap(short = 'c', long)]
    category: Option<u32>,

    /// question difficulty
    #[clap(short = 'd', long, value_enum)]
    difficulty: Option<Difficulty>,

    /// question api endpoint
    #[clap(long)]
    api_url: Option<String>,

    /// request timeout in seconds
    #[clap(long)]
    timeout_secs: Option<u64>,

    /// persist the effective settings as the new defaults
    #[clap(long)]
    save_config: bool,
}

impl Cli {
    /// Overlay the flags that were given on top of the stored config
    fn apply(&self, mut cfg: Config) -> Config {
        if let Some(amount) = self.amount {
            cfg.amount = amount;
        }
        if self.category.is_some() {
            cfg.category = self.category;
        }
        if self.difficulty.is_some() {
            cfg.difficulty = self.difficulty;
        }
        if let Some(api_url) = &self.api_url {
            cfg.api_url = api_url.clone();
        }
        if let Some(timeout_secs) = self.timeout_secs {
            cfg.timeout_secs = timeout_secs;
        }
        cfg
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppState {
    Quiz,
    Results(Score),
}

/// What the event loop has to do after a key was handled
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    None,
    Restart,
    Quit,
}

#[derive(Debug)]
pub struct App {
    pub config: Config,
    pub session: QuizSession,
    pub state: AppState,
    pub spinner_frame: usize,
}

impl App {
    pub fn new(config: Config) -> Self {
        Self {
            session: QuizSession::new(config.amount),
            config,
            state: AppState::Quiz,
            spinner_frame: 0,
        }
    }

    /// Returns true when the screen needs a redraw
    pub fn on_tick(&mut self) -> bool {
        if self.session.state() == SessionState::Loading {
            self.spinner_frame = self.spinner_frame.wrapping_add(1);
            true
        } else {
            false
        }
    }

    pub fn restart(&mut self) -> trivia::session::LoadTicket {
        self.state = AppState::Quiz;
        self.spinner_frame = 0;
        self.session.restart()
    }

    pub fn submit(&mut self) {
        if let Some(score) = self.session.submit() {
            info!("quiz submitted: {}/{}", score.score, score.total);
            self.state = AppState::Results(score);
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        if key.kind == KeyEventKind::Release {
            return Action::None;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Action::Quit;
        }

        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return Action::Quit,
            KeyCode::Char('r') => return Action::Restart,
            _ => {}
        }

        if self.state != AppState::Quiz {
            return Action::None;
        }

        match key.code {
            KeyCode::Left | KeyCode::Char('h') => self.session.previous(),
            KeyCode::Right | KeyCode::Char('l') => self.session.next(),
            KeyCode::Char('m') => self.session.toggle_review(),
            KeyCode::Char('s') | KeyCode::Enter => self.submit(),
            KeyCode::Char(c @ '1'..='9') => self.session.select_option_at(c as usize - '1' as usize),
            KeyCode::Char(c @ 'a'..='g') => self.session.select_option_at(c as usize - 'a' as usize),
            _ => {}
        }
        Action::None
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let store = FileConfigStore::new();
    let config = cli.apply(store.load());

    if config.amount == 0 || config.amount > MAX_AMOUNT {
        let mut cmd = Cli::command();
        cmd.error(
            ErrorKind::ValueValidation,
            format!("amount must be between 1 and {MAX_AMOUNT}"),
        )
        .exit();
    }

    if cli.save_config {
        store.save(&config)?;
        info!("saved settings to {}", store.path().display());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let rt = tokio::runtime::Runtime::new()?;
    let provider = OpenTdbProvider::new(OpenTdbSettings::from(&config))?;

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config);
    let result = start_tui(&mut terminal, &mut app, &rt, provider);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen,)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rt: &tokio::runtime::Runtime,
    provider: OpenTdbProvider,
) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );

    let ticket = app.session.begin_load();
    runner.spawn_fetch(rt.handle(), provider.clone(), ticket, app.session.amount());
    terminal.draw(|f| ui(app, f))?;

    loop {
        match runner.step() {
            QuizEvent::Tick => {
                if app.on_tick() {
                    terminal.draw(|f| ui(app, f))?;
                }
            }
            QuizEvent::Resize => {
                terminal.draw(|f| ui(app, f))?;
            }
            QuizEvent::Loaded(ticket, result) => {
                if app.session.complete_load(ticket, result) {
                    terminal.draw(|f| ui(app, f))?;
                }
            }
            QuizEvent::Key(key) => {
                match app.handle_key(key) {
                    Action::Quit => break,
                    Action::Restart => {
                        let ticket = app.restart();
                        runner.spawn_fetch(
                            rt.handle(),
                            provider.clone(),
                            ticket,
                            app.session.amount(),
                        );
                    }
                    Action::None => {}
                }
                terminal.draw(|f| ui(app, f))?;
            }
        }
    }

    Ok(())
}

fn ui(app: &App, f: &mut Frame) {
    f.render_widget(app, f.area());
}
