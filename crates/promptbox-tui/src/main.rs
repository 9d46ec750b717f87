use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use promptbox_core::{LayoutMode, PromptForm};
use promptbox_service::{
    Command, Controller, NoticeLevel, Outcome, SystemClipboard, IMPORT_DONE,
};
use promptbox_store::{create_store, StoreConfig};
use promptbox_tui::app::App;
use promptbox_tui::components::plain;
use ratatui::prelude::*;
use tracing::info;

const LOG_FILE: &str = "promptbox.log";

/// How often the event loop wakes while a toast is on screen.
const TICK: Duration = Duration::from_millis(250);

#[derive(Parser)]
#[command(name = "promptbox", about = "Keep, search and copy reusable prompts")]
struct Cli {
    /// Directory holding the stored prompts and settings
    #[arg(long, env = "PROMPTBOX_DATA_DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print prompts matching a query
    List {
        /// Name or tag substring (case-insensitive)
        #[arg(long, default_value = "")]
        query: String,
        /// Override the saved layout
        #[arg(long, value_enum)]
        layout: Option<LayoutArg>,
    },
    /// Write all prompts to prompts_data.json
    Export {
        /// Target directory or file
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
    /// Replace all prompts with the contents of a JSON file
    Import { file: PathBuf },
    /// Add a prompt
    Add {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        comment: String,
        /// Comma-separated tags
        #[arg(long, default_value = "")]
        tags: String,
        #[arg(long)]
        prompt: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum LayoutArg {
    Grid,
    List,
}

impl From<LayoutArg> for LayoutMode {
    fn from(arg: LayoutArg) -> Self {
        match arg {
            LayoutArg::Grid => LayoutMode::Grid,
            LayoutArg::List => LayoutMode::List,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match cli.data_dir {
        Some(dir) => StoreConfig::with_data_dir(dir),
        None => StoreConfig::from_env(),
    };
    let data_dir = config.resolved_data_dir();

    match cli.command {
        None => {
            init_file_logging(&data_dir)?;
            info!("promptbox starting, data dir {}", data_dir.display());
            let controller = open_controller(&config)?;
            run_tui(App::new(controller))
        }
        Some(command) => {
            init_stderr_logging();
            let controller = open_controller(&config)?;
            run_headless(controller, command)
        }
    }
}

fn init_file_logging(data_dir: &Path) -> Result<()> {
    fs::create_dir_all(data_dir)
        .with_context(|| format!("failed to create {}", data_dir.display()))?;
    let path = data_dir.join(LOG_FILE);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn init_stderr_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();
}

fn open_controller(config: &StoreConfig) -> Result<Controller> {
    let store = create_store(config);
    Controller::open(store, Box::new(SystemClipboard::new()))
        .context("failed to load stored prompts")
}

fn run_headless(mut controller: Controller, command: Commands) -> Result<()> {
    match command {
        Commands::List { query, layout } => {
            controller.dispatch(Command::Filter(query));
            let layout = layout
                .map(LayoutMode::from)
                .unwrap_or(controller.state().settings.layout);
            print!("{}", plain::render(&controller.visible(), layout));
        }
        Commands::Export { out } => match controller.dispatch(Command::Export(out)) {
            Outcome::Notice(notice) => println!("{}", notice.message),
            Outcome::Alert(message) => bail!(message),
            other => bail!("unexpected outcome: {other:?}"),
        },
        Commands::Import { file } => match controller.dispatch(Command::Import(file)) {
            Outcome::Alert(message) if message == IMPORT_DONE => {
                println!("{message} ({} prompts)", controller.state().records().len());
            }
            Outcome::Alert(message) => bail!(message),
            other => bail!("unexpected outcome: {other:?}"),
        },
        Commands::Add {
            name,
            comment,
            tags,
            prompt,
        } => {
            let form = PromptForm::new(name, comment, tags, prompt);
            match controller.dispatch(Command::Submit(form)) {
                Outcome::Changed => {
                    if !controller.state().settings.auto_save {
                        eprintln!("warning: auto-save is off, the prompt was not stored");
                    }
                    if let Some(record) = controller.state().records().last() {
                        println!("Added \"{}\" [{}]", record.name, record.id);
                    }
                }
                Outcome::Alert(message) => bail!(message),
                Outcome::Notice(notice) if notice.level == NoticeLevel::Error => {
                    bail!(notice.message)
                }
                other => bail!("unexpected outcome: {other:?}"),
            }
        }
    }
    Ok(())
}

fn run_tui(app: App) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        eprintln!("Error: {e}");
    }

    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut app: App,
) -> Result<()> {
    loop {
        terminal.draw(|frame| app.render(frame))?;

        // Poll with a timeout while a toast is showing so it can expire
        let event = if app.needs_polling() {
            if event::poll(TICK)? {
                Some(event::read()?)
            } else {
                app.tick();
                None
            }
        } else {
            Some(event::read()?)
        };

        if let Some(Event::Key(key)) = event {
            if app.is_quit_key(key) {
                break;
            }
            app.handle_key(key);
            app.tick();
        }
    }

    info!("promptbox exiting");
    Ok(())
}
