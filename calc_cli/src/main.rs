//! # RC Design Tools
//!
//! Terminal application for reinforced concrete beam design and code clause
//! search. With no subcommand it opens the menu-driven TUI; the subcommands
//! run one calculation or search and print JSON.

mod app;
mod batch;
mod config;
mod handlers;
mod logging;
mod surface;
mod ui;

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use tracing::{debug, info, warn};

use calc_core::clauses::load_index;
use calc_core::{ClauseIndex, MenuOption};

use crate::app::App;
use crate::config::{AppConfig, LoggingConfig};

#[derive(Parser, Debug)]
#[command(name = "rc-design", version, about = "Reinforced concrete beam design and code clause search")]
struct Cli {
    /// Config file (default: the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Menu option to open first, e.g. "Beam Shear design"
    #[arg(long)]
    menu: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Open the interactive menu (default)
    Tui,
    /// Bending design from a JSON input file (`-` for stdin, defaults when omitted)
    Bending { input: Option<PathBuf> },
    /// Shear design from a JSON input file (`-` for stdin, defaults when omitted)
    Shear { input: Option<PathBuf> },
    /// Search the code clauses by number or keywords
    Search {
        query: String,
        /// Maximum number of hits
        #[arg(short, long)]
        limit: Option<usize>,
        /// Clause source (PDF, text or JSON index) overriding the config
        #[arg(short, long)]
        source: Option<PathBuf>,
    },
    /// Write a PDF report for a calculation JSON file
    Report {
        input: PathBuf,
        /// Output file (default: `<output_dir>/<label>_<kind>.pdf`)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the effective configuration
    Config {
        /// Also write it to the config file
        #[arg(long)]
        write: bool,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config(cli.config.as_deref())?;

    let command = cli.command.unwrap_or(Command::Tui);
    logging::init(&cfg.logging, log_output(&command, &cfg.logging))?;

    match command {
        Command::Tui => run_tui(cfg, cli.menu.as_deref()),
        Command::Bending { input } => batch::run_bending(input.as_deref()),
        Command::Shear { input } => batch::run_shear(input.as_deref()),
        Command::Search { query, limit, source } => batch::run_search(&query, source.as_deref(), limit, &cfg),
        Command::Report { input, output } => batch::run_report(&input, output, &cfg).map(|_| ()),
        Command::Config { write } => {
            print!("{}", config::to_toml(&cfg)?);
            if write {
                let path = cli.config.unwrap_or_else(config::default_config_path);
                config::save_config(&cfg, &path)?;
                eprintln!("Saved {}", path.display());
            }
            Ok(())
        }
    }
}

/// The terminal UI owns the screen, so it logs to a file; everything else to stderr
fn log_output(command: &Command, config: &LoggingConfig) -> logging::Output {
    match command {
        Command::Tui => logging::Output::interactive(config),
        _ => logging::Output::Stderr,
    }
}

/// Clause index for the search handler, or the reason there is none
fn clause_index(cfg: &AppConfig) -> Result<ClauseIndex, String> {
    let Some(path) = cfg.clauses.source.as_deref() else {
        return Err("No clause source configured".to_string());
    };
    load_index(path).map_err(|e| {
        warn!(path = %path.display(), error = %e, "clause index unavailable");
        format!("Could not load {}: {}", path.display(), e)
    })
}

fn run_tui(cfg: AppConfig, menu: Option<&str>) -> Result<()> {
    let clauses = clause_index(&cfg);
    let dispatcher = handlers::build_dispatcher(&cfg, clauses);
    let mut app = App::new(cfg.page.clone(), dispatcher);
    if let Some(label) = menu {
        match MenuOption::from_label(label) {
            Some(option) => app = app.with_selected(option),
            None => debug!(label, "unknown menu label ignored"),
        }
    }

    // Install panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = restore_terminal();
        original_hook(info);
    }));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    info!(title = %app.page.page_title, "session started");
    let result = run_app(&mut terminal, &mut app);

    restore_terminal()?;
    info!("session ended");
    result
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    let mut key = None;
    loop {
        terminal.draw(|frame| app.render(frame, key.take()))?;

        if let Event::Key(event) = event::read().context("Failed to read terminal event")? {
            key = app.handle_key(event);
        }
        if app.should_quit {
            return Ok(());
        }
    }
}
