// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! Terminal navigation radar.

mod app;
mod settings;
mod ui;

use std::fs::{self, File};
use std::io::{self, Stdout};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use log::{info, warn, LevelFilter};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use roadradar_providers::places::parse_coordinates;
use simplelog::{Config, WriteLogger};

use app::App;
use settings::{config_root, SettingsStore};

#[derive(Parser, Debug)]
#[command(name = "roadradar", version, about = "Terminal navigation radar")]
struct Args {
    /// Drive the position along the fetched route instead of locating.
    #[arg(long)]
    simulate: bool,

    /// Start from a fixed position instead of an IP lookup.
    #[arg(long, value_name = "LAT,LON")]
    at: Option<String>,

    /// Routing server to use.
    #[arg(long, env = "ROADRADAR_OSRM_URL")]
    osrm_url: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging()?;
    info!("Starting — version={}", env!("CARGO_PKG_VERSION"));

    let store = SettingsStore::new();
    let mut settings = match store.load() {
        Ok(settings) => settings,
        Err(e) => {
            warn!("Settings unreadable, using defaults — error={:#}", e);
            settings::Settings::default()
        }
    };
    if let Some(url) = args.osrm_url {
        settings.osrm_url = url;
    }

    let mut app = App::new(settings, args.simulate);
    if let Some(raw) = &args.at {
        let Some(point) = parse_coordinates(raw) else {
            bail!("--at expects \"lat,lon\", got {:?}", raw);
        };
        app.set_manual_position(point);
    }

    let mut terminal = setup_terminal()?;
    let result = run(&mut terminal, &mut app);
    restore_terminal(&mut terminal)?;

    if let Err(e) = store.save(&app.settings) {
        warn!("Settings not saved — error={:#}", e);
    }
    info!("Stopped");
    result
}

fn run(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    while !app.should_quit {
        app.tick();
        app.pump();
        terminal.draw(|frame| ui::draw(frame, app))?;

        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                _ => {}
            }
        }
    }
    Ok(())
}

fn init_logging() -> Result<()> {
    let root = config_root();
    fs::create_dir_all(&root).with_context(|| format!("creating {}", root.display()))?;
    let log_path = root.join("roadradar.log");
    let file = File::create(&log_path).with_context(|| format!("opening {}", log_path.display()))?;
    WriteLogger::init(LevelFilter::Info, Config::default(), file)?;
    Ok(())
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}
