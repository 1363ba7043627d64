use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::fs::File;
use std::sync::Mutex;
use std::{error::Error, io};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod app;
mod charts;
mod cli;
mod data;
mod error;
mod export;
mod filter;
mod ui;
mod units;
mod weather;

use crate::app::{run_app, App, DataSource, Settings};
use crate::cli::Args;
use crate::export::{export_selection, Exported};
use crate::filter::Filter;

fn setup_logging(args: &Args) -> io::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // The dashboard owns the terminal, so it only logs when given a file.
    if let Some(path) = &args.log_file {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(File::create(path)?))
            .init();
    } else if args.export {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init();
    }
    Ok(())
}

fn export_once(settings: &Settings, source: DataSource) -> Result<(), Box<dyn Error>> {
    let filter = Filter {
        date: settings.date,
        region: settings.region,
    };
    match export_selection(source, &filter, &settings.out_dir, io::stdout().lock())? {
        Exported::File(path) => println!("{}", path.display()),
        Exported::Stream => {}
        Exported::Nothing(msg) => {
            warn!("{msg}");
            eprintln!("{msg}");
        }
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    setup_logging(&args)?;

    let today = chrono::Local::now().date_naive();
    let settings = args.settings(today)?;
    let seed = args.seed;
    let source: DataSource =
        Box::new(move || Ok::<_, error::DashError>(data::sample_data(today, seed)));

    if args.export {
        return export_once(&settings, source);
    }

    info!(date = %settings.date, region = %settings.region, "starting dashboard");

    // setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // create app and run it
    let res = run_app(&mut terminal, App::new(settings, source));

    // restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{:?}", err)
    }

    Ok(())
}
