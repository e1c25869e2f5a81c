//! Launch the list gym demo.

use std::{fs::File, path::PathBuf, process, sync::Mutex};

use clap::Parser;
use tessera::{
    AnsiCaps, CrosstermTerminal, Result, Screen, ScreenOptions,
    backend::crossterm::events,
    runloop::{Interrupt, RunloopOptions, run_with_options},
};
use tessera_demos::listgym::ListGym;

/// CLI flags for the list gym demo.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Number of rows to start with.
    #[clap(short, long, default_value_t = 200)]
    items: usize,

    /// Screen options file (TOML).
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// Never use terminal scroll regions.
    #[clap(long)]
    no_scroll_region: bool,

    /// Join adjacent borders.
    #[clap(long)]
    dock: bool,

    /// Write trace logs to this file.
    #[clap(long)]
    log: Option<PathBuf>,

    /// Dump the node tree when Ctrl+C is pressed.
    #[clap(long)]
    dump: bool,

    /// Print the effective screen options as TOML and exit.
    #[clap(long)]
    print_config: bool,
}

/// Run the list gym demo.
pub fn main() -> Result<()> {
    let args = Args::parse();

    let mut options = match &args.config {
        Some(path) => ScreenOptions::load(path)?,
        None => ScreenOptions::default(),
    };
    if args.no_scroll_region {
        options.scroll_region = false;
    }
    if args.dock {
        options.dock_borders = true;
    }
    if args.print_config {
        print!("{}", options.to_toml()?);
        return Ok(());
    }

    if let Some(path) = &args.log {
        let file = File::create(path)?;
        tracing_subscriber::fmt()
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .with_max_level(tracing::Level::TRACE)
            .init();
    }

    let mut screen = Screen::new(CrosstermTerminal::new(options.mouse), AnsiCaps, options)?;
    ListGym::install(&mut screen, args.items)?;

    let runloop_options = RunloopOptions {
        restore_on_panic: true,
        interrupt: if args.dump {
            Interrupt::DumpAndExit
        } else {
            Interrupt::Exit
        },
    };
    let code = run_with_options(&mut screen, &mut events(), runloop_options)?;
    drop(screen);
    process::exit(code);
}
