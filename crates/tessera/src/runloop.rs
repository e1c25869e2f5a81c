//! Driving a screen from an input source.
use std::{
    io, panic,
    sync::mpsc::{self, TryRecvError},
};

use color_backtrace::{BacktracePrinter, default_output_stream};
use crossterm::{cursor as ccursor, event as cevent, terminal};
use scopeguard::guard;

use crate::{
    error::{Error, Result},
    event::{Event, key::KeyCode},
    screen::Screen,
};

/// A source of input events.
pub trait EventSource {
    /// Block until the next event arrives.
    fn next(&mut self) -> Result<Event>;

    /// Return an event if one is available right now.
    fn try_next(&mut self) -> Result<Option<Event>>;
}

/// Is this a pointer move?
fn is_move(e: &Event) -> bool {
    matches!(e, Event::Mouse(m) if m.is_move())
}

/// Events from a channel.
///
/// Consecutive mouse-move events are coalesced so clicks are not delayed by
/// move bursts.
pub struct ChannelSource {
    /// Event receiver channel.
    rx: mpsc::Receiver<Event>,
    /// Buffered non-move event encountered while coalescing.
    pending: Option<Event>,
}

impl ChannelSource {
    /// Construct a new event source.
    pub fn new(rx: mpsc::Receiver<Event>) -> Self {
        Self { rx, pending: None }
    }

    /// Replace a move event with the latest of any moves queued behind it.
    fn coalesce(&mut self, mut event: Event) -> Event {
        if !is_move(&event) {
            return event;
        }
        loop {
            match self.rx.try_recv() {
                Ok(next) if is_move(&next) => event = next,
                Ok(next) => {
                    self.pending = Some(next);
                    break;
                }
                Err(_) => break,
            }
        }
        event
    }
}

impl EventSource for ChannelSource {
    fn next(&mut self) -> Result<Event> {
        if let Some(event) = self.pending.take() {
            return Ok(event);
        }
        let event = self.rx.recv()?;
        Ok(self.coalesce(event))
    }

    fn try_next(&mut self) -> Result<Option<Event>> {
        if let Some(event) = self.pending.take() {
            return Ok(Some(event));
        }
        match self.rx.try_recv() {
            Ok(event) => Ok(Some(self.coalesce(event))),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => {
                Err(Error::RunLoop("event source disconnected".into()))
            }
        }
    }
}

/// Exit status reported when the loop is interrupted.
pub const INTERRUPTED: i32 = 130;

/// What Ctrl+C does inside the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interrupt {
    /// Close the screen and return [`INTERRUPTED`].
    #[default]
    Exit,
    /// As `Exit`, printing the node tree to stderr first.
    DumpAndExit,
    /// Treat it as an ordinary key.
    Deliver,
}

/// Run loop settings.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunloopOptions {
    /// While the loop runs, a panic restores the terminal before the
    /// backtrace is printed.
    pub restore_on_panic: bool,
    /// Ctrl+C handling.
    pub interrupt: Interrupt,
}

/// Close the screen, then print `headline` and the node tree to stderr.
fn report(screen: &mut Screen, headline: &str) {
    let dump = screen.dump();
    if let Err(e) = screen.close() {
        tracing::warn!(error = %e, "closing the screen failed");
    }
    eprintln!("\n{headline}");
    match dump {
        Ok(d) => eprintln!("{d}"),
        Err(e) => eprintln!("(no tree dump: {e})"),
    }
}

/// Consecutive failed terminal writes the loop tolerates before giving up.
pub const MAX_RENDER_FAILURES: u32 = 3;

/// Render once. A failed terminal write leaves the screen dirty for the next
/// pass to retry. Any other failure, or too many write failures in a row,
/// releases the terminal and reports the tree before the error is returned.
fn render(screen: &mut Screen, failures: &mut u32) -> Result<()> {
    match screen.render() {
        Ok(_) => {
            *failures = 0;
            Ok(())
        }
        Err(e @ Error::Render(_)) if *failures + 1 < MAX_RENDER_FAILURES => {
            *failures += 1;
            tracing::warn!(error = %e, failures = *failures, "render failed, will retry");
            Ok(())
        }
        Err(e) => {
            report(screen, &format!("render failed: {e}"));
            Err(e)
        }
    }
}

/// Is this Ctrl+C?
fn is_ctrl_c(e: &Event) -> bool {
    matches!(e, Event::Key(k) if k.mods.ctrl && k.key == KeyCode::Char('c'))
}

/// Dispatch one event. Returns an exit status if the loop should stop.
fn step(screen: &mut Screen, event: Event, interrupt: Interrupt) -> Result<Option<i32>> {
    if interrupt != Interrupt::Deliver && is_ctrl_c(&event) {
        if interrupt == Interrupt::DumpAndExit {
            report(screen, "interrupted; node tree:");
        }
        return Ok(Some(INTERRUPTED));
    }
    screen.dispatch(event)?;
    Ok(screen.take_exit_request())
}

/// Swap in a panic hook that puts the terminal back into cooked mode on the
/// main screen, then prints a colour backtrace. The previous hook returns
/// when the guard drops.
fn restoring_panic_hook() -> impl Drop {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(|info| {
        let mut err = io::stderr();
        #[allow(unused_must_use)]
        {
            crossterm::execute!(
                err,
                terminal::LeaveAlternateScreen,
                cevent::DisableMouseCapture,
                ccursor::Show
            );
            terminal::disable_raw_mode();
            BacktracePrinter::new().print_panic_info(info, &mut default_output_stream());
        }
    }));
    guard(previous, panic::set_hook)
}

/// Run the render/event loop until a handler requests an exit or Ctrl+C is
/// pressed. All immediately available events are dispatched before each
/// render, and a render whose terminal write failed is retried on the next
/// pass. Returns the exit status. The screen is closed on exit.
pub fn run(screen: &mut Screen, events: &mut impl EventSource) -> Result<i32> {
    run_with_options(screen, events, RunloopOptions::default())
}

/// Run the loop with custom options.
pub fn run_with_options(
    screen: &mut Screen,
    events: &mut impl EventSource,
    options: RunloopOptions,
) -> Result<i32> {
    let _hook = options.restore_on_panic.then(restoring_panic_hook);
    let mut failures = 0;
    let code = loop {
        render(screen, &mut failures)?;
        if let Some(code) = screen.take_exit_request() {
            break code;
        }
        let mut next = Some(events.next()?);
        let mut stop = None;
        while let Some(event) = next {
            stop = step(screen, event, options.interrupt)?;
            if stop.is_some() {
                break;
            }
            next = events.try_next()?;
        }
        if let Some(code) = stop {
            break code;
        }
    };
    tracing::debug!(code, "run loop finished");
    screen.close()?;
    Ok(code)
}
