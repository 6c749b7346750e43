use std::io::{self, Write};
use std::panic;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    cursor,
    event::EventStream,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use mprc::app::{Session, SessionEvent};
use mprc::remote::Transport;
use mprc::ui::StatusScreen;

const DAEMON_ADDR: &str = "127.0.0.1:2806";
const REFRESH_INTERVAL: Duration = Duration::from_millis(1000);

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    // Connect before touching the terminal so a refused connection
    // prints its error above the status lines, not into them.
    let (remote, transport) = Transport::connect(DAEMON_ADDR).await;
    tokio::spawn(transport.run());

    // The status lines share the screen with the shell, so a panic must
    // not leave raw mode on and the cursor hidden.
    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), cursor::Show);
        default_hook(info);
    }));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, cursor::Hide)?;
    let origin = cursor::position().unwrap_or((0, 0));

    let (tx, rx) = mpsc::channel(100);

    // 1. Input Event Task
    let tx_input = tx.clone();
    tokio::spawn(async move {
        let mut reader = EventStream::new();
        while let Some(Ok(event)) = reader.next().await {
            if tx_input.send(SessionEvent::Input(event)).await.is_err() {
                break;
            }
        }
    });

    // 2. Refresh Tick Task
    let tx_tick = tx;
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(REFRESH_INTERVAL);
        loop {
            interval.tick().await;
            if tx_tick.send(SessionEvent::Tick).await.is_err() {
                break;
            }
        }
    });

    info!(addr = DAEMON_ADDR, "session starting");
    let screen = StatusScreen::new(io::stdout(), origin);
    let mut session = Session::new(remote, screen, rx);
    let result = session.run().await;

    // Park the cursor below the status lines so the shell prompt does
    // not land on top of them.
    execute!(
        stdout,
        cursor::MoveTo(0, origin.1.saturating_add(2)),
        cursor::Show
    )?;
    disable_raw_mode()?;
    writeln!(stdout)?;
    info!("session over");
    result
}

/// Diagnostics go to a file: the terminal itself belongs to the status
/// display. Filterable with RUST_LOG, default `info`.
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let appender = tracing_appender::rolling::never("/tmp", "mprc.log");
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(appender)
        .with_ansi(false)
        .try_init();
}
