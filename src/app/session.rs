use std::io::Write;

use anyhow::Result;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc;
use tracing::{info, trace};

use crate::app::events::SessionEvent;
use crate::remote::{Remote, Snapshot};
use crate::ui::StatusScreen;

/// The event loop that owns the remote handle and the screen. Refresh
/// ticks and keypresses arrive on one channel, so repaints are
/// serialized by construction; the transport actor serializes the
/// socket exchanges behind the remote the same way. The snapshot's
/// sub-queries stay independent requests, though, so a command
/// dispatched between two of them can land in the middle.
pub struct Session<W: Write> {
    remote: Remote,
    screen: StatusScreen<W>,
    events: mpsc::Receiver<SessionEvent>,
}

impl<W: Write> Session<W> {
    pub fn new(remote: Remote, screen: StatusScreen<W>, events: mpsc::Receiver<SessionEvent>) -> Self {
        Session {
            remote,
            screen,
            events,
        }
    }

    /// Runs until the quit key, or until every event source is gone.
    pub async fn run(&mut self) -> Result<()> {
        self.repaint().await?;
        while let Some(event) = self.events.recv().await {
            match event {
                SessionEvent::Tick => self.repaint().await?,
                SessionEvent::Input(Event::Key(key)) => {
                    if !self.handle_key(key).await {
                        info!("quit key, leaving session");
                        return Ok(());
                    }
                    // Repaint right away so the action shows up without
                    // waiting out the rest of the tick interval.
                    self.repaint().await?;
                }
                SessionEvent::Input(_) => {}
            }
        }
        Ok(())
    }

    /// Dispatches one keypress. Returns false when the session should
    /// end. Action failures degrade silently; the next repaint shows
    /// whatever the daemon still answers.
    async fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('q') => return false,
            KeyCode::Enter | KeyCode::Char('>') => {
                let _ = self.remote.next().await;
            }
            KeyCode::Char('<') => {
                let _ = self.remote.prev().await;
            }
            KeyCode::Char(' ') => self.toggle_playback().await,
            KeyCode::Left => {
                let _ = self
                    .remote
                    .backward(key.modifiers.contains(KeyModifiers::SHIFT))
                    .await;
            }
            KeyCode::Right => {
                let _ = self
                    .remote
                    .forward(key.modifiers.contains(KeyModifiers::SHIFT))
                    .await;
            }
            KeyCode::Up => {
                let _ = self.remote.volume_up().await;
            }
            KeyCode::Down => {
                let _ = self.remote.volume_down().await;
            }
            _ => {}
        }
        true
    }

    /// Space re-probes the daemon state rather than trusting the last
    /// snapshot; a daemon in neither state (stopped) makes this a no-op.
    async fn toggle_playback(&mut self) {
        if self.remote.is_paused().await.unwrap_or(false) {
            let _ = self.remote.resume().await;
        } else if self.remote.is_playing().await.unwrap_or(false) {
            let _ = self.remote.pause().await;
        }
    }

    async fn repaint(&mut self) -> Result<()> {
        let snapshot = Snapshot::fetch(&self.remote).await;
        trace!(?snapshot, "repaint");
        self.screen.render(&snapshot)?;
        Ok(())
    }
}
