use std::io::{self, Write};

use crossterm::{cursor, queue, terminal};
use unicode_width::UnicodeWidthStr;

use crate::remote::Snapshot;

/// Two fixed lines repainted in place, anchored at wherever the cursor
/// sat when the program started. No alternate screen, no frame buffer:
/// stale characters are erased by padding every write out to the full
/// terminal width.
pub struct StatusScreen<W: Write> {
    out: W,
    origin_col: u16,
    origin_row: u16,
}

impl<W: Write> StatusScreen<W> {
    pub fn new(out: W, origin: (u16, u16)) -> Self {
        StatusScreen {
            out,
            origin_col: origin.0,
            origin_row: origin.1,
        }
    }

    pub fn origin(&self) -> (u16, u16) {
        (self.origin_col, self.origin_row)
    }

    /// Repaints both status lines, re-reading the terminal size so the
    /// padding always covers the previous (possibly longer) contents.
    pub fn render(&mut self, snapshot: &Snapshot) -> io::Result<()> {
        let area = terminal::size().unwrap_or((80, 24));
        self.write_line(&status_line(snapshot), 0, 0, area)?;
        self.write_line(&progress_line(snapshot), 0, 1, area)
    }

    /// Writes `text` at `origin + (dx, dy)`, padded with spaces out to
    /// the terminal width, and flushes. A target row below the bottom of
    /// the screen is not an error: the row origin shifts up two rows and
    /// the write goes through anyway. Rough compensation for a shrunken
    /// terminal, kept from the original behavior.
    pub fn write_line(&mut self, text: &str, dx: u16, dy: u16, area: (u16, u16)) -> io::Result<()> {
        let (width, height) = area;
        if self.origin_row.saturating_add(dy) >= height {
            self.origin_row = self.origin_row.saturating_sub(2);
        }
        let col = self.origin_col.saturating_add(dx);
        let row = self.origin_row.saturating_add(dy);
        queue!(self.out, cursor::MoveTo(col, row))?;
        let pad = (width as usize).saturating_sub(text.width());
        write!(self.out, "{}{}", text, " ".repeat(pad))?;
        self.out.flush()
    }
}

/// Line 1: playlist position and title.
pub fn status_line(snapshot: &Snapshot) -> String {
    format!(
        "Playing: ({}/{}) {}",
        snapshot.playlist_index, snapshot.playlist_length, snapshot.song
    )
}

/// Line 2: elapsed/total clocks, volume percentage, paused marker.
pub fn progress_line(snapshot: &Snapshot) -> String {
    format!(
        "{}/{} -- Volume: {}% {}",
        clock(snapshot.position),
        clock(snapshot.length),
        (snapshot.volume * 100.0).round() as u32,
        if snapshot.paused { "(Paused)" } else { "" },
    )
}

/// Seconds to zero-padded `HH:MM:SS`, whole seconds only.
fn clock(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    format!(
        "{:02}:{:02}:{:02}",
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}
