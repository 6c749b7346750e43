//! Stand-in music player daemon for demos and manual testing: binds the
//! protocol port, holds fake playback state, and answers every command
//! literal the real daemon understands.

use std::sync::{Arc, Mutex};
use std::time::Instant;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

const DEFAULT_ADDR: &str = "127.0.0.1:2806";
const TRACK_LENGTH: f64 = 247.0;
const VOLUME_STEP: f32 = 0.05;
const SEEK_SHORT: f64 = 5.0;
const SEEK_LONG: f64 = 30.0;

struct FakePlayer {
    playlist: Vec<&'static str>,
    index: usize,
    volume: f32,
    paused: bool,
    started: Instant,
    offset: f64,
}

impl FakePlayer {
    fn new() -> Self {
        FakePlayer {
            playlist: vec!["Morning Raga", "Night Drive", "Static Bloom"],
            index: 0,
            volume: 0.5,
            paused: false,
            started: Instant::now(),
            offset: 0.0,
        }
    }

    fn position(&self) -> f64 {
        let pos = if self.paused {
            self.offset
        } else {
            self.offset + self.started.elapsed().as_secs_f64()
        };
        pos.min(TRACK_LENGTH)
    }

    fn seek(&mut self, delta: f64) {
        self.offset = (self.position() + delta).clamp(0.0, TRACK_LENGTH);
        self.started = Instant::now();
    }

    fn set_paused(&mut self, paused: bool) {
        self.offset = self.position();
        self.started = Instant::now();
        self.paused = paused;
    }

    fn skip(&mut self, forward: bool) {
        let last = self.playlist.len() - 1;
        self.index = if forward {
            (self.index + 1).min(last)
        } else {
            self.index.saturating_sub(1)
        };
        self.offset = 0.0;
        self.started = Instant::now();
    }

    fn answer(&mut self, command: &str) -> String {
        match command {
            "play" | "resume" => {
                self.set_paused(false);
                "ok".to_string()
            }
            "pause" => {
                self.set_paused(true);
                "ok".to_string()
            }
            "next" => {
                self.skip(true);
                "ok".to_string()
            }
            "prev" => {
                self.skip(false);
                "ok".to_string()
            }
            "volume_up" => {
                self.volume = (self.volume + VOLUME_STEP).min(1.0);
                "ok".to_string()
            }
            "volume_down" => {
                self.volume = (self.volume - VOLUME_STEP).max(0.0);
                "ok".to_string()
            }
            "forward" => {
                self.seek(SEEK_SHORT);
                "ok".to_string()
            }
            "long_forward" => {
                self.seek(SEEK_LONG);
                "ok".to_string()
            }
            "backward" => {
                self.seek(-SEEK_SHORT);
                "ok".to_string()
            }
            "long_backward" => {
                self.seek(-SEEK_LONG);
                "ok".to_string()
            }
            "get_volume" => format!("{}", self.volume),
            "get_position" => format!("{:.1}", self.position()),
            "get_length" => format!("{:.1}", TRACK_LENGTH),
            "get_pl_index" => format!("{}", self.index + 1),
            "get_pl_length" => format!("{}", self.playlist.len()),
            "get_current_song" => self.playlist[self.index].to_string(),
            "get_player_state" => if self.paused { "paused" } else { "playing" }.to_string(),
            _ => "N/A".to_string(),
        }
    }
}

fn parse_arg_value(args: &[String], name: &str) -> Option<String> {
    args.iter()
        .position(|a| a == name)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let addr = parse_arg_value(&args, "--addr").unwrap_or_else(|| DEFAULT_ADDR.to_string());

    let listener = TcpListener::bind(&addr).await?;
    println!("mock_playerd listening on {}", listener.local_addr()?);

    let player = Arc::new(Mutex::new(FakePlayer::new()));
    loop {
        let (stream, peer) = listener.accept().await?;
        println!("client connected from {peer}");
        let player = player.clone();
        tokio::spawn(async move {
            let _ = serve(stream, player).await;
        });
    }
}

async fn serve(mut stream: TcpStream, player: Arc<Mutex<FakePlayer>>) -> std::io::Result<()> {
    let mut buf = [0u8; 1024];
    loop {
        let n = stream.read(&mut buf).await?;
        if n == 0 {
            return Ok(());
        }
        let command = String::from_utf8_lossy(&buf[..n]).trim().to_string();
        let reply = {
            let mut player = player.lock().unwrap_or_else(|e| e.into_inner());
            player.answer(&command)
        };
        stream.write_all(reply.as_bytes()).await?;
    }
}
