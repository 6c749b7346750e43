use std::str::FromStr;

use tokio::sync::{mpsc, oneshot};

use crate::remote::transport::Request;
use crate::remote::RemoteError;

/// Every message the daemon understands, by its wire literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Play,
    Pause,
    Resume,
    Next,
    Prev,
    VolumeUp,
    VolumeDown,
    Forward { long: bool },
    Backward { long: bool },
    GetVolume,
    GetPosition,
    GetLength,
    GetPlaylistIndex,
    GetPlaylistLength,
    GetCurrentSong,
    GetPlayerState,
}

impl Command {
    pub fn literal(self) -> &'static str {
        match self {
            Command::Play => "play",
            Command::Pause => "pause",
            Command::Resume => "resume",
            Command::Next => "next",
            Command::Prev => "prev",
            Command::VolumeUp => "volume_up",
            Command::VolumeDown => "volume_down",
            Command::Forward { long: false } => "forward",
            Command::Forward { long: true } => "long_forward",
            Command::Backward { long: false } => "backward",
            Command::Backward { long: true } => "long_backward",
            Command::GetVolume => "get_volume",
            Command::GetPosition => "get_position",
            Command::GetLength => "get_length",
            Command::GetPlaylistIndex => "get_pl_index",
            Command::GetPlaylistLength => "get_pl_length",
            Command::GetCurrentSong => "get_current_song",
            Command::GetPlayerState => "get_player_state",
        }
    }
}

/// What the daemon says about playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayerState {
    Playing,
    Paused,
    /// Anything that is not exactly `playing` or `paused`.
    #[default]
    Stopped,
}

impl PlayerState {
    fn from_reply(reply: &str) -> Self {
        match reply.trim() {
            "playing" => PlayerState::Playing,
            "paused" => PlayerState::Paused,
            _ => PlayerState::Stopped,
        }
    }
}

/// Cloneable handle to the transport actor. Every operation is one
/// queued exchange; queueing is what keeps two concurrent callers from
/// interleaving write/read pairs on the shared socket.
#[derive(Clone)]
pub struct Remote {
    requests: mpsc::Sender<Request>,
}

impl Remote {
    pub(crate) fn new(requests: mpsc::Sender<Request>) -> Self {
        Remote { requests }
    }

    async fn exchange(&self, command: Command) -> Result<String, RemoteError> {
        let (tx, rx) = oneshot::channel();
        self.requests
            .send(Request {
                payload: command.literal(),
                reply: tx,
            })
            .await
            .map_err(|_| RemoteError::Disconnected)?;
        rx.await.map_err(|_| RemoteError::Disconnected)?
    }

    /// Fire-and-forget: the exchange still happens (the daemon answers
    /// every command), the reply content is discarded.
    pub async fn send(&self, command: Command) -> Result<(), RemoteError> {
        self.exchange(command).await.map(|_| ())
    }

    pub async fn play(&self) -> Result<(), RemoteError> {
        self.send(Command::Play).await
    }

    pub async fn pause(&self) -> Result<(), RemoteError> {
        self.send(Command::Pause).await
    }

    pub async fn resume(&self) -> Result<(), RemoteError> {
        self.send(Command::Resume).await
    }

    pub async fn next(&self) -> Result<(), RemoteError> {
        self.send(Command::Next).await
    }

    pub async fn prev(&self) -> Result<(), RemoteError> {
        self.send(Command::Prev).await
    }

    pub async fn volume_up(&self) -> Result<(), RemoteError> {
        self.send(Command::VolumeUp).await
    }

    pub async fn volume_down(&self) -> Result<(), RemoteError> {
        self.send(Command::VolumeDown).await
    }

    pub async fn forward(&self, long: bool) -> Result<(), RemoteError> {
        self.send(Command::Forward { long }).await
    }

    pub async fn backward(&self, long: bool) -> Result<(), RemoteError> {
        self.send(Command::Backward { long }).await
    }

    /// Volume as a fraction in 0.0..=1.0.
    pub async fn volume(&self) -> Result<f32, RemoteError> {
        let reply = self.exchange(Command::GetVolume).await?;
        parse_number("get_volume", reply)
    }

    /// Elapsed position in seconds.
    pub async fn position(&self) -> Result<f64, RemoteError> {
        let reply = self.exchange(Command::GetPosition).await?;
        parse_number("get_position", reply)
    }

    /// Track length in seconds.
    pub async fn length(&self) -> Result<f64, RemoteError> {
        let reply = self.exchange(Command::GetLength).await?;
        parse_number("get_length", reply)
    }

    pub async fn playlist_index(&self) -> Result<u32, RemoteError> {
        let reply = self.exchange(Command::GetPlaylistIndex).await?;
        parse_number("get_pl_index", reply)
    }

    pub async fn playlist_length(&self) -> Result<u32, RemoteError> {
        let reply = self.exchange(Command::GetPlaylistLength).await?;
        parse_number("get_pl_length", reply)
    }

    pub async fn current_song(&self) -> Result<String, RemoteError> {
        let reply = self.exchange(Command::GetCurrentSong).await?;
        Ok(reply.trim().to_string())
    }

    pub async fn player_state(&self) -> Result<PlayerState, RemoteError> {
        let reply = self.exchange(Command::GetPlayerState).await?;
        Ok(PlayerState::from_reply(&reply))
    }

    /// Re-queries the daemon per call; two calls in a row can disagree
    /// if the daemon moved between them.
    pub async fn is_playing(&self) -> Result<bool, RemoteError> {
        Ok(self.player_state().await? == PlayerState::Playing)
    }

    pub async fn is_paused(&self) -> Result<bool, RemoteError> {
        Ok(self.player_state().await? == PlayerState::Paused)
    }
}

fn parse_number<T: FromStr>(command: &'static str, reply: String) -> Result<T, RemoteError> {
    reply
        .trim()
        .parse()
        .map_err(|_| RemoteError::BadReply { command, reply })
}

/// One repaint's worth of status, fetched field by field. The seven
/// queries are independent exchanges: another task's command can land
/// between any two of them, so the fields carry no consistency
/// guarantee among themselves.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub song: String,
    pub playlist_index: u32,
    pub playlist_length: u32,
    pub position: f64,
    pub length: f64,
    pub volume: f32,
    pub paused: bool,
}

impl Snapshot {
    /// Never fails: a field whose query errors falls back to its zero
    /// default, so a daemon hiccup shows up as zeroed status fields on
    /// the next repaint instead of an error.
    pub async fn fetch(remote: &Remote) -> Self {
        Snapshot {
            song: remote.current_song().await.unwrap_or_default(),
            playlist_index: remote.playlist_index().await.unwrap_or(0),
            playlist_length: remote.playlist_length().await.unwrap_or(0),
            position: remote.position().await.unwrap_or(0.0),
            length: remote.length().await.unwrap_or(0.0),
            volume: remote.volume().await.unwrap_or(0.0),
            paused: remote.is_paused().await.unwrap_or(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_literals_match_the_wire() {
        assert_eq!(Command::Play.literal(), "play");
        assert_eq!(Command::Prev.literal(), "prev");
        assert_eq!(Command::Forward { long: false }.literal(), "forward");
        assert_eq!(Command::Forward { long: true }.literal(), "long_forward");
        assert_eq!(Command::Backward { long: false }.literal(), "backward");
        assert_eq!(Command::Backward { long: true }.literal(), "long_backward");
        assert_eq!(Command::GetPlaylistIndex.literal(), "get_pl_index");
        assert_eq!(Command::GetPlaylistLength.literal(), "get_pl_length");
        assert_eq!(Command::GetCurrentSong.literal(), "get_current_song");
        assert_eq!(Command::GetPlayerState.literal(), "get_player_state");
    }

    #[test]
    fn well_formed_numeric_replies_parse_exactly() {
        assert_eq!(
            parse_number::<f64>("get_position", "3725.5".into()).unwrap(),
            3725.5
        );
        assert_eq!(
            parse_number::<f32>("get_volume", "0.42".into()).unwrap(),
            0.42
        );
        assert_eq!(parse_number::<u32>("get_pl_index", " 2\n".into()).unwrap(), 2);
    }

    #[test]
    fn malformed_replies_are_bad_reply_not_panic() {
        let err = parse_number::<f64>("get_position", "N/A".into()).unwrap_err();
        assert!(matches!(
            err,
            RemoteError::BadReply {
                command: "get_position",
                ..
            }
        ));
        assert!(parse_number::<u32>("get_pl_length", String::new()).is_err());
        assert!(parse_number::<f32>("get_volume", "0.4.2".into()).is_err());
    }

    #[test]
    fn state_strings_outside_the_two_literals_mean_stopped() {
        assert_eq!(PlayerState::from_reply("playing"), PlayerState::Playing);
        assert_eq!(PlayerState::from_reply("paused\n"), PlayerState::Paused);
        assert_eq!(PlayerState::from_reply("Playing"), PlayerState::Stopped);
        assert_eq!(PlayerState::from_reply("stopped"), PlayerState::Stopped);
        assert_eq!(PlayerState::from_reply(""), PlayerState::Stopped);
    }
}
