mod client;
mod transport;

pub use client::{Command, PlayerState, Remote, Snapshot};
pub use transport::Transport;

use thiserror::Error;

/// What can go wrong on the wire or in a reply. None of these are fatal
/// to the program: the session renders fallback fields and keeps going.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// The initial connection never came up, or the transport actor is gone.
    #[error("no connection to the daemon")]
    Disconnected,

    /// The daemon closed the connection (a read returned zero bytes).
    #[error("daemon closed the connection")]
    HungUp,

    #[error("socket fault: {0}")]
    Io(#[from] std::io::Error),

    /// The reply text did not decode as the type the command expects.
    #[error("unusable `{command}` reply: {reply:?}")]
    BadReply {
        command: &'static str,
        reply: String,
    },
}
