use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use crate::remote::{Remote, RemoteError};

/// Generously above any reply the daemon sends. One read per exchange;
/// a reply that doesn't fit is not handled (wire compatibility).
const REPLY_BUF: usize = 1024;

const QUEUE_DEPTH: usize = 32;

pub(crate) struct Request {
    pub(crate) payload: &'static str,
    pub(crate) reply: oneshot::Sender<Result<String, RemoteError>>,
}

/// Owns the one TCP connection to the daemon and services a
/// single-consumer request queue. Each request is handled as one
/// write-then-read pair, so exchanges from concurrent callers can never
/// interleave on the socket.
pub struct Transport {
    stream: Option<TcpStream>,
    requests: mpsc::Receiver<Request>,
}

impl Transport {
    /// Attempts the TCP connection. Failure is reported, not propagated:
    /// the transport comes up degraded and answers every request with
    /// [`RemoteError::Disconnected`]. There is no reconnect.
    pub async fn connect(addr: &str) -> (Remote, Transport) {
        let stream = match TcpStream::connect(addr).await {
            Ok(stream) => Some(stream),
            Err(err) => {
                eprintln!("Error: {err}");
                warn!(addr, %err, "connection failed, continuing degraded");
                None
            }
        };
        let (tx, rx) = mpsc::channel(QUEUE_DEPTH);
        (
            Remote::new(tx),
            Transport {
                stream,
                requests: rx,
            },
        )
    }

    /// The I/O actor loop. Runs until every [`Remote`] handle is dropped.
    /// A failed exchange answers that one requester and moves on; the
    /// stream is kept, so later exchanges fail the same way.
    pub async fn run(mut self) {
        while let Some(request) = self.requests.recv().await {
            let outcome = match self.stream.as_mut() {
                Some(stream) => Self::exchange(stream, request.payload).await,
                None => Err(RemoteError::Disconnected),
            };
            if let Err(err) = &outcome {
                debug!(command = request.payload, %err, "exchange failed");
            }
            // Requester may have given up; nobody to tell is fine.
            let _ = request.reply.send(outcome);
        }
    }

    /// One exchange: write the bare command literal (no terminator, no
    /// length prefix), then exactly one bounded read. NUL padding in the
    /// reply is stripped.
    async fn exchange(stream: &mut TcpStream, payload: &str) -> Result<String, RemoteError> {
        stream.write_all(payload.as_bytes()).await?;
        let mut buf = [0u8; REPLY_BUF];
        let n = stream.read(&mut buf).await?;
        if n == 0 {
            return Err(RemoteError::HungUp);
        }
        let text = String::from_utf8_lossy(&buf[..n])
            .chars()
            .filter(|&c| c != '\0')
            .collect();
        Ok(text)
    }
}
