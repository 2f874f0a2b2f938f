//! Connection - handles an individual client connection.
//!
//! Each connection runs in its own Tokio task through two phases:
//!
//! 1. Handshake: read and dispatch lines until registration completes,
//!    with every read bounded by the registration deadline.
//! 2. Event loop: `tokio::select!` over inbound lines, the outbound
//!    queue, and the keepalive schedule.
//!
//! Session state is owned by this task, so the keepalive check-and-act is
//! serialized with PONG handling by construction and the pending-ping flag
//! needs no synchronization.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures_util::{SinkExt, StreamExt};
use minnow_proto::{CommandLine, InboundLine, LineCodec, Message};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_util::codec::Framed;
use tracing::{debug, info, instrument, warn};

use super::keepalive::{KeepaliveAction, KeepaliveTimer};
use crate::error::HandlerError;
use crate::handlers::{Context, Registry};
use crate::state::{Roster, SessionState};

/// Outbound queue depth per connection.
const OUTGOING_QUEUE_SIZE: usize = 32;

/// A client connection handler.
pub struct Connection {
    uid: String,
    addr: SocketAddr,
    roster: Arc<Roster>,
    registry: Arc<Registry>,
    framed: Framed<TcpStream, LineCodec>,
}

impl Connection {
    /// Wrap an accepted stream.
    pub fn new(
        uid: String,
        stream: TcpStream,
        addr: SocketAddr,
        roster: Arc<Roster>,
        registry: Arc<Registry>,
    ) -> Self {
        Self {
            uid,
            addr,
            roster,
            registry,
            framed: Framed::new(stream, LineCodec::new()),
        }
    }

    /// Drive the connection until it closes, then clean up.
    #[instrument(skip(self), fields(uid = %self.uid, addr = %self.addr), name = "connection")]
    pub async fn run(mut self) {
        info!(server = %self.roster.server.name, "Client connected");

        let mut session = SessionState::new(self.addr.ip().to_string());
        let (outgoing_tx, mut outgoing_rx) = mpsc::channel::<Message>(OUTGOING_QUEUE_SIZE);
        self.roster.register_sender(&self.uid, outgoing_tx.clone());

        let registered = self
            .handshake(&mut session, &outgoing_tx, &mut outgoing_rx)
            .await;
        if registered {
            self.event_loop(&mut session, &outgoing_tx, &mut outgoing_rx)
                .await;
        }

        self.cleanup(&session);
        info!("Client disconnected");
    }

    /// Phase 1: read until registration completes or the deadline expires.
    ///
    /// Returns true when the session registered in time; false when the
    /// connection must close instead.
    async fn handshake(
        &mut self,
        session: &mut SessionState,
        outgoing_tx: &mpsc::Sender<Message>,
        outgoing_rx: &mut mpsc::Receiver<Message>,
    ) -> bool {
        let deadline = Instant::now() + Duration::from_secs(self.roster.timeouts.registration);

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                warn!("Registration timed out");
                self.send_error("Registration timed out").await;
                return false;
            }

            match tokio::time::timeout(remaining, self.framed.next()).await {
                Ok(Some(Ok(InboundLine::Line(line)))) => {
                    if !self.process_line(session, outgoing_tx, &line).await {
                        return false;
                    }
                    // Replies are drained synchronously during handshake
                    if !self.drain_outgoing(outgoing_rx).await {
                        return false;
                    }
                    if session.registered {
                        return true;
                    }
                }
                Ok(Some(Ok(InboundLine::Invalid(e)))) => {
                    warn!(error = %e, "Dropping undecodable line");
                }
                Ok(Some(Err(e))) => {
                    debug!(error = %e, "Read error during handshake");
                    return false;
                }
                Ok(None) => {
                    info!("Client disconnected during handshake");
                    return false;
                }
                Err(_) => {
                    // Timeout elapsed; the check at the top of the loop
                    // sends the ERROR line
                    continue;
                }
            }
        }
    }

    /// Phase 2: multiplex inbound lines, the outbound queue, and the
    /// keepalive schedule until the connection closes.
    async fn event_loop(
        &mut self,
        session: &mut SessionState,
        outgoing_tx: &mpsc::Sender<Message>,
        outgoing_rx: &mut mpsc::Receiver<Message>,
    ) {
        let period = Duration::from_secs(self.roster.timeouts.ping_period);
        let timeout = Duration::from_secs(self.roster.timeouts.ping_timeout);
        let mut keepalive = KeepaliveTimer::new(period, timeout, Instant::now());

        info!("Entering event loop");

        loop {
            tokio::select! {
                result = self.framed.next() => {
                    match result {
                        Some(Ok(InboundLine::Line(line))) => {
                            if !self.process_line(session, outgoing_tx, &line).await {
                                break;
                            }
                        }
                        Some(Ok(InboundLine::Invalid(e))) => {
                            warn!(error = %e, "Dropping undecodable line");
                        }
                        Some(Err(e)) => {
                            debug!(error = %e, "Read error");
                            break;
                        }
                        None => {
                            info!("Client disconnected");
                            break;
                        }
                    }
                }

                Some(msg) = outgoing_rx.recv() => {
                    if let Err(e) = self.framed.send(msg).await {
                        warn!(error = %e, "Write error");
                        break;
                    }
                }

                _ = tokio::time::sleep_until(tokio::time::Instant::from_std(keepalive.deadline())) => {
                    match keepalive.on_deadline(Instant::now(), session.ping_pending) {
                        Some(KeepaliveAction::SendPing) => {
                            debug!("Sending keepalive PING");
                            session.ping_pending = true;
                            let ping = Message::ping(self.roster.server.name.clone());
                            if let Err(e) = self.framed.send(ping).await {
                                warn!(error = %e, "Failed to send PING");
                                break;
                            }
                        }
                        Some(KeepaliveAction::Disconnect) => {
                            let timeout_secs = self.roster.timeouts.ping_timeout;
                            warn!(timeout_secs, "Ping timeout - disconnecting");
                            self.send_error(&format!("Ping timeout ({} seconds)", timeout_secs))
                                .await;
                            break;
                        }
                        None => {}
                    }
                }
            }
        }
    }

    /// Dispatch one framed line.
    ///
    /// Returns false when the connection must close.
    async fn process_line(
        &mut self,
        session: &mut SessionState,
        outgoing_tx: &mpsc::Sender<Message>,
        line: &str,
    ) -> bool {
        let line = CommandLine::new(line);
        if line.command().is_empty() {
            return true;
        }
        debug!(raw = %line.raw(), "Received line");

        let mut ctx = Context {
            uid: &self.uid,
            roster: &self.roster,
            sender: outgoing_tx,
            state: session,
            remote_addr: self.addr,
        };

        let result = self.registry.dispatch(&mut ctx, &line).await;

        if let Err(e) = result {
            debug!(error = %e, "Handler error");
            match e {
                HandlerError::Quit(reason) => {
                    let text = match reason {
                        Some(r) => format!("Closing link: {} (Quit: {})", self.addr.ip(), r),
                        None => format!("Closing link: {} (Client quit)", self.addr.ip()),
                    };
                    self.send_error(&text).await;
                    return false;
                }
                HandlerError::Send(_) => return false,
                other => {
                    let nick = session.nick_or_star().to_string();
                    if let Some(reply) =
                        other.to_irc_reply(&self.roster.server.name, &nick, line.command())
                    {
                        if self.framed.send(reply).await.is_err() {
                            return false;
                        }
                    }
                }
            }
        }
        true
    }

    /// Flush replies queued by handlers.
    ///
    /// Returns false on write error.
    async fn drain_outgoing(&mut self, outgoing_rx: &mut mpsc::Receiver<Message>) -> bool {
        while let Ok(msg) = outgoing_rx.try_recv() {
            if let Err(e) = self.framed.send(msg).await {
                warn!(error = %e, "Write error");
                return false;
            }
        }
        true
    }

    /// Write a final `ERROR :<reason>` line. Write failures only mean the
    /// peer is already gone.
    async fn send_error(&mut self, reason: &str) {
        if let Err(e) = self.framed.send(Message::error(reason)).await {
            debug!(error = %e, "Write error while sending ERROR");
        }
    }

    /// Remove this connection from the shared registries. Reached from
    /// every exit path; removals are no-ops when already absent.
    fn cleanup(&self, session: &SessionState) {
        if session.registered {
            if let Some(nick) = &session.nickname {
                self.roster.nicks.remove(nick);
                info!(nick = %nick, "Nick released");
            }
        }
        self.roster.unregister_sender(&self.uid);
    }
}
