//! Keepalive scheduling for registered connections.
//!
//! Deadlines are computed from a monotonic clock and polled by the
//! connection's event loop. The loop re-checks connection liveness every
//! iteration, so a closed connection ends the schedule with it; there is
//! no detached timer task to cancel.

use std::time::{Duration, Instant};

/// What the event loop must do when a keepalive deadline fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeepaliveAction {
    /// Send `PING :<server>` and set the session's pending flag.
    SendPing,
    /// No PONG arrived inside the timeout window: send the final ERROR
    /// line and close the connection.
    Disconnect,
}

#[derive(Debug, Clone, Copy)]
enum State {
    /// Waiting until the next PING is due.
    Idle { due: Instant },
    /// A PING is outstanding; `deadline` bounds the wait for its PONG.
    AwaitingPong { deadline: Instant, sent_at: Instant },
}

/// Two-phase keepalive timer: a PING every `period`, a disconnect when the
/// PONG does not arrive within `timeout` of the PING.
///
/// `timeout` must be strictly less than `period`; that ordering is
/// validated at configuration load, not here.
#[derive(Debug)]
pub struct KeepaliveTimer {
    period: Duration,
    timeout: Duration,
    state: State,
}

impl KeepaliveTimer {
    /// Create a timer whose first PING is due immediately.
    pub fn new(period: Duration, timeout: Duration, now: Instant) -> Self {
        Self {
            period,
            timeout,
            state: State::Idle { due: now },
        }
    }

    /// The instant the event loop should sleep until.
    pub fn deadline(&self) -> Instant {
        match self.state {
            State::Idle { due } => due,
            State::AwaitingPong { deadline, .. } => deadline,
        }
    }

    /// Advance the state machine at a fired deadline.
    ///
    /// `ping_pending` is the session flag as the event loop sees it now; a
    /// PONG processed since the PING was sent clears it. Returns `None`
    /// when the timer only rearmed.
    pub fn on_deadline(&mut self, now: Instant, ping_pending: bool) -> Option<KeepaliveAction> {
        match self.state {
            State::Idle { .. } => {
                self.state = State::AwaitingPong {
                    deadline: now + self.timeout,
                    sent_at: now,
                };
                Some(KeepaliveAction::SendPing)
            }
            State::AwaitingPong { sent_at, .. } => {
                if ping_pending {
                    return Some(KeepaliveAction::Disconnect);
                }
                // PONG arrived in time. The next PING is due one period
                // after the previous one was sent; if that instant has
                // already passed, it fires immediately.
                self.state = State::Idle {
                    due: sent_at + self.period,
                };
                None
            }
        }
    }
}
