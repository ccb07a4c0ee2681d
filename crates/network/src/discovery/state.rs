#[cfg(test)]
#[path = "../tests/discovery/state.rs"]
mod tests;

use core::fmt;

use nearby_network_primitives::transport::{AttachHandle, PeerHandle, SessionHandle, Transport};
use tracing::{debug, warn};

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum SessionRole {
    Publisher,
    Subscriber,
}

impl fmt::Display for SessionRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::Publisher => "publisher",
            Self::Subscriber => "subscriber",
        })
    }
}

/// Lifecycle of a publish or subscribe session.
///
/// `Starting` is the "publishing"/"subscribing" phase: the transport was asked
/// to open the session and has not confirmed it yet. `Closed` is terminal.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum SessionState {
    #[default]
    Idle,
    Starting,
    Active(SessionHandle),
    Closed,
}

/// SessionState wrapped with the role it plays and the transport calls that
/// drive it between states.
#[derive(Debug)]
pub struct DiscoverySession {
    role: SessionRole,
    state: SessionState,
}

impl DiscoverySession {
    #[must_use]
    pub const fn new(role: SessionRole) -> Self {
        Self {
            role,
            state: SessionState::Idle,
        }
    }

    #[must_use]
    pub const fn role(&self) -> SessionRole {
        self.role
    }

    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub const fn handle(&self) -> Option<SessionHandle> {
        match self.state {
            SessionState::Active(handle) => Some(handle),
            SessionState::Idle | SessionState::Starting | SessionState::Closed => None,
        }
    }

    /// Whether the transport still owes this session a confirmation.
    #[must_use]
    pub fn is_starting(&self) -> bool {
        self.state == SessionState::Starting
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self.state, SessionState::Active(_))
    }

    /// Whether `peer` was handed out by this session while it is active.
    #[must_use]
    pub fn owns(&self, peer: &PeerHandle) -> bool {
        self.handle() == Some(peer.session())
    }

    /// Asks the transport to open the session. A session can only be started
    /// once; if the request is rejected outright the session is closed.
    pub fn start<T: Transport>(
        &mut self,
        transport: &mut T,
        attach: AttachHandle,
        service_name: &str,
    ) -> eyre::Result<()> {
        if self.state != SessionState::Idle {
            eyre::bail!("{} session already started ({:?})", self.role, self.state);
        }

        let result = match self.role {
            SessionRole::Publisher => transport.publish(attach, service_name),
            SessionRole::Subscriber => transport.subscribe(attach, service_name),
        };

        if let Err(err) = result {
            self.state = SessionState::Closed;
            return Err(err);
        }

        debug!(role=%self.role, %attach, service_name, "Requested discovery session");

        self.state = SessionState::Starting;

        Ok(())
    }

    /// Handles the transport's confirmation that the session is open.
    ///
    /// Returns `false` when the session was not waiting for one, in which
    /// case the caller owns `handle` and must close it.
    pub fn confirm(&mut self, handle: SessionHandle) -> bool {
        if self.state != SessionState::Starting {
            warn!(role=%self.role, %handle, state=?self.state, "Unexpected session confirmation");
            return false;
        }

        debug!(role=%self.role, %handle, "Discovery session active");

        self.state = SessionState::Active(handle);

        true
    }

    /// Closes the session, releasing the transport session if one is held.
    pub fn close<T: Transport>(&mut self, transport: &mut T) {
        if let SessionState::Active(handle) = self.state {
            transport.close_session(handle);
            debug!(role=%self.role, %handle, "Closed discovery session");
        }

        self.state = SessionState::Closed;
    }

    /// Marks the session closed after the transport ended it.
    pub fn terminated(&mut self, handle: SessionHandle) -> bool {
        if self.handle() != Some(handle) {
            return false;
        }

        warn!(role=%self.role, %handle, "Discovery session terminated by transport");

        self.state = SessionState::Closed;

        true
    }
}
