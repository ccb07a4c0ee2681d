//! The discovery medium as seen by the session controller.
//!
//! A transport exposes attach, publish, subscribe and send primitives. None of
//! them block: outcomes arrive later as [`TransportEvent`]s on the queue the
//! transport was constructed with.

use core::fmt;

/// Literal identifying this application's discovery channel.
pub const SERVICE_NAME: &str = "profile_share";

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct AttachHandle(u64);

impl AttachHandle {
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for AttachHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "attach#{}", self.0)
    }
}

/// Handle to a single publish or subscribe session.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct SessionHandle(u64);

impl SessionHandle {
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for SessionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session#{}", self.0)
    }
}

/// Opaque reference to a remote participant.
///
/// A peer handle is minted by, and only meaningful within, the session it
/// was reported on. It must not be used once that session is closed.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct PeerHandle {
    session: SessionHandle,
    id: u64,
}

impl PeerHandle {
    #[must_use]
    pub const fn new(session: SessionHandle, id: u64) -> Self {
        Self { session, id }
    }

    #[must_use]
    pub const fn session(&self) -> SessionHandle {
        self.session
    }
}

impl fmt::Display for PeerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "peer#{}/{}", self.session.0, self.id)
    }
}

/// Transport-level tag attached to outgoing messages. The protocol itself
/// only looks at payload content.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum MessageId {
    ProfileRequest,
    ProfilePayload,
}

impl MessageId {
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        match self {
            Self::ProfileRequest => 1,
            Self::ProfilePayload => 2,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TransportEvent {
    Attached {
        attach: AttachHandle,
    },
    AttachFailed {
        reason: String,
    },
    PublishStarted {
        session: SessionHandle,
    },
    SubscribeStarted {
        session: SessionHandle,
    },
    /// The transport ended a session on its own.
    SessionTerminated {
        session: SessionHandle,
    },
    ServiceDiscovered {
        peer: PeerHandle,
    },
    MessageReceived {
        peer: PeerHandle,
        payload: Vec<u8>,
    },
}

impl TransportEvent {
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Attached { .. } => "attached",
            Self::AttachFailed { .. } => "attach_failed",
            Self::PublishStarted { .. } => "publish_started",
            Self::SubscribeStarted { .. } => "subscribe_started",
            Self::SessionTerminated { .. } => "session_terminated",
            Self::ServiceDiscovered { .. } => "service_discovered",
            Self::MessageReceived { .. } => "message_received",
        }
    }
}

pub trait Transport: Send + 'static {
    fn is_available(&self) -> bool;

    /// Requests attachment; answered by `Attached` or `AttachFailed`.
    fn attach(&mut self) -> eyre::Result<()>;

    /// Starts advertising `service_name`; answered by `PublishStarted`.
    fn publish(&mut self, attach: AttachHandle, service_name: &str) -> eyre::Result<()>;

    /// Starts looking for `service_name`; answered by `SubscribeStarted`.
    fn subscribe(&mut self, attach: AttachHandle, service_name: &str) -> eyre::Result<()>;

    fn send_message(
        &mut self,
        session: SessionHandle,
        peer: PeerHandle,
        message_id: MessageId,
        payload: &[u8],
    ) -> eyre::Result<()>;

    fn close_session(&mut self, session: SessionHandle);

    fn detach(&mut self, attach: AttachHandle);
}
