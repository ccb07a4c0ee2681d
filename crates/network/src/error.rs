use nearby_network_primitives::codec::DecodeError;
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DiscoveryError {
    /// Terminal, reported to the listener once.
    #[error("Nearby discovery is not available on this device")]
    TransportUnavailable,

    /// Terminal, reported to the listener once.
    #[error("Failed to connect to the discovery service: {0}")]
    AttachFailed(String),

    /// Per message, dropped without notifying the listener.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// A profile was requested before the local profile was created.
    #[error("No local profile to share")]
    MissingLocalProfile,
}
