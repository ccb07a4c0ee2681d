mod publisher;
pub(crate) mod state;
mod subscriber;

pub use publisher::Publisher;
pub use state::{DiscoverySession, SessionRole, SessionState};
pub use subscriber::Subscriber;
