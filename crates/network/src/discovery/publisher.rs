use core::ops::{Deref, DerefMut};

use nearby_network_primitives::codec::ExchangeCodec;
use nearby_network_primitives::transport::{MessageId, PeerHandle, Transport};
use nearby_store::profile::ProfileStore;
use tracing::{debug, warn};

use super::state::{DiscoverySession, SessionRole};
use crate::error::DiscoveryError;

/// Advertises the local profile and answers profile requests.
#[derive(Debug)]
pub struct Publisher {
    session: DiscoverySession,
}

impl Default for Publisher {
    fn default() -> Self {
        Self {
            session: DiscoverySession::new(SessionRole::Publisher),
        }
    }
}

impl Deref for Publisher {
    type Target = DiscoverySession;

    fn deref(&self) -> &Self::Target {
        &self.session
    }
}

impl DerefMut for Publisher {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.session
    }
}

impl Publisher {
    /// Replies to a profile request from `peer` with the encoded local
    /// profile. Anything other than a request is ignored.
    pub fn on_message<T: Transport>(
        &self,
        transport: &mut T,
        store: &ProfileStore,
        peer: PeerHandle,
        payload: &[u8],
    ) -> Result<(), DiscoveryError> {
        let Some(session) = self.handle() else {
            debug!(%peer, "Publisher not active, ignoring message");
            return Ok(());
        };

        if !ExchangeCodec::is_profile_request(payload) {
            debug!(%peer, len = payload.len(), "Publisher ignoring non-request message");
            return Ok(());
        }

        let Some(profile) = store.local_profile() else {
            return Err(DiscoveryError::MissingLocalProfile);
        };

        let bytes = match ExchangeCodec::encode(profile) {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!(%err, "Failed to encode local profile");
                return Ok(());
            }
        };

        if let Err(err) = transport.send_message(session, peer, MessageId::ProfilePayload, &bytes)
        {
            warn!(%peer, %err, "Failed to send profile");
            return Ok(());
        }

        debug!(%peer, id=%profile.id, "Sent local profile");

        Ok(())
    }
}
