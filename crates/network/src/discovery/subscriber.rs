use core::ops::{Deref, DerefMut};

use nearby_network_primitives::codec::{ExchangeCodec, REQUEST_PROFILE};
use nearby_network_primitives::messages::Listener;
use nearby_network_primitives::transport::{MessageId, PeerHandle, Transport};
use nearby_primitives::events::DiscoveryEvent;
use nearby_primitives::profile::now_millis;
use nearby_store::profile::ProfileStore;
use tracing::{debug, error, info, warn};

use super::state::{DiscoverySession, SessionRole};
use crate::error::DiscoveryError;

/// Finds advertising peers and collects their profiles.
#[derive(Debug)]
pub struct Subscriber {
    session: DiscoverySession,
}

impl Default for Subscriber {
    fn default() -> Self {
        Self {
            session: DiscoverySession::new(SessionRole::Subscriber),
        }
    }
}

impl Deref for Subscriber {
    type Target = DiscoverySession;

    fn deref(&self) -> &Self::Target {
        &self.session
    }
}

impl DerefMut for Subscriber {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.session
    }
}

impl Subscriber {
    /// Asks a freshly discovered peer for its profile.
    ///
    /// Every discovery triggers a new request, repeated ones included; there
    /// is no retry and no wait for a reply.
    pub fn on_service_discovered<T: Transport>(&self, transport: &mut T, peer: PeerHandle) {
        let Some(session) = self.handle() else {
            debug!(%peer, "Subscriber not active, ignoring discovery");
            return;
        };

        if let Err(err) =
            transport.send_message(session, peer, MessageId::ProfileRequest, REQUEST_PROFILE)
        {
            warn!(%peer, %err, "Failed to request profile");
            return;
        }

        debug!(%peer, "Requested profile");
    }

    /// Accepts a profile sent by `peer`: the listener hears about it first,
    /// then it is stored.
    pub fn on_message(
        &self,
        store: &mut ProfileStore,
        listener: Option<&Listener>,
        peer: PeerHandle,
        payload: &[u8],
    ) -> Result<(), DiscoveryError> {
        if !self.is_active() {
            debug!(%peer, "Subscriber not active, ignoring message");
            return Ok(());
        }

        if ExchangeCodec::is_profile_request(payload) {
            debug!(%peer, "Subscriber ignoring profile request");
            return Ok(());
        }

        let record = ExchangeCodec::decode(payload)?.into_discovered(now_millis());

        info!(%peer, id=%record.id, name=%record.name, "Discovered profile");

        if let Some(listener) = listener {
            if listener
                .send(DiscoveryEvent::DiscoveredProfile(record.clone()))
                .is_err()
            {
                debug!("Discovery listener is gone");
            }
        }

        if let Err(err) = store.upsert_discovered(record) {
            error!(?err, "Failed to store discovered profile");
        }

        Ok(())
    }
}
