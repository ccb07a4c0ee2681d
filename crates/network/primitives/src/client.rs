use eyre::{eyre, Result as EyreResult};
use nearby_primitives::events::DiscoveryEvent;
use nearby_primitives::profile::ProfileRecord;
use tokio::sync::{mpsc, oneshot};

use crate::messages::NetworkMessage;
use crate::state::ControllerState;

#[derive(Clone, Debug)]
pub struct NetworkClient {
    network_manager: mpsc::Sender<NetworkMessage>,
}

impl NetworkClient {
    #[must_use]
    pub const fn new(network_manager: mpsc::Sender<NetworkMessage>) -> Self {
        Self { network_manager }
    }

    async fn request<T>(
        &self,
        message: impl FnOnce(oneshot::Sender<T>) -> NetworkMessage,
    ) -> EyreResult<T> {
        let (tx, rx) = oneshot::channel();

        self.network_manager
            .send(message(tx))
            .await
            .map_err(|_| eyre!("network event loop is not running"))?;

        rx.await
            .map_err(|_| eyre!("network event loop dropped the request"))
    }

    /// Starts discovery. Discovered profiles and terminal errors arrive on the
    /// returned receiver, in the order the transport produced them.
    pub async fn initialize(
        &self,
    ) -> EyreResult<(ControllerState, mpsc::UnboundedReceiver<DiscoveryEvent>)> {
        let (listener, events) = mpsc::unbounded_channel();

        let state = self
            .request(|outcome| NetworkMessage::Initialize { listener, outcome })
            .await?;

        Ok((state, events))
    }

    pub async fn cleanup(&self) -> EyreResult<ControllerState> {
        self.request(|outcome| NetworkMessage::Cleanup { outcome })
            .await
    }

    pub async fn state(&self) -> EyreResult<ControllerState> {
        self.request(|outcome| NetworkMessage::State { outcome })
            .await
    }

    pub async fn local_profile(&self) -> EyreResult<Option<ProfileRecord>> {
        self.request(|outcome| NetworkMessage::LocalProfile { outcome })
            .await
    }

    pub async fn set_local_profile(&self, record: ProfileRecord) -> EyreResult<()> {
        self.request(|outcome| NetworkMessage::SetLocalProfile {
            request: record,
            outcome,
        })
        .await?
    }

    pub async fn discovered(&self) -> EyreResult<Vec<ProfileRecord>> {
        self.request(|outcome| NetworkMessage::ListDiscovered { outcome })
            .await
    }

    pub async fn clear_discovered(&self) -> EyreResult<()> {
        self.request(|outcome| NetworkMessage::ClearDiscovered { outcome })
            .await?
    }
}
