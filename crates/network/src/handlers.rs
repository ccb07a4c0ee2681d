use nearby_network_primitives::messages::NetworkMessage;
use nearby_network_primitives::transport::Transport;
use tracing::debug;

use crate::EventLoop;

impl<T: Transport> EventLoop<T> {
    pub(crate) fn handle_command(&mut self, command: NetworkMessage) {
        match command {
            NetworkMessage::Initialize { listener, outcome } => {
                let _ignored = outcome.send(self.controller.initialize(listener));
            }
            NetworkMessage::Cleanup { outcome } => {
                let _ignored = outcome.send(self.controller.cleanup());
            }
            NetworkMessage::State { outcome } => {
                let _ignored = outcome.send(self.controller.state());
            }
            NetworkMessage::LocalProfile { outcome } => {
                let _ignored = outcome.send(self.controller.store().local_profile().cloned());
            }
            NetworkMessage::SetLocalProfile { request, outcome } => {
                let _ignored = outcome.send(self.controller.store_mut().set_local_profile(request));
            }
            NetworkMessage::ListDiscovered { outcome } => {
                let _ignored = outcome.send(self.controller.store().list_discovered());
            }
            NetworkMessage::ClearDiscovered { outcome } => {
                let _ignored = outcome.send(self.controller.store_mut().clear_discovered());
            }
        }

        debug!(state=%self.controller.state(), "Handled command");
    }
}
