use nearby_network_primitives::client::NetworkClient;
use nearby_network_primitives::messages::NetworkMessage;
use nearby_network_primitives::transport::{Transport, TransportEvent};
use nearby_store::profile::ProfileStore;
use tokio::sync::mpsc;
use tokio::{select, spawn};
use tracing::{debug, info};

use crate::config::NetworkConfig;
use crate::controller::SessionController;

pub mod config;
pub mod controller;
pub mod discovery;
pub mod error;
mod handlers;
pub mod sim;

#[cfg(test)]
mod mock;

/// Spawns the event loop on the current runtime and returns a client for it.
///
/// `transport_events` must be the queue `transport` reports its outcomes on.
pub fn run<T: Transport>(
    config: NetworkConfig,
    transport: T,
    transport_events: mpsc::UnboundedReceiver<TransportEvent>,
    store: ProfileStore,
) -> NetworkClient {
    let (client, event_loop) = init(config, transport, transport_events, store);

    drop(spawn(event_loop.run()));

    client
}

pub fn init<T: Transport>(
    config: NetworkConfig,
    transport: T,
    transport_events: mpsc::UnboundedReceiver<TransportEvent>,
    store: ProfileStore,
) -> (NetworkClient, EventLoop<T>) {
    let (command_sender, command_receiver) = mpsc::channel(config.command_buffer.max(1));

    let client = NetworkClient::new(command_sender);

    let event_loop = EventLoop::new(
        SessionController::new(config, transport, store),
        transport_events,
        command_receiver,
    );

    (client, event_loop)
}

/// Serialises client commands and transport events onto one controller.
#[derive(Debug)]
pub struct EventLoop<T> {
    controller: SessionController<T>,
    transport_events: mpsc::UnboundedReceiver<TransportEvent>,
    command_receiver: mpsc::Receiver<NetworkMessage>,
}

impl<T: Transport> EventLoop<T> {
    const fn new(
        controller: SessionController<T>,
        transport_events: mpsc::UnboundedReceiver<TransportEvent>,
        command_receiver: mpsc::Receiver<NetworkMessage>,
    ) -> Self {
        Self {
            controller,
            transport_events,
            command_receiver,
        }
    }

    /// Runs until every [`NetworkClient`] is dropped, then cleans up.
    pub async fn run(mut self) {
        let mut transport_open = true;

        #[expect(clippy::redundant_pub_crate, reason = "Needed for Tokio code")]
        loop {
            select! {
                event = self.transport_events.recv(), if transport_open => {
                    let Some(event) = event else {
                        debug!("Transport event queue closed");
                        transport_open = false;
                        continue;
                    };
                    self.controller.dispatch(event);
                }
                command = self.command_receiver.recv() => {
                    let Some(command) = command else { break };
                    self.handle_command(command);
                }
            }
        }

        let state = self.controller.cleanup();

        while transport_open && self.controller.is_draining() {
            let Some(event) = self.transport_events.recv().await else {
                break;
            };
            self.controller.dispatch(event);
        }

        info!(%state, "Network event loop stopped");
    }
}
