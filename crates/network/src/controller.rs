//! Attach lifecycle and event dispatch.
//!
//! The controller is the single consumer of transport events. Every handler,
//! and every store mutation a handler triggers, runs from [`SessionController::dispatch`],
//! so the publisher and subscriber never act concurrently.

#[cfg(test)]
#[path = "tests/controller.rs"]
mod tests;

use nearby_network_primitives::messages::Listener;
use nearby_network_primitives::state::ControllerState;
use nearby_network_primitives::transport::{
    AttachHandle, PeerHandle, SessionHandle, Transport, TransportEvent,
};
use nearby_primitives::events::DiscoveryEvent;
use nearby_store::profile::ProfileStore;
use owo_colors::OwoColorize;
use tracing::{debug, error, info, warn};

use crate::config::NetworkConfig;
use crate::discovery::{Publisher, Subscriber};
use crate::error::DiscoveryError;

#[derive(Debug)]
pub struct SessionController<T> {
    config: NetworkConfig,
    transport: T,
    store: ProfileStore,
    state: ControllerState,
    attach: Option<AttachHandle>,
    publisher: Publisher,
    subscriber: Subscriber,
    listener: Option<Listener>,
}

impl<T: Transport> SessionController<T> {
    pub fn new(config: NetworkConfig, transport: T, store: ProfileStore) -> Self {
        Self {
            config,
            transport,
            store,
            state: ControllerState::Detached,
            attach: None,
            publisher: Publisher::default(),
            subscriber: Subscriber::default(),
            listener: None,
        }
    }

    pub const fn state(&self) -> ControllerState {
        self.state
    }

    pub const fn store(&self) -> &ProfileStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut ProfileStore {
        &mut self.store
    }

    pub const fn publisher(&self) -> &Publisher {
        &self.publisher
    }

    pub const fn subscriber(&self) -> &Subscriber {
        &self.subscriber
    }

    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Starts the attach lifecycle, reporting to `listener` from now on.
    ///
    /// Only meaningful once, from `Detached`; later calls leave the
    /// controller untouched.
    pub fn initialize(&mut self, listener: Listener) -> ControllerState {
        if self.state != ControllerState::Detached {
            warn!(state=%self.state, "Discovery already initialized");
            return self.state;
        }

        self.listener = Some(listener);

        if !self.transport.is_available() {
            self.fail(DiscoveryError::TransportUnavailable);
            return self.state;
        }

        self.transition(ControllerState::Attaching);

        if let Err(err) = self.transport.attach() {
            self.fail(DiscoveryError::AttachFailed(err.to_string()));
        }

        self.state
    }

    /// Routes one transport event to the session it belongs to.
    pub fn dispatch(&mut self, event: TransportEvent) {
        debug!("{}: {:?}", event.kind().yellow(), event);

        match event {
            TransportEvent::Attached { attach } => self.on_attached(attach),
            TransportEvent::AttachFailed { reason } => {
                if self.state == ControllerState::Attaching {
                    self.fail(DiscoveryError::AttachFailed(reason));
                } else {
                    warn!(state=%self.state, %reason, "Ignoring attach failure");
                }
            }
            TransportEvent::PublishStarted { session } => {
                if self.publisher.confirm(session) {
                    self.resume_teardown();
                } else {
                    self.transport.close_session(session);
                }
            }
            TransportEvent::SubscribeStarted { session } => {
                if self.subscriber.confirm(session) {
                    self.resume_teardown();
                } else {
                    self.transport.close_session(session);
                }
            }
            TransportEvent::SessionTerminated { session } => self.on_terminated(session),
            TransportEvent::ServiceDiscovered { peer } => {
                if self.subscriber.owns(&peer) {
                    self.subscriber
                        .on_service_discovered(&mut self.transport, peer);
                } else {
                    debug!(%peer, "Dropping discovery for unknown session");
                }
            }
            TransportEvent::MessageReceived { peer, payload } => {
                self.on_message(peer, &payload);
            }
        }
    }

    /// Tears down the publisher, the subscriber and the attach session, in
    /// that order. Does nothing unless attached.
    ///
    /// A session the transport has not confirmed yet has no handle to close,
    /// so the attach session is held until every pending confirmation has
    /// been dispatched; see [`Self::is_draining`].
    pub fn cleanup(&mut self) -> ControllerState {
        if self.state != ControllerState::Attached {
            debug!(state=%self.state, "Nothing to clean up");
            return self.state;
        }

        self.transition(ControllerState::Closed);

        drop(self.listener.take());

        self.teardown();

        self.state
    }

    /// Finished, but still waiting on session confirmations before detaching.
    #[must_use]
    pub const fn is_draining(&self) -> bool {
        self.state.is_terminal() && self.attach.is_some()
    }

    fn resume_teardown(&mut self) {
        if self.is_draining() {
            self.teardown();
        }
    }

    fn teardown(&mut self) {
        if self.publisher.is_starting() || self.subscriber.is_starting() {
            debug!("Waiting for session confirmations before detaching");
            return;
        }

        self.publisher.close(&mut self.transport);
        self.subscriber.close(&mut self.transport);

        if let Some(attach) = self.attach.take() {
            self.transport.detach(attach);
        }
    }

    fn on_attached(&mut self, attach: AttachHandle) {
        if self.state != ControllerState::Attaching {
            warn!(%attach, state=%self.state, "Unexpected attach, releasing it");
            self.transport.detach(attach);
            return;
        }

        info!(%attach, "Attached to discovery transport");

        self.attach = Some(attach);
        self.transition(ControllerState::Attached);

        let service_name = self.config.service_name.clone();

        if let Err(err) = self
            .publisher
            .start(&mut self.transport, attach, &service_name)
        {
            error!(?err, "Failed to start publishing");
        }

        if let Err(err) = self
            .subscriber
            .start(&mut self.transport, attach, &service_name)
        {
            error!(?err, "Failed to start subscribing");
        }
    }

    fn on_terminated(&mut self, session: SessionHandle) {
        if !self.publisher.terminated(session) && !self.subscriber.terminated(session) {
            debug!(%session, "Termination of unknown session");
        }
    }

    fn on_message(&mut self, peer: PeerHandle, payload: &[u8]) {
        let result = if self.publisher.owns(&peer) {
            self.publisher
                .on_message(&mut self.transport, &self.store, peer, payload)
        } else if self.subscriber.owns(&peer) {
            self.subscriber
                .on_message(&mut self.store, self.listener.as_ref(), peer, payload)
        } else {
            debug!(%peer, "Dropping message for unknown session");
            Ok(())
        };

        match result {
            Ok(()) => {}
            Err(DiscoveryError::MissingLocalProfile) => {
                debug!(%peer, "No local profile yet, ignoring profile request");
            }
            Err(err) => {
                debug!(%peer, %err, "Dropping undecodable message");
            }
        }
    }

    fn fail(&mut self, err: DiscoveryError) {
        error!(%err, "Discovery failed");

        self.transition(ControllerState::Failed);
        self.report(DiscoveryEvent::Error(err.to_string()));
    }

    fn report(&self, event: DiscoveryEvent) {
        if let Some(listener) = &self.listener {
            if listener.send(event).is_err() {
                debug!("Discovery listener is gone");
            }
        }
    }

    fn transition(&mut self, next: ControllerState) {
        debug!(from=%self.state, to=%next, "Controller state change");

        self.state = next;
    }
}
