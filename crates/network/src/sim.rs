//! In-process discovery medium.
//!
//! Every device that joins a [`SimMedium`] gets a [`SimTransport`] plus the
//! queue its events arrive on. Publishers and subscribers of the same service
//! name on different devices see each other, and messages sent between them
//! are delivered to the other device's queue.

#[cfg(test)]
#[path = "tests/sim.rs"]
mod tests;

use core::fmt;
use std::collections::BTreeMap;
use std::sync::Arc;

use eyre::{bail, OptionExt};
use nearby_network_primitives::transport::{
    AttachHandle, MessageId, PeerHandle, SessionHandle, Transport, TransportEvent,
};
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::{debug, trace};

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct DeviceId(u64);

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "device#{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Role {
    Publish,
    Subscribe,
}

#[derive(Debug)]
struct Device {
    events: mpsc::UnboundedSender<TransportEvent>,
    available: bool,
    fail_attach: Option<String>,
    attach: Option<AttachHandle>,
}

#[derive(Debug)]
struct Session {
    device: DeviceId,
    role: Role,
    service: String,
}

#[derive(Debug, Default)]
struct Medium {
    next_id: u64,
    devices: BTreeMap<DeviceId, Device>,
    sessions: BTreeMap<SessionHandle, Session>,
    /// Peer handle minted on a local session, to the remote session it names.
    peers: BTreeMap<PeerHandle, SessionHandle>,
}

impl Medium {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn emit(&self, device: DeviceId, event: TransportEvent) {
        let Some(device) = self.devices.get(&device) else {
            return;
        };

        trace!(kind = event.kind(), "Delivering transport event");

        // A device whose event loop is gone simply stops hearing anything.
        let _ignored = device.events.send(event);
    }

    /// The handle `local` uses to address `remote`, minted on first use.
    fn peer_for(&mut self, local: SessionHandle, remote: SessionHandle) -> PeerHandle {
        if let Some((peer, _)) = self
            .peers
            .iter()
            .find(|(peer, target)| peer.session() == local && **target == remote)
        {
            return *peer;
        }

        let peer = PeerHandle::new(local, self.next_id());
        let _prev = self.peers.insert(peer, remote);

        peer
    }

    fn matching(&self, device: DeviceId, role: Role, service: &str) -> Vec<SessionHandle> {
        self.sessions
            .iter()
            .filter(|(_, session)| {
                session.device != device && session.role == role && session.service == service
            })
            .map(|(handle, _)| *handle)
            .collect()
    }

    fn announce(&mut self, subscriber: SessionHandle, publisher: SessionHandle) {
        let Some(device) = self.sessions.get(&subscriber).map(|session| session.device) else {
            return;
        };

        let peer = self.peer_for(subscriber, publisher);

        self.emit(device, TransportEvent::ServiceDiscovered { peer });
    }

    fn open(
        &mut self,
        device: DeviceId,
        attach: AttachHandle,
        role: Role,
        service: &str,
    ) -> eyre::Result<SessionHandle> {
        let state = self
            .devices
            .get(&device)
            .ok_or_eyre("device left the medium")?;

        if state.attach != Some(attach) {
            bail!("{attach} is not attached");
        }

        let handle = SessionHandle::new(self.next_id());

        let _prev = self.sessions.insert(
            handle,
            Session {
                device,
                role,
                service: service.to_owned(),
            },
        );

        Ok(handle)
    }

    fn remove_session(&mut self, handle: SessionHandle) -> Option<Session> {
        let session = self.sessions.remove(&handle)?;

        self.peers
            .retain(|peer, remote| peer.session() != handle && *remote != handle);

        Some(session)
    }
}

/// Shared medium. Clones refer to the same medium.
#[derive(Clone, Debug, Default)]
pub struct SimMedium {
    inner: Arc<Mutex<Medium>>,
}

impl SimMedium {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a device, returning its transport and event queue.
    #[must_use]
    pub fn join(&self) -> (SimTransport, mpsc::UnboundedReceiver<TransportEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();

        let mut medium = self.inner.lock();

        let id = DeviceId(medium.next_id());

        let _prev = medium.devices.insert(
            id,
            Device {
                events,
                available: true,
                fail_attach: None,
                attach: None,
            },
        );

        debug!(device=%id, "Device joined medium");

        let transport = SimTransport {
            device: id,
            medium: self.clone(),
        };

        (transport, receiver)
    }

    pub fn set_available(&self, device: DeviceId, available: bool) {
        if let Some(device) = self.inner.lock().devices.get_mut(&device) {
            device.available = available;
        }
    }

    /// Makes the next attach attempts of `device` fail with `reason`.
    pub fn fail_attach(&self, device: DeviceId, reason: impl Into<String>) {
        if let Some(device) = self.inner.lock().devices.get_mut(&device) {
            device.fail_attach = Some(reason.into());
        }
    }

    /// Ends `session` from the medium's side, as a radio going away would.
    pub fn terminate(&self, session: SessionHandle) {
        let mut medium = self.inner.lock();

        if let Some(removed) = medium.remove_session(session) {
            medium.emit(removed.device, TransportEvent::SessionTerminated { session });
        }
    }

    #[must_use]
    pub fn session_count(&self) -> usize {
        self.inner.lock().sessions.len()
    }

    #[must_use]
    pub fn is_attached(&self, device: DeviceId) -> bool {
        self.inner
            .lock()
            .devices
            .get(&device)
            .is_some_and(|device| device.attach.is_some())
    }
}

#[derive(Debug)]
pub struct SimTransport {
    device: DeviceId,
    medium: SimMedium,
}

impl SimTransport {
    #[must_use]
    pub const fn device(&self) -> DeviceId {
        self.device
    }
}

impl Transport for SimTransport {
    fn is_available(&self) -> bool {
        self.medium
            .inner
            .lock()
            .devices
            .get(&self.device)
            .is_some_and(|device| device.available)
    }

    fn attach(&mut self) -> eyre::Result<()> {
        let mut medium = self.medium.inner.lock();

        let attach = AttachHandle::new(medium.next_id());

        let device = medium
            .devices
            .get_mut(&self.device)
            .ok_or_eyre("device left the medium")?;

        if !device.available {
            bail!("discovery is not available on {}", self.device);
        }

        let event = if let Some(reason) = device.fail_attach.clone() {
            TransportEvent::AttachFailed { reason }
        } else {
            device.attach = Some(attach);
            TransportEvent::Attached { attach }
        };

        medium.emit(self.device, event);

        Ok(())
    }

    fn publish(&mut self, attach: AttachHandle, service_name: &str) -> eyre::Result<()> {
        let mut medium = self.medium.inner.lock();

        let session = medium.open(self.device, attach, Role::Publish, service_name)?;

        medium.emit(self.device, TransportEvent::PublishStarted { session });

        for subscriber in medium.matching(self.device, Role::Subscribe, service_name) {
            medium.announce(subscriber, session);
        }

        Ok(())
    }

    fn subscribe(&mut self, attach: AttachHandle, service_name: &str) -> eyre::Result<()> {
        let mut medium = self.medium.inner.lock();

        let session = medium.open(self.device, attach, Role::Subscribe, service_name)?;

        medium.emit(self.device, TransportEvent::SubscribeStarted { session });

        for publisher in medium.matching(self.device, Role::Publish, service_name) {
            medium.announce(session, publisher);
        }

        Ok(())
    }

    fn send_message(
        &mut self,
        session: SessionHandle,
        peer: PeerHandle,
        message_id: MessageId,
        payload: &[u8],
    ) -> eyre::Result<()> {
        let mut medium = self.medium.inner.lock();

        if medium.sessions.get(&session).map(|session| session.device) != Some(self.device) {
            bail!("{session} is not open on {}", self.device);
        }

        if peer.session() != session {
            bail!("{peer} does not belong to {session}");
        }

        let remote = *medium.peers.get(&peer).ok_or_eyre("unknown peer")?;

        let device = medium
            .sessions
            .get(&remote)
            .map(|session| session.device)
            .ok_or_eyre("peer session is closed")?;

        let reply_to = medium.peer_for(remote, session);

        trace!(%peer, message_id = message_id.as_u32(), len = payload.len(), "Routing message");

        medium.emit(
            device,
            TransportEvent::MessageReceived {
                peer: reply_to,
                payload: payload.to_vec(),
            },
        );

        Ok(())
    }

    fn close_session(&mut self, session: SessionHandle) {
        let mut medium = self.medium.inner.lock();

        if medium.sessions.get(&session).map(|session| session.device) == Some(self.device) {
            let _removed = medium.remove_session(session);
        }
    }

    fn detach(&mut self, attach: AttachHandle) {
        let mut medium = self.medium.inner.lock();

        let Some(device) = medium.devices.get_mut(&self.device) else {
            return;
        };

        if device.attach != Some(attach) {
            return;
        }

        device.attach = None;

        let owned: Vec<_> = medium
            .sessions
            .iter()
            .filter(|(_, session)| session.device == self.device)
            .map(|(handle, _)| *handle)
            .collect();

        for session in owned {
            let _removed = medium.remove_session(session);
        }

        debug!(device=%self.device, %attach, "Detached from medium");
    }
}
