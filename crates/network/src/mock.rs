use eyre::bail;
use nearby_network_primitives::transport::{
    AttachHandle, MessageId, PeerHandle, SessionHandle, Transport,
};

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum Call {
    Attach,
    Publish(AttachHandle, String),
    Subscribe(AttachHandle, String),
    Send {
        session: SessionHandle,
        peer: PeerHandle,
        message_id: MessageId,
        payload: Vec<u8>,
    },
    CloseSession(SessionHandle),
    Detach(AttachHandle),
}

/// Transport that answers nothing and records every call made on it.
#[derive(Debug, Default)]
pub(crate) struct RecordingTransport {
    pub unavailable: bool,
    pub reject_attach: bool,
    pub reject_publish: bool,
    pub reject_send: bool,
    pub calls: Vec<Call>,
}

impl RecordingTransport {
    pub(crate) fn sent(&self) -> Vec<(PeerHandle, MessageId, Vec<u8>)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::Send {
                    peer,
                    message_id,
                    payload,
                    ..
                } => Some((*peer, *message_id, payload.clone())),
                _ => None,
            })
            .collect()
    }
}

impl Transport for RecordingTransport {
    fn is_available(&self) -> bool {
        !self.unavailable
    }

    fn attach(&mut self) -> eyre::Result<()> {
        self.calls.push(Call::Attach);

        if self.reject_attach {
            bail!("attach rejected");
        }

        Ok(())
    }

    fn publish(&mut self, attach: AttachHandle, service_name: &str) -> eyre::Result<()> {
        self.calls
            .push(Call::Publish(attach, service_name.to_owned()));

        if self.reject_publish {
            bail!("publish rejected");
        }

        Ok(())
    }

    fn subscribe(&mut self, attach: AttachHandle, service_name: &str) -> eyre::Result<()> {
        self.calls
            .push(Call::Subscribe(attach, service_name.to_owned()));

        Ok(())
    }

    fn send_message(
        &mut self,
        session: SessionHandle,
        peer: PeerHandle,
        message_id: MessageId,
        payload: &[u8],
    ) -> eyre::Result<()> {
        self.calls.push(Call::Send {
            session,
            peer,
            message_id,
            payload: payload.to_vec(),
        });

        if self.reject_send {
            bail!("send rejected");
        }

        Ok(())
    }

    fn close_session(&mut self, session: SessionHandle) {
        self.calls.push(Call::CloseSession(session));
    }

    fn detach(&mut self, attach: AttachHandle) {
        self.calls.push(Call::Detach(attach));
    }
}
