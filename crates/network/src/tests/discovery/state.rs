use super::*;
use crate::mock::{Call, RecordingTransport};

const ATTACH: AttachHandle = AttachHandle::new(1);

#[test]
fn test_session_lifecycle() {
    let mut transport = RecordingTransport::default();
    let mut session = DiscoverySession::new(SessionRole::Publisher);
    assert_eq!(session.state(), SessionState::Idle);
    assert_eq!(session.handle(), None);

    session.start(&mut transport, ATTACH, "svc").unwrap();
    assert_eq!(session.state(), SessionState::Starting);
    assert!(!session.is_active());

    let handle = SessionHandle::new(7);
    assert!(session.confirm(handle));
    assert_eq!(session.handle(), Some(handle));
    assert!(session.owns(&PeerHandle::new(handle, 1)));
    assert!(!session.owns(&PeerHandle::new(SessionHandle::new(8), 1)));

    session.close(&mut transport);
    assert_eq!(session.state(), SessionState::Closed);
    assert!(!session.owns(&PeerHandle::new(handle, 1)));

    assert_eq!(
        transport.calls,
        vec![
            Call::Publish(ATTACH, "svc".to_owned()),
            Call::CloseSession(handle),
        ]
    );
}

#[test]
fn test_subscriber_start_subscribes() {
    let mut transport = RecordingTransport::default();
    let mut session = DiscoverySession::new(SessionRole::Subscriber);

    session.start(&mut transport, ATTACH, "svc").unwrap();

    assert_eq!(transport.calls, vec![Call::Subscribe(ATTACH, "svc".to_owned())]);
}

#[test]
fn test_start_only_once() {
    let mut transport = RecordingTransport::default();
    let mut session = DiscoverySession::new(SessionRole::Subscriber);

    session.start(&mut transport, ATTACH, "svc").unwrap();
    assert!(session.start(&mut transport, ATTACH, "svc").is_err());

    assert_eq!(transport.calls.len(), 1);
}

#[test]
fn test_rejected_start_closes() {
    let mut transport = RecordingTransport {
        reject_publish: true,
        ..Default::default()
    };
    let mut session = DiscoverySession::new(SessionRole::Publisher);

    assert!(session.start(&mut transport, ATTACH, "svc").is_err());
    assert_eq!(session.state(), SessionState::Closed);
}

#[test]
fn test_unexpected_confirmation_is_refused() {
    let mut transport = RecordingTransport::default();
    let mut session = DiscoverySession::new(SessionRole::Publisher);

    assert!(!session.confirm(SessionHandle::new(3)));

    session.start(&mut transport, ATTACH, "svc").unwrap();
    session.close(&mut transport);

    assert!(!session.confirm(SessionHandle::new(3)));
    assert_eq!(session.state(), SessionState::Closed);
    assert!(transport.calls.iter().all(|call| !matches!(call, Call::CloseSession(_))));
}

#[test]
fn test_terminated_only_matches_own_handle() {
    let mut transport = RecordingTransport::default();
    let mut session = DiscoverySession::new(SessionRole::Subscriber);
    session.start(&mut transport, ATTACH, "svc").unwrap();
    let _ = session.confirm(SessionHandle::new(5));

    assert!(!session.terminated(SessionHandle::new(6)));
    assert!(session.is_active());

    assert!(session.terminated(SessionHandle::new(5)));
    assert_eq!(session.state(), SessionState::Closed);

    session.close(&mut transport);
    assert!(transport.calls.iter().all(|call| !matches!(call, Call::CloseSession(_))));
}
