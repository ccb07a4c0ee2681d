use super::*;

fn attach(
    transport: &mut SimTransport,
    events: &mut mpsc::UnboundedReceiver<TransportEvent>,
) -> AttachHandle {
    transport.attach().unwrap();

    match events.try_recv().unwrap() {
        TransportEvent::Attached { attach } => attach,
        event => panic!("unexpected event {event:?}"),
    }
}

fn started(events: &mut mpsc::UnboundedReceiver<TransportEvent>) -> SessionHandle {
    match events.try_recv().unwrap() {
        TransportEvent::PublishStarted { session } | TransportEvent::SubscribeStarted { session } => {
            session
        }
        event => panic!("unexpected event {event:?}"),
    }
}

#[test]
fn test_attach_honours_availability_and_failures() {
    let medium = SimMedium::new();
    let (mut transport, mut events) = medium.join();

    medium.set_available(transport.device(), false);
    assert!(!transport.is_available());
    assert!(transport.attach().is_err());

    medium.set_available(transport.device(), true);
    medium.fail_attach(transport.device(), "busy");
    transport.attach().unwrap();
    assert_eq!(
        events.try_recv().unwrap(),
        TransportEvent::AttachFailed {
            reason: "busy".to_owned()
        }
    );
    assert!(!medium.is_attached(transport.device()));
}

#[test]
fn test_matching_services_see_each_other() {
    let medium = SimMedium::new();
    let (mut alice, mut alice_events) = medium.join();
    let (mut bob, mut bob_events) = medium.join();
    let (mut carol, mut carol_events) = medium.join();

    let alice_attach = attach(&mut alice, &mut alice_events);
    let bob_attach = attach(&mut bob, &mut bob_events);
    let carol_attach = attach(&mut carol, &mut carol_events);

    alice.publish(alice_attach, "profile_share").unwrap();
    let alice_pub = started(&mut alice_events);

    carol.publish(carol_attach, "other").unwrap();
    let _ = started(&mut carol_events);

    bob.subscribe(bob_attach, "profile_share").unwrap();
    let bob_sub = started(&mut bob_events);

    let TransportEvent::ServiceDiscovered { peer } = bob_events.try_recv().unwrap() else {
        panic!("expected discovery");
    };
    assert_eq!(peer.session(), bob_sub);
    assert!(bob_events.try_recv().is_err());

    bob.send_message(bob_sub, peer, MessageId::ProfileRequest, b"hi")
        .unwrap();

    let TransportEvent::MessageReceived {
        peer: reply_to,
        payload,
    } = alice_events.try_recv().unwrap()
    else {
        panic!("expected message");
    };
    assert_eq!(reply_to.session(), alice_pub);
    assert_eq!(payload, b"hi");

    alice
        .send_message(alice_pub, reply_to, MessageId::ProfilePayload, b"yo")
        .unwrap();

    assert_eq!(
        bob_events.try_recv().unwrap(),
        TransportEvent::MessageReceived {
            peer,
            payload: b"yo".to_vec()
        }
    );
}

#[test]
fn test_late_publisher_is_announced() {
    let medium = SimMedium::new();
    let (mut alice, mut alice_events) = medium.join();
    let (mut bob, mut bob_events) = medium.join();
    let alice_attach = attach(&mut alice, &mut alice_events);
    let bob_attach = attach(&mut bob, &mut bob_events);

    bob.subscribe(bob_attach, "profile_share").unwrap();
    let bob_sub = started(&mut bob_events);

    alice.publish(alice_attach, "profile_share").unwrap();

    assert!(matches!(
        bob_events.try_recv().unwrap(),
        TransportEvent::ServiceDiscovered { peer } if peer.session() == bob_sub
    ));
}

#[test]
fn test_closed_session_invalidates_handles() {
    let medium = SimMedium::new();
    let (mut alice, mut alice_events) = medium.join();
    let (mut bob, mut bob_events) = medium.join();
    let alice_attach = attach(&mut alice, &mut alice_events);
    let bob_attach = attach(&mut bob, &mut bob_events);

    alice.publish(alice_attach, "profile_share").unwrap();
    let alice_pub = started(&mut alice_events);
    bob.subscribe(bob_attach, "profile_share").unwrap();
    let bob_sub = started(&mut bob_events);
    let TransportEvent::ServiceDiscovered { peer } = bob_events.try_recv().unwrap() else {
        panic!("expected discovery");
    };

    alice.close_session(alice_pub);

    assert!(bob
        .send_message(bob_sub, peer, MessageId::ProfileRequest, b"hi")
        .is_err());
    assert!(alice_events.try_recv().is_err());
}

#[test]
fn test_detach_and_terminate() {
    let medium = SimMedium::new();
    let (mut alice, mut alice_events) = medium.join();
    let alice_attach = attach(&mut alice, &mut alice_events);

    alice.publish(alice_attach, "profile_share").unwrap();
    let alice_pub = started(&mut alice_events);
    alice.subscribe(alice_attach, "profile_share").unwrap();
    let _ = started(&mut alice_events);
    assert_eq!(medium.session_count(), 2);

    medium.terminate(alice_pub);
    assert_eq!(
        alice_events.try_recv().unwrap(),
        TransportEvent::SessionTerminated { session: alice_pub }
    );
    assert_eq!(medium.session_count(), 1);

    alice.detach(alice_attach);
    assert_eq!(medium.session_count(), 0);
    assert!(!medium.is_attached(alice.device()));
    assert!(alice.publish(alice_attach, "profile_share").is_err());
}
