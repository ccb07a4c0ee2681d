use core::time::Duration;

use nearby_network::config::NetworkConfig;
use nearby_network::run;
use nearby_network::sim::SimMedium;
use nearby_network_primitives::client::NetworkClient;
use nearby_network_primitives::state::ControllerState;
use nearby_primitives::events::DiscoveryEvent;
use nearby_primitives::profile::ProfileRecord;
use nearby_store::db::InMemoryDB;
use nearby_store::profile::ProfileStore;
use nearby_store::Store;
use tokio::sync::mpsc;
use tokio::time::timeout;

fn profile(id: &str, name: &str) -> ProfileRecord {
    ProfileRecord::new(
        id.parse().unwrap(),
        name.to_owned(),
        format!("I am {name}"),
        vec!["chess".to_owned(), "climbing".to_owned()],
    )
}

fn device(medium: &SimMedium, local: Option<ProfileRecord>) -> NetworkClient {
    let (transport, events) = medium.join();
    let mut store = ProfileStore::open(Store::new(InMemoryDB::new())).unwrap();

    if let Some(local) = local {
        store.set_local_profile(local).unwrap();
    }

    run(NetworkConfig::default(), transport, events, store)
}

async fn next(events: &mut mpsc::UnboundedReceiver<DiscoveryEvent>) -> DiscoveryEvent {
    timeout(Duration::from_secs(5), events.recv())
        .await
        .unwrap()
        .unwrap()
}

#[tokio::test]
async fn test_two_devices_exchange_profiles() {
    let medium = SimMedium::new();
    let alice = device(&medium, Some(profile("u1", "Alice")));
    let bob = device(&medium, Some(profile("u2", "Bob")));

    let (state, mut alice_events) = alice.initialize().await.unwrap();
    assert_eq!(state, ControllerState::Attaching);
    let (_, mut bob_events) = bob.initialize().await.unwrap();

    let seen_by_alice = next(&mut alice_events).await;
    let seen_by_bob = next(&mut bob_events).await;

    assert_eq!(seen_by_alice.profile().unwrap().name, "Bob");
    assert_eq!(seen_by_bob.profile().unwrap().name, "Alice");
    assert!(!seen_by_bob.profile().unwrap().is_current_user);

    assert_eq!(alice.state().await.unwrap(), ControllerState::Attached);

    let discovered = bob.discovered().await.unwrap();
    assert_eq!(discovered.len(), 1);
    assert_eq!(discovered[0].id.as_str(), "u1");

    assert_eq!(alice.cleanup().await.unwrap(), ControllerState::Closed);
    assert_eq!(alice.cleanup().await.unwrap(), ControllerState::Closed);
    assert!(timeout(Duration::from_secs(5), alice_events.recv())
        .await
        .unwrap()
        .is_none());

    assert_eq!(bob.cleanup().await.unwrap(), ControllerState::Closed);
    assert_eq!(medium.session_count(), 0);
}

#[tokio::test]
async fn test_device_without_profile_only_collects() {
    let medium = SimMedium::new();
    let alice = device(&medium, Some(profile("u1", "Alice")));
    let newcomer = device(&medium, None);

    let (_, mut alice_events) = alice.initialize().await.unwrap();
    let (_, mut newcomer_events) = newcomer.initialize().await.unwrap();

    let event = next(&mut newcomer_events).await;
    assert_eq!(event.profile().unwrap().name, "Alice");

    assert!(alice_events.try_recv().is_err());
    assert!(alice.discovered().await.unwrap().is_empty());

    newcomer
        .set_local_profile(profile("u3", "Newcomer"))
        .await
        .unwrap();
    assert!(newcomer.local_profile().await.unwrap().unwrap().is_current_user);

    newcomer.clear_discovered().await.unwrap();
    assert!(newcomer.discovered().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unavailable_device_reports_error() {
    let medium = SimMedium::new();
    let (transport, events) = medium.join();
    medium.set_available(transport.device(), false);
    let store = ProfileStore::open(Store::new(InMemoryDB::new())).unwrap();
    let client = run(NetworkConfig::default(), transport, events, store);

    let (state, mut events) = client.initialize().await.unwrap();

    assert_eq!(state, ControllerState::Failed);
    assert!(next(&mut events).await.error().is_some());
    assert_eq!(client.cleanup().await.unwrap(), ControllerState::Failed);
}
