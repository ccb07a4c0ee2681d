use core::time::Duration;

use clap::Parser;
use eyre::{bail, Result as EyreResult};
use nearby_network::run;
use nearby_network::sim::SimMedium;
use nearby_network_primitives::client::NetworkClient;
use nearby_primitives::draft::ProfileDraft;
use nearby_primitives::events::DiscoveryEvent;
use nearby_store::db::InMemoryDB;
use nearby_store::profile::ProfileStore;
use nearby_store::Store;
use owo_colors::OwoColorize;
use tokio::signal::ctrl_c;
use tokio::time::sleep;
use tokio::{pin, select};
use tracing::{info, warn};

use crate::cli::profile::print_profile;
use crate::cli::RootArgs;

const NAMES: &[&str] = &["Ada", "Grace", "Alan", "Barbara", "Edsger", "Frances"];
const INTERESTS: &[&str] = &[
    "chess, climbing",
    "sailing, compilers",
    "running, jazz",
    "board games, tea",
];

/// Discover simulated devices nearby and exchange profiles with them
#[derive(Debug, Parser)]
pub struct SimulateCommand {
    /// Number of simulated devices sharing a profile
    #[arg(long, default_value_t = 3)]
    pub peers: usize,

    /// How long to keep discovering before shutting down
    #[arg(long, value_name = "MS", default_value_t = 1_000)]
    pub duration_ms: u64,
}

impl SimulateCommand {
    pub async fn run(self, root_args: &RootArgs) -> EyreResult<()> {
        let (config, store) = root_args.open()?;

        if !store.has_local_profile() {
            warn!("No local profile, nearby devices will not receive one");
        }

        let medium = SimMedium::new();

        let mut peers = Vec::with_capacity(self.peers);

        for index in 0..self.peers {
            let draft = ProfileDraft {
                name: NAMES[index % NAMES.len()].to_owned(),
                bio: format!("Simulated device #{index}"),
                interests: INTERESTS[index % INTERESTS.len()].to_owned(),
                picture_uri: None,
            };

            let mut peer_store = ProfileStore::open(Store::new(InMemoryDB::new()))?;
            peer_store.set_local_profile(draft.into_local_profile(None)?)?;

            let (transport, transport_events) = medium.join();
            let client = run(config.network.clone(), transport, transport_events, peer_store);

            // Peers report into the void, only the local device is watched.
            let (_state, _events) = client.initialize().await?;

            peers.push(client);
        }

        let (transport, transport_events) = medium.join();
        let client = run(config.network.clone(), transport, transport_events, store);

        let (state, mut events) = client.initialize().await?;

        info!(%state, peers = self.peers, "Discovering nearby profiles");

        let deadline = sleep(Duration::from_millis(self.duration_ms));
        pin!(deadline);

        let mut received = 0_usize;

        loop {
            select! {
                event = events.recv() => match event {
                    Some(DiscoveryEvent::DiscoveredProfile(record)) => {
                        received += 1;
                        println!("{}", "discovered".green());
                        print_profile(&record);
                    }
                    Some(DiscoveryEvent::Error(message)) => {
                        shutdown(&client, &peers).await?;
                        bail!(message);
                    }
                    None => break,
                },
                () = &mut deadline => break,
                _ = ctrl_c() => break,
            }
        }

        shutdown(&client, &peers).await?;

        let total = client.discovered().await?.len();

        info!(received, total, "Discovery finished");

        Ok(())
    }
}

async fn shutdown(client: &NetworkClient, peers: &[NetworkClient]) -> EyreResult<()> {
    let _state = client.cleanup().await?;

    for peer in peers {
        let _state = peer.cleanup().await?;
    }

    Ok(())
}
