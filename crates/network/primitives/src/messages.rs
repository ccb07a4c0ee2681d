use eyre::Result as EyreResult;
use nearby_primitives::events::DiscoveryEvent;
use nearby_primitives::profile::ProfileRecord;
use tokio::sync::{mpsc, oneshot};

use crate::state::ControllerState;

/// Channel the controller reports discovery outcomes on.
pub type Listener = mpsc::UnboundedSender<DiscoveryEvent>;

/// Requests served by the event loop, in the same queue order as they were
/// sent.
#[derive(Debug)]
pub enum NetworkMessage {
    Initialize {
        listener: Listener,
        outcome: oneshot::Sender<ControllerState>,
    },
    Cleanup {
        outcome: oneshot::Sender<ControllerState>,
    },
    State {
        outcome: oneshot::Sender<ControllerState>,
    },
    LocalProfile {
        outcome: oneshot::Sender<Option<ProfileRecord>>,
    },
    SetLocalProfile {
        request: ProfileRecord,
        outcome: oneshot::Sender<EyreResult<()>>,
    },
    ListDiscovered {
        outcome: oneshot::Sender<Vec<ProfileRecord>>,
    },
    ClearDiscovered {
        outcome: oneshot::Sender<EyreResult<()>>,
    },
}
