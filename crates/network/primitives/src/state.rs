use core::fmt;

use serde::{Deserialize, Serialize};

/// Attach lifecycle of the session controller.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum ControllerState {
    #[default]
    Detached,
    Attaching,
    Attached,
    Closed,
    Failed,
}

impl ControllerState {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Closed | Self::Failed)
    }
}

impl fmt::Display for ControllerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Detached => "detached",
            Self::Attaching => "attaching",
            Self::Attached => "attached",
            Self::Closed => "closed",
            Self::Failed => "failed",
        };

        f.pad(label)
    }
}
