use nearby_network_primitives::transport::SERVICE_NAME;
use serde::{Deserialize, Serialize};

pub const DEFAULT_COMMAND_BUFFER: usize = 32;

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct NetworkConfig {
    /// Discovery channel both publisher and subscriber sessions use.
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// Capacity of the queue carrying client requests into the event loop.
    #[serde(default = "default_command_buffer")]
    pub command_buffer: usize,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            command_buffer: default_command_buffer(),
        }
    }
}

fn default_service_name() -> String {
    SERVICE_NAME.to_owned()
}

const fn default_command_buffer() -> usize {
    DEFAULT_COMMAND_BUFFER
}
