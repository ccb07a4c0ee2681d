pub mod client;
pub mod codec;
pub mod messages;
pub mod state;
pub mod transport;
