pub mod draft;
pub mod events;
pub mod profile;
