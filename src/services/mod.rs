// Smart Bookmark services
// Services talk to the outside world: the hosted store and identity provider,
// on-disk settings and session, and favicon URL derivation.

pub mod favicon;
pub mod identity_gateway;
pub mod memory_backend;
pub mod remote_store;
pub mod session_store;
pub mod settings_engine;
