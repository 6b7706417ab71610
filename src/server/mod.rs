// Server module entry point
// Listener creation and per-connection handling

pub mod connection;
pub mod listener;

pub use connection::accept_connection;
pub use listener::create_reusable_listener;
