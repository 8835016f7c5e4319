// Certificate text fitting: the layout engine plus the HTTP surface that
// serves it. `main.rs` only wires configuration, logging and the listener.

pub mod certificate;
pub mod config;
pub mod errors;
pub mod layout;
pub mod routes;
pub mod state;
