//! # Módulo del Servidor
//! src/server/mod.rs
//!
//! - `listener`: socket de escucha (socket + bind + listen)
//! - `connection`: una conexión aceptada, usada una sola vez
//! - `shutdown`: cancelación con Ctrl-C sin sockets globales
//! - `tcp`: el loop secuencial accept -> responder -> cerrar

pub mod connection;
pub mod listener;
pub mod shutdown;
pub mod tcp;

// Re-exportar para facilitar el uso
pub use connection::Connection;
pub use listener::Listener;
pub use shutdown::{ActiveConnection, Shutdown};
pub use tcp::{Outcome, Server, ServerStats};
