//! # Errores del Servidor
//! src/error.rs
//!
//! - Errores de arranque (`SocketError`): fatales, el proceso termina
//! - Errores por conexión (`ConnectionError`): solo afectan a esa conexión,
//!   el loop de accept sigue atendiendo
//!
//! Un request sin separador (`ParseError`, en `http::request`) no es un error
//! de conexión: se contesta con 400 y se cierra normalmente.

use crate::diagnostics::Stage;
use std::io;
use thiserror::Error;

/// Fallo al preparar el socket de escucha
#[derive(Debug, Error)]
pub enum SocketError {
    #[error("socket() failed: {0}")]
    Create(#[source] io::Error),

    #[error("bind() failed: {0}")]
    Bind(#[source] io::Error),

    #[error("listen() failed: {0}")]
    Listen(#[source] io::Error),
}

impl SocketError {
    /// Llamada al sistema que falló
    pub fn stage(&self) -> Stage {
        match self {
            SocketError::Create(_) => Stage::Socket,
            SocketError::Bind(_) => Stage::Bind,
            SocketError::Listen(_) => Stage::Listen,
        }
    }

    /// Código errno de la plataforma, si lo hay
    pub fn os_code(&self) -> Option<i32> {
        self.io_error().raw_os_error()
    }

    pub fn io_error(&self) -> &io::Error {
        match self {
            SocketError::Create(e) | SocketError::Bind(e) | SocketError::Listen(e) => e,
        }
    }
}

/// Fallo al leer el request de un peer
#[derive(Debug, Error)]
#[error("failed to read request: {0}")]
pub struct ReadError(#[source] pub io::Error);

/// Fallo al escribir la respuesta
#[derive(Debug, Error)]
#[error("failed to send response: {0}")]
pub struct SendError(#[source] pub io::Error);

/// Cualquier error que termina el manejo de una conexión
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error(transparent)]
    Read(#[from] ReadError),

    #[error(transparent)]
    Send(#[from] SendError),
}
