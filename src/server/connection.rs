//! # Conexión con un Peer
//! src/server/connection.rs
//!
//! Una conexión vive exactamente un ciclo: leer, responder, cerrar.

use crate::error::{ReadError, SendError};
use crate::http::request::{self, RawRequest};
use std::io::{self, Write};
use std::net::{Shutdown, SocketAddr, TcpStream};
use tracing::debug;

#[derive(Debug)]
pub struct Connection {
    stream: TcpStream,
    peer: SocketAddr,
}

impl Connection {
    pub fn new(stream: TcpStream, peer: SocketAddr) -> Self {
        Self { stream, peer }
    }

    pub fn peer_addr(&self) -> SocketAddr {
        self.peer
    }

    /// Otro handle al mismo socket, para poder cerrarlo desde otro thread
    pub fn try_clone_stream(&self) -> io::Result<TcpStream> {
        self.stream.try_clone()
    }

    /// Captura hasta `max_bytes` del request (ver [`request::read_request`])
    pub fn read_request(&mut self, max_bytes: usize) -> Result<RawRequest, ReadError> {
        request::read_request(&mut self.stream, max_bytes)
    }

    /// Escribe todos los bytes; `write_all` reintenta las escrituras parciales.
    pub fn send(&mut self, bytes: &[u8]) -> Result<usize, SendError> {
        self.stream.write_all(bytes).map_err(SendError)?;
        self.stream.flush().map_err(SendError)?;
        Ok(bytes.len())
    }

    /// Cierra ambos sentidos y libera el socket.
    pub fn close(self) {
        if let Err(e) = self.stream.shutdown(Shutdown::Both) {
            // El peer puede haber cerrado antes; no hay nada que hacer
            debug!(peer = %self.peer, error = %e, "shutdown failed");
        }
    }
}
