//! # Socket de Escucha
//! src/server/listener.rs
//!
//! Se crea con `socket2` para poder fijar el backlog: `std::net::TcpListener`
//! no permite elegirlo.

use super::connection::Connection;
use crate::error::SocketError;
use socket2::{Domain, Protocol, Socket, Type};
use std::io;
use std::net::{SocketAddr, SocketAddrV4, TcpListener};
use tracing::debug;

/// Socket TCP ligado y escuchando. Se cierra al hacer drop.
#[derive(Debug)]
pub struct Listener {
    inner: TcpListener,
}

impl Listener {
    /// socket() + bind() + listen(), en ese orden.
    ///
    /// Cada paso que falla devuelve su variante de `SocketError` con el
    /// `io::Error` original (y por lo tanto el errno).
    pub fn open(address: SocketAddrV4, backlog: i32) -> Result<Self, SocketError> {
        let socket = Socket::new(Domain::IPV4, Type::STREAM, Some(Protocol::TCP))
            .map_err(SocketError::Create)?;

        // Permite reiniciar el servidor sin esperar a que expire TIME_WAIT
        socket.set_reuse_address(true).map_err(SocketError::Create)?;

        socket
            .bind(&SocketAddr::V4(address).into())
            .map_err(SocketError::Bind)?;
        socket.listen(backlog).map_err(SocketError::Listen)?;

        debug!(%address, backlog, "socket listening");

        Ok(Self {
            inner: socket.into(),
        })
    }

    /// Dirección efectivamente ligada (resuelve el puerto 0)
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.inner.local_addr()
    }

    /// Bloquea hasta que un peer se conecta.
    pub fn accept_next(&self) -> io::Result<Connection> {
        let (stream, peer) = self.inner.accept()?;
        Ok(Connection::new(stream, peer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Stage;
    use std::net::{Ipv4Addr, TcpStream};

    fn ephemeral() -> SocketAddrV4 {
        SocketAddrV4::new(Ipv4Addr::LOCALHOST, 0)
    }

    #[test]
    fn test_open_ephemeral_port() {
        let listener = Listener::open(ephemeral(), 50).unwrap();
        let addr = listener.local_addr().unwrap();
        assert!(addr.is_ipv4());
        assert_ne!(addr.port(), 0);
    }

    #[test]
    fn test_open_port_in_use_is_bind_error() {
        let first = Listener::open(ephemeral(), 50).unwrap();
        let port = first.local_addr().unwrap().port();

        let err = Listener::open(SocketAddrV4::new(Ipv4Addr::LOCALHOST, port), 50).unwrap_err();
        assert_eq!(err.stage(), Stage::Bind);
        assert_eq!(err.os_code(), Some(libc::EADDRINUSE));
    }

    #[test]
    fn test_open_non_local_address_is_bind_error() {
        // 192.0.2.0/24 (TEST-NET-1) nunca es una dirección local
        let address = SocketAddrV4::new(Ipv4Addr::new(192, 0, 2, 1), 0);
        let err = Listener::open(address, 50).unwrap_err();
        assert_eq!(err.stage(), Stage::Bind);
        assert_eq!(err.os_code(), Some(libc::EADDRNOTAVAIL));
    }

    #[test]
    fn test_accept_next_reports_peer() {
        let listener = Listener::open(ephemeral(), 50).unwrap();
        let addr = listener.local_addr().unwrap();

        let client = TcpStream::connect(addr).unwrap();
        let connection = listener.accept_next().unwrap();
        assert_eq!(connection.peer_addr(), client.local_addr().unwrap());
    }
}
