//! # Servidor de Eco Secuencial
//! src/server/tcp.rs
//!
//! Un solo thread, I/O bloqueante. Cada iteración del loop:
//!
//! ```text
//! accept_next -> read_request -> extract_body -> Response -> send -> close
//! ```
//!
//! La siguiente conexión no se acepta hasta que la actual está cerrada, así
//! que un cliente lento hace esperar a todos los demás.

use super::connection::Connection;
use super::listener::Listener;
use super::shutdown::Shutdown;
use crate::config::Config;
use crate::diagnostics::{self, Stage};
use crate::error::ConnectionError;
use crate::http::Response;
use tracing::{debug, error, info, warn};

/// Qué pasó con una conexión atendida
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Se devolvió un body de `body_len` bytes
    Echoed { body_len: usize },

    /// No había separador: se respondió 400
    Rejected,

    /// El peer cerró sin enviar nada: no hay respuesta
    Empty,

    /// Se pidió el cierre mientras se atendía: no hay respuesta
    Interrupted,
}

/// Contadores acumulados durante `run`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServerStats {
    pub echoed: u64,
    pub rejected: u64,
    pub empty: u64,
    pub interrupted: u64,
    pub failed: u64,
}

impl ServerStats {
    fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Echoed { .. } => self.echoed += 1,
            Outcome::Rejected => self.rejected += 1,
            Outcome::Empty => self.empty += 1,
            Outcome::Interrupted => self.interrupted += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.echoed + self.rejected + self.empty + self.interrupted + self.failed
    }
}

/// Servidor de eco
pub struct Server {
    config: Config,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Atiende conexiones, una a la vez, hasta que `shutdown` se dispare.
    ///
    /// Los errores de una conexión se registran y el loop continúa. Al
    /// salir se liberan la conexión pendiente y el listener.
    pub fn run(&self, listener: Listener, shutdown: &Shutdown) -> ServerStats {
        match listener.local_addr() {
            Ok(addr) => info!("Waiting for connection at http://{}", addr),
            Err(e) => warn!(error = %e, "listening on unknown address"),
        }

        let mut stats = ServerStats::default();

        while !shutdown.is_requested() {
            let connection = match listener.accept_next() {
                Ok(connection) => connection,
                Err(e) => {
                    error!(error = %e, "failed to accept connection");
                    continue;
                }
            };

            if shutdown.is_requested() {
                // Conexión de despertar (o un cliente que llegó tarde)
                drop(connection);
                break;
            }

            let peer = connection.peer_addr();
            info!(%peer, "connection received");

            match self.serve(connection, shutdown) {
                Ok(outcome) => {
                    debug!(%peer, ?outcome, "connection closed");
                    stats.record(outcome);
                }
                Err(e) => {
                    error!(%peer, error = %e, "connection abandoned");
                    stats.failed += 1;
                }
            }
        }

        info!(
            echoed = stats.echoed,
            rejected = stats.rejected,
            empty = stats.empty,
            interrupted = stats.interrupted,
            failed = stats.failed,
            "closing listener"
        );
        drop(listener);

        stats
    }

    /// Atiende una conexión y la cierra, pase lo que pase.
    ///
    /// Mientras dura, `shutdown.trigger()` corta la conexión y la lectura o
    /// escritura en curso retorna de inmediato.
    pub fn serve(
        &self,
        mut connection: Connection,
        shutdown: &Shutdown,
    ) -> Result<Outcome, ConnectionError> {
        let _guard = match shutdown.watch(&connection) {
            Ok(guard) => Some(guard),
            Err(e) => {
                warn!(peer = %connection.peer_addr(), error = %e, "connection cannot be interrupted");
                None
            }
        };

        let result = self.handle_connection(&mut connection, shutdown);
        connection.close();
        result
    }

    fn handle_connection(
        &self,
        connection: &mut Connection,
        shutdown: &Shutdown,
    ) -> Result<Outcome, ConnectionError> {
        let peer = connection.peer_addr();

        let request = match connection.read_request(self.config.max_request_bytes) {
            Ok(request) => request,
            Err(_) if shutdown.is_requested() => return Ok(Outcome::Interrupted),
            Err(e) => {
                diagnostics::report(Stage::Recv, e.0.raw_os_error());
                return Err(e.into());
            }
        };

        if shutdown.is_requested() {
            debug!(%peer, bytes = request.len(), "shutdown requested, dropping request");
            return Ok(Outcome::Interrupted);
        }

        if request.is_empty() {
            debug!(%peer, "peer closed without sending data");
            return Ok(Outcome::Empty);
        }

        debug!(%peer, bytes = request.len(), full = request.is_full(), "request captured");

        let (response, outcome) = match request.body() {
            Ok(body) => (
                Response::echo(body, &self.config.server_name),
                Outcome::Echoed {
                    body_len: body.len(),
                },
            ),
            Err(e) => {
                warn!(%peer, error = %e, "rejecting request");
                (Response::bad_request(&self.config.server_name), Outcome::Rejected)
            }
        };

        let sent = match connection.send(&response.to_bytes()) {
            Ok(sent) => sent,
            Err(_) if shutdown.is_requested() => return Ok(Outcome::Interrupted),
            Err(e) => return Err(e.into()),
        };
        info!(%peer, status = %response.status(), bytes = sent, "response sent");

        Ok(outcome)
    }
}
