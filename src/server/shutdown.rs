//! # Cierre Ordenado
//! src/server/shutdown.rs
//!
//! El loop de accept es dueño del listener y de la conexión en curso; nadie
//! más los toca. Para detenerlo basta con:
//!
//! 1. Marcar la bandera compartida
//! 2. Abrir una conexión descartable hacia el listener, que despierta al
//!    `accept` bloqueado
//!
//! 3. Cerrar (shutdown) la conexión que se está atendiendo, si la hay, para
//!    que un `read`/`write` bloqueado sobre un peer lento retorne ya
//!
//! El loop ve la bandera, suelta la conexión pendiente y el listener (drop)
//! y retorna. Un segundo Ctrl-C termina el proceso sin esperar al loop.

use super::connection::Connection;
use super::listener::Listener;
use std::io;
use std::net::{self, IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tracing::{debug, info, warn};

const WAKE_TIMEOUT: Duration = Duration::from_secs(1);

/// Señal de cancelación clonable, asociada a un listener.
#[derive(Debug, Clone)]
pub struct Shutdown {
    requested: Arc<AtomicBool>,
    wake_addr: SocketAddr,

    /// Clon del stream de la conexión en curso
    active: Arc<Mutex<Option<TcpStream>>>,
}

/// Mientras vive, `trigger` puede cerrar la conexión vigilada.
#[derive(Debug)]
pub struct ActiveConnection {
    active: Arc<Mutex<Option<TcpStream>>>,
}

impl Drop for ActiveConnection {
    fn drop(&mut self) {
        lock(&self.active).take();
    }
}

fn lock(active: &Mutex<Option<TcpStream>>) -> MutexGuard<'_, Option<TcpStream>> {
    // Un Option<TcpStream> no puede quedar inconsistente: se ignora el poison
    active.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn close_stream(stream: &TcpStream) {
    if let Err(e) = stream.shutdown(net::Shutdown::Both) {
        debug!(error = %e, "active connection already closed");
    }
}

impl Shutdown {
    pub fn new(listener: &Listener) -> io::Result<Self> {
        let mut wake_addr = listener.local_addr()?;

        // Ligado a 0.0.0.0: se despierta por loopback
        if wake_addr.ip().is_unspecified() {
            let loopback: IpAddr = match wake_addr {
                SocketAddr::V4(_) => Ipv4Addr::LOCALHOST.into(),
                SocketAddr::V6(_) => Ipv6Addr::LOCALHOST.into(),
            };
            wake_addr.set_ip(loopback);
        }

        Ok(Self {
            requested: Arc::new(AtomicBool::new(false)),
            wake_addr,
            active: Arc::new(Mutex::new(None)),
        })
    }

    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }

    /// Registra `connection` como la conexión en curso.
    ///
    /// Si el cierre ya fue pedido, la conexión se cierra de inmediato.
    pub fn watch(&self, connection: &Connection) -> io::Result<ActiveConnection> {
        let stream = connection.try_clone_stream()?;

        let mut active = lock(&self.active);
        // Se revisa la bandera con el lock tomado: o trigger ve el stream,
        // o aquí se ve la bandera
        if self.is_requested() {
            close_stream(&stream);
        }
        *active = Some(stream);
        drop(active);

        Ok(ActiveConnection {
            active: Arc::clone(&self.active),
        })
    }

    /// Pide al loop que termine y corta la conexión en curso.
    ///
    /// Llamarlo varias veces es seguro.
    pub fn trigger(&self) {
        let already = self.requested.swap(true, Ordering::SeqCst);

        if let Some(stream) = lock(&self.active).as_ref() {
            close_stream(stream);
        }

        if already {
            return;
        }

        if let Err(e) = TcpStream::connect_timeout(&self.wake_addr, WAKE_TIMEOUT) {
            // El listener ya no existe o el loop no está en accept
            debug!(error = %e, "wake-up connection failed");
        }
    }

    /// Registra `trigger` como handler de Ctrl-C (SIGINT).
    ///
    /// Si el loop sigue vivo al segundo Ctrl-C, el proceso sale con código 1.
    pub fn install(&self) -> Result<(), ctrlc::Error> {
        let handle = self.clone();
        ctrlc::set_handler(move || {
            if handle.is_requested() {
                warn!("Second Ctrl-C, exiting immediately");
                std::process::exit(1);
            }
            info!("Ctrl-C detected, closing sockets");
            handle.trigger();
        })
    }
}
