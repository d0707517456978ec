//! # Configuración del Servidor
//! src/config.rs
//!
//! Configuración por argumentos CLI o variables de entorno. Los valores por
//! defecto reproducen el servidor clásico: `127.0.0.1:4444`, backlog de 50
//! y captura de 4 KiB por request.
//!
//! ## Ejemplos de uso
//!
//! ### CLI
//! ```bash
//! ./echo_server --port 8080 --backlog 128 --server-name "Mi Eco"
//! ```
//!
//! ### Variables de entorno
//! ```bash
//! ECHO_PORT=8080 ECHO_LOG=debug ./echo_server
//! ```

use crate::http::request::DEFAULT_CAPTURE_BYTES;
use crate::http::response::DEFAULT_SERVER_NAME;
use clap::Parser;
use std::net::{Ipv4Addr, SocketAddrV4};

/// Configuración del servidor de eco
#[derive(Debug, Clone, Parser)]
#[command(name = "echo_server")]
#[command(about = "Servidor TCP secuencial que devuelve el body de cada request HTTP")]
#[command(version = "0.1.0")]
pub struct Config {
    /// Dirección IPv4 en la que escucha
    #[arg(long, default_value = "127.0.0.1", env = "ECHO_HOST")]
    pub host: Ipv4Addr,

    /// Puerto en el que escucha el servidor (0 = puerto efímero)
    #[arg(short, long, default_value = "4444", env = "ECHO_PORT")]
    pub port: u16,

    /// Conexiones pendientes que el kernel encola antes del accept
    #[arg(long, default_value = "50", env = "ECHO_BACKLOG")]
    pub backlog: i32,

    /// Bytes máximos capturados por request
    #[arg(long = "max-request-bytes", default_value = "4096", env = "ECHO_MAX_REQUEST_BYTES")]
    pub max_request_bytes: usize,

    /// Valor del header `Server`
    #[arg(long = "server-name", default_value = DEFAULT_SERVER_NAME, env = "ECHO_SERVER_NAME")]
    pub server_name: String,

    /// Nivel de log si RUST_LOG no está definida
    #[arg(long = "log-level", default_value = "info", env = "ECHO_LOG")]
    pub log_level: String,
}

impl Config {
    /// Parsea argumentos CLI (y variables de entorno)
    pub fn new() -> Self {
        Config::parse()
    }

    /// Dirección completa para bind
    ///
    /// # Ejemplo
    /// ```rust
    /// use echo_server::config::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(config.address().to_string(), "127.0.0.1:4444");
    /// ```
    pub fn address(&self) -> SocketAddrV4 {
        SocketAddrV4::new(self.host, self.port)
    }

    /// Valida la configuración
    pub fn validate(&self) -> Result<(), String> {
        if self.backlog <= 0 {
            return Err("Backlog must be >= 1".to_string());
        }

        if self.max_request_bytes == 0 {
            return Err("Max request bytes must be >= 1".to_string());
        }

        if self.server_name.trim().is_empty() {
            return Err("Server name must not be empty".to_string());
        }

        // Un CR/LF rompería la plantilla de la respuesta
        if self.server_name.contains(['\r', '\n']) {
            return Err("Server name must not contain CR or LF".to_string());
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: Ipv4Addr::LOCALHOST,
            port: 4444,
            backlog: 50,
            max_request_bytes: DEFAULT_CAPTURE_BYTES,
            server_name: DEFAULT_SERVER_NAME.to_string(),
            log_level: "info".to_string(),
        }
    }
}
