//! # Echo Server
//! src/lib.rs
//!
//! Servidor TCP mínimo, de un solo thread, que acepta conexiones tipo HTTP,
//! extrae el body que sigue a la primera línea vacía (`\r\n\r\n`) y lo
//! devuelve envuelto en una respuesta HTTP/1.1 fija.
//!
//! ## Arquitectura
//!
//! - `http`: captura del request, extracción del body y plantilla de respuesta
//! - `server`: listener, conexiones, loop de accept y cierre con Ctrl-C
//! - `config`: argumentos CLI y variables de entorno
//! - `error`: errores de arranque y de conexión
//! - `diagnostics`: explicación de los códigos errno
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use echo_server::config::Config;
//! use echo_server::server::{Listener, Server, Shutdown};
//!
//! let config = Config::default();
//! let listener = Listener::open(config.address(), config.backlog)?;
//! let shutdown = Shutdown::new(&listener)?;
//! shutdown.install()?;
//! Server::new(config).run(listener, &shutdown);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod http;
pub mod server;
