//! # Módulo HTTP
//!
//! Lo mínimo de HTTP que necesita un servidor de eco:
//!
//! - Captura acotada de los bytes de un request
//! - Extracción del body después de `\r\n\r\n`
//! - Construcción de la respuesta con la plantilla fija
//!
//! No se validan método, path, versión ni headers del request.

pub mod request;
pub mod response;
pub mod status;

pub use request::{extract_body, read_request, ParseError, RawRequest};
pub use response::Response;
pub use status::StatusCode;
