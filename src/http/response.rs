//! # Construcción de Respuestas HTTP
//! src/http/response.rs
//!
//! Toda respuesta del servidor sigue la misma plantilla:
//!
//! ```text
//! HTTP/1.1 200 OK\r\n
//! Content-Type: text/html\r\n
//! Content-Length: 5\r\n
//! Server: Rust Echo Server\r\n
//! \r\n
//! hello
//! ```
//!
//! `Content-Length` cuenta exactamente los bytes que siguen a la línea vacía.
//! No se agrega ningún `\r\n` después del body.
//!
//! ## Ejemplo de uso
//!
//! ```
//! use echo_server::http::Response;
//!
//! let bytes = Response::echo(b"hello", "Rust Echo Server").to_bytes();
//! assert!(bytes.starts_with(b"HTTP/1.1 200 OK\r\n"));
//! assert!(bytes.ends_with(b"\r\n\r\nhello"));
//! ```

use super::StatusCode;

/// Banner por defecto del header `Server`
pub const DEFAULT_SERVER_NAME: &str = "Rust Echo Server";

/// Una respuesta HTTP/1.1 lista para serializar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    status: StatusCode,

    /// Headers en el orden en que se escriben
    headers: Vec<(String, String)>,

    body: Vec<u8>,
}

impl Response {
    /// Respuesta sin headers ni body
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    /// Respuesta 200 que devuelve `body` tal cual.
    pub fn echo(body: &[u8], server_name: &str) -> Self {
        Self::new(StatusCode::Ok)
            .with_header("Content-Type", "text/html")
            .with_body(body)
            .with_header("Server", server_name)
    }

    /// Rechazo 400 para requests sin separador, con body vacío.
    pub fn bad_request(server_name: &str) -> Self {
        Self::new(StatusCode::BadRequest)
            .with_header("Content-Type", "text/html")
            .with_body(b"")
            .with_header("Server", server_name)
    }

    /// Agrega un header; si ya existe, reemplaza su valor en el mismo lugar.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.set_header(name, value);
        self
    }

    /// Establece el body y su `Content-Length`
    pub fn with_body(mut self, body: &[u8]) -> Self {
        self.body = body.to_vec();
        let length = self.body.len().to_string();
        self.set_header("Content-Length", &length);
        self
    }

    fn set_header(&mut self, name: &str, value: &str) {
        match self
            .headers
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
        {
            Some((_, existing)) => *existing = value.to_string(),
            None => self.headers.push((name.to_string(), value.to_string())),
        }
    }

    /// Serializa la respuesta: status line, headers, línea vacía, body.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut result = Vec::with_capacity(128 + self.body.len());

        result.extend_from_slice(format!("HTTP/1.1 {}\r\n", self.status).as_bytes());

        for (name, value) in &self.headers {
            result.extend_from_slice(format!("{}: {}\r\n", name, value).as_bytes());
        }

        result.extend_from_slice(b"\r\n");
        result.extend_from_slice(&self.body);

        result
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Valor de un header (sin distinguir mayúsculas)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }
}
