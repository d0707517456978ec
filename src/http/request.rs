//! # Lectura de Requests y Extracción del Body
//! src/http/request.rs
//!
//! El servidor no parsea HTTP: solo necesita encontrar la línea vacía que
//! separa los headers del body y devolver todo lo que viene después.
//!
//! ```text
//! GET / HTTP/1.1\r\n
//! Host: x\r\n
//! \r\n            <- separador (CRLFCRLF)
//! hello           <- body
//! ```
//!
//! ## Captura acotada
//!
//! `read_request` consume bytes del socket hasta que ocurre lo primero de:
//!
//! 1. Aparece el separador `\r\n\r\n`
//! 2. El peer cierra su lado de escritura (EOF)
//! 3. Se capturan `max_bytes` bytes
//!
//! Lo que llegue después de ese punto nunca se ve. La captura es una foto
//! de lo disponible, no una lectura completa del request.

use crate::error::ReadError;
use std::io::{ErrorKind, Read};
use thiserror::Error;

/// Separador entre headers y body
pub const SEPARATOR: &[u8] = b"\r\n\r\n";

/// Capacidad de captura por defecto (4 KiB)
pub const DEFAULT_CAPTURE_BYTES: usize = 0x1000;

/// Tamaño de cada lectura individual sobre el socket
const READ_CHUNK: usize = 0x400;

/// Errores al interpretar los bytes capturados
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseError {
    /// No hay `\r\n\r\n` en lo capturado: no se sabe dónde empieza el body
    #[error("no \\r\\n\\r\\n separator found in request")]
    NoBodySeparator,
}

/// Bytes capturados de una conexión
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRequest {
    bytes: Vec<u8>,
    capacity: usize,
}

impl RawRequest {
    /// Construye una captura a partir de bytes ya leídos.
    ///
    /// Si `bytes` excede `capacity` se recorta, igual que haría la lectura.
    pub fn new(mut bytes: Vec<u8>, capacity: usize) -> Self {
        bytes.truncate(capacity);
        Self { bytes, capacity }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// `true` si el peer cerró sin enviar nada
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// `true` si la captura llegó al límite de capacidad
    pub fn is_full(&self) -> bool {
        self.bytes.len() >= self.capacity
    }

    /// Body del request (ver [`extract_body`])
    pub fn body(&self) -> Result<&[u8], ParseError> {
        extract_body(&self.bytes)
    }
}

/// Posición de la primera ocurrencia de `\r\n\r\n`
pub fn find_separator(buffer: &[u8]) -> Option<usize> {
    buffer
        .windows(SEPARATOR.len())
        .position(|window| window == SEPARATOR)
}

/// Extrae el body: todo lo que sigue al primer `\r\n\r\n`.
///
/// Función pura, sin estado: el mismo buffer siempre produce el mismo body.
///
/// # Errores
///
/// `ParseError::NoBodySeparator` si el buffer no contiene el separador.
///
/// # Ejemplo
///
/// ```
/// use echo_server::http::request::{extract_body, ParseError};
///
/// let raw = b"GET / HTTP/1.1\r\nHost: x\r\n\r\nhello";
/// assert_eq!(extract_body(raw), Ok(&b"hello"[..]));
/// assert_eq!(extract_body(b"GET / HTTP/1.1\r\n"), Err(ParseError::NoBodySeparator));
/// ```
pub fn extract_body(buffer: &[u8]) -> Result<&[u8], ParseError> {
    let offset = find_separator(buffer).ok_or(ParseError::NoBodySeparator)?;
    Ok(&buffer[offset + SEPARATOR.len()..])
}

/// Lee un request consumiendo bytes de `reader`, sin pasar de `max_bytes`.
///
/// Un peer que cierra sin enviar nada produce un `RawRequest` vacío.
/// Las lecturas interrumpidas (`EINTR`) se reintentan.
pub fn read_request<R: Read>(reader: &mut R, max_bytes: usize) -> Result<RawRequest, ReadError> {
    let mut bytes = Vec::with_capacity(max_bytes.min(READ_CHUNK));
    let mut chunk = [0u8; READ_CHUNK];

    while bytes.len() < max_bytes {
        let want = (max_bytes - bytes.len()).min(chunk.len());
        let read = match reader.read(&mut chunk[..want]) {
            Ok(0) => break,
            Ok(read) => read,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(ReadError(e)),
        };

        // El separador puede quedar partido entre dos lecturas
        let scan_from = bytes.len().saturating_sub(SEPARATOR.len() - 1);
        bytes.extend_from_slice(&chunk[..read]);

        if find_separator(&bytes[scan_from..]).is_some() {
            break;
        }
    }

    Ok(RawRequest::new(bytes, max_bytes))
}
