//! # Códigos de Estado HTTP
//! src/http/status.rs
//!
//! El servidor de eco solo produce dos respuestas posibles:
//!
//! - **200 OK**: el request tenía separador y se devuelve su body
//! - **400 Bad Request**: no se encontró `\r\n\r\n` en lo capturado

/// Códigos de estado que puede enviar el servidor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK - Body devuelto tal cual
    Ok = 200,

    /// 400 Bad Request - Request sin separador entre headers y body
    BadRequest = 400,
}

impl StatusCode {
    /// Convierte el código a su valor numérico
    ///
    /// # Ejemplo
    /// ```
    /// use echo_server::http::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// ```
    pub fn as_u16(&self) -> u16 {
        *self as u16
    }

    /// Texto de razón (reason phrase) de la status line
    ///
    /// # Ejemplo
    /// ```
    /// use echo_server::http::StatusCode;
    /// assert_eq!(StatusCode::BadRequest.reason_phrase(), "Bad Request");
    /// ```
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::BadRequest => "Bad Request",
        }
    }
}

impl std::fmt::Display for StatusCode {
    /// Formato: "200 OK"
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.as_u16(), self.reason_phrase())
    }
}
