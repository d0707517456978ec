//! # Diagnósticos de errno
//! src/diagnostics.rs
//!
//! Traduce el código errno de una llamada al sistema fallida a una
//! explicación legible para el operador. Solo informa: no decide nada
//! ni devuelve nada al llamador.

use std::fmt;
use tracing::error;

/// Llamada al sistema en la que se originó el error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Socket,
    Bind,
    Listen,
    Recv,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Socket => "socket",
            Stage::Bind => "bind",
            Stage::Listen => "listen",
            Stage::Recv => "recv",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Explicación del errno `code` para la llamada `stage`.
///
/// `None` si el código no es uno de los documentados para esa llamada.
///
/// # Ejemplo
/// ```
/// use echo_server::diagnostics::{describe, Stage};
///
/// let text = describe(Stage::Bind, libc::EADDRINUSE).unwrap();
/// assert!(text.contains("already in use"));
/// ```
pub fn describe(stage: Stage, code: i32) -> Option<&'static str> {
    match stage {
        Stage::Socket => describe_socket(code),
        Stage::Bind => describe_bind(code),
        Stage::Listen => describe_listen(code),
        Stage::Recv => describe_recv(code),
    }
}

/// Registra el error de `stage` con su explicación, si se conoce.
pub fn report(stage: Stage, code: Option<i32>) {
    match code {
        Some(code) => match describe(stage, code) {
            Some(text) => error!(stage = %stage, errno = code, "{}", text),
            None => error!(stage = %stage, errno = code, "unrecognized error code"),
        },
        None => error!(stage = %stage, "failed without an OS error code"),
    }
}

fn describe_socket(code: i32) -> Option<&'static str> {
    let text = match code {
        libc::EACCES => {
            "Permission to create a socket of the specified type and/or protocol is denied."
        }
        libc::EAFNOSUPPORT => "The implementation does not support the specified address family.",
        libc::EINVAL => "Unknown protocol, or protocol family not available.",
        libc::EMFILE => "The per-process limit on the number of open files has been reached.",
        libc::ENFILE => "The system-wide limit on the total number of open files has been reached.",
        libc::ENOBUFS | libc::ENOMEM => {
            "Insufficient memory is available; the socket cannot be created until resources are freed."
        }
        libc::EPROTONOSUPPORT => {
            "The protocol type or the specified protocol is not supported within this domain."
        }
        _ => return None,
    };
    Some(text)
}

fn describe_bind(code: i32) -> Option<&'static str> {
    let text = match code {
        libc::EADDRINUSE => "EADDRINUSE: The given address is already in use.",
        libc::EADDRNOTAVAIL => {
            "EADDRNOTAVAIL: A nonexistent interface was requested or the address was not local."
        }
        libc::EACCES => "EACCES: The address is protected and the user is not allowed to bind it.",
        libc::EBADF => "EBADF: The socket is not a valid file descriptor.",
        libc::EINVAL => "EINVAL: The socket is already bound, or the address is not valid for its domain.",
        libc::ENOTSOCK => "ENOTSOCK: The file descriptor does not refer to a socket.",
        libc::EFAULT => "EFAULT: The address points outside the accessible address space.",
        libc::ENOMEM => "ENOMEM: Insufficient kernel memory was available.",
        _ => return None,
    };
    Some(text)
}

fn describe_listen(code: i32) -> Option<&'static str> {
    let text = match code {
        libc::EADDRINUSE => "Another socket is already listening on the same port.",
        libc::EBADF => "The socket is not a valid file descriptor.",
        libc::ENOTSOCK => "The file descriptor does not refer to a socket.",
        libc::EOPNOTSUPP => "The socket is not of a type that supports the listen() operation.",
        _ => return None,
    };
    Some(text)
}

fn describe_recv(code: i32) -> Option<&'static str> {
    let text = match code {
        libc::EAGAIN => "The receive would block, or a receive timeout expired before data arrived.",
        libc::EBADF => "The socket is an invalid descriptor.",
        libc::ECONNRESET => "The connection was closed by the peer during the receive.",
        libc::EFAULT => "The receive buffer points outside the process's address space.",
        libc::EINTR => "The receive was interrupted by a signal before any data was available.",
        libc::EINVAL => "Invalid argument passed to the receive call.",
        libc::ENOBUFS | libc::ENOMEM => "Insufficient memory is available.",
        libc::ENOTCONN => "The socket has not been connected.",
        libc::ENOTSOCK => "The descriptor does not refer to a socket.",
        libc::EOPNOTSUPP => "The socket type does not support the requested receive flags.",
        libc::ETIMEDOUT => "The connection timed out.",
        _ => return None,
    };
    Some(text)
}
