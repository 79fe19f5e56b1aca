//! # Errores por request
//! src/error.rs
//!
//! Todo lo que puede fallar mientras se atiende una conexión termina en
//! un `RequestError`, que se traduce a exactamente un código HTTP. Ningún
//! error de un request afecta a otros: se escribe la página de error y se
//! cierra la conexión.

use crate::http::{ParseError, StatusCode};
use crate::resolve::ResolveError;
use std::io;

#[derive(Debug)]
pub enum RequestError {
    /// Request line o headers malformados
    Parse(ParseError),

    /// URI inexistente o fuera del root
    Resolve(ResolveError),

    /// El recurso existe pero no se puede servir (tipo no soportado,
    /// archivo ilegible, script que no arranca)
    NotFound(String),

    /// Falla del lado del servidor (p. ej. tabla de mimetypes ilegible)
    Internal(String),

    /// La cabecera 200 ya salió y el cliente dejó de leer
    Disconnected(io::Error),
}

impl RequestError {
    /// Código HTTP que corresponde al error
    ///
    /// `Disconnected` conserva el 200 ya enviado.
    pub fn status(&self) -> StatusCode {
        match self {
            RequestError::Parse(_) => StatusCode::BadRequest,
            RequestError::Resolve(_) => StatusCode::NotFound,
            RequestError::NotFound(_) => StatusCode::NotFound,
            RequestError::Internal(_) => StatusCode::InternalServerError,
            RequestError::Disconnected(_) => StatusCode::Ok,
        }
    }

    /// Indica si todavía hay que escribir una página de error
    pub fn needs_error_page(&self) -> bool {
        !matches!(self, RequestError::Disconnected(_))
    }
}

impl std::fmt::Display for RequestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestError::Parse(e) => write!(f, "Parse error: {}", e),
            RequestError::Resolve(e) => write!(f, "Resolve error: {}", e),
            RequestError::NotFound(msg) => write!(f, "Not found: {}", msg),
            RequestError::Internal(msg) => write!(f, "Internal error: {}", msg),
            RequestError::Disconnected(e) => write!(f, "Client disconnected: {}", e),
        }
    }
}

impl std::error::Error for RequestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RequestError::Parse(e) => Some(e),
            RequestError::Resolve(e) => Some(e),
            RequestError::Disconnected(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ParseError> for RequestError {
    fn from(e: ParseError) -> Self {
        RequestError::Parse(e)
    }
}

impl From<ResolveError> for RequestError {
    fn from(e: ResolveError) -> Self {
        RequestError::Resolve(e)
    }
}
