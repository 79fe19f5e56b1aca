//! Handler terminal para errores: status line más una página HTML mínima.

use crate::http::{Response, StatusCode};
use std::io::Write;
use tracing::debug;

/// Escribe la página de error y retorna el mismo `status`
///
/// Nunca falla: si la conexión ya está rota la escritura se descarta.
pub fn handle_error<W: Write>(out: &mut W, status: StatusCode) -> StatusCode {
    if let Err(e) = Response::error_page(status).write_to(out) {
        debug!("No se pudo escribir la página de error {}: {}", status, e);
    }
    status
}
