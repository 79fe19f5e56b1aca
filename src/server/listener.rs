//! Socket de escucha.

use std::io;
use std::net::TcpListener;
use tracing::info;

/// Crea el socket de escucha en `address` (`host:puerto`)
///
/// `TcpListener::bind` ya deja `SO_REUSEADDR` activo en Unix.
pub fn socket_listen(address: &str) -> io::Result<TcpListener> {
    let listener = TcpListener::bind(address)?;
    info!("Escuchando en {}", listener.local_addr()?);
    Ok(listener)
}
