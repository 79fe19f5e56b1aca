//! # Servidor secuencial
//! src/server/single.rs
//!
//! Atiende una conexión a la vez en el mismo proceso. Un cliente lento o
//! un script CGI que no termina bloquean a todos los demás.

use crate::config::ServerContext;
use crate::handler::handle_request;
use crate::http::Request;
use anyhow::{Context, Result};
use std::net::TcpListener;
use tracing::debug;

/// Ciclo accept → handle → release
///
/// Solo retorna si `accept` falla.
pub fn serve(listener: &TcpListener, ctx: &ServerContext) -> Result<()> {
    loop {
        let mut request = Request::accept(listener).context("failed to accept connection")?;
        let status = handle_request(&mut request, ctx);
        request.finish();
        debug!("Request terminado con {}", status);
    }
}
