//! # Servidor con un proceso por conexión
//! src/server/forking.rs
//!
//! El proceso padre solo acepta conexiones. Cada conexión aceptada se
//! atiende en un hijo creado con `fork(2)`, que termina al cerrar la
//! conexión y nunca vuelve al ciclo de accept.
//!
//! `SIGCHLD` se ignora en el padre, así el kernel recoge a los hijos
//! terminados y no quedan zombies sin un `wait` explícito. Los hijos
//! restauran la disposición por defecto antes de atender el request,
//! porque el handler CGI necesita esperar a sus propios procesos.

use crate::config::ServerContext;
use crate::handler::handle_request;
use crate::http::Request;
use anyhow::{Context, Result};
use nix::sys::signal::{signal, SigHandler, Signal};
use nix::unistd::{close, fork, ForkResult};
use std::net::TcpListener;
use std::os::unix::io::AsRawFd;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, error, warn};

/// Ciclo accept → fork → (hijo: handle y exit | padre: release)
///
/// Solo retorna si `accept`, `fork` o la configuración de señales fallan.
pub fn serve(listener: &TcpListener, ctx: &ServerContext) -> Result<()> {
    unsafe { signal(Signal::SIGCHLD, SigHandler::SigIgn) }
        .context("failed to ignore SIGCHLD")?;

    loop {
        let request = Request::accept(listener).context("failed to accept connection")?;

        match unsafe { fork() }.context("failed to fork process")? {
            ForkResult::Child => std::process::exit(run_child(listener, request, ctx)),
            ForkResult::Parent { child } => {
                debug!(
                    "Proceso {} atiende a {}:{}",
                    child,
                    request.peer_host(),
                    request.peer_port()
                );
                // La conexión ahora pertenece al hijo; el padre solo
                // cierra su descriptor.
                drop(request);
            }
        }
    }
}

/// Atiende el request en el hijo y retorna su código de salida
///
/// El hijo cierra su copia del socket de escucha: si queda colgado (un
/// CGI que no termina) el puerto se libera igual cuando el padre muere.
/// `listener` no se vuelve a usar en este proceso.
fn run_child(listener: &TcpListener, mut request: Request, ctx: &ServerContext) -> i32 {
    if let Err(e) = close(listener.as_raw_fd()) {
        warn!("No se pudo cerrar el socket de escucha en el hijo: {}", e);
    }
    if let Err(e) = unsafe { signal(Signal::SIGCHLD, SigHandler::SigDfl) } {
        warn!("No se pudo restaurar SIGCHLD en el hijo: {}", e);
    }

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        let status = handle_request(&mut request, ctx);
        request.finish();
        status
    }));
    drop(request);

    match outcome {
        Ok(status) => {
            debug!("Hijo {} terminó con {}", std::process::id(), status);
            0
        }
        Err(_) => {
            error!("Hijo {} abortó atendiendo el request", std::process::id());
            1
        }
    }
}
