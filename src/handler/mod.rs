//! # Dispatcher de requests
//! src/handler/mod.rs
//!
//! Reemplaza el routing por tabla: el handler se elige según lo que hay
//! en el filesystem en el path resuelto.
//!
//! ```text
//! Request → parse → resolve → classify → { CGI | File | Directory }
//!                                       ↘ Error (400 / 404 / 500)
//! ```
//!
//! Un archivo regular ejecutable por el proceso es CGI, cualquier otro
//! archivo regular es estático, un directorio se lista y todo lo demás
//! (sockets, FIFOs, dispositivos) es 404.

pub mod cgi;
pub mod directory;
pub mod error;
pub mod file;

use crate::config::ServerContext;
use crate::error::RequestError;
use crate::http::{Request, StatusCode};
use nix::unistd::{access, AccessFlags};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

pub use error::handle_error;

/// Qué tipo de recurso hay en un path resuelto
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Cgi,
    File,
    Directory,
}

/// Clasifica `path` con `stat(2)` y `access(2)`
pub fn classify(path: &Path) -> Result<ResourceKind, RequestError> {
    let metadata = fs::metadata(path)
        .map_err(|e| RequestError::NotFound(format!("{}: {}", path.display(), e)))?;

    if metadata.is_dir() {
        Ok(ResourceKind::Directory)
    } else if metadata.is_file() {
        if access(path, AccessFlags::X_OK).is_ok() {
            Ok(ResourceKind::Cgi)
        } else {
            Ok(ResourceKind::File)
        }
    } else {
        Err(RequestError::NotFound(format!(
            "{}: unsupported file type",
            path.display()
        )))
    }
}

/// Atiende un request ya parseado y resuelto
///
/// Falla con `NotFound` si el request todavía no tiene path.
pub fn dispatch(request: &mut Request, ctx: &ServerContext) -> Result<(), RequestError> {
    let path = request
        .path()
        .map(Path::to_path_buf)
        .ok_or_else(|| RequestError::NotFound("request has no resolved path".to_string()))?;

    let kind = classify(&path)?;
    debug!("HTTP REQUEST TYPE: {:?}", kind);

    match kind {
        ResourceKind::Cgi => cgi::handle(request, ctx, &path),
        ResourceKind::File => file::handle(request.stream(), &path, ctx.mimetypes()),
        ResourceKind::Directory => {
            let uri = request.uri().to_string();
            let at_root = ctx.resolver().is_root(&path);
            directory::handle(request.stream(), &path, &uri, at_root)
        }
    }
}

/// Ciclo completo de un request: parse, resolve, dispatch y página de
/// error si hace falta. Retorna el status que recibió el cliente.
pub fn handle_request(request: &mut Request, ctx: &ServerContext) -> StatusCode {
    let status = match process(request, ctx) {
        Ok(()) => StatusCode::Ok,
        Err(e) => {
            warn!("{}: {}", describe(request), e);
            if e.needs_error_page() {
                handle_error(request.stream(), e.status())
            } else {
                e.status()
            }
        }
    };

    info!("{} -> {}", describe(request), status);
    status
}

/// `host:puerto`, más método y URI si la request line llegó a parsearse
fn describe(request: &Request) -> String {
    let peer = format!("{}:{}", request.peer_host(), request.peer_port());
    if request.method().is_empty() {
        peer
    } else {
        format!("{} {} {}", peer, request.method(), request.uri())
    }
}

fn process(request: &mut Request, ctx: &ServerContext) -> Result<(), RequestError> {
    request.parse()?;
    let path = ctx.resolver().resolve(request.uri())?;
    request.set_path(path);
    dispatch(request, ctx)
}
