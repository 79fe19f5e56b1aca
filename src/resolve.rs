//! # Resolución de paths
//! src/resolve.rs
//!
//! Traduce la URI de un request a un path absoluto bajo el root.
//!
//! El root se canonicaliza una sola vez al crear el resolver. Cada URI se
//! decodifica, se une al root y se canonicaliza (symlinks y `..` incluidos);
//! el resultado tiene que ser descendiente del root canónico. Esta es la
//! única defensa contra path traversal y se evalúa sobre el path ya
//! resuelto, nunca sobre la URI cruda.

use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Errores de resolución. Ambos terminan en 404.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// El path no existe, es un symlink roto o no se puede atravesar
    NotFound,

    /// El path canónico queda fuera del root
    OutsideRoot,
}

impl std::fmt::Display for ResolveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolveError::NotFound => write!(f, "Path not found"),
            ResolveError::OutsideRoot => write!(f, "Path escapes document root"),
        }
    }
}

impl std::error::Error for ResolveError {}

/// Resolver atado a un root canónico
#[derive(Debug, Clone)]
pub struct PathResolver {
    root: PathBuf,
}

impl PathResolver {
    /// Canonicaliza `root`. Falla si el directorio no existe.
    pub fn new(root: impl AsRef<Path>) -> io::Result<Self> {
        let root = root.as_ref().canonicalize()?;
        Ok(Self { root })
    }

    /// Root canónico (el `DOCUMENT_ROOT` de los scripts CGI)
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resuelve una URI a un path canónico dentro del root
    ///
    /// # Ejemplo
    /// ```no_run
    /// use rootd::resolve::{PathResolver, ResolveError};
    ///
    /// let resolver = PathResolver::new("/srv/www").unwrap();
    /// let result = resolver.resolve("/../../etc/passwd");
    /// assert!(matches!(result, Err(ResolveError::OutsideRoot) | Err(ResolveError::NotFound)));
    /// ```
    pub fn resolve(&self, uri: &str) -> Result<PathBuf, ResolveError> {
        let decoded = percent_decode(uri).ok_or(ResolveError::NotFound)?;
        let candidate = self.root.join(decoded.trim_start_matches('/'));

        let canonical = candidate.canonicalize().map_err(|e| {
            debug!("No se pudo canonicalizar {}: {}", candidate.display(), e);
            ResolveError::NotFound
        })?;

        if !canonical.starts_with(&self.root) {
            warn!(
                "URI {} resuelve fuera del root: {}",
                uri,
                canonical.display()
            );
            return Err(ResolveError::OutsideRoot);
        }

        debug!("HTTP REQUEST PATH: {}", canonical.display());
        Ok(canonical)
    }

    /// Indica si `path` es el root mismo
    pub fn is_root(&self, path: &Path) -> bool {
        path == self.root
    }
}

/// Decodifica secuencias `%XX`. `None` si quedan bytes inválidos o no UTF-8.
fn percent_decode(input: &str) -> Option<String> {
    let bytes = input.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = input.get(i + 1..i + 3)?;
            if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
                return None;
            }
            decoded.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            decoded.push(bytes[i]);
            i += 1;
        }
    }

    String::from_utf8(decoded).ok()
}
