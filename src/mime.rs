//! # Tabla de mimetypes
//! src/mime.rs
//!
//! Determina el `Content-Type` de un archivo según su extensión, leyendo
//! una tabla con el formato de `/etc/mime.types`:
//!
//! ```text
//! # comentario
//! text/html                html htm
//! image/png                png
//! ```
//!
//! La primera regla que contiene la extensión gana. Sin extensión o sin
//! coincidencia se usa el mimetype por defecto.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Tabla de mimetypes más el valor por defecto
#[derive(Debug, Clone)]
pub struct MimeTypes {
    table_path: PathBuf,
    default: String,
}

impl MimeTypes {
    pub fn new(table_path: impl Into<PathBuf>, default: impl Into<String>) -> Self {
        Self {
            table_path: table_path.into(),
            default: default.into(),
        }
    }

    pub fn table_path(&self) -> &Path {
        &self.table_path
    }

    /// Mimetype para `path`
    ///
    /// La tabla se lee en cada llamada. Falla solo si no se puede leer.
    pub fn lookup(&self, path: &Path) -> io::Result<String> {
        let extension = match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if !ext.is_empty() => ext,
            _ => {
                debug!("Sin extensión, usando mimetype por defecto: {}", self.default);
                return Ok(self.default.clone());
            }
        };

        let table = BufReader::new(File::open(&self.table_path)?);
        for line in table.lines() {
            if let Some(mimetype) = match_line(&line?, extension) {
                debug!("Mimetype encontrado: {}", mimetype);
                return Ok(mimetype);
            }
        }

        debug!("Mimetype no encontrado, usando por defecto: {}", self.default);
        Ok(self.default.clone())
    }

    /// Verifica que la tabla se pueda abrir
    pub fn check_table(&self) -> io::Result<()> {
        File::open(&self.table_path).map(|_| ())
    }
}

/// Mimetype de la línea si alguna de sus extensiones coincide
fn match_line(line: &str, extension: &str) -> Option<String> {
    let mut fields = line.split_whitespace();
    let mimetype = fields.next()?;
    if mimetype.starts_with('#') {
        return None;
    }

    fields
        .any(|ext| ext == extension)
        .then(|| mimetype.to_string())
}
