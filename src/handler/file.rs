//! # Handler de archivos estáticos
//! src/handler/file.rs
//!
//! Transmite el archivo completo con `200 OK` y el `Content-Type` que da
//! la tabla de mimetypes. No hay soporte de rangos.

use crate::error::RequestError;
use crate::http::{Response, StatusCode};
use crate::mime::MimeTypes;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use tracing::debug;

pub fn handle<W: Write>(
    out: &mut W,
    path: &Path,
    mimetypes: &MimeTypes,
) -> Result<(), RequestError> {
    let mut file = File::open(path)
        .map_err(|e| RequestError::NotFound(format!("{}: {}", path.display(), e)))?;

    let mimetype = mimetypes.lookup(path).map_err(|e| {
        RequestError::Internal(format!(
            "cannot read mimetype table {}: {}",
            mimetypes.table_path().display(),
            e
        ))
    })?;

    Response::new(StatusCode::Ok)
        .with_header("Content-Type", &mimetype)
        .write_head(out)
        .map_err(RequestError::Disconnected)?;

    let sent = io::copy(&mut file, out).map_err(RequestError::Disconnected)?;
    out.flush().map_err(RequestError::Disconnected)?;

    debug!("{} bytes enviados desde {} ({})", sent, path.display(), mimetype);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TempRoot;

    fn mimetypes(root: &TempRoot) -> MimeTypes {
        let table = root.file("mime.types", "text/html html htm\ntext/plain txt\n");
        MimeTypes::new(table, "application/octet-stream")
    }

    #[test]
    fn test_streams_file_with_mimetype() {
        let root = TempRoot::new("file-html");
        let path = root.file("www/index.html", "hello");
        let mut out = Vec::new();

        handle(&mut out, &path, &mimetypes(&root)).unwrap();

        assert_eq!(
            out,
            b"HTTP/1.0 200 OK\r\nContent-Type: text/html\r\n\r\nhello"
        );
    }

    #[test]
    fn test_unknown_extension_uses_default() {
        let root = TempRoot::new("file-default");
        let path = root.file("www/blob.xyz", "\u{1}\u{2}");
        let mut out = Vec::new();

        handle(&mut out, &path, &mimetypes(&root)).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Content-Type: application/octet-stream\r\n"));
        assert!(text.ends_with("\r\n\r\n\u{1}\u{2}"));
    }

    #[test]
    fn test_large_file_is_sent_whole() {
        let root = TempRoot::new("file-large");
        let contents = "0123456789".repeat(100_000);
        let path = root.file("www/big.txt", &contents);
        let mut out = Vec::new();

        handle(&mut out, &path, &mimetypes(&root)).unwrap();

        assert!(out.ends_with(contents.as_bytes()));
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let root = TempRoot::new("file-missing");
        let mut out = Vec::new();

        let err = handle(&mut out, &root.path().join("nope.txt"), &mimetypes(&root)).unwrap_err();

        assert_eq!(err.status(), StatusCode::NotFound);
        assert!(out.is_empty());
    }

    #[test]
    fn test_unreadable_mime_table_is_internal_error() {
        let root = TempRoot::new("file-no-table");
        let path = root.file("index.html", "hello");
        let mimetypes = MimeTypes::new(root.path().join("missing.types"), "text/plain");
        let mut out = Vec::new();

        let err = handle(&mut out, &path, &mimetypes).unwrap_err();

        assert_eq!(err.status(), StatusCode::InternalServerError);
        assert!(out.is_empty());
    }
}
