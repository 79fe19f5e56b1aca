//! # Handler de directorios
//! src/handler/directory.rs
//!
//! Lista el contenido de un directorio como una lista HTML de links.
//! Las entradas se ordenan lexicográficamente; `.` nunca aparece y `..`
//! aparece en todos los directorios excepto el root. Archivos y
//! subdirectorios se muestran igual.

use crate::error::RequestError;
use crate::http::{Response, StatusCode};
use std::ffi::{OsStr, OsString};
use std::fs;
use std::io::{self, Write};
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

pub fn handle<W: Write>(
    out: &mut W,
    dir: &Path,
    uri: &str,
    at_root: bool,
) -> Result<(), RequestError> {
    let entries = list_entries(dir, at_root)
        .map_err(|e| RequestError::NotFound(format!("{}: {}", dir.display(), e)))?;

    Response::html(StatusCode::Ok, &render_listing(uri, &entries))
        .write_to(out)
        .map_err(RequestError::Disconnected)
}

/// Nombres de las entradas, ordenados byte a byte
///
/// Se conservan los bytes originales: un nombre que no es UTF-8 sigue
/// apuntando al archivo real.
pub fn list_entries(dir: &Path, at_root: bool) -> io::Result<Vec<OsString>> {
    let mut names = Vec::new();
    if !at_root {
        names.push(OsString::from(".."));
    }

    for entry in fs::read_dir(dir)? {
        let name = entry?.file_name();
        if name.as_os_str() != OsStr::new(".") && name.as_os_str() != OsStr::new("..") {
            names.push(name);
        }
    }

    names.sort();
    Ok(names)
}

fn render_listing(uri: &str, entries: &[OsString]) -> String {
    let items: String = entries
        .iter()
        .map(|name| {
            format!(
                "<li><a href=\"{}\">{}</a></li>",
                html_escape(&entry_href(uri, name)),
                html_escape(&name.to_string_lossy())
            )
        })
        .collect();

    format!("<html><body><ul>{}</ul></body></html>", items)
}

/// Une la URI actual con la entrada, con exactamente una `/` entre ambas
fn entry_href(uri: &str, name: &OsStr) -> String {
    let encoded = url_encode(name.as_bytes());
    if uri.ends_with('/') {
        format!("{}{}", uri, encoded)
    } else {
        format!("{}/{}", uri, encoded)
    }
}

/// Codifica todo lo que no sea un carácter no reservado (RFC 3986)
fn url_encode(name: &[u8]) -> String {
    let mut encoded = String::with_capacity(name.len());
    for &byte in name {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.' | b'_' | b'~') {
            encoded.push(byte as char);
        } else {
            encoded.push_str(&format!("%{:02X}", byte));
        }
    }
    encoded
}

fn html_escape(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
