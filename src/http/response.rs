//! # Construcción de Respuestas HTTP
//!
//! API para armar respuestas HTTP/1.0 y escribirlas en el socket.
//!
//! ## Formato de una respuesta HTTP/1.0
//!
//! ```text
//! HTTP/1.0 200 OK\r\n
//! Content-Type: text/html\r\n
//! \r\n
//! <html>...</html>
//! ```
//!
//! Los handlers que transmiten archivos o la salida de un script escriben
//! solo la cabecera con [`Response::write_head`] y después copian el body
//! directamente al socket, sin cargarlo en memoria.
//!
//! ## Ejemplo de uso
//!
//! ```
//! use rootd::http::{Response, StatusCode};
//!
//! let response = Response::new(StatusCode::Ok)
//!     .with_header("Content-Type", "text/plain")
//!     .with_body("hello");
//!
//! let bytes = response.to_bytes();
//! assert_eq!(bytes, b"HTTP/1.0 200 OK\r\nContent-Type: text/plain\r\n\r\nhello");
//! ```

use super::StatusCode;
use std::io::{self, Write};

/// Versión que se anuncia en la status line
pub const HTTP_VERSION: &str = "HTTP/1.0";

/// Representa una respuesta HTTP/1.0 completa
#[derive(Debug, Clone)]
pub struct Response {
    /// Código de estado HTTP (200, 404, etc.)
    status: StatusCode,

    /// Headers en el orden en que se escriben
    headers: Vec<(String, String)>,

    /// Cuerpo de la respuesta (puede ser vacío)
    body: Vec<u8>,
}

impl Response {
    /// Crea una nueva respuesta sin headers ni body
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    /// Agrega un header al final
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// Establece el cuerpo de la respuesta desde un string
    pub fn with_body(mut self, body: &str) -> Self {
        self.body = body.as_bytes().to_vec();
        self
    }

    /// Respuesta HTML (`Content-Type: text/html`)
    pub fn html(status: StatusCode, body: &str) -> Self {
        Self::new(status)
            .with_header("Content-Type", "text/html")
            .with_body(body)
    }

    /// Página de error mínima con la frase de razón del código
    ///
    /// # Ejemplo
    /// ```
    /// use rootd::http::{Response, StatusCode};
    ///
    /// let response = Response::error_page(StatusCode::NotFound);
    /// let text = String::from_utf8(response.to_bytes()).unwrap();
    /// assert!(text.starts_with("HTTP/1.0 404 Not Found\r\n"));
    /// assert!(text.contains("<h1>Not Found</h1>"));
    /// ```
    pub fn error_page(status: StatusCode) -> Self {
        let body = format!(
            "<html>\n<head><title>{status}</title></head>\n<body>\n<h1>{reason}</h1>\n</body>\n</html>\n",
            status = status,
            reason = status.reason_phrase()
        );
        Self::html(status, &body)
    }

    /// Status line, headers y línea vacía
    pub fn head_bytes(&self) -> Vec<u8> {
        let mut result = Vec::new();

        // 1. Status line: HTTP/1.0 200 OK\r\n
        result.extend_from_slice(format!("{} {}\r\n", HTTP_VERSION, self.status).as_bytes());

        // 2. Headers: Header-Name: Value\r\n
        for (name, value) in &self.headers {
            result.extend_from_slice(format!("{}: {}\r\n", name, value).as_bytes());
        }

        // 3. Línea vacía que separa headers del body
        result.extend_from_slice(b"\r\n");
        result
    }

    /// Convierte la respuesta completa a bytes
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut result = self.head_bytes();
        result.extend_from_slice(&self.body);
        result
    }

    /// Escribe solo la cabecera; el llamador transmite el body
    pub fn write_head<W: Write>(&self, out: &mut W) -> io::Result<()> {
        out.write_all(&self.head_bytes())
    }

    /// Escribe la respuesta completa y hace flush
    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        out.write_all(&self.to_bytes())?;
        out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_response() {
        let response = Response::new(StatusCode::NotFound);
        assert_eq!(response.to_bytes(), b"HTTP/1.0 404 Not Found\r\n\r\n");
    }

    #[test]
    fn test_head_bytes() {
        let response = Response::new(StatusCode::Ok).with_header("Content-Type", "image/png");
        assert_eq!(
            response.head_bytes(),
            b"HTTP/1.0 200 OK\r\nContent-Type: image/png\r\n\r\n"
        );
    }

    #[test]
    fn test_error_page() {
        for status in [
            StatusCode::BadRequest,
            StatusCode::NotFound,
            StatusCode::InternalServerError,
        ] {
            let response = Response::error_page(status);
            let text = String::from_utf8(response.to_bytes()).unwrap();

            assert!(text.starts_with(&format!("HTTP/1.0 {}\r\n", status)));
            assert!(text.contains("Content-Type: text/html\r\n"));
            assert!(text.contains(status.reason_phrase()));
        }
    }

    #[test]
    fn test_write_to() {
        let mut out = Vec::new();
        Response::html(StatusCode::Ok, "<p>hi</p>")
            .write_to(&mut out)
            .unwrap();

        assert_eq!(
            out,
            b"HTTP/1.0 200 OK\r\nContent-Type: text/html\r\n\r\n<p>hi</p>"
        );
    }
}
