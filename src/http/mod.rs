//! # Módulo HTTP
//!
//! Este módulo implementa la parte de protocolo HTTP/1.0 del servidor:
//!
//! - Parsing de requests (request line + headers)
//! - Almacenamiento ordenado de headers
//! - Construcción de responses
//! - Manejo de status codes
//!
//! ## Especificación HTTP/1.0
//!
//! El protocolo HTTP/1.0 (RFC 1945) es más simple que HTTP/1.1:
//! - No requiere el header `Host`
//! - No tiene chunked transfer encoding
//! - Una conexión atiende un único request y se cierra
//!
//! ### Formato de Request
//!
//! ```text
//! GET /path?query=value HTTP/1.0\r\n
//! Header-Name: Header-Value\r\n
//! \r\n
//! ```
//!
//! ### Formato de Response
//!
//! ```text
//! HTTP/1.0 200 OK\r\n
//! Content-Type: text/html\r\n
//! \r\n
//! <html>...</html>
//! ```

pub mod headers;
pub mod request;
pub mod response;
pub mod status;

// Re-exportamos los tipos principales para facilitar su uso
pub use headers::{Header, HeaderStore};
pub use request::{ParseError, Request, RequestHead};
pub use response::Response;
pub use status::StatusCode;
