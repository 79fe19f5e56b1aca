//! # rootd
//! src/lib.rs
//!
//! Servidor HTTP/1.0 mínimo que expone un directorio raíz: archivos
//! estáticos, listados de directorios y scripts CGI.
//!
//! ## Arquitectura
//!
//! - `http`: parsing de requests, headers, responses y status codes
//! - `resolve`: traducción URI → path con chequeo de contención en el root
//! - `handler`: dispatcher y handlers (archivo, directorio, CGI, error)
//! - `mime`: lookup de mimetypes en una tabla estilo `/etc/mime.types`
//! - `server`: socket de escucha y estrategias de concurrencia
//! - `config`: opciones de CLI y contexto compartido
//! - `error`: errores por request y su código HTTP
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use rootd::config::Config;
//! use rootd::server::Server;
//!
//! let config = Config::default();
//! let server = Server::new(config).expect("root inexistente");
//! server.run().expect("Error al iniciar servidor");
//! ```

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod mime;
pub mod resolve;
pub mod server;

#[cfg(test)]
mod testing;
