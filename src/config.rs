//! # Configuración del Servidor
//! src/config.rs
//!
//! Opciones de línea de comandos (con variables de entorno como respaldo)
//! y el contexto inmutable que comparten todos los handlers.
//!
//! ## Ejemplos de uso
//!
//! ### CLI
//! ```bash
//! ./rootd --concurrency single \
//!   --mimetypes /etc/mime.types \
//!   --default-mimetype text/plain \
//!   --port 9898 \
//!   --root www
//! ```
//!
//! ### Variables de entorno
//! ```bash
//! HTTP_PORT=8080 HTTP_ROOT=/srv/www ./rootd
//! ```

use crate::mime::MimeTypes;
use crate::resolve::PathResolver;
use clap::{Parser, ValueEnum};
use std::io;
use std::path::PathBuf;
use tracing::info;

/// Estrategia para atender conexiones
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConcurrencyMode {
    /// Una conexión a la vez, en el mismo proceso
    Single,
    /// Un proceso hijo por conexión
    Forking,
}

impl std::fmt::Display for ConcurrencyMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConcurrencyMode::Single => write!(f, "single"),
            ConcurrencyMode::Forking => write!(f, "forking"),
        }
    }
}

/// Configuración del servidor HTTP/1.0
#[derive(Debug, Clone, Parser)]
#[command(name = "rootd")]
#[command(about = "Servidor HTTP/1.0 de archivos estáticos, directorios y CGI")]
#[command(version)]
pub struct Config {
    /// Modo de concurrencia
    #[arg(
        short = 'c',
        long,
        value_enum,
        default_value = "forking",
        env = "HTTP_CONCURRENCY"
    )]
    pub concurrency: ConcurrencyMode,

    /// Ruta de la tabla de mimetypes
    #[arg(
        short = 'm',
        long = "mimetypes",
        default_value = "/etc/mime.types",
        env = "HTTP_MIMETYPES"
    )]
    pub mimetypes_path: PathBuf,

    /// Mimetype para archivos sin extensión conocida
    #[arg(
        short = 'M',
        long = "default-mimetype",
        default_value = "text/plain",
        env = "HTTP_DEFAULT_MIMETYPE"
    )]
    pub default_mimetype: String,

    /// Puerto en el que escucha el servidor
    #[arg(short, long, default_value = "9898", env = "HTTP_PORT")]
    pub port: u16,

    /// Directorio raíz de documentos
    #[arg(short, long, default_value = "www", env = "HTTP_ROOT")]
    pub root: PathBuf,

    /// Host/IP en el que escucha
    #[arg(long, default_value = "0.0.0.0", env = "HTTP_HOST")]
    pub host: String,
}

impl Config {
    /// Dirección completa para bind
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Valida la configuración
    pub fn validate(&self) -> Result<(), String> {
        if self.port == 0 {
            return Err("Port must be between 1 and 65535".to_string());
        }

        if self.host.trim().is_empty() {
            return Err("Host must not be empty".to_string());
        }

        if self.default_mimetype.trim().is_empty() {
            return Err("Default mimetype must not be empty".to_string());
        }
        if !self.default_mimetype.contains('/') {
            return Err(format!(
                "Default mimetype '{}' must have the form type/subtype",
                self.default_mimetype
            ));
        }

        if self.root.as_os_str().is_empty() {
            return Err("Root path must not be empty".to_string());
        }

        Ok(())
    }

    /// Registra un resumen de la configuración
    pub fn log_summary(&self) {
        info!("Address:          {}", self.address());
        info!("Concurrency:      {}", self.concurrency);
        info!("Root:             {}", self.root.display());
        info!("Mimetypes:        {}", self.mimetypes_path.display());
        info!("Default mimetype: {}", self.default_mimetype);
    }
}

impl Default for Config {
    /// Configuración por defecto
    fn default() -> Self {
        Self {
            concurrency: ConcurrencyMode::Forking,
            mimetypes_path: PathBuf::from("/etc/mime.types"),
            default_mimetype: "text/plain".to_string(),
            port: 9898,
            root: PathBuf::from("www"),
            host: "0.0.0.0".to_string(),
        }
    }
}

/// Contexto de solo lectura que reciben los handlers
///
/// Se construye una vez al arrancar. En modo forking cada hijo hereda su
/// propia copia.
#[derive(Debug, Clone)]
pub struct ServerContext {
    resolver: PathResolver,
    mimetypes: MimeTypes,
    port: u16,
}

impl ServerContext {
    pub fn new(resolver: PathResolver, mimetypes: MimeTypes, port: u16) -> Self {
        Self {
            resolver,
            mimetypes,
            port,
        }
    }

    /// Canonicaliza el root; falla si no existe
    pub fn from_config(config: &Config) -> io::Result<Self> {
        let resolver = PathResolver::new(&config.root).map_err(|e| {
            io::Error::new(
                e.kind(),
                format!("root {}: {}", config.root.display(), e),
            )
        })?;
        let mimetypes = MimeTypes::new(&config.mimetypes_path, config.default_mimetype.as_str());

        Ok(Self::new(resolver, mimetypes, config.port))
    }

    pub fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    pub fn mimetypes(&self) -> &MimeTypes {
        &self.mimetypes
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}
