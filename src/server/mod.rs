//! # Módulo del Servidor HTTP
//! src/server/mod.rs
//!
//! Une la configuración con una de las dos estrategias de concurrencia:
//!
//! - `single`: una conexión a la vez, en el proceso principal
//! - `forking`: un proceso hijo por conexión
//!
//! Ambas repiten accept → handle → release hasta que `accept` falla.

pub mod forking;
pub mod listener;
pub mod single;

pub use listener::socket_listen;

use crate::config::{ConcurrencyMode, Config, ServerContext};
use anyhow::{Context, Result};
use std::net::TcpListener;
use tracing::info;

/// Servidor HTTP/1.0 listo para escuchar
pub struct Server {
    config: Config,
    context: ServerContext,
}

impl Server {
    /// Construye el contexto compartido. Falla si el root no existe.
    pub fn new(config: Config) -> Result<Self> {
        let context = ServerContext::from_config(&config)
            .context("failed to open document root")?;
        Ok(Self { config, context })
    }

    pub fn context(&self) -> &ServerContext {
        &self.context
    }

    /// Abre el socket de escucha y atiende conexiones indefinidamente
    pub fn run(&self) -> Result<()> {
        let address = self.config.address();
        let listener = socket_listen(&address)
            .with_context(|| format!("failed to listen on {}", address))?;
        self.serve(&listener)
    }

    /// Atiende conexiones de un listener ya abierto
    pub fn serve(&self, listener: &TcpListener) -> Result<()> {
        info!(
            "Modo {} sirviendo {}",
            self.config.concurrency,
            self.context.resolver().root().display()
        );

        match self.config.concurrency {
            ConcurrencyMode::Single => single::serve(listener, &self.context),
            ConcurrencyMode::Forking => forking::serve(listener, &self.context),
        }
    }
}
