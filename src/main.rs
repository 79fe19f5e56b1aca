//! # rootd - Entry Point
//! src/main.rs
//!
//! Lee la configuración, abre el socket y delega en la estrategia de
//! concurrencia elegida. Cualquier error fatal termina con código 1.

use clap::Parser;
use rootd::config::Config;
use rootd::server::Server;
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .init();

    let config = Config::parse();
    if let Err(e) = config.validate() {
        error!("Configuración inválida: {}", e);
        std::process::exit(1);
    }
    config.log_summary();

    let server = match Server::new(config) {
        Ok(server) => server,
        Err(e) => {
            error!("{:#}", e);
            std::process::exit(1);
        }
    };

    let mimetypes = server.context().mimetypes();
    if let Err(e) = mimetypes.check_table() {
        warn!(
            "No se puede leer la tabla de mimetypes {}: {} (los archivos con extensión responderán 500)",
            mimetypes.table_path().display(),
            e
        );
    }

    if let Err(e) = server.run() {
        error!("Error fatal: {:#}", e);
        std::process::exit(1);
    }
}
