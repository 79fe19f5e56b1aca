//! # hammer - Generador de carga
//! src/bin/hammer.rs
//!
//! Lanza varios workers que hacen GETs HTTP/1.0 secuenciales contra una
//! URL y reporta el tiempo de cada request, el promedio por worker y el
//! promedio total.
//!
//! ```bash
//! hammer -p 4 -r 10 http://localhost:9898/index.html
//! ```

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::io::{Read, Write};
use std::net::TcpStream;
use std::thread;
use std::time::Instant;
use url::Url;

/// Opciones del generador de carga
#[derive(Debug, Clone, Parser)]
#[command(name = "hammer")]
#[command(about = "Generador de carga HTTP/1.0 para rootd")]
struct Args {
    /// Número de workers concurrentes
    #[arg(short = 'p', long, default_value = "1")]
    processes: usize,

    /// Requests por worker
    #[arg(short = 'r', long, default_value = "1")]
    requests: usize,

    /// Muestra el body de cada respuesta
    #[arg(short = 'v', long)]
    verbose: bool,

    /// URL objetivo (solo http)
    url: String,
}

/// Destino ya validado de los requests
#[derive(Debug, Clone, PartialEq, Eq)]
struct Target {
    address: String,
    host_header: String,
    request_target: String,
}

impl Target {
    fn parse(raw: &str) -> Result<Self> {
        let url = Url::parse(raw).with_context(|| format!("invalid URL '{}'", raw))?;
        if url.scheme() != "http" {
            bail!("unsupported scheme '{}', only http is accepted", url.scheme());
        }

        let host = url
            .host_str()
            .with_context(|| format!("URL '{}' has no host", raw))?;
        let port = url.port_or_known_default().unwrap_or(80);

        let mut request_target = url.path().to_string();
        if let Some(query) = url.query() {
            request_target.push('?');
            request_target.push_str(query);
        }

        let host_header = match url.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        };

        Ok(Self {
            address: format!("{}:{}", host, port),
            host_header,
            request_target,
        })
    }

    fn request_bytes(&self) -> Vec<u8> {
        format!(
            "GET {} HTTP/1.0\r\nHost: {}\r\nUser-Agent: hammer/{}\r\n\r\n",
            self.request_target,
            self.host_header,
            env!("CARGO_PKG_VERSION")
        )
        .into_bytes()
    }

    /// Un request completo; retorna la respuesta cruda
    fn fetch(&self) -> Result<Vec<u8>> {
        let mut stream = TcpStream::connect(&self.address)
            .with_context(|| format!("failed to connect to {}", self.address))?;
        stream.write_all(&self.request_bytes())?;

        let mut response = Vec::new();
        stream.read_to_end(&mut response)?;
        Ok(response)
    }
}

fn body(response: &[u8]) -> &[u8] {
    response
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .map(|pos| &response[pos + 4..])
        .unwrap_or(&[])
}

/// Trabajo de un worker: retorna el tiempo promedio en segundos
fn worker(id: usize, target: &Target, requests: usize, verbose: bool) -> Result<f64> {
    let mut total = 0.0;

    for i in 0..requests {
        let start = Instant::now();
        let response = target.fetch()?;
        if verbose {
            println!("{}", String::from_utf8_lossy(body(&response)));
        }
        let elapsed = start.elapsed().as_secs_f64();
        total += elapsed;
        println!(
            "Process: {}, Request: {}, Elapsed Time: {:.2}",
            id, i, elapsed
        );
    }

    let average = total / requests as f64;
    println!("Process: {}, AVERAGE   , Elapsed Time: {:.2}", id, average);
    Ok(average)
}

fn run(args: Args) -> Result<f64> {
    if args.processes == 0 || args.requests == 0 {
        bail!("processes and requests must be >= 1");
    }
    let target = Target::parse(&args.url)?;

    let handles: Vec<_> = (0..args.processes)
        .map(|id| {
            let target = target.clone();
            let (requests, verbose) = (args.requests, args.verbose);
            thread::spawn(move || worker(id, &target, requests, verbose))
        })
        .collect();

    let mut sum = 0.0;
    for handle in handles {
        match handle.join() {
            Ok(average) => sum += average?,
            Err(_) => bail!("worker thread panicked"),
        }
    }

    Ok(sum / args.processes as f64)
}

fn main() {
    let args = Args::parse();
    match run(args) {
        Ok(average) => println!("TOTAL AVERAGE ELAPSED TIME: {:.2}", average),
        Err(e) => {
            eprintln!("hammer: {:#}", e);
            std::process::exit(1);
        }
    }
}
