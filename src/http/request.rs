//! # Parsing de Requests HTTP/1.0
//! src/http/request.rs
//!
//! Este módulo implementa el parser HTTP/1.0 y el `Request` que vive
//! durante toda la atención de una conexión.
//!
//! ## Formato de un Request HTTP/1.0
//!
//! ```text
//! GET /scripts/env.sh?q=foo HTTP/1.0\r\n
//! Host: localhost:9898\r\n
//! User-Agent: curl/7.68.0\r\n
//! \r\n
//! ```
//!
//! ## Componentes
//!
//! 1. **Request Line**: `METHOD /uri[?query] [HTTP/VERSION]`
//! 2. **Headers**: Pares `Name: Value` (uno por línea)
//! 3. **Empty Line**: `\r\n` que termina los headers
//!
//! El body nunca se lee: ni los archivos ni los scripts CGI lo reciben.

use super::HeaderStore;
use std::io::{self, BufRead, BufReader, Read};
use std::net::{Shutdown, SocketAddr, TcpListener, TcpStream};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Largo máximo de una línea (request line o header), sin contar `\r\n`
pub const MAX_LINE_LEN: usize = 8192;

/// Espera máxima por cada lectura al descartar datos sin leer
const DRAIN_READ_TIMEOUT: Duration = Duration::from_millis(100);

/// Tiempo total y bytes máximos que se descartan al cerrar
const DRAIN_DEADLINE: Duration = Duration::from_secs(1);
const DRAIN_MAX_BYTES: usize = 1 << 20;

/// Errores que pueden ocurrir durante el parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// El cliente cerró la conexión antes de mandar la request line
    NoRequestLine,

    /// Request line vacía
    MissingMethod,

    /// Request line sin target
    MissingTarget,

    /// El target no empieza con `/`
    InvalidTarget(String),

    /// Header sin `:`, con nombre vacío o con valor vacío
    MalformedHeader(String),

    /// Línea más larga que `MAX_LINE_LEN`
    LineTooLong,

    /// Error de lectura del socket o bytes que no son UTF-8
    Read(String),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::NoRequestLine => write!(f, "No request line"),
            ParseError::MissingMethod => write!(f, "Missing request method"),
            ParseError::MissingTarget => write!(f, "Missing request target"),
            ParseError::InvalidTarget(t) => write!(f, "Invalid request target: {}", t),
            ParseError::MalformedHeader(h) => write!(f, "Malformed header: {}", h),
            ParseError::LineTooLong => write!(f, "Line exceeds {} bytes", MAX_LINE_LEN),
            ParseError::Read(e) => write!(f, "Failed to read request: {}", e),
        }
    }
}

impl std::error::Error for ParseError {}

/// Lo que el parser extrae del stream: request line y headers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestHead {
    pub method: String,
    pub uri: String,
    pub query: Option<String>,
    pub headers: HeaderStore,
}

impl RequestHead {
    /// Parsea un request desde cualquier `BufRead` posicionado al inicio
    ///
    /// # Ejemplo
    ///
    /// ```
    /// use rootd::http::request::RequestHead;
    ///
    /// let mut raw: &[u8] = b"GET /index.html?lang=es HTTP/1.0\r\nHost: x\r\n\r\n";
    /// let head = RequestHead::read_from(&mut raw).unwrap();
    ///
    /// assert_eq!(head.uri, "/index.html");
    /// assert_eq!(head.query.as_deref(), Some("lang=es"));
    /// ```
    pub fn read_from<R: BufRead>(reader: &mut R) -> Result<Self, ParseError> {
        // 1. Request line
        let line = read_line(reader)?.ok_or(ParseError::NoRequestLine)?;
        let (method, uri, query) = parse_request_line(&line)?;

        // 2. Headers hasta línea vacía o fin del stream
        let headers = parse_headers(reader)?;

        Ok(Self {
            method,
            uri,
            query,
            headers,
        })
    }
}

/// Lee una línea sin el `\r\n` final. `None` si el stream ya terminó.
fn read_line<R: BufRead>(reader: &mut R) -> Result<Option<String>, ParseError> {
    let mut buffer = Vec::new();
    let limit = MAX_LINE_LEN as u64 + 2;
    let n = reader
        .by_ref()
        .take(limit)
        .read_until(b'\n', &mut buffer)
        .map_err(|e| ParseError::Read(e.to_string()))?;

    if n == 0 {
        return Ok(None);
    }

    // El límite se aplica al contenido, sin `\n` ni `\r\n`
    if buffer.last() == Some(&b'\n') {
        buffer.pop();
        if buffer.last() == Some(&b'\r') {
            buffer.pop();
        }
    }
    if buffer.len() > MAX_LINE_LEN {
        return Err(ParseError::LineTooLong);
    }

    String::from_utf8(buffer)
        .map(Some)
        .map_err(|_| ParseError::Read("invalid UTF-8".to_string()))
}

/// Formato: `GET /path?query HTTP/1.0`. La versión es opcional.
fn parse_request_line(line: &str) -> Result<(String, String, Option<String>), ParseError> {
    let mut parts = line.split_whitespace();

    let method = parts.next().ok_or(ParseError::MissingMethod)?;
    let target = parts.next().ok_or(ParseError::MissingTarget)?;
    if !target.starts_with('/') {
        return Err(ParseError::InvalidTarget(target.to_string()));
    }

    let (uri, query) = match target.split_once('?') {
        Some((uri, query)) => (uri, Some(query.to_string())),
        None => (target, None),
    };

    debug!("HTTP METHOD: {}", method);
    debug!("HTTP URI:    {}", uri);
    debug!("HTTP QUERY:  {:?}", query);

    Ok((method.to_string(), uri.to_string(), query))
}

/// Cada header tiene formato: "Name: Value"
fn parse_headers<R: BufRead>(reader: &mut R) -> Result<HeaderStore, ParseError> {
    let mut headers = HeaderStore::new();

    // Un cliente que corta sin mandar la línea vacía no es un error
    while let Some(line) = read_line(reader)? {
        if line.trim().is_empty() {
            break;
        }

        let (name, value) = line
            .split_once(':')
            .ok_or_else(|| ParseError::MalformedHeader(line.clone()))?;
        if !headers.push(name, value) {
            return Err(ParseError::MalformedHeader(line));
        }
    }

    for header in headers.iter() {
        debug!("HTTP HEADER {} = {}", header.name(), header.value());
    }

    Ok(headers)
}

/// Un request en curso: la conexión aceptada más lo que se fue parseando
///
/// Se crea al aceptar, el parser completa método/URI/query/headers y el
/// resolver completa `path`. Al hacer drop se cierra la conexión.
#[derive(Debug)]
pub struct Request {
    stream: TcpStream,
    peer_host: String,
    peer_port: String,
    method: String,
    uri: String,
    query: Option<String>,
    path: Option<PathBuf>,
    headers: HeaderStore,
}

impl Request {
    /// Bloquea hasta que llega un cliente y crea su `Request`
    pub fn accept(listener: &TcpListener) -> io::Result<Self> {
        let (stream, peer) = listener.accept()?;
        let request = Self::new(stream, peer);
        info!(
            "Conexión aceptada desde {}:{}",
            request.peer_host, request.peer_port
        );
        Ok(request)
    }

    fn new(stream: TcpStream, peer: SocketAddr) -> Self {
        Self {
            stream,
            peer_host: peer.ip().to_string(),
            peer_port: peer.port().to_string(),
            method: String::new(),
            uri: String::new(),
            query: None,
            path: None,
            headers: HeaderStore::new(),
        }
    }

    /// Lee y parsea request line y headers desde la conexión
    pub fn parse(&mut self) -> Result<(), ParseError> {
        let head = {
            let mut reader = BufReader::new(&self.stream);
            RequestHead::read_from(&mut reader)?
        };

        self.method = head.method;
        self.uri = head.uri;
        self.query = head.query;
        self.headers = head.headers;
        Ok(())
    }

    /// Registra el path ya resuelto (y validado) en el filesystem
    pub fn set_path(&mut self, path: PathBuf) {
        self.path = Some(path);
    }

    // === Métodos públicos para acceder a los campos ===

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn headers(&self) -> &HeaderStore {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    pub fn peer_host(&self) -> &str {
        &self.peer_host
    }

    pub fn peer_port(&self) -> &str {
        &self.peer_port
    }

    /// Socket del cliente, para escribir la respuesta
    pub fn stream(&mut self) -> &mut TcpStream {
        &mut self.stream
    }

    /// Cierra la escritura y descarta lo que el cliente mandó sin que se
    /// leyera (por ejemplo el body de un POST)
    ///
    /// Con datos pendientes en el buffer de recepción el kernel cierra con
    /// RST y el cliente puede perder el final de la respuesta. Solo lo llama
    /// el proceso que atendió el request.
    pub fn finish(&mut self) {
        if let Err(e) = self.stream.shutdown(Shutdown::Write) {
            debug!("shutdown de {}:{} falló: {}", self.peer_host, self.peer_port, e);
            return;
        }
        if let Err(e) = self.stream.set_read_timeout(Some(DRAIN_READ_TIMEOUT)) {
            debug!("No se pudo configurar el timeout de lectura: {}", e);
            return;
        }

        let deadline = Instant::now() + DRAIN_DEADLINE;
        let mut buffer = [0u8; 8192];
        let mut drained = 0;
        while drained < DRAIN_MAX_BYTES && Instant::now() < deadline {
            match self.stream.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => drained += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(_) => break,
            }
        }

        if drained > 0 {
            debug!(
                "{} bytes sin leer descartados de {}:{}",
                drained, self.peer_host, self.peer_port
            );
        }
    }
}

impl Drop for Request {
    fn drop(&mut self) {
        // Solo se cierra el descriptor; un shutdown() cortaría también la
        // copia del proceso hijo en modo forking.
        debug!(
            "Liberando request de {}:{}",
            self.peer_host, self.peer_port
        );
    }
}
