//! # Handler CGI
//! src/handler/cgi.rs
//!
//! Ejecuta un archivo ejecutable del root y reenvía su stdout al cliente.
//! El servidor solo escribe la status line `HTTP/1.0 200 OK`; los headers
//! restantes (y la línea en blanco) son responsabilidad del script.
//!
//! El script se ejecuta directamente, sin shell intermedio, con el
//! ambiente del servidor más las meta-variables CGI del request.

use crate::config::ServerContext;
use crate::error::RequestError;
use crate::http::response::HTTP_VERSION;
use crate::http::{Request, StatusCode};
use std::io::{self, Write};
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::{debug, info, warn};

/// Headers del request que se exportan al script, con su variable
pub const FORWARDED_HEADERS: [(&str, &str); 6] = [
    ("Host", "HTTP_HOST"),
    ("Accept", "HTTP_ACCEPT"),
    ("Accept-Language", "HTTP_ACCEPT_LANGUAGE"),
    ("Accept-Encoding", "HTTP_ACCEPT_ENCODING"),
    ("Connection", "HTTP_CONNECTION"),
    ("User-Agent", "HTTP_USER_AGENT"),
];

pub fn handle(
    request: &mut Request,
    ctx: &ServerContext,
    script: &Path,
) -> Result<(), RequestError> {
    let env = environment(request, ctx, script);
    run(request.stream(), script, &env)
}

/// Meta-variables CGI para `request`
///
/// `QUERY_STRING` siempre está presente (vacía si no hubo query). Los
/// headers ausentes no generan variable.
pub fn environment(
    request: &Request,
    ctx: &ServerContext,
    script: &Path,
) -> Vec<(String, String)> {
    let mut env = vec![
        (
            "DOCUMENT_ROOT".to_string(),
            ctx.resolver().root().to_string_lossy().into_owned(),
        ),
        (
            "QUERY_STRING".to_string(),
            request.query().unwrap_or("").to_string(),
        ),
        ("REMOTE_ADDR".to_string(), request.peer_host().to_string()),
        ("REMOTE_PORT".to_string(), request.peer_port().to_string()),
        ("REQUEST_METHOD".to_string(), request.method().to_string()),
        ("REQUEST_URI".to_string(), request.uri().to_string()),
        (
            "SCRIPT_FILENAME".to_string(),
            script.to_string_lossy().into_owned(),
        ),
        ("SCRIPT_NAME".to_string(), request.uri().to_string()),
        ("SERVER_PORT".to_string(), ctx.port().to_string()),
    ];

    for (header, variable) in FORWARDED_HEADERS {
        if let Some(value) = request.header(header) {
            env.push((variable.to_string(), value.to_string()));
        }
    }

    env
}

/// Lanza `script` y copia su salida a `out`
///
/// Si el script no arranca no se escribe nada y el error es 404. Una vez
/// enviada la status line, un error de escritura mata al hijo; su código
/// de salida solo se registra.
pub fn run<W: Write>(
    out: &mut W,
    script: &Path,
    env: &[(String, String)],
) -> Result<(), RequestError> {
    let mut command = Command::new(script);
    command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit());
    for (name, value) in env {
        command.env(name, value);
    }
    if let Some(dir) = script.parent() {
        command.current_dir(dir);
    }

    let mut child = command.spawn().map_err(|e| {
        RequestError::NotFound(format!("cannot execute {}: {}", script.display(), e))
    })?;
    info!("CGI {} lanzado (pid {})", script.display(), child.id());

    let mut stdout = match child.stdout.take() {
        Some(stdout) => stdout,
        None => {
            let _ = child.kill();
            let _ = child.wait();
            return Err(RequestError::Internal("CGI stdout was not captured".to_string()));
        }
    };

    let status_line = format!("{} {}\r\n", HTTP_VERSION, StatusCode::Ok);
    let forwarded = out
        .write_all(status_line.as_bytes())
        .and_then(|_| io::copy(&mut stdout, out))
        .and_then(|sent| out.flush().map(|_| sent));
    drop(stdout);

    match forwarded {
        Ok(sent) => debug!("CGI {}: {} bytes reenviados", script.display(), sent),
        Err(e) => {
            let _ = child.kill();
            let _ = child.wait();
            return Err(RequestError::Disconnected(e));
        }
    }

    match child.wait() {
        Ok(status) if !status.success() => {
            warn!("CGI {} terminó con {}", script.display(), status)
        }
        Ok(_) => {}
        Err(e) => warn!("No se pudo esperar al CGI {}: {}", script.display(), e),
    }

    Ok(())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::mime::MimeTypes;
    use crate::resolve::PathResolver;
    use crate::testing::{parsed_request, TempRoot};

    fn context(root: &TempRoot) -> ServerContext {
        ServerContext::new(
            PathResolver::new(root.path()).unwrap(),
            MimeTypes::new("/etc/mime.types", "text/plain"),
            9898,
        )
    }

    fn lookup<'a>(env: &'a [(String, String)], name: &str) -> Option<&'a str> {
        env.iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_environment_variables() {
        let root = TempRoot::new("cgi-env");
        let script = root.script("env.sh", "#!/bin/sh\n");
        let ctx = context(&root);
        let (request, _client) = parsed_request(
            b"GET /env.sh?a=1&b=2 HTTP/1.0\r\nHost: example\r\nUser-Agent: curl\r\nX-Other: no\r\n\r\n",
        );

        let env = environment(&request, &ctx, &script);

        assert_eq!(lookup(&env, "QUERY_STRING"), Some("a=1&b=2"));
        assert_eq!(lookup(&env, "REQUEST_METHOD"), Some("GET"));
        assert_eq!(lookup(&env, "REQUEST_URI"), Some("/env.sh"));
        assert_eq!(lookup(&env, "SCRIPT_NAME"), Some("/env.sh"));
        assert_eq!(lookup(&env, "SERVER_PORT"), Some("9898"));
        assert_eq!(lookup(&env, "REMOTE_ADDR"), Some("127.0.0.1"));
        assert_eq!(lookup(&env, "HTTP_HOST"), Some("example"));
        assert_eq!(lookup(&env, "HTTP_USER_AGENT"), Some("curl"));
        assert_eq!(
            lookup(&env, "DOCUMENT_ROOT"),
            Some(ctx.resolver().root().to_str().unwrap())
        );
        assert_eq!(
            lookup(&env, "SCRIPT_FILENAME"),
            Some(script.to_str().unwrap())
        );
        assert!(lookup(&env, "HTTP_ACCEPT").is_none());
        assert!(lookup(&env, "HTTP_X_OTHER").is_none());
    }

    #[test]
    fn test_environment_without_query() {
        let root = TempRoot::new("cgi-no-query");
        let script = root.script("env.sh", "#!/bin/sh\n");
        let (request, _client) = parsed_request(b"GET /env.sh HTTP/1.0\r\n\r\n");

        let env = environment(&request, &context(&root), &script);

        assert_eq!(lookup(&env, "QUERY_STRING"), Some(""));
    }

    #[test]
    fn test_forwarded_header_names_are_case_insensitive() {
        let root = TempRoot::new("cgi-case");
        let script = root.script("env.sh", "#!/bin/sh\n");
        let (request, _client) =
            parsed_request(b"GET /env.sh HTTP/1.0\r\naccept-language: es\r\n\r\n");

        let env = environment(&request, &context(&root), &script);

        assert_eq!(lookup(&env, "HTTP_ACCEPT_LANGUAGE"), Some("es"));
    }

    #[test]
    fn test_run_forwards_output() {
        let root = TempRoot::new("cgi-run");
        let script = root.script(
            "hello.sh",
            "#!/bin/sh\nprintf 'Content-Type: text/plain\\r\\n\\r\\nhi %s' \"$REQUEST_METHOD\"\n",
        );
        let env = vec![("REQUEST_METHOD".to_string(), "GET".to_string())];
        let mut out = Vec::new();

        run(&mut out, &script, &env).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "HTTP/1.0 200 OK\r\nContent-Type: text/plain\r\n\r\nhi GET"
        );
    }

    #[test]
    fn test_run_nonzero_exit_keeps_output() {
        let root = TempRoot::new("cgi-exit");
        let script = root.script("fail.sh", "#!/bin/sh\necho partial\nexit 3\n");
        let mut out = Vec::new();

        run(&mut out, &script, &[]).unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "HTTP/1.0 200 OK\r\npartial\n");
    }

    #[test]
    fn test_run_unlaunchable_writes_nothing() {
        let root = TempRoot::new("cgi-missing");
        let mut out = Vec::new();

        let err = run(&mut out, &root.path().join("gone.sh"), &[]).unwrap_err();

        assert_eq!(err.status(), StatusCode::NotFound);
        assert!(out.is_empty());
    }
}
