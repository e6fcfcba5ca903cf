//! # Servidor TCP de Archivos Estáticos
//! src/server/tcp.rs
//!
//! Accept loop del servidor: cada conexión se atiende en su propio
//! thread, que lee el request, resuelve el archivo contra el content
//! root y escribe la respuesta con las cabeceras CORS configuradas.
//!
//! El listener se pone en modo no bloqueante para que el loop pueda
//! observar el flag de apagado entre accepts; con Ctrl+C el servidor
//! deja de aceptar conexiones y `run()` retorna limpiamente.

use crate::config::{CorsPolicy, ServerConfig};
use crate::files;
use crate::http::{Method, ParseError, Request, Response, StatusCode};
use std::io::{self, ErrorKind, Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Intervalo de sondeo del flag de apagado cuando no hay conexiones
const ACCEPT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Errores de arranque del servidor
///
/// Ambos casos terminan el proceso con un mensaje específico; un content
/// root ausente se detecta ANTES de intentar el bind del puerto.
#[derive(Debug)]
pub enum StartupError {
    /// El content root no existe (hay que correr `npm run build` antes)
    MissingRoot(PathBuf),

    /// No se pudo hacer bind del listener (puerto ocupado, permiso, etc.)
    Bind { address: String, source: io::Error },
}

impl std::fmt::Display for StartupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StartupError::MissingRoot(path) => {
                write!(f, "el directorio de contenido {} no existe", path.display())
            }
            StartupError::Bind { address, source } => {
                write!(f, "no se pudo escuchar en {}: {}", address, source)
            }
        }
    }
}

impl std::error::Error for StartupError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StartupError::MissingRoot(_) => None,
            StartupError::Bind { source, .. } => Some(source),
        }
    }
}

/// Servidor de archivos estáticos sobre TCP
pub struct Server {
    config: ServerConfig,
    listener: TcpListener,
    root: Arc<PathBuf>,
    shutdown: Arc<AtomicBool>,
}

impl Server {
    /// Verifica el content root y hace bind del listener
    ///
    /// Los dos perfiles validan el root antes del bind: si falta, el
    /// proceso termina sin haber ocupado el puerto.
    pub fn bind(config: ServerConfig) -> Result<Self, StartupError> {
        let root = config.content_root();
        if !root.is_dir() {
            return Err(StartupError::MissingRoot(root));
        }

        let address = config.address();
        let listener = TcpListener::bind(&address).map_err(|source| StartupError::Bind {
            address: address.clone(),
            source,
        })?;

        // No bloqueante: el accept loop necesita despertar para mirar
        // el flag de apagado
        listener
            .set_nonblocking(true)
            .map_err(|source| StartupError::Bind { address, source })?;

        Ok(Self {
            config,
            listener,
            root: Arc::new(root),
            shutdown: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Configuración con la que se construyó el servidor
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Dirección real del listener (útil con puerto 0 en tests)
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Flag compartido de apagado
    ///
    /// El handler de Ctrl+C (y los tests de integración) lo activan;
    /// el accept loop lo observa entre accepts.
    pub fn shutdown_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    /// Accept loop: corre hasta que el flag de apagado se active
    ///
    /// Cada conexión se procesa en su propio thread. Los errores por
    /// conexión se reportan por consola pero nunca tiran el servidor.
    pub fn run(&self) -> io::Result<()> {
        println!("[+] Servidor escuchando en {}", self.config.address());
        println!("[*] Modo concurrente: un thread por conexion\n");

        loop {
            if self.shutdown.load(Ordering::SeqCst) {
                println!("[*] Apagado solicitado, dejando de aceptar conexiones");
                break;
            }

            match self.listener.accept() {
                Ok((stream, peer_addr)) => {
                    let root = Arc::clone(&self.root);
                    let cors = self.config.cors.clone();

                    thread::spawn(move || {
                        if let Err(e) = Self::handle_connection(stream, peer_addr, root, cors) {
                            eprintln!("   ❌ Error en conexión de {}: {}", peer_addr, e);
                        }
                    });
                }
                Err(e) if e.kind() == ErrorKind::WouldBlock => {
                    thread::sleep(ACCEPT_POLL_INTERVAL);
                }
                Err(e) => {
                    eprintln!("   ❌ Error al aceptar conexión: {}", e);
                }
            }
        }

        Ok(())
    }

    /// Atiende una conexión: lee, parsea, resuelve y responde
    fn handle_connection(
        mut stream: TcpStream,
        peer_addr: SocketAddr,
        root: Arc<PathBuf>,
        cors: CorsPolicy,
    ) -> io::Result<()> {
        let start = Instant::now();

        // El stream aceptado no debe heredar el modo no bloqueante del listener
        stream.set_nonblocking(false)?;
        stream.set_read_timeout(Some(Duration::from_secs(5)))?;

        let mut buffer = [0u8; 8192];
        let bytes_read = stream.read(&mut buffer)?;

        if bytes_read == 0 {
            return Ok(());
        }

        let (mut response, request_line) = match Request::parse(&buffer[..bytes_read]) {
            Ok(request) => {
                let line = format!("{} {}", request.method().as_str(), request.path());
                let response = files::serve(&root, request.path());

                // HEAD: mismos headers, sin body
                let response = if request.method() == Method::HEAD {
                    response.into_head()
                } else {
                    response
                };
                (response, line)
            }
            Err(ParseError::UnsupportedMethod(m)) => (
                Response::error(
                    StatusCode::NotImplemented,
                    &format!("Unsupported method ('{}')", m),
                ),
                format!("{} -", m),
            ),
            Err(e) => (
                Response::error(StatusCode::BadRequest, &format!("Invalid request: {}", e)),
                "-".to_string(),
            ),
        };

        // Cabeceras comunes y CORS, incondicionales para TODA respuesta
        // (también en los 404 y las páginas de error)
        response.add_header("Server", "TriBridge-Static/0.1");
        response.add_header("Connection", "close");
        cors.apply(&mut response);

        stream.write_all(&response.to_bytes())?;
        stream.flush()?;

        let latency = start.elapsed();
        println!(
            "   {} {} → {} ({:.2}ms) [{}]",
            if response.status().is_success() { "✅" } else { "⚠️ " },
            request_line,
            response.status(),
            latency.as_secs_f64() * 1000.0,
            peer_addr,
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Cli;
    use clap::Parser;
    use std::fs::{self, File};
    use tempfile::TempDir;

    /// Helper: config del app server apuntando a un root temporal,
    /// puerto 0 para que el SO asigne uno libre
    fn test_config(root: &TempDir) -> ServerConfig {
        let mut config = ServerConfig::app(Cli::parse_from(["test"]));
        config.host = "127.0.0.1".to_string();
        config.port = 0;
        config.project_dir = root.path().to_path_buf();
        config.root = PathBuf::from("dist");
        config
    }

    fn make_bundle(root: &TempDir) {
        let dist = root.path().join("dist");
        fs::create_dir(&dist).unwrap();
        let mut index = File::create(dist.join("index.html")).unwrap();
        index.write_all(b"<h1>TriBridge</h1>").unwrap();
    }

    /// Helper: envía un request crudo y retorna la respuesta completa
    fn send_raw(addr: SocketAddr, raw: &str) -> String {
        let mut stream = TcpStream::connect(addr).expect("connect");
        stream.write_all(raw.as_bytes()).unwrap();
        stream.flush().unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).unwrap();
        response
    }

    #[test]
    fn test_bind_missing_root_fails_before_listening() {
        let root = TempDir::new().unwrap();
        // Sin dist/: el bind debe fallar con MissingRoot
        let result = Server::bind(test_config(&root));

        assert!(matches!(result, Err(StartupError::MissingRoot(_))));
        let message = result.err().unwrap().to_string();
        assert!(message.contains("no existe"));
    }

    #[test]
    fn test_get_existing_file_with_cors() {
        let root = TempDir::new().unwrap();
        make_bundle(&root);

        let server = Server::bind(test_config(&root)).unwrap();
        let addr = server.local_addr().unwrap();
        let shutdown = server.shutdown_handle();
        let handle = thread::spawn(move || server.run());

        let response = send_raw(addr, "GET /index.html HTTP/1.1\r\nHost: localhost\r\n\r\n");

        assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(response.contains("Access-Control-Allow-Origin: *\r\n"));
        assert!(response.contains("Content-Type: text/html\r\n"));
        assert!(response.ends_with("<h1>TriBridge</h1>"));

        shutdown.store(true, Ordering::SeqCst);
        handle.join().unwrap().unwrap();
    }

    #[test]
    fn test_404_still_has_cors() {
        let root = TempDir::new().unwrap();
        make_bundle(&root);

        let server = Server::bind(test_config(&root)).unwrap();
        let addr = server.local_addr().unwrap();
        let shutdown = server.shutdown_handle();
        let handle = thread::spawn(move || server.run());

        let response = send_raw(addr, "GET /does-not-exist.html HTTP/1.1\r\n\r\n");

        assert!(response.starts_with("HTTP/1.1 404 Not Found\r\n"));
        assert!(response.contains("Access-Control-Allow-Origin: *\r\n"));

        shutdown.store(true, Ordering::SeqCst);
        handle.join().unwrap().unwrap();
    }

    #[test]
    fn test_head_has_headers_but_no_body() {
        let root = TempDir::new().unwrap();
        make_bundle(&root);

        let server = Server::bind(test_config(&root)).unwrap();
        let addr = server.local_addr().unwrap();
        let shutdown = server.shutdown_handle();
        let handle = thread::spawn(move || server.run());

        let response = send_raw(addr, "HEAD /index.html HTTP/1.1\r\n\r\n");

        assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(response.contains("Content-Length: 18\r\n"));
        assert!(response.ends_with("\r\n\r\n"));

        shutdown.store(true, Ordering::SeqCst);
        handle.join().unwrap().unwrap();
    }

    #[test]
    fn test_unsupported_method_is_501_with_cors() {
        let root = TempDir::new().unwrap();
        make_bundle(&root);

        let server = Server::bind(test_config(&root)).unwrap();
        let addr = server.local_addr().unwrap();
        let shutdown = server.shutdown_handle();
        let handle = thread::spawn(move || server.run());

        let response = send_raw(addr, "POST /upload HTTP/1.1\r\n\r\n");

        assert!(response.starts_with("HTTP/1.1 501 Not Implemented\r\n"));
        assert!(response.contains("Access-Control-Allow-Origin: *\r\n"));

        shutdown.store(true, Ordering::SeqCst);
        handle.join().unwrap().unwrap();
    }

    #[test]
    fn test_shutdown_flag_stops_run() {
        let root = TempDir::new().unwrap();
        make_bundle(&root);

        let server = Server::bind(test_config(&root)).unwrap();
        let shutdown = server.shutdown_handle();
        let handle = thread::spawn(move || server.run());

        shutdown.store(true, Ordering::SeqCst);
        // run() debe retornar Ok en menos de un intervalo de sondeo
        handle.join().unwrap().unwrap();
    }
}
