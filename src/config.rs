//! # Configuración del Servidor
//! src/config.rs
//!
//! Este módulo define la configuración de los dos servidores estáticos.
//! Los valores que antes eran constantes del programa (puerto, directorio
//! de contenido, cabeceras CORS) viven en una estructura inmutable que se
//! construye una sola vez al arrancar y se pasa al servidor; nada queda
//! como global ambiental.
//!
//! Cada binario tiene su propio perfil de defaults, y cualquier valor se
//! puede sobrescribir por CLI o variable de entorno.
//!
//! ## Ejemplos de uso
//!
//! ### CLI
//! ```bash
//! ./app_server --port 4000 --project-dir ~/proyectos/tribridge --root dist
//! ./demo_server --port 8765
//! ```
//!
//! ### Variables de entorno
//! ```bash
//! SERVE_PORT=9000 SERVE_PROJECT_DIR=/srv/tribridge ./app_server
//! ```

use crate::http::Response;
use clap::Parser;
use std::path::PathBuf;

/// Argumentos CLI compartidos por ambos binarios
///
/// Todos los campos con default "según el perfil" son `Option`: si el
/// usuario no los pasa, el perfil del binario (`ServerConfig::app` o
/// `ServerConfig::demo`) aporta el valor.
#[derive(Debug, Clone, Parser)]
#[command(about = "Servidor de archivos estáticos para el bundle web de TriBridge")]
#[command(version = "0.1.0")]
pub struct Cli {
    /// Puerto en el que escucha el servidor (default según el perfil:
    /// 4000 para app_server, 8765 para demo_server)
    #[arg(short, long, env = "SERVE_PORT")]
    pub port: Option<u16>,

    /// Host/IP en el que escucha
    #[arg(long, default_value = "0.0.0.0", env = "SERVE_HOST")]
    pub host: String,

    /// Directorio del proyecto; el proceso hace chdir aquí al arrancar
    #[arg(long, default_value = ".", env = "SERVE_PROJECT_DIR")]
    pub project_dir: PathBuf,

    /// Content root relativo al directorio del proyecto (default según
    /// el perfil: "dist" para app_server, "demo" para demo_server)
    #[arg(long, env = "SERVE_ROOT")]
    pub root: Option<PathBuf>,

    /// No abrir el navegador automáticamente (solo afecta a app_server)
    #[arg(long, env = "SERVE_NO_OPEN")]
    pub no_open: bool,
}

/// Cabeceras CORS como lista ordenada de pares (nombre, valor)
///
/// Se agregan incondicionalmente a TODAS las respuestas, incluidos los
/// 404 y las páginas de error.
#[derive(Debug, Clone)]
pub struct CorsPolicy {
    headers: Vec<(String, String)>,
}

impl CorsPolicy {
    /// Política mínima del app server: solo permite el origen
    pub fn allow_origin() -> Self {
        Self {
            headers: vec![("Access-Control-Allow-Origin".to_string(), "*".to_string())],
        }
    }

    /// Política completa del demo server: origen, métodos y headers
    pub fn allow_origin_methods_headers() -> Self {
        Self {
            headers: vec![
                ("Access-Control-Allow-Origin".to_string(), "*".to_string()),
                (
                    "Access-Control-Allow-Methods".to_string(),
                    "GET, POST, OPTIONS".to_string(),
                ),
                (
                    "Access-Control-Allow-Headers".to_string(),
                    "Content-Type".to_string(),
                ),
            ],
        }
    }

    /// Agrega las cabeceras de la política a una respuesta
    pub fn apply(&self, response: &mut Response) {
        for (name, value) in &self.headers {
            response.add_header(name, value);
        }
    }

    /// Lista ordenada de cabeceras de la política
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }
}

/// Configuración inmutable de una instancia del servidor
///
/// Se construye una vez al arrancar a partir del perfil del binario más
/// los overrides de CLI/entorno, y se pasa por valor al `Server`.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Nombre del perfil, solo para los mensajes de consola
    pub label: &'static str,

    /// Host/IP en el que escucha
    pub host: String,

    /// Puerto en el que escucha
    pub port: u16,

    /// Directorio del proyecto (directorio de trabajo del proceso)
    pub project_dir: PathBuf,

    /// Content root, normalmente relativo a `project_dir`
    pub root: PathBuf,

    /// Cabeceras CORS que se agregan a todas las respuestas
    pub cors: CorsPolicy,

    /// Abrir el navegador tras confirmar el bind del listener
    pub open_browser: bool,

    /// Retraso antes de abrir el navegador, en milisegundos
    pub open_delay_ms: u64,
}

impl ServerConfig {
    /// Perfil del app server: build de producción en el puerto 4000,
    /// una sola cabecera CORS, navegador automático
    pub fn app(cli: Cli) -> Self {
        Self {
            label: "app_server",
            host: cli.host,
            port: cli.port.unwrap_or(4000),
            project_dir: cli.project_dir,
            root: cli.root.unwrap_or_else(|| PathBuf::from("dist")),
            cors: CorsPolicy::allow_origin(),
            open_browser: !cli.no_open,
            open_delay_ms: 1000,
        }
    }

    /// Perfil del demo server: demo en el puerto 8765, las tres
    /// cabeceras CORS, sin navegador
    pub fn demo(cli: Cli) -> Self {
        Self {
            label: "demo_server",
            host: cli.host,
            port: cli.port.unwrap_or(8765),
            project_dir: cli.project_dir,
            root: cli.root.unwrap_or_else(|| PathBuf::from("demo")),
            cors: CorsPolicy::allow_origin_methods_headers(),
            open_browser: false,
            open_delay_ms: 1000,
        }
    }

    /// Obtiene la dirección completa para bind (host:port)
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// URL local que se muestra en consola y se abre en el navegador
    pub fn local_url(&self) -> String {
        format!("http://localhost:{}", self.port)
    }

    /// Content root resuelto contra el directorio del proyecto
    ///
    /// Si `root` es absoluto, `join` lo usa tal cual.
    pub fn content_root(&self) -> PathBuf {
        self.project_dir.join(&self.root)
    }

    /// Vuelve absoluto el directorio del proyecto
    ///
    /// Los binarios hacen chdir a `project_dir` y después resuelven el
    /// content root con `content_root()`. Si `project_dir` fuera relativo
    /// (ej: `--project-dir proj`), el join posterior lo aplicaría por
    /// segunda vez sobre el nuevo directorio de trabajo y el servidor
    /// buscaría `proj/proj/dist`. Canonicalizar antes del chdir deja un
    /// base absoluto y la resolución ocurre una sola vez.
    pub fn canonicalize_project_dir(&mut self) -> std::io::Result<()> {
        self.project_dir = self.project_dir.canonicalize()?;
        Ok(())
    }

    /// Valida la configuración
    ///
    /// Retorna errores si hay valores inválidos
    pub fn validate(&self) -> Result<(), String> {
        if self.port == 0 {
            return Err("Port must be >= 1".to_string());
        }
        if self.host.trim().is_empty() {
            return Err("Host must not be empty".to_string());
        }
        if self.root.as_os_str().is_empty() {
            return Err("Content root must not be empty".to_string());
        }
        Ok(())
    }

    /// Imprime un resumen de la configuración
    pub fn print_summary(&self) {
        println!("⚙️  Configuración ({}):", self.label);
        println!("   Dirección:    {}", self.address());
        println!("   Proyecto:     {}", self.project_dir.display());
        println!("   Content root: {}", self.content_root().display());
        for (name, value) in self.cors.headers() {
            println!("   CORS:         {}: {}", name, value);
        }
        if self.open_browser {
            println!("   Navegador:    automático ({} ms)", self.open_delay_ms);
        } else {
            println!("   Navegador:    no");
        }
        println!();
    }
}
