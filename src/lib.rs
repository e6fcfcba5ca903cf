//! # Static Server
//! src/lib.rs
//!
//! Servidor de archivos estáticos para el bundle web pre-compilado de
//! TriBridge. El crate expone dos binarios independientes:
//!
//! - `app_server`: sirve el build de producción (`dist/`) en el puerto 4000
//!   y abre el navegador automáticamente.
//! - `demo_server`: sirve la demo (`demo/`) en el puerto 8765, sin navegador.
//!
//! Ambos agregan cabeceras CORS permisivas a todas las respuestas, incluso
//! a los errores.
//!
//! ## Arquitectura
//!
//! El servidor está dividido en módulos especializados:
//! - `http`: Parsing y construcción del protocolo HTTP
//! - `config`: Configuración inmutable por binario (CLI + variables de entorno)
//! - `files`: Resolución de paths a archivos del content root y tipos MIME
//! - `server`: Lógica del servidor TCP y manejo de conexiones
//! - `browser`: Apertura diferida del navegador (best-effort)
//!
//! ## Ejemplo de uso
//!
//! ```ignore
//! use clap::Parser;
//! use static_server::config::{Cli, ServerConfig};
//! use static_server::server::Server;
//!
//! let config = ServerConfig::app(Cli::parse());
//! let server = Server::bind(config).expect("Error al iniciar servidor");
//! server.run().expect("Error en el accept loop");
//! ```

pub mod browser;
pub mod config;
pub mod files;
pub mod http;
pub mod server;
