//! # Módulo HTTP
//! src/http/mod.rs
//!
//! Este módulo implementa la parte del protocolo HTTP que un servidor
//! de archivos estáticos necesita, sin usar librerías de alto nivel:
//!
//! - Parsing de requests (GET y HEAD)
//! - Construcción de responses con headers ordenados
//! - Manejo de status codes
//!
//! ### Formato de Request
//!
//! ```text
//! GET /path HTTP/1.1\r\n
//! Header-Name: Header-Value\r\n
//! \r\n
//! ```
//!
//! ### Formato de Response
//!
//! ```text
//! HTTP/1.1 200 OK\r\n
//! Content-Type: text/html; charset=utf-8\r\n
//! Content-Length: 13\r\n
//! Access-Control-Allow-Origin: *\r\n
//! \r\n
//! <h1>Hola</h1>
//! ```

pub mod request;   // Parsing de HTTP requests
pub mod response;  // Construcción de HTTP responses
pub mod status;    // Códigos de estado HTTP

// Re-exportamos los tipos principales para facilitar su uso
// Esto permite usar `http::Request` en vez de `http::request::Request`
pub use request::{Method, ParseError, Request};
pub use response::Response;
pub use status::StatusCode;
