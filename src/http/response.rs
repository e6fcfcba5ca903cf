//! # Construcción de Respuestas HTTP
//! src/http/response.rs
//!
//! API para construir respuestas HTTP de forma programática y
//! convertirlas a bytes para enviar al cliente.
//!
//! Los headers se guardan como lista ordenada de pares (nombre, valor):
//! el orden de inserción se preserva al serializar, y las cabeceras CORS
//! se agregan al final de la lista en todas las respuestas.
//!
//! ## Ejemplo de uso
//!
//! ```
//! use static_server::http::{Response, StatusCode};
//!
//! let response = Response::new(StatusCode::Ok)
//!     .with_header("Content-Type", "text/html")
//!     .with_body("<h1>Hola</h1>");
//!
//! let bytes = response.to_bytes();
//! // Ahora puedes enviar `bytes` por el socket
//! ```

use super::StatusCode;

/// Representa una respuesta HTTP completa
#[derive(Debug, Clone)]
pub struct Response {
    /// Código de estado HTTP (200, 404, etc.)
    status: StatusCode,

    /// Headers HTTP en orden de inserción
    headers: Vec<(String, String)>,

    /// Cuerpo de la respuesta (puede ser vacío)
    body: Vec<u8>,
}

impl Response {
    /// Crea una nueva respuesta con el código de estado especificado
    ///
    /// Por defecto, la respuesta no tiene headers ni body.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    /// Agrega un header a la respuesta (versión builder)
    ///
    /// Si el header ya existe se sobrescribe en su posición original.
    ///
    /// # Ejemplo
    /// ```
    /// use static_server::http::{Response, StatusCode};
    ///
    /// let response = Response::new(StatusCode::Ok)
    ///     .with_header("Content-Type", "text/css");
    /// ```
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.add_header(name, value);
        self
    }

    /// Agrega un header a una respuesta existente (versión mutable)
    ///
    /// La comparación de nombres es case-insensitive, como manda HTTP.
    pub fn add_header(&mut self, name: &str, value: &str) {
        for (existing, existing_value) in &mut self.headers {
            if existing.eq_ignore_ascii_case(name) {
                *existing_value = value.to_string();
                return;
            }
        }
        self.headers.push((name.to_string(), value.to_string()));
    }

    /// Establece el cuerpo de la respuesta desde un string
    ///
    /// Automáticamente calcula y agrega el header `Content-Length`.
    pub fn with_body(self, body: &str) -> Self {
        self.with_body_bytes(body.as_bytes().to_vec())
    }

    /// Establece el cuerpo de la respuesta desde bytes
    ///
    /// Útil para archivos binarios (imágenes, fuentes, wasm, etc.)
    pub fn with_body_bytes(mut self, body: Vec<u8>) -> Self {
        let len = body.len();
        self.body = body;
        self.add_header("Content-Length", &len.to_string());
        self
    }

    /// Crea una respuesta HTML exitosa (200 OK)
    pub fn html(body: &str) -> Self {
        Self::new(StatusCode::Ok)
            .with_header("Content-Type", "text/html; charset=utf-8")
            .with_body(body)
    }

    /// Crea una respuesta de error con una página HTML mínima
    ///
    /// El formato imita la página de error clásica de los file servers:
    /// código, reason phrase y mensaje explicativo.
    ///
    /// # Ejemplo
    /// ```
    /// use static_server::http::{Response, StatusCode};
    ///
    /// let response = Response::error(StatusCode::NotFound, "File not found");
    /// assert_eq!(response.status(), StatusCode::NotFound);
    /// ```
    pub fn error(status: StatusCode, message: &str) -> Self {
        let body = format!(
            "<!DOCTYPE html>\n<html>\n<head><title>{status}</title></head>\n\
             <body>\n<h1>{status}</h1>\n<p>{message}</p>\n</body>\n</html>\n",
            status = status,
            message = message,
        );
        Self::new(status)
            .with_header("Content-Type", "text/html; charset=utf-8")
            .with_body(&body)
    }

    /// Crea una redirección permanente (301) hacia `location`
    ///
    /// Se usa cuando se pide un directorio sin slash final.
    pub fn redirect(location: &str) -> Self {
        Self::new(StatusCode::MovedPermanently)
            .with_header("Location", location)
            .with_body_bytes(Vec::new())
    }

    /// Convierte la respuesta en su variante HEAD
    ///
    /// Descarta el body pero conserva todos los headers, incluido
    /// `Content-Length`, que debe reflejar el tamaño que tendría el GET.
    pub fn into_head(mut self) -> Self {
        self.body = Vec::new();
        self
    }

    /// Convierte la respuesta a bytes listos para enviar por el socket
    ///
    /// Genera el formato completo:
    /// - Status line: `HTTP/1.1 200 OK\r\n`
    /// - Headers en orden de inserción: `Header-Name: Value\r\n`
    /// - Línea vacía: `\r\n`
    /// - Body: contenido binario
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut result = Vec::new();

        // 1. Status line
        let status_line = format!("HTTP/1.1 {}\r\n", self.status);
        result.extend_from_slice(status_line.as_bytes());

        // 2. Headers, preservando el orden
        for (name, value) in &self.headers {
            let header_line = format!("{}: {}\r\n", name, value);
            result.extend_from_slice(header_line.as_bytes());
        }

        // 3. Línea vacía que separa headers del body
        result.extend_from_slice(b"\r\n");

        // 4. Body (si existe)
        result.extend_from_slice(&self.body);

        result
    }

    /// Obtiene el código de estado de la respuesta
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Obtiene la lista ordenada de headers
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Busca un header por nombre (case-insensitive)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Obtiene una referencia al body
    pub fn body(&self) -> &[u8] {
        &self.body
    }
}
