//! # Tipos MIME
//! src/files/mime.rs
//!
//! Inferencia del `Content-Type` a partir de la extensión del archivo.
//! Cubre los tipos que aparecen en un bundle web moderno (html, css, js,
//! fuentes, imágenes, wasm); cualquier extensión desconocida cae en
//! `application/octet-stream`.

use std::path::Path;

/// Infiere el Content-Type para un archivo según su extensión
///
/// La comparación es case-insensitive (`LOGO.PNG` es `image/png`).
///
/// # Ejemplo
/// ```
/// use std::path::Path;
/// use static_server::files::mime::content_type_for;
///
/// assert_eq!(content_type_for(Path::new("index.html")), "text/html");
/// assert_eq!(content_type_for(Path::new("datos.bin")), "application/octet-stream");
/// ```
pub fn content_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match extension.as_deref() {
        Some("html") | Some("htm") => "text/html",
        Some("css") => "text/css",
        Some("js") | Some("mjs") => "text/javascript",
        Some("json") | Some("map") => "application/json",
        Some("txt") => "text/plain",
        Some("xml") => "application/xml",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/vnd.microsoft.icon",
        Some("webp") => "image/webp",
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("ttf") => "font/ttf",
        Some("otf") => "font/otf",
        Some("wasm") => "application/wasm",
        Some("pdf") => "application/pdf",
        Some("mp3") => "audio/mpeg",
        Some("mp4") => "video/mp4",
        Some("webm") => "video/webm",
        Some("zip") => "application/zip",
        Some("gz") => "application/gzip",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_web_bundle_types() {
        assert_eq!(content_type_for(Path::new("index.html")), "text/html");
        assert_eq!(content_type_for(Path::new("assets/index-B2kx.css")), "text/css");
        assert_eq!(content_type_for(Path::new("assets/index-C9fQ.js")), "text/javascript");
        assert_eq!(content_type_for(Path::new("manifest.json")), "application/json");
        assert_eq!(content_type_for(Path::new("index.js.map")), "application/json");
    }

    #[test]
    fn test_images_and_fonts() {
        assert_eq!(content_type_for(Path::new("logo.png")), "image/png");
        assert_eq!(content_type_for(Path::new("foto.jpeg")), "image/jpeg");
        assert_eq!(content_type_for(Path::new("icono.svg")), "image/svg+xml");
        assert_eq!(content_type_for(Path::new("fuente.woff2")), "font/woff2");
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(content_type_for(Path::new("LOGO.PNG")), "image/png");
        assert_eq!(content_type_for(Path::new("Index.HTML")), "text/html");
    }

    #[test]
    fn test_unknown_extension_is_octet_stream() {
        assert_eq!(content_type_for(Path::new("datos.xyz")), "application/octet-stream");
        assert_eq!(content_type_for(Path::new("sin_extension")), "application/octet-stream");
    }
}
