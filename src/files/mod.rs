//! # Resolución de Archivos Estáticos
//! src/files/mod.rs
//!
//! Este módulo mapea el path de un request HTTP a un archivo dentro del
//! content root y construye la respuesta correspondiente:
//!
//! - Archivo existente → 200 con los bytes exactos y Content-Type inferido
//! - Directorio sin slash final → 301 agregando el slash
//! - Directorio con slash → `index.html` si existe, sino un listado HTML
//! - Cualquier otro caso → 404
//!
//! La resolución nunca escapa del content root: los componentes `..` del
//! path hacen pop sin poder subir por encima de la raíz.

pub mod mime;

use crate::http::{Response, StatusCode};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Archivos índice que se sirven al pedir un directorio
const INDEX_FILES: [&str; 2] = ["index.html", "index.htm"];

/// Resuelve un request path contra el content root y construye la respuesta
///
/// `raw_path` es el path tal cual llegó en la request line: puede traer
/// query string, fragmento y percent-encoding. Las cabeceras CORS NO se
/// agregan aquí; el servidor las aplica a toda respuesta al final.
///
/// # Ejemplo
/// ```no_run
/// use std::path::Path;
/// use static_server::files::serve;
/// use static_server::http::StatusCode;
///
/// let response = serve(Path::new("dist"), "/index.html");
/// assert_eq!(response.status(), StatusCode::Ok);
/// ```
pub fn serve(root: &Path, raw_path: &str) -> Response {
    // 1. Recortar query string y fragmento
    let without_query = raw_path
        .split(|c| c == '?' || c == '#')
        .next()
        .unwrap_or("");

    // 2. Decodificar percent-encoding
    let decoded = match percent_decode(without_query) {
        Some(d) => d,
        None => return Response::error(StatusCode::BadRequest, "Invalid percent-encoding in path"),
    };

    if decoded.contains('\0') {
        return Response::error(StatusCode::BadRequest, "Invalid path");
    }

    let wants_directory = decoded.ends_with('/');

    // 3. Resolver contra el root sin permitir escapes
    let fs_path = root.join(sanitize(&decoded));

    match fs::metadata(&fs_path) {
        Ok(meta) if meta.is_dir() => {
            if !wants_directory {
                // Redirigir agregando el slash, preservando el encoding
                // original y el query string si lo había
                let rest = raw_path.strip_prefix(without_query).unwrap_or("");
                return Response::redirect(&format!("{}/{}", without_query, rest));
            }
            serve_directory(&fs_path, &decoded)
        }
        Ok(_) => serve_file(&fs_path),
        Err(e) => io_error_response(e.kind()),
    }
}

/// Decodifica el percent-encoding de un path
///
/// Las secuencias `%xx` malformadas se dejan tal cual; retorna `None` si
/// los bytes decodificados no son UTF-8 válido. A diferencia de los query
/// strings, en un path `+` NO significa espacio.
pub fn percent_decode(s: &str) -> Option<String> {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let high = (bytes[i + 1] as char).to_digit(16);
            let low = (bytes[i + 2] as char).to_digit(16);
            if let (Some(h), Some(l)) = (high, low) {
                out.push((h * 16 + l) as u8);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }

    String::from_utf8(out).ok()
}

/// Convierte un path de URL en un path relativo seguro
///
/// Recorre los componentes separados por `/`: los vacíos y `.` se
/// ignoran, y `..` hace pop de lo acumulado sin poder subir por encima
/// del root. Normaliza con clamp en vez de rechazar con 403.
pub fn sanitize(url_path: &str) -> PathBuf {
    let mut parts: Vec<&str> = Vec::new();

    for component in url_path.split('/') {
        match component {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            other => parts.push(other),
        }
    }

    parts.iter().collect()
}

/// Sirve un archivo regular con su Content-Type inferido
fn serve_file(fs_path: &Path) -> Response {
    match fs::read(fs_path) {
        Ok(bytes) => Response::new(StatusCode::Ok)
            .with_header("Content-Type", mime::content_type_for(fs_path))
            .with_body_bytes(bytes),
        Err(e) => io_error_response(e.kind()),
    }
}

/// Sirve un directorio: índice si existe, listado HTML si no
fn serve_directory(fs_path: &Path, url_path: &str) -> Response {
    for index in INDEX_FILES {
        let candidate = fs_path.join(index);
        if candidate.is_file() {
            return serve_file(&candidate);
        }
    }
    directory_listing(fs_path, url_path)
}

/// Genera un listado HTML simple del directorio, ordenado por nombre
///
/// Los subdirectorios llevan slash final en el link y en el texto.
fn directory_listing(fs_path: &Path, url_path: &str) -> Response {
    let entries = match fs::read_dir(fs_path) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::PermissionDenied => {
            return Response::error(StatusCode::Forbidden, "No permission to list directory");
        }
        Err(_) => {
            return Response::error(StatusCode::InternalServerError, "Error listing directory");
        }
    };

    let mut names: Vec<String> = Vec::new();
    for entry in entries.flatten() {
        let mut name = entry.file_name().to_string_lossy().into_owned();
        if entry.path().is_dir() {
            name.push('/');
        }
        names.push(name);
    }
    names.sort();

    let items: String = names
        .iter()
        .map(|name| format!("<li><a href=\"{name}\">{name}</a></li>\n"))
        .collect();

    let body = format!(
        "<!DOCTYPE html>\n<html>\n<head><title>Directory listing for {url_path}</title></head>\n\
         <body>\n<h1>Directory listing for {url_path}</h1>\n<hr>\n<ul>\n{items}</ul>\n<hr>\n</body>\n</html>\n",
    );

    Response::html(&body)
}

/// Mapea un error de IO al status HTTP correspondiente
fn io_error_response(kind: ErrorKind) -> Response {
    match kind {
        ErrorKind::NotFound => Response::error(StatusCode::NotFound, "File not found"),
        ErrorKind::PermissionDenied => Response::error(StatusCode::Forbidden, "Permission denied"),
        _ => Response::error(StatusCode::InternalServerError, "Error reading file"),
    }
}
