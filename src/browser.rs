//! # Apertura del Navegador
//! src/browser.rs
//!
//! Lanza el navegador del sistema contra la URL local del servidor,
//! después de un retraso corto para dar tiempo a que el listener esté
//! aceptando conexiones.
//!
//! La apertura es best-effort: si el comando del sistema no existe o
//! falla, se imprime un aviso y el servidor sigue como si nada.

use std::io;
use std::process::Command;
use std::thread;
use std::time::Duration;

/// Programa una apertura del navegador en un thread independiente
///
/// Retorna el handle del thread por si el llamador quiere esperarlo
/// (los binarios no lo hacen; el thread muere solo).
///
/// # Ejemplo
/// ```no_run
/// use std::time::Duration;
/// use static_server::browser;
///
/// browser::open_delayed("http://localhost:4000".to_string(), Duration::from_secs(1));
/// ```
pub fn open_delayed(url: String, delay: Duration) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        thread::sleep(delay);
        match open(&url) {
            Ok(()) => println!("   🌐 Navegador abierto en {}", url),
            Err(e) => eprintln!("   ⚠️  No se pudo abrir el navegador: {}", e),
        }
    })
}

/// Invoca el opener de la plataforma y espera a que retorne
fn open(url: &str) -> io::Result<()> {
    let status = opener_command(url).status()?;
    if status.success() {
        Ok(())
    } else {
        Err(io::Error::new(
            io::ErrorKind::Other,
            format!("opener exited with {}", status),
        ))
    }
}

/// Construye el comando del opener según la plataforma
#[cfg(target_os = "macos")]
fn opener_command(url: &str) -> Command {
    let mut cmd = Command::new("open");
    cmd.arg(url);
    cmd
}

/// Construye el comando del opener según la plataforma
#[cfg(target_os = "windows")]
fn opener_command(url: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.args(["/C", "start", "", url]);
    cmd
}

/// Construye el comando del opener según la plataforma
#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn opener_command(url: &str) -> Command {
    let mut cmd = Command::new("xdg-open");
    cmd.arg(url);
    cmd
}
