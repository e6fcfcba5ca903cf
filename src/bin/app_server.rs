//! # App Server - Entry Point
//! src/bin/app_server.rs
//!
//! Sirve el build de producción de TriBridge (`dist/`) en el puerto 4000,
//! con `Access-Control-Allow-Origin: *` en todas las respuestas, y abre
//! el navegador automáticamente tras confirmar el bind del listener.

use clap::Parser;
use std::sync::atomic::Ordering;
use std::time::Duration;

use static_server::browser;
use static_server::config::{Cli, ServerConfig};
use static_server::server::{Server, StartupError};

fn main() {
    println!("=================================");
    println!("  TriBridge App Server");
    println!("=================================\n");

    let mut config = ServerConfig::app(Cli::parse());

    if let Err(e) = config.validate() {
        eprintln!("💥 Configuración inválida: {}", e);
        std::process::exit(2);
    }

    config.print_summary();

    // El proceso trabaja desde el directorio del proyecto. Se
    // canonicaliza primero: un project_dir relativo, aplicado después
    // del chdir, se resolvería dos veces
    if let Err(e) = config.canonicalize_project_dir() {
        eprintln!(
            "💥 Directorio de proyecto inválido {}: {}",
            config.project_dir.display(),
            e
        );
        std::process::exit(1);
    }
    if let Err(e) = std::env::set_current_dir(&config.project_dir) {
        eprintln!(
            "💥 No se pudo entrar a {}: {}",
            config.project_dir.display(),
            e
        );
        std::process::exit(1);
    }

    let server = match Server::bind(config) {
        Ok(server) => server,
        Err(e) => {
            eprintln!("❌ {}", e);
            if matches!(e, StartupError::MissingRoot(_)) {
                eprintln!("💡 Ejecute `npm run build` para generar el directorio dist/");
            }
            std::process::exit(1);
        }
    };

    println!("✅ Aplicación TriBridge disponible!");
    println!("🌐 Dirección: {}", server.config().local_url());
    println!("⏹️  Ctrl+C para detener el servidor");
    println!("{}\n", "=".repeat(60));

    // Ctrl+C activa el flag; el accept loop lo observa y retorna
    let shutdown = server.shutdown_handle();
    if let Err(e) = ctrlc::set_handler(move || {
        shutdown.store(true, Ordering::SeqCst);
    }) {
        eprintln!("⚠️  No se pudo instalar el handler de Ctrl+C: {}", e);
    }

    // Navegador: solo después de que el listener ya está enlazado,
    // y siempre best-effort
    if server.config().open_browser {
        browser::open_delayed(
            server.config().local_url(),
            Duration::from_millis(server.config().open_delay_ms),
        );
    }

    if let Err(e) = server.run() {
        eprintln!("💥 Error fatal: {}", e);
        std::process::exit(1);
    }

    println!("\n🛑 Servidor detenido");
}
