//! # Demo Server - Entry Point
//! src/bin/demo_server.rs
//!
//! Sirve la demo de TriBridge (`demo/`) en el puerto 8765 con las tres
//! cabeceras CORS permisivas. No abre el navegador.

use clap::Parser;
use std::sync::atomic::Ordering;

use static_server::config::{Cli, ServerConfig};
use static_server::server::Server;

fn main() {
    println!("=================================");
    println!("  TriBridge Demo Server");
    println!("=================================\n");

    let mut config = ServerConfig::demo(Cli::parse());

    if let Err(e) = config.validate() {
        eprintln!("💥 Configuración inválida: {}", e);
        std::process::exit(2);
    }

    config.print_summary();

    // Canonicalizar antes del chdir: un project_dir relativo no debe
    // aplicarse dos veces al resolver el content root
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

    // La demo también valida su content root antes del bind
    // (Server::bind lo hace para ambos perfiles)
    let server = match Server::bind(config) {
        Ok(server) => server,
        Err(e) => {
            eprintln!("❌ Arranque fallido: {}", e);
            std::process::exit(1);
        }
    };

    println!("✅ Demo TriBridge disponible!");
    println!("🌐 Dirección: {}", server.config().local_url());
    println!("⏹️  Ctrl+C para detener el servidor");
    println!("{}\n", "=".repeat(50));

    let shutdown = server.shutdown_handle();
    if let Err(e) = ctrlc::set_handler(move || {
        shutdown.store(true, Ordering::SeqCst);
    }) {
        eprintln!("⚠️  No se pudo instalar el handler de Ctrl+C: {}", e);
    }

    if let Err(e) = server.run() {
        eprintln!("💥 Error fatal: {}", e);
        std::process::exit(1);
    }

    println!("\n🛑 Servidor detenido");
}
