//! # Módulo del Servidor
//! src/server/mod.rs
//!
//! Este módulo implementa el servidor TCP que:
//! 1. Verifica que el content root exista
//! 2. Escucha en un puerto
//! 3. Acepta conexiones entrantes y las atiende en threads
//! 4. Se detiene limpiamente cuando el flag de apagado se activa

pub mod tcp;

// Re-exportar para facilitar el uso
pub use tcp::{Server, StartupError};
