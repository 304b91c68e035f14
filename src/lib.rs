//! Núcleo de gestión comercial multi-marca: depósito principal, ventas
//! directas, stock en consignación y registro de clientes, sobre SQLite.
//!
//! Cada operación de escritura corre en una transacción propia: o se aplica
//! completa o no deja rastro. Las cantidades nunca quedan negativas.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod servicios;

pub use config::Config;
pub use db::Database;
pub use error::{AppError, AppResult};
