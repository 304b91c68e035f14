use chrono::{FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Marcas que maneja el negocio.
pub const MARCAS: [&str; 2] = ["VETA", "VENETO"];

// Huso horario fijo del negocio (UTC-3, Buenos Aires)
const HORAS_AL_OESTE: i32 = 3;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub ruta_db: PathBuf,
    pub marca_default: String,
}

impl Config {
    /// Lee la configuración del entorno, con valores por defecto locales.
    ///
    /// `TRASTIENDA_DB` fija la ruta de la base; `TRASTIENDA_MARCA` la marca
    /// inicial de la sesión.
    pub fn desde_entorno() -> Self {
        let ruta_db = std::env::var("TRASTIENDA_DB")
            .map(PathBuf::from)
            .unwrap_or_else(|_| Self::ruta_por_defecto());
        let marca_default =
            std::env::var("TRASTIENDA_MARCA").unwrap_or_else(|_| MARCAS[0].to_string());

        Config {
            ruta_db,
            marca_default,
        }
    }

    fn ruta_por_defecto() -> PathBuf {
        let mut ruta = directorio_datos().unwrap_or_else(|| PathBuf::from("."));
        ruta.push("trastienda.db");
        ruta
    }
}

/// Retorna el directorio de datos de la aplicación
fn directorio_datos() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var("LOCALAPPDATA")
            .ok()
            .map(|p| PathBuf::from(p).join("Trastienda"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .ok()
            .map(|p| PathBuf::from(p).join(".trastienda"))
    }
}

pub fn huso_horario() -> FixedOffset {
    FixedOffset::west_opt(HORAS_AL_OESTE * 3600).unwrap()
}

/// Fecha y hora actual en ISO-8601 con el huso del negocio.
pub fn ahora() -> String {
    Utc::now().with_timezone(&huso_horario()).to_rfc3339()
}
