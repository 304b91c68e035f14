pub mod schema;

use crate::config::Config;
use crate::error::AppResult;
use rusqlite::Connection;
use std::path::PathBuf;

/// Acceso a la base. Guarda la ruta y abre una conexión nueva por operación:
/// el modelo es una conexión, una transacción, por acción del usuario.
pub struct Database {
    ruta: PathBuf,
}

impl Database {
    /// Abre (o crea) la base en la ruta configurada y aplica el esquema.
    pub fn abrir(config: &Config) -> AppResult<Self> {
        if let Some(parent) = config.ruta_db.parent() {
            std::fs::create_dir_all(parent).ok();
        }

        let db = Database {
            ruta: config.ruta_db.clone(),
        };

        let conn = db.conexion()?;
        schema::crear_tablas(&conn)?;

        Ok(db)
    }

    /// Conexión nueva con los pragmas aplicados.
    pub fn conexion(&self) -> AppResult<Connection> {
        let conn = Connection::open(&self.ruta)?;

        // Optimizaciones SQLite
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA cache_size = -8000;
             PRAGMA foreign_keys = ON;
             PRAGMA busy_timeout = 5000;",
        )?;

        Ok(conn)
    }

    /// Base en memoria con el esquema aplicado, para pruebas.
    pub fn en_memoria() -> AppResult<Connection> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        schema::crear_tablas(&conn)?;
        Ok(conn)
    }
}
