use thiserror::Error;

/// Errores de las operaciones del negocio.
///
/// Los mensajes son los que ve el usuario final, por eso van en castellano.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Stock insuficiente para {producto}: hay {disponible}, se piden {pedido}")]
    StockInsuficiente {
        producto: String,
        disponible: i64,
        pedido: i64,
    },

    #[error("Stock en concesión insuficiente para el producto {producto_id}: hay {disponible}, se piden {pedido}")]
    StockConcesionInsuficiente {
        producto_id: i64,
        disponible: f64,
        pedido: i64,
    },

    #[error("Producto {0} no encontrado")]
    ProductoNoEncontrado(i64),

    #[error("Concesionario {0} no encontrado")]
    ConcesionarioNoEncontrado(i64),

    #[error("Venta {0} no encontrada")]
    VentaNoEncontrada(i64),

    #[error("Item {0} no encontrado")]
    ItemNoEncontrado(i64),

    #[error("Cliente {0} no encontrado")]
    ClienteNoEncontrado(i64),

    #[error("El concesionario {0} todavía tiene stock en consignación activo")]
    ConcesionarioConStock(i64),

    #[error("Ya existe {0}")]
    Duplicado(String),

    #[error("{0}")]
    Validacion(String),

    #[error("Error de base de datos: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Error de serialización: {0}")]
    Serde(#[from] serde_json::Error),
}

impl AppError {
    /// Convierte violaciones UNIQUE de SQLite en `Duplicado`; el resto de los
    /// errores de base pasan sin tocar.
    pub fn mapear_unique(err: rusqlite::Error, entidad: &str) -> Self {
        if let rusqlite::Error::SqliteFailure(_, Some(ref mensaje)) = err {
            if mensaje.contains("UNIQUE constraint failed") {
                return AppError::Duplicado(entidad.to_string());
            }
        }
        AppError::Db(err)
    }
}

pub type AppResult<T> = Result<T, AppError>;
