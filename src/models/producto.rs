use serde::{Deserialize, Serialize};

/// Renglón del depósito principal. `cantidad` la mueven solo las operaciones
/// de venta/consignación y el ajuste explícito, nunca la edición del catálogo.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Producto {
    pub id: Option<i64>,
    pub codigo: String,
    pub nombre: String,
    pub categoria: Option<String>,
    pub cantidad: i64,
    pub precio_unitario: f64,
    pub stock_minimo: i64,
    pub marca: String,
}
