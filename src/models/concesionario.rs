use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Concesionario {
    pub id: Option<i64>,
    pub nombre_socio: String,
    pub cuit_cuil: Option<String>,
    pub contacto: Option<String>,
    pub marca: String,
}

/// Renglón del libro de consignación: lo que un socio tiene en su poder.
/// Un renglón por (socio, producto).
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ConcesionStock {
    pub id: Option<i64>,
    pub concesionario_id: i64,
    pub producto_id: i64,
    pub marca: String,
    pub cantidad_disponible: f64,
    pub fecha_salida: Option<String>,
}

/// Stock en concesión con los datos del producto (JOIN contra el depósito).
#[derive(Debug, Serialize, Deserialize)]
pub struct ConcesionStockDetalle {
    pub concesionario_id: i64,
    pub producto_id: i64,
    pub producto_nombre: String,
    pub producto_codigo: String,
    pub cantidad_disponible: f64,
    pub fecha_salida: Option<String>,
}

/// Un producto y una cantidad dentro de una salida, venta o devolución.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MovimientoConcesion {
    pub producto_id: i64,
    pub cantidad: i64,
}
