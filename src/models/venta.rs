use serde::{Deserialize, Serialize};

pub const TIPO_VENTA_DIRECTA: &str = "Venta Directa";
pub const TIPO_VENTA_CONCESION: &str = "Venta Concesión";
pub const ESTADO_CONFIRMADA: &str = "confirmada";
pub const FACTURADO: &str = "Facturado";
pub const NO_FACTURADO: &str = "No Facturado";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Venta {
    pub id: Option<i64>,
    pub fecha: String,
    pub cliente: String,
    pub total_bruto: f64,
    pub descuento_porcentaje: f64,
    pub total_neto: f64,
    pub estado: String,
    pub estado_facturacion: String,
    pub marca: String,
    pub tipo_venta: String,
    /// Socio dueño del stock en ventas en consignación; `None` en directas.
    pub concesionario_id: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct VentaItem {
    pub id: Option<i64>,
    pub venta_id: Option<i64>,
    pub producto_id: i64,
    pub cantidad: i64,
    /// Precio congelado al momento de la venta; no sigue al catálogo.
    pub precio_unitario: f64,
    pub subtotal: f64,
    pub marca: String,
}

/// Renglón del carrito al registrar una venta directa.
#[derive(Debug, Serialize, Deserialize)]
pub struct ItemNuevo {
    pub producto_id: i64,
    pub cantidad: i64,
    pub precio_unitario: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NuevaVenta {
    pub cliente: String,
    pub descuento_porcentaje: f64,
    pub marca: String,
    pub items: Vec<ItemNuevo>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VentaCompleta {
    pub venta: Venta,
    pub items: Vec<VentaItem>,
}
