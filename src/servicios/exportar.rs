use rusqlite::Connection;
use serde::Serialize;
use tracing::info;

use crate::config;
use crate::error::AppResult;
use crate::models::{Cliente, Concesionario, ConcesionStock, Producto, VentaCompleta};

use super::{clientes, concesion, productos, ventas};

/// Volcado completo de una marca: catálogo, clientes, socios, libro de
/// consignación y ventas con sus items.
#[derive(Debug, Serialize)]
pub struct ExportacionMarca {
    pub marca: String,
    pub generado_en: String,
    pub stock: Vec<Producto>,
    pub clientes: Vec<Cliente>,
    pub concesionarios: Vec<Concesionario>,
    pub concesion: Vec<ConcesionStock>,
    pub ventas: Vec<VentaCompleta>,
}

/// Arma el volcado de la marca y lo serializa como JSON legible.
pub fn exportar_marca(conn: &Connection, marca: &str) -> AppResult<String> {
    let stock = productos::leer_stock(conn, Some(marca))?;
    let lista_clientes = clientes::leer_clientes(conn, Some(marca))?;
    let socios = concesion::leer_concesionarios(conn, marca)?;
    let renglones = concesion::leer_renglones_concesion(conn, marca)?;
    let cabeceras = ventas::leer_ventas(conn, Some(marca))?;

    let mut ventas_completas = Vec::with_capacity(cabeceras.len());
    for venta in cabeceras {
        let items = match venta.id {
            Some(id) => ventas::leer_items_por_venta(conn, id)?,
            None => Vec::new(),
        };
        ventas_completas.push(VentaCompleta { venta, items });
    }

    let exportacion = ExportacionMarca {
        marca: marca.to_string(),
        generado_en: config::ahora(),
        stock,
        clientes: lista_clientes,
        concesionarios: socios,
        concesion: renglones,
        ventas: ventas_completas,
    };

    let json = serde_json::to_string_pretty(&exportacion)?;
    info!(
        marca,
        productos = exportacion.stock.len(),
        ventas = exportacion.ventas.len(),
        "exportación generada"
    );
    Ok(json)
}
