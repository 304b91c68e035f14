//! Indicadores y rankings calculados en memoria sobre datos ya leídos.
//!
//! Las fechas se interpretan en el huso horario del negocio: una venta
//! registrada cerca de medianoche cae en el día calendario local, no en
//! el del servidor.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate};
use serde::Serialize;

use crate::config;
use crate::models::{Producto, Venta, VentaItem};

#[derive(Debug, Clone, Serialize)]
pub struct ResumenKpis {
    /// Neto acumulado del mes calendario de la fecha de referencia.
    pub mtd_neto: f64,
    /// Neto acumulado del año calendario de la fecha de referencia.
    pub ytd_neto: f64,
    /// Cantidad de ventas del mes calendario de la fecha de referencia.
    pub total_transacciones: usize,
    /// Productos con cantidad igual o por debajo de su stock mínimo.
    pub stock_critico: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductoVendido {
    pub producto_id: i64,
    pub nombre_producto: String,
    pub cantidad: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct VentaDiaria {
    pub fecha: NaiveDate,
    pub total_neto: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClientePrincipal {
    pub cliente: String,
    pub total_neto: f64,
}

/// Resumen general del negocio a una fecha de referencia.
/// Las ventas con fecha ilegible no suman a los acumulados.
pub fn kpis(stock: &[Producto], ventas: &[Venta], referencia: DateTime<FixedOffset>) -> ResumenKpis {
    let mut mtd_neto = 0.0;
    let mut ytd_neto = 0.0;
    let mut mtd_transacciones = 0usize;

    for venta in ventas {
        let fecha = match parsear_fecha(&venta.fecha) {
            Some(f) => f,
            None => continue,
        };

        if fecha.year() == referencia.year() {
            ytd_neto += venta.total_neto;
            if fecha.month() == referencia.month() {
                mtd_neto += venta.total_neto;
                mtd_transacciones += 1;
            }
        }
    }

    let stock_critico = stock
        .iter()
        .filter(|p| p.cantidad <= p.stock_minimo)
        .count();

    ResumenKpis {
        mtd_neto,
        ytd_neto,
        total_transacciones: mtd_transacciones,
        stock_critico,
    }
}

/// Ranking de productos por unidades vendidas, de mayor a menor.
/// Un producto borrado del catálogo sigue apareciendo con nombre genérico.
pub fn productos_mas_vendidos(
    items: &[VentaItem],
    stock: &[Producto],
    top_n: usize,
) -> Vec<ProductoVendido> {
    let mut cantidades: HashMap<i64, i64> = HashMap::new();
    for item in items {
        *cantidades.entry(item.producto_id).or_insert(0) += item.cantidad;
    }

    let nombres: HashMap<i64, &str> = stock
        .iter()
        .filter_map(|p| p.id.map(|id| (id, p.nombre.as_str())))
        .collect();

    let mut filas: Vec<ProductoVendido> = cantidades
        .into_iter()
        .map(|(producto_id, cantidad)| {
            let nombre_producto = match nombres.get(&producto_id) {
                Some(nombre) => (*nombre).to_string(),
                None => "Producto Eliminado".to_string(),
            };
            ProductoVendido {
                producto_id,
                nombre_producto,
                cantidad,
            }
        })
        .collect();

    filas.sort_by(|a, b| {
        b.cantidad
            .cmp(&a.cantidad)
            .then_with(|| a.producto_id.cmp(&b.producto_id))
    });
    filas.truncate(top_n);
    filas
}

/// Neto vendido por día calendario, en orden cronológico.
pub fn ventas_por_dia(ventas: &[Venta]) -> Vec<VentaDiaria> {
    let mut por_dia: HashMap<NaiveDate, f64> = HashMap::new();

    for venta in ventas {
        let fecha = match parsear_fecha(&venta.fecha) {
            Some(f) => f,
            None => continue,
        };
        *por_dia.entry(fecha.date_naive()).or_insert(0.0) += venta.total_neto;
    }

    let mut dias: Vec<VentaDiaria> = por_dia
        .into_iter()
        .map(|(fecha, total_neto)| VentaDiaria { fecha, total_neto })
        .collect();
    dias.sort_by_key(|d| d.fecha);
    dias
}

/// Ranking de clientes por neto facturado, de mayor a menor.
pub fn clientes_principales(ventas: &[Venta], top_n: usize) -> Vec<ClientePrincipal> {
    let mut por_cliente: HashMap<String, f64> = HashMap::new();

    for venta in ventas {
        *por_cliente.entry(venta.cliente.clone()).or_insert(0.0) += venta.total_neto;
    }

    let mut filas: Vec<ClientePrincipal> = por_cliente
        .into_iter()
        .map(|(cliente, total_neto)| ClientePrincipal { cliente, total_neto })
        .collect();

    filas.sort_by(|a, b| {
        b.total_neto
            .partial_cmp(&a.total_neto)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.cliente.cmp(&b.cliente))
    });
    filas.truncate(top_n);
    filas
}

/// Pasa la fecha guardada al huso horario del negocio. `None` si no parsea.
fn parsear_fecha(fecha: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(fecha)
        .ok()
        .map(|f| f.with_timezone(&config::huso_horario()))
}
