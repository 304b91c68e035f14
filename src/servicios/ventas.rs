use crate::config;
use crate::error::{AppError, AppResult};
use crate::models::{
    NuevaVenta, Venta, VentaCompleta, VentaItem, ESTADO_CONFIRMADA, FACTURADO, NO_FACTURADO,
    TIPO_VENTA_CONCESION, TIPO_VENTA_DIRECTA,
};
use rusqlite::Connection;
use tracing::{debug, info};

use super::{concesion, productos};

/// Registra una venta directa contra el depósito principal.
///
/// Todo ocurre en una sola transacción: si algún item no tiene stock, la
/// venta entera se descarta y el depósito queda como estaba.
pub fn registrar_venta(conn: &mut Connection, nueva: &NuevaVenta) -> AppResult<VentaCompleta> {
    if nueva.items.is_empty() {
        return Err(AppError::Validacion("La venta no tiene items".to_string()));
    }
    validar_descuento(nueva.descuento_porcentaje)?;

    let tx = conn.transaction()?;

    // Descontar depósito item por item
    for item in &nueva.items {
        if item.cantidad <= 0 {
            return Err(AppError::Validacion(format!(
                "Cantidad inválida para el producto {}: {}",
                item.producto_id, item.cantidad
            )));
        }
        productos::descontar_stock(&tx, item.producto_id, item.cantidad)?;
    }

    // Totales derivados de los items, la cabecera queda consistente siempre
    let total_bruto: f64 = nueva
        .items
        .iter()
        .map(|i| i.cantidad as f64 * i.precio_unitario)
        .sum();
    let total_neto = total_bruto * (1.0 - nueva.descuento_porcentaje / 100.0);
    let fecha = config::ahora();

    tx.execute(
        "INSERT INTO ventas (fecha, cliente, total_bruto, descuento_porcentaje, total_neto,
         estado, estado_facturacion, marca, tipo_venta, concesionario_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, NULL)",
        rusqlite::params![
            fecha,
            nueva.cliente,
            total_bruto,
            nueva.descuento_porcentaje,
            total_neto,
            ESTADO_CONFIRMADA,
            NO_FACTURADO,
            nueva.marca,
            TIPO_VENTA_DIRECTA,
        ],
    )?;

    let venta_id = tx.last_insert_rowid();

    let mut items_guardados = Vec::new();
    for item in &nueva.items {
        let subtotal = item.cantidad as f64 * item.precio_unitario;

        tx.execute(
            "INSERT INTO ventas_items (venta_id, producto_id, cantidad, precio_unitario, subtotal, marca)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![
                venta_id,
                item.producto_id,
                item.cantidad,
                item.precio_unitario,
                subtotal,
                nueva.marca,
            ],
        )?;

        items_guardados.push(VentaItem {
            id: Some(tx.last_insert_rowid()),
            venta_id: Some(venta_id),
            producto_id: item.producto_id,
            cantidad: item.cantidad,
            precio_unitario: item.precio_unitario,
            subtotal,
            marca: nueva.marca.clone(),
        });
    }

    tx.commit()?;
    info!(venta_id, total_neto, "venta directa registrada");

    Ok(VentaCompleta {
        venta: Venta {
            id: Some(venta_id),
            fecha,
            cliente: nueva.cliente.clone(),
            total_bruto,
            descuento_porcentaje: nueva.descuento_porcentaje,
            total_neto,
            estado: ESTADO_CONFIRMADA.to_string(),
            estado_facturacion: NO_FACTURADO.to_string(),
            marca: nueva.marca.clone(),
            tipo_venta: TIPO_VENTA_DIRECTA.to_string(),
            concesionario_id: None,
        },
        items: items_guardados,
    })
}

/// Elimina una venta reponiendo cada item al libro del que salió: depósito
/// principal para ventas directas, stock del socio para consignación.
///
/// Si el destino de la reposición ya no existe, la operación falla y la venta
/// queda intacta.
pub fn eliminar_venta(conn: &mut Connection, venta_id: i64) -> AppResult<()> {
    let tx = conn.transaction()?;

    let venta = obtener_cabecera(&tx, venta_id)?;
    let items = leer_items_por_venta(&tx, venta_id)?;

    if venta.tipo_venta == TIPO_VENTA_CONCESION {
        let concesionario_id = venta.concesionario_id.ok_or_else(|| {
            AppError::Validacion(format!(
                "La venta {venta_id} es en consignación pero no tiene concesionario asociado"
            ))
        })?;
        concesion::verificar_concesionario(&tx, concesionario_id)?;

        for item in &items {
            concesion::reponer_stock_concesion(
                &tx,
                concesionario_id,
                item.producto_id,
                &venta.marca,
                item.cantidad,
            )?;
        }
    } else {
        for item in &items {
            productos::reponer_stock(&tx, item.producto_id, item.cantidad)?;
        }
    }

    tx.execute(
        "DELETE FROM ventas_items WHERE venta_id = ?1",
        rusqlite::params![venta_id],
    )?;
    tx.execute(
        "DELETE FROM ventas WHERE id = ?1",
        rusqlite::params![venta_id],
    )?;

    tx.commit()?;
    info!(venta_id, "venta eliminada, stock repuesto");
    Ok(())
}

/// Cambia la cantidad de un item ya vendido moviendo solo la diferencia
/// contra el libro que corresponda, y recalcula los totales de la cabecera.
pub fn actualizar_cantidad_item(
    conn: &mut Connection,
    venta_id: i64,
    item_id: i64,
    nueva_cantidad: i64,
) -> AppResult<()> {
    if nueva_cantidad < 1 {
        return Err(AppError::Validacion(format!(
            "Cantidad inválida: {nueva_cantidad}"
        )));
    }

    let tx = conn.transaction()?;

    let item = obtener_item(&tx, item_id)?;
    if item.venta_id != Some(venta_id) {
        return Err(AppError::ItemNoEncontrado(item_id));
    }

    let delta = nueva_cantidad - item.cantidad;
    if delta == 0 {
        return Ok(());
    }

    let venta = obtener_cabecera(&tx, venta_id)?;

    if venta.tipo_venta == TIPO_VENTA_CONCESION {
        let concesionario_id = venta.concesionario_id.ok_or_else(|| {
            AppError::Validacion(format!(
                "La venta {venta_id} es en consignación pero no tiene concesionario asociado"
            ))
        })?;
        concesion::verificar_concesionario(&tx, concesionario_id)?;

        if delta > 0 {
            concesion::descontar_stock_concesion(&tx, concesionario_id, item.producto_id, delta)?;
        } else {
            concesion::reponer_stock_concesion(
                &tx,
                concesionario_id,
                item.producto_id,
                &venta.marca,
                -delta,
            )?;
        }
    } else if delta > 0 {
        productos::descontar_stock(&tx, item.producto_id, delta)?;
    } else {
        productos::reponer_stock(&tx, item.producto_id, -delta)?;
    }

    let nuevo_subtotal = item.precio_unitario * nueva_cantidad as f64;
    tx.execute(
        "UPDATE ventas_items SET cantidad = ?1, subtotal = ?2 WHERE id = ?3",
        rusqlite::params![nueva_cantidad, nuevo_subtotal, item_id],
    )?;

    recalcular_totales_en(&tx, venta_id)?;

    tx.commit()?;
    debug!(venta_id, item_id, nueva_cantidad, "cantidad de item actualizada");
    Ok(())
}

/// Cambia el porcentaje de descuento de la venta y recalcula el neto.
pub fn actualizar_descuento(
    conn: &mut Connection,
    venta_id: i64,
    nuevo_descuento: f64,
) -> AppResult<()> {
    validar_descuento(nuevo_descuento)?;

    let tx = conn.transaction()?;

    let afectadas = tx.execute(
        "UPDATE ventas SET descuento_porcentaje = ?1 WHERE id = ?2",
        rusqlite::params![nuevo_descuento, venta_id],
    )?;
    if afectadas == 0 {
        return Err(AppError::VentaNoEncontrada(venta_id));
    }

    recalcular_totales_en(&tx, venta_id)?;

    tx.commit()?;
    Ok(())
}

/// Recalcula `total_bruto` y `total_neto` a partir de los items guardados.
pub fn recalcular_totales(conn: &mut Connection, venta_id: i64) -> AppResult<()> {
    let tx = conn.transaction()?;
    recalcular_totales_en(&tx, venta_id)?;
    tx.commit()?;
    Ok(())
}

fn recalcular_totales_en(conn: &Connection, venta_id: i64) -> AppResult<()> {
    let total_bruto: f64 = conn.query_row(
        "SELECT COALESCE(SUM(subtotal), 0) FROM ventas_items WHERE venta_id = ?1",
        rusqlite::params![venta_id],
        |row| row.get(0),
    )?;

    let descuento: f64 = match conn.query_row(
        "SELECT descuento_porcentaje FROM ventas WHERE id = ?1",
        rusqlite::params![venta_id],
        |row| row.get(0),
    ) {
        Ok(d) => d,
        Err(rusqlite::Error::QueryReturnedNoRows) => {
            return Err(AppError::VentaNoEncontrada(venta_id))
        }
        Err(e) => return Err(e.into()),
    };

    let total_neto = total_bruto * (1.0 - descuento / 100.0);

    conn.execute(
        "UPDATE ventas SET total_bruto = ?1, total_neto = ?2 WHERE id = ?3",
        rusqlite::params![total_bruto, total_neto, venta_id],
    )?;

    Ok(())
}

pub fn actualizar_estado_facturacion(
    conn: &Connection,
    venta_id: i64,
    estado: &str,
) -> AppResult<()> {
    if estado != FACTURADO && estado != NO_FACTURADO {
        return Err(AppError::Validacion(format!(
            "Estado de facturación inválido: {estado}"
        )));
    }

    let afectadas = conn.execute(
        "UPDATE ventas SET estado_facturacion = ?1 WHERE id = ?2",
        rusqlite::params![estado, venta_id],
    )?;

    if afectadas == 0 {
        return Err(AppError::VentaNoEncontrada(venta_id));
    }

    Ok(())
}

pub fn leer_ventas(conn: &Connection, marca: Option<&str>) -> AppResult<Vec<Venta>> {
    let ventas = match marca {
        Some(m) => {
            let mut stmt = conn.prepare(
                "SELECT id, fecha, cliente, total_bruto, descuento_porcentaje, total_neto,
                 estado, estado_facturacion, marca, tipo_venta, concesionario_id
                 FROM ventas WHERE marca = ?1 ORDER BY id DESC",
            )?;
            let filas = stmt.query_map(rusqlite::params![m], mapear_venta)?;
            filas.collect::<Result<Vec<_>, _>>()?
        }
        None => {
            let mut stmt = conn.prepare(
                "SELECT id, fecha, cliente, total_bruto, descuento_porcentaje, total_neto,
                 estado, estado_facturacion, marca, tipo_venta, concesionario_id
                 FROM ventas ORDER BY id DESC",
            )?;
            let filas = stmt.query_map([], mapear_venta)?;
            filas.collect::<Result<Vec<_>, _>>()?
        }
    };

    Ok(ventas)
}

pub fn obtener_venta(conn: &Connection, venta_id: i64) -> AppResult<VentaCompleta> {
    let venta = obtener_cabecera(conn, venta_id)?;
    let items = leer_items_por_venta(conn, venta_id)?;
    Ok(VentaCompleta { venta, items })
}

pub fn leer_items_por_venta(conn: &Connection, venta_id: i64) -> AppResult<Vec<VentaItem>> {
    let mut stmt = conn.prepare(
        "SELECT id, venta_id, producto_id, cantidad, precio_unitario, subtotal, marca
         FROM ventas_items WHERE venta_id = ?1 ORDER BY id",
    )?;
    let filas = stmt.query_map(rusqlite::params![venta_id], mapear_item)?;
    Ok(filas.collect::<Result<Vec<_>, _>>()?)
}

pub fn leer_ventas_items(conn: &Connection, marca: Option<&str>) -> AppResult<Vec<VentaItem>> {
    let items = match marca {
        Some(m) => {
            let mut stmt = conn.prepare(
                "SELECT id, venta_id, producto_id, cantidad, precio_unitario, subtotal, marca
                 FROM ventas_items WHERE marca = ?1 ORDER BY id",
            )?;
            let filas = stmt.query_map(rusqlite::params![m], mapear_item)?;
            filas.collect::<Result<Vec<_>, _>>()?
        }
        None => {
            let mut stmt = conn.prepare(
                "SELECT id, venta_id, producto_id, cantidad, precio_unitario, subtotal, marca
                 FROM ventas_items ORDER BY id",
            )?;
            let filas = stmt.query_map([], mapear_item)?;
            filas.collect::<Result<Vec<_>, _>>()?
        }
    };

    Ok(items)
}

fn obtener_cabecera(conn: &Connection, venta_id: i64) -> AppResult<Venta> {
    let resultado = conn.query_row(
        "SELECT id, fecha, cliente, total_bruto, descuento_porcentaje, total_neto,
         estado, estado_facturacion, marca, tipo_venta, concesionario_id
         FROM ventas WHERE id = ?1",
        rusqlite::params![venta_id],
        mapear_venta,
    );

    match resultado {
        Ok(venta) => Ok(venta),
        Err(rusqlite::Error::QueryReturnedNoRows) => Err(AppError::VentaNoEncontrada(venta_id)),
        Err(e) => Err(e.into()),
    }
}

fn obtener_item(conn: &Connection, item_id: i64) -> AppResult<VentaItem> {
    let resultado = conn.query_row(
        "SELECT id, venta_id, producto_id, cantidad, precio_unitario, subtotal, marca
         FROM ventas_items WHERE id = ?1",
        rusqlite::params![item_id],
        mapear_item,
    );

    match resultado {
        Ok(item) => Ok(item),
        Err(rusqlite::Error::QueryReturnedNoRows) => Err(AppError::ItemNoEncontrado(item_id)),
        Err(e) => Err(e.into()),
    }
}

fn validar_descuento(descuento: f64) -> AppResult<()> {
    if !(0.0..=100.0).contains(&descuento) {
        return Err(AppError::Validacion(format!(
            "Descuento fuera de rango: {descuento}"
        )));
    }
    Ok(())
}

fn mapear_venta(row: &rusqlite::Row<'_>) -> Result<Venta, rusqlite::Error> {
    Ok(Venta {
        id: Some(row.get(0)?),
        fecha: row.get(1)?,
        cliente: row.get(2)?,
        total_bruto: row.get(3)?,
        descuento_porcentaje: row.get(4)?,
        total_neto: row.get(5)?,
        estado: row.get(6)?,
        estado_facturacion: row.get(7)?,
        marca: row.get(8)?,
        tipo_venta: row.get(9)?,
        concesionario_id: row.get(10)?,
    })
}

fn mapear_item(row: &rusqlite::Row<'_>) -> Result<VentaItem, rusqlite::Error> {
    Ok(VentaItem {
        id: Some(row.get(0)?),
        venta_id: Some(row.get(1)?),
        producto_id: row.get(2)?,
        cantidad: row.get(3)?,
        precio_unitario: row.get(4)?,
        subtotal: row.get(5)?,
        marca: row.get(6)?,
    })
}
