use crate::config;
use crate::error::{AppError, AppResult};
use crate::models::{
    Concesionario, ConcesionStock, ConcesionStockDetalle, MovimientoConcesion, Venta,
    VentaCompleta, VentaItem, ESTADO_CONFIRMADA, NO_FACTURADO, TIPO_VENTA_CONCESION,
};
use rusqlite::Connection;
use tracing::{debug, info};

use super::productos;

/// Descuento mayorista aplicado a las ventas en consignación (porcentaje).
pub const DESCUENTO_MAYORISTA: f64 = 30.0;

pub fn crear_concesionario(conn: &Connection, socio: &Concesionario) -> AppResult<i64> {
    if socio.nombre_socio.trim().is_empty() {
        return Err(AppError::Validacion(
            "El nombre del socio no puede estar vacío".to_string(),
        ));
    }

    conn.execute(
        "INSERT INTO concesionarios (nombre_socio, cuit_cuil, contacto, marca)
         VALUES (?1, ?2, ?3, ?4)",
        rusqlite::params![socio.nombre_socio, socio.cuit_cuil, socio.contacto, socio.marca],
    )
    .map_err(|e| AppError::mapear_unique(e, &format!("el socio '{}'", socio.nombre_socio)))?;

    let id = conn.last_insert_rowid();
    debug!(id, nombre_socio = %socio.nombre_socio, "concesionario creado");
    Ok(id)
}

pub fn leer_concesionarios(conn: &Connection, marca: &str) -> AppResult<Vec<Concesionario>> {
    let mut stmt = conn.prepare(
        "SELECT id, nombre_socio, cuit_cuil, contacto, marca
         FROM concesionarios WHERE marca = ?1 ORDER BY nombre_socio",
    )?;
    let filas = stmt.query_map(rusqlite::params![marca], |row| {
        Ok(Concesionario {
            id: Some(row.get(0)?),
            nombre_socio: row.get(1)?,
            cuit_cuil: row.get(2)?,
            contacto: row.get(3)?,
            marca: row.get(4)?,
        })
    })?;
    Ok(filas.collect::<Result<Vec<_>, _>>()?)
}

pub fn actualizar_concesionario(conn: &Connection, socio: &Concesionario) -> AppResult<()> {
    let id = socio
        .id
        .ok_or_else(|| AppError::Validacion("ID requerido para actualizar".to_string()))?;

    let afectadas = conn
        .execute(
            "UPDATE concesionarios SET nombre_socio = ?1, cuit_cuil = ?2, contacto = ?3
             WHERE id = ?4",
            rusqlite::params![socio.nombre_socio, socio.cuit_cuil, socio.contacto, id],
        )
        .map_err(|e| AppError::mapear_unique(e, &format!("otro socio '{}'", socio.nombre_socio)))?;

    if afectadas == 0 {
        return Err(AppError::ConcesionarioNoEncontrado(id));
    }

    Ok(())
}

/// Borra un socio siempre que no tenga stock en consignación activo.
/// Los renglones en cero se limpian junto con el socio.
pub fn eliminar_concesionario(conn: &mut Connection, concesionario_id: i64) -> AppResult<()> {
    let tx = conn.transaction()?;

    let con_stock: i64 = tx.query_row(
        "SELECT COUNT(*) FROM concesion_stock
         WHERE concesionario_id = ?1 AND cantidad_disponible > 0",
        rusqlite::params![concesionario_id],
        |row| row.get(0),
    )?;
    if con_stock > 0 {
        return Err(AppError::ConcesionarioConStock(concesionario_id));
    }

    tx.execute(
        "DELETE FROM concesion_stock WHERE concesionario_id = ?1",
        rusqlite::params![concesionario_id],
    )?;

    let afectadas = tx.execute(
        "DELETE FROM concesionarios WHERE id = ?1",
        rusqlite::params![concesionario_id],
    )?;
    if afectadas == 0 {
        return Err(AppError::ConcesionarioNoEncontrado(concesionario_id));
    }

    tx.commit()?;
    info!(concesionario_id, "concesionario eliminado");
    Ok(())
}

/// Mueve stock del depósito principal al poder de un socio. El lote entero
/// se aplica o se descarta: un faltante en cualquier item lo aborta todo.
pub fn registrar_salida(
    conn: &mut Connection,
    concesionario_id: i64,
    marca: &str,
    items: &[MovimientoConcesion],
) -> AppResult<()> {
    if items.is_empty() {
        return Err(AppError::Validacion("La salida no tiene items".to_string()));
    }

    let tx = conn.transaction()?;
    verificar_concesionario(&tx, concesionario_id)?;

    for item in items {
        if item.cantidad <= 0 {
            return Err(AppError::Validacion(format!(
                "Cantidad inválida para el producto {}: {}",
                item.producto_id, item.cantidad
            )));
        }

        productos::descontar_stock(&tx, item.producto_id, item.cantidad)?;

        tx.execute(
            "INSERT INTO concesion_stock (concesionario_id, producto_id, marca, cantidad_disponible, fecha_salida)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(concesionario_id, producto_id) DO UPDATE SET
                 cantidad_disponible = cantidad_disponible + excluded.cantidad_disponible,
                 fecha_salida = excluded.fecha_salida",
            rusqlite::params![
                concesionario_id,
                item.producto_id,
                marca,
                item.cantidad as f64,
                config::ahora(),
            ],
        )?;
    }

    tx.commit()?;
    info!(concesionario_id, items = items.len(), "salida a concesión registrada");
    Ok(())
}

/// Registra una venta desde el stock que el socio tiene en su poder.
///
/// El precio unitario no viene del caller: se toma el precio de lista del
/// catálogo y se le aplica el descuento mayorista fijo. La cabecera guarda
/// el bruto a precio de lista y el neto a precio mayorista.
pub fn confirmar_venta_concesion(
    conn: &mut Connection,
    concesionario_id: i64,
    marca: &str,
    items: &[MovimientoConcesion],
) -> AppResult<VentaCompleta> {
    if items.is_empty() {
        return Err(AppError::Validacion("La venta no tiene items".to_string()));
    }

    let tx = conn.transaction()?;

    let nombre_socio: String = match tx.query_row(
        "SELECT nombre_socio FROM concesionarios WHERE id = ?1",
        rusqlite::params![concesionario_id],
        |row| row.get(0),
    ) {
        Ok(nombre) => nombre,
        Err(rusqlite::Error::QueryReturnedNoRows) => {
            return Err(AppError::ConcesionarioNoEncontrado(concesionario_id))
        }
        Err(e) => return Err(e.into()),
    };

    let mut total_bruto = 0.0_f64;
    let mut total_neto = 0.0_f64;
    let mut items_venta = Vec::new();

    for item in items {
        if item.cantidad <= 0 {
            return Err(AppError::Validacion(format!(
                "Cantidad inválida para el producto {}: {}",
                item.producto_id, item.cantidad
            )));
        }

        descontar_stock_concesion(&tx, concesionario_id, item.producto_id, item.cantidad)?;

        let precio_lista: f64 = match tx.query_row(
            "SELECT precio_unitario FROM stock WHERE id = ?1",
            rusqlite::params![item.producto_id],
            |row| row.get(0),
        ) {
            Ok(precio) => precio,
            Err(rusqlite::Error::QueryReturnedNoRows) => {
                return Err(AppError::ProductoNoEncontrado(item.producto_id))
            }
            Err(e) => return Err(e.into()),
        };

        let precio_mayorista = precio_lista * (1.0 - DESCUENTO_MAYORISTA / 100.0);
        let subtotal = precio_mayorista * item.cantidad as f64;

        total_bruto += precio_lista * item.cantidad as f64;
        total_neto += subtotal;

        items_venta.push(VentaItem {
            id: None,
            venta_id: None,
            producto_id: item.producto_id,
            cantidad: item.cantidad,
            precio_unitario: precio_mayorista,
            subtotal,
            marca: marca.to_string(),
        });
    }

    let fecha = config::ahora();
    let cliente = format!("{nombre_socio} (Concesión)");

    tx.execute(
        "INSERT INTO ventas (fecha, cliente, total_bruto, descuento_porcentaje, total_neto,
         estado, estado_facturacion, marca, tipo_venta, concesionario_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        rusqlite::params![
            fecha,
            cliente,
            total_bruto,
            DESCUENTO_MAYORISTA,
            total_neto,
            ESTADO_CONFIRMADA,
            NO_FACTURADO,
            marca,
            TIPO_VENTA_CONCESION,
            concesionario_id,
        ],
    )?;

    let venta_id = tx.last_insert_rowid();

    for item in &mut items_venta {
        tx.execute(
            "INSERT INTO ventas_items (venta_id, producto_id, cantidad, precio_unitario, subtotal, marca)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![
                venta_id,
                item.producto_id,
                item.cantidad,
                item.precio_unitario,
                item.subtotal,
                item.marca,
            ],
        )?;
        item.id = Some(tx.last_insert_rowid());
        item.venta_id = Some(venta_id);
    }

    tx.commit()?;
    info!(venta_id, concesionario_id, total_neto, "venta en consignación registrada");

    Ok(VentaCompleta {
        venta: Venta {
            id: Some(venta_id),
            fecha,
            cliente,
            total_bruto,
            descuento_porcentaje: DESCUENTO_MAYORISTA,
            total_neto,
            estado: ESTADO_CONFIRMADA.to_string(),
            estado_facturacion: NO_FACTURADO.to_string(),
            marca: marca.to_string(),
            tipo_venta: TIPO_VENTA_CONCESION.to_string(),
            concesionario_id: Some(concesionario_id),
        },
        items: items_venta,
    })
}

/// Stock disponible en poder de un socio, con nombre y código del producto.
/// Los renglones en cero no se listan.
pub fn leer_stock_concesion(
    conn: &Connection,
    concesionario_id: i64,
) -> AppResult<Vec<ConcesionStockDetalle>> {
    let mut stmt = conn.prepare(
        "SELECT cs.concesionario_id, cs.producto_id, s.nombre, s.codigo,
         cs.cantidad_disponible, cs.fecha_salida
         FROM concesion_stock cs
         JOIN stock s ON cs.producto_id = s.id
         WHERE cs.concesionario_id = ?1 AND cs.cantidad_disponible > 0
         ORDER BY s.nombre",
    )?;
    let filas = stmt.query_map(rusqlite::params![concesionario_id], |row| {
        Ok(ConcesionStockDetalle {
            concesionario_id: row.get(0)?,
            producto_id: row.get(1)?,
            producto_nombre: row.get(2)?,
            producto_codigo: row.get(3)?,
            cantidad_disponible: row.get(4)?,
            fecha_salida: row.get(5)?,
        })
    })?;
    Ok(filas.collect::<Result<Vec<_>, _>>()?)
}

/// Todos los renglones del libro de una marca, incluidos los saldados en
/// cero. Pensado para el volcado completo, no para pantallas.
pub fn leer_renglones_concesion(conn: &Connection, marca: &str) -> AppResult<Vec<ConcesionStock>> {
    let mut stmt = conn.prepare(
        "SELECT id, concesionario_id, producto_id, marca, cantidad_disponible, fecha_salida
         FROM concesion_stock WHERE marca = ?1 ORDER BY id",
    )?;
    let filas = stmt.query_map(rusqlite::params![marca], |row| {
        Ok(ConcesionStock {
            id: Some(row.get(0)?),
            concesionario_id: row.get(1)?,
            producto_id: row.get(2)?,
            marca: row.get(3)?,
            cantidad_disponible: row.get(4)?,
            fecha_salida: row.get(5)?,
        })
    })?;
    Ok(filas.collect::<Result<Vec<_>, _>>()?)
}

/// Devuelve stock del poder de un socio al depósito principal.
pub fn devolver_stock(
    conn: &mut Connection,
    concesionario_id: i64,
    producto_id: i64,
    cantidad: i64,
) -> AppResult<()> {
    let tx = conn.transaction()?;
    devolver_item(&tx, concesionario_id, producto_id, cantidad)?;
    tx.commit()?;
    info!(concesionario_id, producto_id, cantidad, "devolución de concesión");
    Ok(())
}

/// Devolución de varios items en una sola transacción: o vuelven todos al
/// depósito o no vuelve ninguno.
pub fn devolver_stock_masivo(
    conn: &mut Connection,
    concesionario_id: i64,
    items: &[MovimientoConcesion],
) -> AppResult<()> {
    if items.is_empty() {
        return Err(AppError::Validacion(
            "La devolución no tiene items".to_string(),
        ));
    }

    let tx = conn.transaction()?;
    for item in items {
        devolver_item(&tx, concesionario_id, item.producto_id, item.cantidad)?;
    }
    tx.commit()?;
    info!(concesionario_id, items = items.len(), "devolución masiva de concesión");
    Ok(())
}

fn devolver_item(
    conn: &Connection,
    concesionario_id: i64,
    producto_id: i64,
    cantidad: i64,
) -> AppResult<()> {
    if cantidad <= 0 {
        return Err(AppError::Validacion(format!(
            "Cantidad inválida para el producto {producto_id}: {cantidad}"
        )));
    }

    descontar_stock_concesion(conn, concesionario_id, producto_id, cantidad)?;
    productos::reponer_stock(conn, producto_id, cantidad)?;
    Ok(())
}

pub(crate) fn verificar_concesionario(conn: &Connection, concesionario_id: i64) -> AppResult<()> {
    let existe: i64 = conn.query_row(
        "SELECT COUNT(*) FROM concesionarios WHERE id = ?1",
        rusqlite::params![concesionario_id],
        |row| row.get(0),
    )?;

    if existe == 0 {
        return Err(AppError::ConcesionarioNoEncontrado(concesionario_id));
    }
    Ok(())
}

/// Descuenta del libro de consignación en un solo UPDATE condicional.
/// Un renglón ausente cuenta como cero disponible.
pub(crate) fn descontar_stock_concesion(
    conn: &Connection,
    concesionario_id: i64,
    producto_id: i64,
    cantidad: i64,
) -> AppResult<()> {
    let afectadas = conn.execute(
        "UPDATE concesion_stock SET cantidad_disponible = cantidad_disponible - ?1
         WHERE concesionario_id = ?2 AND producto_id = ?3 AND cantidad_disponible >= ?1",
        rusqlite::params![cantidad as f64, concesionario_id, producto_id],
    )?;

    if afectadas == 0 {
        let disponible: f64 = match conn.query_row(
            "SELECT cantidad_disponible FROM concesion_stock
             WHERE concesionario_id = ?1 AND producto_id = ?2",
            rusqlite::params![concesionario_id, producto_id],
            |row| row.get(0),
        ) {
            Ok(valor) => valor,
            Err(rusqlite::Error::QueryReturnedNoRows) => 0.0,
            Err(e) => return Err(e.into()),
        };

        return Err(AppError::StockConcesionInsuficiente {
            producto_id,
            disponible,
            pedido: cantidad,
        });
    }

    Ok(())
}

/// Repone cantidad al libro del socio (reversa de una venta en consignación).
/// Crea el renglón si hiciera falta; no pisa la fecha de salida original.
pub(crate) fn reponer_stock_concesion(
    conn: &Connection,
    concesionario_id: i64,
    producto_id: i64,
    marca: &str,
    cantidad: i64,
) -> AppResult<()> {
    conn.execute(
        "INSERT INTO concesion_stock (concesionario_id, producto_id, marca, cantidad_disponible, fecha_salida)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(concesionario_id, producto_id) DO UPDATE SET
             cantidad_disponible = cantidad_disponible + excluded.cantidad_disponible",
        rusqlite::params![
            concesionario_id,
            producto_id,
            marca,
            cantidad as f64,
            config::ahora(),
        ],
    )?;

    Ok(())
}
