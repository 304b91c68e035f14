use crate::error::{AppError, AppResult};
use crate::models::Producto;
use rusqlite::Connection;
use tracing::debug;

/// Normaliza códigos numéricos a un mínimo de dos dígitos ("7" -> "07").
fn normalizar_codigo(codigo: &str) -> String {
    let limpio = codigo.trim();
    if !limpio.is_empty() && limpio.chars().all(|c| c.is_ascii_digit()) {
        format!("{:0>2}", limpio)
    } else {
        limpio.to_string()
    }
}

pub fn crear_producto(conn: &Connection, producto: &Producto) -> AppResult<i64> {
    if producto.cantidad < 0 {
        return Err(AppError::Validacion(format!(
            "Cantidad inicial inválida: {}",
            producto.cantidad
        )));
    }

    conn.execute(
        "INSERT INTO stock (codigo, nombre, categoria, cantidad, precio_unitario, stock_minimo, marca)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        rusqlite::params![
            normalizar_codigo(&producto.codigo),
            producto.nombre,
            producto.categoria,
            producto.cantidad,
            producto.precio_unitario,
            producto.stock_minimo,
            producto.marca,
        ],
    )?;

    let id = conn.last_insert_rowid();
    debug!(id, nombre = %producto.nombre, marca = %producto.marca, "producto creado");
    Ok(id)
}

pub fn leer_stock(conn: &Connection, marca: Option<&str>) -> AppResult<Vec<Producto>> {
    let productos = match marca {
        Some(m) => {
            let mut stmt = conn.prepare(
                "SELECT id, codigo, nombre, categoria, cantidad, precio_unitario, stock_minimo, marca
                 FROM stock WHERE marca = ?1 ORDER BY id",
            )?;
            let filas = stmt.query_map(rusqlite::params![m], mapear_producto)?;
            filas.collect::<Result<Vec<_>, _>>()?
        }
        None => {
            let mut stmt = conn.prepare(
                "SELECT id, codigo, nombre, categoria, cantidad, precio_unitario, stock_minimo, marca
                 FROM stock ORDER BY id",
            )?;
            let filas = stmt.query_map([], mapear_producto)?;
            filas.collect::<Result<Vec<_>, _>>()?
        }
    };

    Ok(productos)
}

pub fn obtener_producto(conn: &Connection, producto_id: i64) -> AppResult<Option<Producto>> {
    let resultado = conn.query_row(
        "SELECT id, codigo, nombre, categoria, cantidad, precio_unitario, stock_minimo, marca
         FROM stock WHERE id = ?1",
        rusqlite::params![producto_id],
        mapear_producto,
    );

    match resultado {
        Ok(producto) => Ok(Some(producto)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Actualiza los datos de catálogo. La cantidad en depósito no se toca acá:
/// eso es terreno de las ventas, la consignación y `ajustar_cantidad`.
pub fn actualizar_producto(conn: &Connection, producto: &Producto) -> AppResult<()> {
    let id = producto
        .id
        .ok_or_else(|| AppError::Validacion("ID requerido para actualizar".to_string()))?;

    let afectadas = conn.execute(
        "UPDATE stock SET codigo = ?1, nombre = ?2, categoria = ?3, precio_unitario = ?4,
         stock_minimo = ?5, marca = ?6
         WHERE id = ?7",
        rusqlite::params![
            normalizar_codigo(&producto.codigo),
            producto.nombre,
            producto.categoria,
            producto.precio_unitario,
            producto.stock_minimo,
            producto.marca,
            id,
        ],
    )?;

    if afectadas == 0 {
        return Err(AppError::ProductoNoEncontrado(id));
    }

    Ok(())
}

/// Fija la cantidad absoluta en depósito (ajuste manual de inventario).
pub fn ajustar_cantidad(conn: &Connection, producto_id: i64, cantidad: i64) -> AppResult<()> {
    if cantidad < 0 {
        return Err(AppError::Validacion(format!(
            "Cantidad inválida: {cantidad}"
        )));
    }

    let afectadas = conn.execute(
        "UPDATE stock SET cantidad = ?1 WHERE id = ?2",
        rusqlite::params![cantidad, producto_id],
    )?;

    if afectadas == 0 {
        return Err(AppError::ProductoNoEncontrado(producto_id));
    }

    debug!(producto_id, cantidad, "ajuste manual de stock");
    Ok(())
}

pub fn eliminar_producto(conn: &Connection, producto_id: i64) -> AppResult<()> {
    let afectadas = conn.execute(
        "DELETE FROM stock WHERE id = ?1",
        rusqlite::params![producto_id],
    )?;

    if afectadas == 0 {
        return Err(AppError::ProductoNoEncontrado(producto_id));
    }

    Ok(())
}

/// Descuenta del depósito en un solo UPDATE condicional: si la cantidad no
/// alcanza no se modifica nada y se informa cuánto había.
pub(crate) fn descontar_stock(conn: &Connection, producto_id: i64, cantidad: i64) -> AppResult<()> {
    let afectadas = conn.execute(
        "UPDATE stock SET cantidad = cantidad - ?1 WHERE id = ?2 AND cantidad >= ?1",
        rusqlite::params![cantidad, producto_id],
    )?;

    if afectadas == 0 {
        // Cero filas: o el producto no existe o no alcanza el stock
        let fila = conn.query_row(
            "SELECT nombre, cantidad FROM stock WHERE id = ?1",
            rusqlite::params![producto_id],
            |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)),
        );

        return match fila {
            Ok((nombre, disponible)) => Err(AppError::StockInsuficiente {
                producto: nombre,
                disponible,
                pedido: cantidad,
            }),
            Err(rusqlite::Error::QueryReturnedNoRows) => {
                Err(AppError::ProductoNoEncontrado(producto_id))
            }
            Err(e) => Err(e.into()),
        };
    }

    Ok(())
}

pub(crate) fn reponer_stock(conn: &Connection, producto_id: i64, cantidad: i64) -> AppResult<()> {
    let afectadas = conn.execute(
        "UPDATE stock SET cantidad = cantidad + ?1 WHERE id = ?2",
        rusqlite::params![cantidad, producto_id],
    )?;

    if afectadas == 0 {
        return Err(AppError::ProductoNoEncontrado(producto_id));
    }

    Ok(())
}

fn mapear_producto(row: &rusqlite::Row<'_>) -> Result<Producto, rusqlite::Error> {
    Ok(Producto {
        id: Some(row.get(0)?),
        codigo: row.get(1)?,
        nombre: row.get(2)?,
        categoria: row.get(3)?,
        cantidad: row.get(4)?,
        precio_unitario: row.get(5)?,
        stock_minimo: row.get(6)?,
        marca: row.get(7)?,
    })
}
