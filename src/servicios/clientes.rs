use crate::config;
use crate::error::{AppError, AppResult};
use crate::models::Cliente;
use rusqlite::Connection;
use tracing::debug;

pub fn crear_cliente(conn: &Connection, cliente: &Cliente) -> AppResult<i64> {
    if cliente.razon_social.trim().is_empty() {
        return Err(AppError::Validacion(
            "La razón social no puede estar vacía".to_string(),
        ));
    }

    let fecha_creacion = config::ahora();

    conn.execute(
        "INSERT INTO clientes (razon_social, cuit_cuil, fecha_creacion, marca)
         VALUES (?1, ?2, ?3, ?4)",
        rusqlite::params![
            cliente.razon_social,
            cliente.cuit_cuil,
            fecha_creacion,
            cliente.marca,
        ],
    )
    .map_err(|e| {
        AppError::mapear_unique(e, &format!("el cliente '{}'", cliente.razon_social))
    })?;

    let id = conn.last_insert_rowid();
    debug!(id, razon_social = %cliente.razon_social, "cliente creado");
    Ok(id)
}

pub fn leer_clientes(conn: &Connection, marca: Option<&str>) -> AppResult<Vec<Cliente>> {
    let clientes = match marca {
        Some(m) => {
            let mut stmt = conn.prepare(
                "SELECT id, razon_social, cuit_cuil, fecha_creacion, marca
                 FROM clientes WHERE marca = ?1 ORDER BY razon_social ASC",
            )?;
            let filas = stmt.query_map(rusqlite::params![m], mapear_cliente)?;
            filas.collect::<Result<Vec<_>, _>>()?
        }
        None => {
            let mut stmt = conn.prepare(
                "SELECT id, razon_social, cuit_cuil, fecha_creacion, marca
                 FROM clientes ORDER BY razon_social ASC",
            )?;
            let filas = stmt.query_map([], mapear_cliente)?;
            filas.collect::<Result<Vec<_>, _>>()?
        }
    };

    Ok(clientes)
}

pub fn actualizar_cliente(conn: &Connection, cliente: &Cliente) -> AppResult<()> {
    let id = cliente
        .id
        .ok_or_else(|| AppError::Validacion("ID requerido para actualizar".to_string()))?;

    let afectadas = conn
        .execute(
            "UPDATE clientes SET razon_social = ?1, cuit_cuil = ?2 WHERE id = ?3",
            rusqlite::params![cliente.razon_social, cliente.cuit_cuil, id],
        )
        .map_err(|e| {
            AppError::mapear_unique(e, &format!("otro cliente '{}'", cliente.razon_social))
        })?;

    if afectadas == 0 {
        return Err(AppError::ClienteNoEncontrado(id));
    }

    Ok(())
}

pub fn eliminar_cliente(conn: &Connection, cliente_id: i64) -> AppResult<()> {
    let afectadas = conn.execute(
        "DELETE FROM clientes WHERE id = ?1",
        rusqlite::params![cliente_id],
    )?;

    if afectadas == 0 {
        return Err(AppError::ClienteNoEncontrado(cliente_id));
    }

    Ok(())
}

fn mapear_cliente(row: &rusqlite::Row<'_>) -> Result<Cliente, rusqlite::Error> {
    Ok(Cliente {
        id: Some(row.get(0)?),
        razon_social: row.get(1)?,
        cuit_cuil: row.get(2)?,
        fecha_creacion: row.get(3)?,
        marca: row.get(4)?,
    })
}
