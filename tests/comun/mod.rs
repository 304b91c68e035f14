#![allow(dead_code)]

use rusqlite::Connection;
use trastienda::models::{Cliente, Concesionario, ItemNuevo, NuevaVenta, Producto};
use trastienda::servicios::{concesion, productos};
use trastienda::Database;

pub fn conexion() -> Connection {
    init_trazas();
    Database::en_memoria().expect("base en memoria")
}

/// Logs de las operaciones visibles al correr con RUST_LOG.
pub fn init_trazas() {
    let filtro = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filtro)
        .with_test_writer()
        .try_init();
}

pub fn producto(codigo: &str, nombre: &str, cantidad: i64, precio: f64) -> Producto {
    Producto {
        id: None,
        codigo: codigo.to_string(),
        nombre: nombre.to_string(),
        categoria: None,
        cantidad,
        precio_unitario: precio,
        stock_minimo: 5,
        marca: "VETA".to_string(),
    }
}

pub fn sembrar_producto(conn: &Connection, nombre: &str, cantidad: i64, precio: f64) -> i64 {
    productos::crear_producto(conn, &producto("", nombre, cantidad, precio))
        .expect("producto sembrado")
}

pub fn concesionario(nombre: &str) -> Concesionario {
    Concesionario {
        id: None,
        nombre_socio: nombre.to_string(),
        cuit_cuil: Some("20-11111111-1".to_string()),
        contacto: Some("11-5555-0000".to_string()),
        marca: "VETA".to_string(),
    }
}

pub fn sembrar_concesionario(conn: &Connection, nombre: &str) -> i64 {
    concesion::crear_concesionario(conn, &concesionario(nombre)).expect("concesionario sembrado")
}

pub fn cliente(razon_social: &str, marca: &str) -> Cliente {
    Cliente {
        id: None,
        razon_social: razon_social.to_string(),
        cuit_cuil: Some("30-22222222-2".to_string()),
        fecha_creacion: None,
        marca: marca.to_string(),
    }
}

pub fn item(producto_id: i64, cantidad: i64, precio: f64) -> ItemNuevo {
    ItemNuevo {
        producto_id,
        cantidad,
        precio_unitario: precio,
    }
}

pub fn venta_directa(cliente: &str, descuento: f64, items: Vec<ItemNuevo>) -> NuevaVenta {
    NuevaVenta {
        cliente: cliente.to_string(),
        descuento_porcentaje: descuento,
        marca: "VETA".to_string(),
        items,
    }
}

/// Cantidad actual del producto en el depósito principal.
pub fn stock_de(conn: &Connection, producto_id: i64) -> i64 {
    conn.query_row(
        "SELECT cantidad FROM stock WHERE id = ?1",
        rusqlite::params![producto_id],
        |row| row.get(0),
    )
    .expect("producto existente")
}

/// Disponible en el libro de consignación; un renglón ausente cuenta cero.
pub fn disponible_concesion(conn: &Connection, concesionario_id: i64, producto_id: i64) -> f64 {
    match conn.query_row(
        "SELECT cantidad_disponible FROM concesion_stock
         WHERE concesionario_id = ?1 AND producto_id = ?2",
        rusqlite::params![concesionario_id, producto_id],
        |row| row.get(0),
    ) {
        Ok(valor) => valor,
        Err(rusqlite::Error::QueryReturnedNoRows) => 0.0,
        Err(e) => panic!("lectura del libro de consignación: {e}"),
    }
}
