mod comun;

use trastienda::models::{FACTURADO, NO_FACTURADO, TIPO_VENTA_DIRECTA};
use trastienda::servicios::{productos, ventas};
use trastienda::AppError;

#[test]
fn la_venta_directa_descuenta_stock_y_calcula_totales() {
    let mut conn = comun::conexion();
    let producto_id = comun::sembrar_producto(&conn, "Yerbera de cuero", 10, 100.0);

    let venta = ventas::registrar_venta(
        &mut conn,
        &comun::venta_directa("Kiosco Norte", 10.0, vec![comun::item(producto_id, 3, 100.0)]),
    )
    .expect("venta registrada");

    assert_eq!(comun::stock_de(&conn, producto_id), 7);
    assert_eq!(venta.venta.total_bruto, 300.0);
    assert_eq!(venta.venta.total_neto, 270.0);
    assert_eq!(venta.venta.tipo_venta, TIPO_VENTA_DIRECTA);
    assert_eq!(venta.venta.estado_facturacion, NO_FACTURADO);
    assert_eq!(venta.venta.concesionario_id, None);
    assert_eq!(venta.items.len(), 1);
    assert_eq!(venta.items[0].subtotal, 300.0);

    let guardada = ventas::obtener_venta(&conn, venta.venta.id.unwrap()).expect("venta guardada");
    assert_eq!(guardada.venta.total_neto, 270.0);
    assert_eq!(guardada.items[0].cantidad, 3);
}

#[test]
fn la_venta_sin_stock_suficiente_no_deja_rastro() {
    let mut conn = comun::conexion();
    let producto_id = comun::sembrar_producto(&conn, "Termo acero", 2, 50.0);

    let err = ventas::registrar_venta(
        &mut conn,
        &comun::venta_directa("Bazar Centro", 0.0, vec![comun::item(producto_id, 5, 50.0)]),
    )
    .unwrap_err();

    match err {
        AppError::StockInsuficiente {
            disponible, pedido, ..
        } => {
            assert_eq!(disponible, 2);
            assert_eq!(pedido, 5);
        }
        otro => panic!("error inesperado: {otro}"),
    }

    assert_eq!(comun::stock_de(&conn, producto_id), 2);
    assert!(ventas::leer_ventas(&conn, None).unwrap().is_empty());
    assert!(ventas::leer_ventas_items(&conn, None).unwrap().is_empty());
}

#[test]
fn un_faltante_en_el_lote_revierte_los_items_anteriores() {
    let mut conn = comun::conexion();
    let con_stock = comun::sembrar_producto(&conn, "Mate imperial", 10, 100.0);
    let sin_stock = comun::sembrar_producto(&conn, "Bombilla pico loro", 1, 20.0);

    let resultado = ventas::registrar_venta(
        &mut conn,
        &comun::venta_directa(
            "Bazar Centro",
            0.0,
            vec![
                comun::item(con_stock, 3, 100.0),
                comun::item(sin_stock, 5, 20.0),
            ],
        ),
    );

    assert!(matches!(
        resultado,
        Err(AppError::StockInsuficiente { .. })
    ));
    assert_eq!(comun::stock_de(&conn, con_stock), 10);
    assert_eq!(comun::stock_de(&conn, sin_stock), 1);
}

#[test]
fn vender_un_producto_inexistente_falla() {
    let mut conn = comun::conexion();

    let err = ventas::registrar_venta(
        &mut conn,
        &comun::venta_directa("Bazar Centro", 0.0, vec![comun::item(99, 1, 10.0)]),
    )
    .unwrap_err();

    assert!(matches!(err, AppError::ProductoNoEncontrado(99)));
}

#[test]
fn una_venta_sin_items_se_rechaza() {
    let mut conn = comun::conexion();

    let err =
        ventas::registrar_venta(&mut conn, &comun::venta_directa("Nadie", 0.0, vec![])).unwrap_err();

    assert!(matches!(err, AppError::Validacion(_)));
}

#[test]
fn un_descuento_fuera_de_rango_se_rechaza() {
    let mut conn = comun::conexion();
    let producto_id = comun::sembrar_producto(&conn, "Termo acero", 5, 50.0);

    let err = ventas::registrar_venta(
        &mut conn,
        &comun::venta_directa("Bazar", 150.0, vec![comun::item(producto_id, 1, 50.0)]),
    )
    .unwrap_err();

    assert!(matches!(err, AppError::Validacion(_)));
    assert_eq!(comun::stock_de(&conn, producto_id), 5);
}

#[test]
fn eliminar_una_venta_directa_repone_el_deposito() {
    let mut conn = comun::conexion();
    let producto_id = comun::sembrar_producto(&conn, "Yerbera de cuero", 10, 100.0);

    let venta = ventas::registrar_venta(
        &mut conn,
        &comun::venta_directa("Kiosco Norte", 0.0, vec![comun::item(producto_id, 4, 100.0)]),
    )
    .expect("venta registrada");
    assert_eq!(comun::stock_de(&conn, producto_id), 6);

    ventas::eliminar_venta(&mut conn, venta.venta.id.unwrap()).expect("venta eliminada");

    assert_eq!(comun::stock_de(&conn, producto_id), 10);
    assert!(ventas::leer_ventas(&conn, None).unwrap().is_empty());
    assert!(ventas::leer_ventas_items(&conn, None).unwrap().is_empty());
}

#[test]
fn eliminar_una_venta_inexistente_falla() {
    let mut conn = comun::conexion();

    let err = ventas::eliminar_venta(&mut conn, 42).unwrap_err();

    assert!(matches!(err, AppError::VentaNoEncontrada(42)));
}

#[test]
fn editar_la_cantidad_de_un_item_mueve_el_deposito_y_los_totales() {
    let mut conn = comun::conexion();
    let producto_id = comun::sembrar_producto(&conn, "Yerbera de cuero", 10, 100.0);

    let venta = ventas::registrar_venta(
        &mut conn,
        &comun::venta_directa("Kiosco Norte", 0.0, vec![comun::item(producto_id, 3, 100.0)]),
    )
    .expect("venta registrada");
    let venta_id = venta.venta.id.unwrap();
    let item_id = venta.items[0].id.unwrap();

    // Subir de 3 a 5 saca dos unidades más del depósito
    ventas::actualizar_cantidad_item(&mut conn, venta_id, item_id, 5).expect("item actualizado");
    assert_eq!(comun::stock_de(&conn, producto_id), 5);

    let guardada = ventas::obtener_venta(&conn, venta_id).unwrap();
    assert_eq!(guardada.items[0].cantidad, 5);
    assert_eq!(guardada.items[0].subtotal, 500.0);
    assert_eq!(guardada.venta.total_bruto, 500.0);
    assert_eq!(guardada.venta.total_neto, 500.0);

    // Bajar de 5 a 2 devuelve tres unidades
    ventas::actualizar_cantidad_item(&mut conn, venta_id, item_id, 2).expect("item actualizado");
    assert_eq!(comun::stock_de(&conn, producto_id), 8);

    let guardada = ventas::obtener_venta(&conn, venta_id).unwrap();
    assert_eq!(guardada.venta.total_neto, 200.0);
}

#[test]
fn editar_con_la_misma_cantidad_no_toca_nada() {
    let mut conn = comun::conexion();
    let producto_id = comun::sembrar_producto(&conn, "Termo acero", 10, 50.0);

    let venta = ventas::registrar_venta(
        &mut conn,
        &comun::venta_directa("Kiosco Norte", 0.0, vec![comun::item(producto_id, 3, 50.0)]),
    )
    .expect("venta registrada");
    let venta_id = venta.venta.id.unwrap();
    let item_id = venta.items[0].id.unwrap();

    ventas::actualizar_cantidad_item(&mut conn, venta_id, item_id, 3).expect("sin cambios");

    assert_eq!(comun::stock_de(&conn, producto_id), 7);
    let guardada = ventas::obtener_venta(&conn, venta_id).unwrap();
    assert_eq!(guardada.items[0].cantidad, 3);
    assert_eq!(guardada.venta.total_neto, 150.0);
}

#[test]
fn editar_sin_stock_suficiente_deja_todo_como_estaba() {
    let mut conn = comun::conexion();
    let producto_id = comun::sembrar_producto(&conn, "Termo acero", 5, 50.0);

    let venta = ventas::registrar_venta(
        &mut conn,
        &comun::venta_directa("Kiosco Norte", 0.0, vec![comun::item(producto_id, 3, 50.0)]),
    )
    .expect("venta registrada");
    let venta_id = venta.venta.id.unwrap();
    let item_id = venta.items[0].id.unwrap();
    assert_eq!(comun::stock_de(&conn, producto_id), 2);

    // Pide 3 más y solo quedan 2
    let err = ventas::actualizar_cantidad_item(&mut conn, venta_id, item_id, 6).unwrap_err();
    assert!(matches!(err, AppError::StockInsuficiente { .. }));

    assert_eq!(comun::stock_de(&conn, producto_id), 2);
    let guardada = ventas::obtener_venta(&conn, venta_id).unwrap();
    assert_eq!(guardada.items[0].cantidad, 3);
    assert_eq!(guardada.venta.total_neto, 150.0);
}

#[test]
fn el_item_tiene_que_pertenecer_a_la_venta() {
    let mut conn = comun::conexion();
    let producto_id = comun::sembrar_producto(&conn, "Yerbera de cuero", 20, 100.0);

    let venta_a = ventas::registrar_venta(
        &mut conn,
        &comun::venta_directa("Kiosco Norte", 0.0, vec![comun::item(producto_id, 2, 100.0)]),
    )
    .expect("venta registrada");
    let venta_b = ventas::registrar_venta(
        &mut conn,
        &comun::venta_directa("Bazar Centro", 0.0, vec![comun::item(producto_id, 1, 100.0)]),
    )
    .expect("venta registrada");

    let item_ajeno = venta_b.items[0].id.unwrap();
    let err = ventas::actualizar_cantidad_item(&mut conn, venta_a.venta.id.unwrap(), item_ajeno, 4)
        .unwrap_err();

    assert!(matches!(err, AppError::ItemNoEncontrado(_)));
    assert_eq!(comun::stock_de(&conn, producto_id), 17);
}

#[test]
fn actualizar_el_descuento_recalcula_el_neto() {
    let mut conn = comun::conexion();
    let producto_id = comun::sembrar_producto(&conn, "Yerbera de cuero", 10, 100.0);

    let venta = ventas::registrar_venta(
        &mut conn,
        &comun::venta_directa("Kiosco Norte", 0.0, vec![comun::item(producto_id, 2, 100.0)]),
    )
    .expect("venta registrada");
    let venta_id = venta.venta.id.unwrap();
    assert_eq!(venta.venta.total_neto, 200.0);

    ventas::actualizar_descuento(&mut conn, venta_id, 25.0).expect("descuento actualizado");

    let guardada = ventas::obtener_venta(&conn, venta_id).unwrap();
    assert_eq!(guardada.venta.descuento_porcentaje, 25.0);
    assert_eq!(guardada.venta.total_bruto, 200.0);
    assert_eq!(guardada.venta.total_neto, 150.0);

    let err = ventas::actualizar_descuento(&mut conn, venta_id, -5.0).unwrap_err();
    assert!(matches!(err, AppError::Validacion(_)));

    let err = ventas::actualizar_descuento(&mut conn, 99, 10.0).unwrap_err();
    assert!(matches!(err, AppError::VentaNoEncontrada(99)));
}

#[test]
fn el_estado_de_facturacion_solo_acepta_los_conocidos() {
    let mut conn = comun::conexion();
    let producto_id = comun::sembrar_producto(&conn, "Termo acero", 5, 50.0);

    let venta = ventas::registrar_venta(
        &mut conn,
        &comun::venta_directa("Kiosco Norte", 0.0, vec![comun::item(producto_id, 1, 50.0)]),
    )
    .expect("venta registrada");
    let venta_id = venta.venta.id.unwrap();

    ventas::actualizar_estado_facturacion(&conn, venta_id, FACTURADO).expect("estado actualizado");
    let guardada = ventas::obtener_venta(&conn, venta_id).unwrap();
    assert_eq!(guardada.venta.estado_facturacion, FACTURADO);

    let err = ventas::actualizar_estado_facturacion(&conn, venta_id, "pendiente").unwrap_err();
    assert!(matches!(err, AppError::Validacion(_)));

    let err = ventas::actualizar_estado_facturacion(&conn, 99, NO_FACTURADO).unwrap_err();
    assert!(matches!(err, AppError::VentaNoEncontrada(99)));
}

#[test]
fn las_ventas_se_listan_de_la_mas_nueva_a_la_mas_vieja() {
    let mut conn = comun::conexion();
    let producto_id = comun::sembrar_producto(&conn, "Yerbera de cuero", 20, 100.0);

    let mut cartera = comun::producto("", "Cartera de cuero", 5, 900.0);
    cartera.marca = "VENETO".to_string();
    let cartera_id = productos::crear_producto(&conn, &cartera).expect("producto sembrado");

    ventas::registrar_venta(
        &mut conn,
        &comun::venta_directa("Primera", 0.0, vec![comun::item(producto_id, 1, 100.0)]),
    )
    .expect("venta registrada");
    ventas::registrar_venta(
        &mut conn,
        &comun::venta_directa("Segunda", 0.0, vec![comun::item(producto_id, 1, 100.0)]),
    )
    .expect("venta registrada");

    let mut de_boutique =
        comun::venta_directa("Boutique", 0.0, vec![comun::item(cartera_id, 1, 900.0)]);
    de_boutique.marca = "VENETO".to_string();
    ventas::registrar_venta(&mut conn, &de_boutique).expect("venta registrada");

    let veta = ventas::leer_ventas(&conn, Some("VETA")).unwrap();
    assert_eq!(veta.len(), 2);
    assert_eq!(veta[0].cliente, "Segunda");
    assert_eq!(veta[1].cliente, "Primera");

    assert_eq!(ventas::leer_ventas(&conn, Some("VENETO")).unwrap().len(), 1);
    assert_eq!(ventas::leer_ventas(&conn, None).unwrap().len(), 3);
}
