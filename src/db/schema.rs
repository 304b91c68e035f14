use rusqlite::Connection;

pub fn crear_tablas(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "
        -- Depósito principal, un renglón por producto y marca
        CREATE TABLE IF NOT EXISTS stock (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            codigo TEXT NOT NULL DEFAULT '',
            nombre TEXT NOT NULL,
            categoria TEXT,
            cantidad INTEGER NOT NULL DEFAULT 0,
            precio_unitario REAL NOT NULL DEFAULT 0,
            stock_minimo INTEGER NOT NULL DEFAULT 5,
            marca TEXT NOT NULL DEFAULT 'VETA'
        );

        CREATE INDEX IF NOT EXISTS idx_stock_marca ON stock(marca);
        CREATE INDEX IF NOT EXISTS idx_stock_codigo ON stock(codigo);

        -- Ventas (cabecera); el concesionario solo aplica a ventas en consignación
        CREATE TABLE IF NOT EXISTS ventas (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            fecha TEXT NOT NULL,
            cliente TEXT NOT NULL,
            total_bruto REAL NOT NULL DEFAULT 0,
            descuento_porcentaje REAL NOT NULL DEFAULT 0,
            total_neto REAL NOT NULL DEFAULT 0,
            estado TEXT NOT NULL DEFAULT 'confirmada',
            estado_facturacion TEXT NOT NULL DEFAULT 'No Facturado',
            marca TEXT NOT NULL DEFAULT 'VETA',
            tipo_venta TEXT NOT NULL DEFAULT 'Venta Directa',
            concesionario_id INTEGER
        );

        CREATE INDEX IF NOT EXISTS idx_ventas_marca ON ventas(marca);
        CREATE INDEX IF NOT EXISTS idx_ventas_fecha ON ventas(fecha);
        CREATE INDEX IF NOT EXISTS idx_ventas_concesionario ON ventas(concesionario_id);

        -- Detalle de ventas, precio congelado al vender
        CREATE TABLE IF NOT EXISTS ventas_items (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            venta_id INTEGER NOT NULL,
            producto_id INTEGER NOT NULL,
            cantidad INTEGER NOT NULL,
            precio_unitario REAL NOT NULL,
            subtotal REAL NOT NULL,
            marca TEXT NOT NULL DEFAULT 'VETA',
            FOREIGN KEY (venta_id) REFERENCES ventas(id),
            FOREIGN KEY (producto_id) REFERENCES stock(id)
        );

        CREATE INDEX IF NOT EXISTS idx_ventas_items_venta ON ventas_items(venta_id);

        -- Clientes, razón social única dentro de cada marca
        CREATE TABLE IF NOT EXISTS clientes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            razon_social TEXT NOT NULL,
            cuit_cuil TEXT,
            fecha_creacion TEXT,
            marca TEXT NOT NULL DEFAULT 'VETA',
            UNIQUE (razon_social, marca)
        );

        CREATE INDEX IF NOT EXISTS idx_clientes_marca ON clientes(marca);

        -- Socios con stock en consignación
        CREATE TABLE IF NOT EXISTS concesionarios (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            nombre_socio TEXT NOT NULL UNIQUE,
            cuit_cuil TEXT,
            contacto TEXT,
            marca TEXT NOT NULL DEFAULT 'VETA'
        );

        -- Libro de consignación: lo que cada socio tiene en su poder.
        -- producto_id sin FK a propósito: el producto puede borrarse del
        -- catálogo mientras el socio todavía lo tiene.
        CREATE TABLE IF NOT EXISTS concesion_stock (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            concesionario_id INTEGER NOT NULL,
            producto_id INTEGER NOT NULL,
            marca TEXT NOT NULL DEFAULT 'VETA',
            cantidad_disponible REAL NOT NULL DEFAULT 0,
            fecha_salida TEXT,
            FOREIGN KEY (concesionario_id) REFERENCES concesionarios(id),
            UNIQUE (concesionario_id, producto_id)
        );

        CREATE INDEX IF NOT EXISTS idx_concesion_stock_socio ON concesion_stock(concesionario_id);
        ",
    )?;

    Ok(())
}
