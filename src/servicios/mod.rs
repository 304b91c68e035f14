pub mod clientes;
pub mod concesion;
pub mod exportar;
pub mod productos;
pub mod reportes;
pub mod ventas;
