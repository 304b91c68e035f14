pub mod cliente;
pub mod concesionario;
pub mod producto;
pub mod venta;

pub use cliente::*;
pub use concesionario::*;
pub use producto::*;
pub use venta::*;
