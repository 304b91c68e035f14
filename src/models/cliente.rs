use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Cliente {
    pub id: Option<i64>,
    pub razon_social: String,
    pub cuit_cuil: Option<String>,
    pub fecha_creacion: Option<String>,
    pub marca: String,
}
