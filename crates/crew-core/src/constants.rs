//! Constantes del motor core.
//!
//! `ENGINE_VERSION` forma parte del input del `definition_hash` del grafo: un
//! cambio incompatible en la semántica de scheduling debe subirla.

/// Versión lógica del motor de triggers.
pub const ENGINE_VERSION: &str = "C1.0";

/// Clave bajo la que una unidad fallida deja el mensaje de error en
/// `result`.
pub const ERROR_RESULT_KEY: &str = "error";

/// Clave usada cuando el crew no devuelve salida estructurada y hay que
/// envolver la salida cruda.
pub const DEFAULT_RESULT_KEY: &str = "overview";
