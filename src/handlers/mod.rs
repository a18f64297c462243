//! HTTP handlers for the generated table routes.

pub mod table;
pub use table::*;
