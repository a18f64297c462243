mod common;
mod table;

pub use common::{common_routes, GREETING};
pub use table::table_routes;
