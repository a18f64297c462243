//! Table routes built from the schema registry: one `/<table>` route per table, GET and POST,
//! each registered with a handler closure over that table's definition.

use crate::handlers::table::{create, list};
use crate::state::AppState;
use axum::{body::Bytes, extract::State, routing::get, Router};
use std::sync::Arc;

pub fn table_routes(state: AppState) -> Router {
    let mut router: Router<AppState> = Router::new();
    for table in state.registry.tables() {
        let path = format!("/{}", table.name);
        tracing::info!(route = %path, "adding route");

        let read_table = Arc::clone(table);
        let write_table = Arc::clone(table);
        router = router.route(
            &path,
            get(move |State(state): State<AppState>| list(state, read_table)).post(
                move |State(state): State<AppState>, body: Bytes| create(state, write_table, body),
            ),
        );
    }
    router.with_state(state)
}
