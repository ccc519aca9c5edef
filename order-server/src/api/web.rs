//! Static web UI
//!
//! `/` and `/order/{order_uid}` both serve `index.html`; the page reads the id
//! from the location and calls the order API. Assets live under `/static`.

use axum::Router;
use std::path::Path;
use tower_http::services::{ServeDir, ServeFile};

use crate::core::ServerState;

pub fn router(web_dir: &Path) -> Router<ServerState> {
    let index = web_dir.join("index.html");

    Router::new()
        .route_service("/", ServeFile::new(&index))
        .route_service("/order/{order_uid}", ServeFile::new(&index))
        .nest_service("/static", ServeDir::new(web_dir))
}
