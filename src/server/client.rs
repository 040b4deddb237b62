//! The browser dashboard, compiled into the binary

use axum::{Router, response::Html, routing::get};

const DASHBOARD_HTML: &str = include_str!("../../assets/dashboard.html");

pub fn routes() -> Router {
    Router::new().route("/", get(dashboard_page))
}

async fn dashboard_page() -> Html<&'static str> {
    Html(DASHBOARD_HTML)
}
