//! ==============================================================================
//! server.rs - web dashboard and json api
//! ==============================================================================
//!
//! purpose:
//!     serves the dashboard pages and the live reading.
//!
//! routes:
//!     GET /get_data              -> current reading as json
//!     GET /                      -> home.html
//!     GET /water_quality         -> water_quality.html
//!     GET /drone_mission         -> drone_mission.html
//!     GET /aquatic_life          -> aquatic_life.html
//!     GET /alerts                -> alerts.html
//!     GET /citizen_engagement    -> citizen_engagement.html
//!
//! relationships:
//!     - reads: store.rs (snapshot per request, lock released before encoding)
//!     - reads: <template_dir>/*.html at request time
//!     - started by: main.rs
//!
//! ==============================================================================

use crate::domain::Reading;
use crate::store::ReadingStore;

use anyhow::Result;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    routing::get,
    Router,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// route -> template file
pub const PAGES: &[(&str, &str)] = &[
    ("/", "home.html"),
    ("/water_quality", "water_quality.html"),
    ("/drone_mission", "drone_mission.html"),
    ("/aquatic_life", "aquatic_life.html"),
    ("/alerts", "alerts.html"),
    ("/citizen_engagement", "citizen_engagement.html"),
];

// ==============================================================================
// shared state
// ==============================================================================
// handed to every handler. cloning is cheap: the store is an arc handle and
// the template dir is shared.

#[derive(Clone)]
pub struct AppState {
    pub store: ReadingStore,
    pub template_dir: Arc<PathBuf>,
}

impl AppState {
    pub fn new(store: ReadingStore, template_dir: PathBuf) -> Self {
        Self {
            store,
            template_dir: Arc::new(template_dir),
        }
    }
}

/// build the full router with middleware applied
pub fn router(state: AppState) -> Router {
    let mut app = Router::new().route("/get_data", get(get_data_handler));

    for &(path, template) in PAGES {
        app = app.route(
            path,
            get(move |State(state): State<AppState>| async move {
                render_page(&state, template).await
            }),
        );
    }

    app.layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// serve until `shutdown` fires, then drain in-flight requests
pub async fn run_server(
    listener: TcpListener,
    state: AppState,
    shutdown: CancellationToken,
) -> Result<()> {
    info!(addr = %listener.local_addr()?, "web server listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    info!("web server stopped");
    Ok(())
}

// ==============================================================================
// handlers
// ==============================================================================

/// json api endpoint
/// the snapshot is copied out under the lock; encoding happens after release
async fn get_data_handler(State(state): State<AppState>) -> Json<Reading> {
    Json(state.store.read())
}

async fn render_page(state: &AppState, template: &str) -> Response {
    let path = state.template_dir.join(template);

    match tokio::fs::read_to_string(&path).await {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            warn!(template, path = %path.display(), error = %e, "template unavailable");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(format!(
                    r#"<!doctype html>
<html>
<head><title>error</title></head>
<body style="font-family: system-ui; padding: 2rem; background: #0b2530; color: #eee;">
    <h1 style="color: #ff6b6b;">⚠️ page unavailable</h1>
    <p>failed to load template <code>{}</code>:</p>
    <pre style="background: #12384a; padding: 1rem; border-radius: 8px; overflow-x: auto;">{}</pre>
</body>
</html>"#,
                    html_escape(template),
                    html_escape(&e.to_string())
                )),
            )
                .into_response()
        }
    }
}

/// escape html special characters to prevent xss
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
