use axum::{
    extract::{Request, State},
    middleware::{self, Next},
    response::{Redirect, Response},
    routing::get,
    Router,
};
use motion_portfolio::{
    assets::normalize_base_path,
    logging::{log_event, LogConfig, LogLevel, DEFAULT_LOG_LEVEL},
};
use std::path::PathBuf;
use tokio::time::Instant;
use tower_http::services::{ServeDir, ServeFile};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DIST_DIR: &str = "dist";

#[derive(Clone, Debug, PartialEq)]
struct SiteConfig {
    port: u16,
    dist_dir: PathBuf,
    base_path: String,
    log: LogConfig,
}

impl SiteConfig {
    fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let port = lookup("PORT")
            .and_then(|value| value.trim().parse::<u16>().ok())
            .filter(|port| *port > 0)
            .unwrap_or(DEFAULT_PORT);
        let dist_dir = non_empty(lookup("DIST_DIR"))
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DIST_DIR));
        let base_path = non_empty(lookup("PORTFOLIO_BASE_PATH"))
            .map(|value| normalize_base_path(&value))
            .unwrap_or_default();
        let level = non_empty(lookup("LOG_LEVEL"))
            .and_then(|value| LogLevel::parse(&value))
            .unwrap_or(DEFAULT_LOG_LEVEL);

        Self {
            port,
            dist_dir,
            base_path,
            log: LogConfig::new(level),
        }
    }

    fn index_file(&self) -> PathBuf {
        self.dist_dir.join("index.html")
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = SiteConfig::from_env();
    let bind_address = format!("0.0.0.0:{}", config.port);
    let app = router(&config);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    log_event(
        &config.log,
        LogLevel::Info,
        "server_start",
        serde_json::json!({
            "url": format!("http://127.0.0.1:{}{}/", config.port, config.base_path),
            "dist_dir": config.dist_dir.display().to_string(),
            "base_path": config.base_path.as_str(),
        }),
    );
    axum::serve(listener, app).await?;
    Ok(())
}

/// Static bundle under the base path. Unknown paths get `index.html` so deep
/// links land on the single page.
fn router(config: &SiteConfig) -> Router {
    let static_service = ServeDir::new(&config.dist_dir).fallback(ServeFile::new(config.index_file()));

    let app = if config.base_path.is_empty() {
        Router::new().fallback_service(static_service)
    } else {
        let home = format!("{}/", config.base_path);
        Router::new()
            .route("/", get(move || async move { Redirect::permanent(&home) }))
            .nest_service(&config.base_path, static_service)
    };

    app.layer(middleware::from_fn_with_state(config.log, log_request))
}

async fn log_request(State(log): State<LogConfig>, request: Request, next: Next) -> Response {
    let started_at = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;

    log_event(
        &log,
        LogLevel::Debug,
        "request_complete",
        serde_json::json!({
            "method": method.as_str(),
            "path": path,
            "status": response.status().as_u16(),
            "duration_ms": started_at.elapsed().as_millis() as u64,
        }),
    );
    response
}
