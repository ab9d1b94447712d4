//! ProbViz Server: distribution curves and compound samplers over HTTP.
//!
//! Every endpoint is a stateless `GET` that returns JSON.
//!
//! # Endpoints
//!
//! - `GET /api/distribution/{family}?<params>` → `{x, y, title}`
//! - `GET /api/sampling/negative-binomial?r&p&size` → `{samples}`
//! - `GET /api/sampling/geometric?p&size` → `{samples}`
//! - `GET /api/sampling/geometric-sum?p&r&size` → `{samples}`
//! - `GET /api/health` → server status, version, uptime

mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::http::{HeaderValue, Method};
use clap::Parser;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use state::AppState;

/// ProbViz server: probability distribution data for the browser front end.
#[derive(Parser, Debug)]
#[command(name = "probviz-server", version = pv_core::VERSION, about)]
struct Cli {
    /// Port to listen on.
    #[arg(short, long, default_value = "8080")]
    port: u16,

    /// Bind address.
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Allowed CORS origin. Repeat for several; `*` allows any origin.
    #[arg(long = "allow-origin", default_value = "http://localhost:3000")]
    allow_origins: Vec<String>,

    /// Largest `size` accepted by the sampling endpoints; larger requests are capped.
    #[arg(long, default_value = "1000000")]
    max_sample_size: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    let cli = Cli::parse();

    let cors = cors_layer(&cli.allow_origins)?;
    let state = Arc::new(AppState::new(cli.max_sample_size));

    let app = Router::new()
        .merge(routes::router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state);

    let addr: SocketAddr = format!("{}:{}", cli.host, cli.port).parse()?;
    tracing::info!(
        %addr,
        origins = ?cli.allow_origins,
        max_sample_size = cli.max_sample_size,
        version = pv_core::VERSION,
        "probviz-server starting"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Cross-origin policy: any method and header, origins from the command line.
fn cors_layer(origins: &[String]) -> anyhow::Result<CorsLayer> {
    let base = CorsLayer::new().allow_methods([Method::GET, Method::OPTIONS]).allow_headers(Any);
    if origins.iter().any(|o| o == "*") {
        return Ok(base.allow_origin(Any));
    }
    let values = origins
        .iter()
        .map(|o| {
            HeaderValue::from_str(o).map_err(|e| anyhow::anyhow!("invalid --allow-origin {o:?}: {e}"))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok(base.allow_origin(AllowOrigin::list(values)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_defaults() {
        let cli = Cli::parse_from(["probviz-server"]);
        assert_eq!(cli.port, 8080);
        assert_eq!(cli.allow_origins, vec!["http://localhost:3000".to_string()]);
        assert_eq!(cli.max_sample_size, 1_000_000);
    }

    #[test]
    fn repeated_origins() {
        let cli = Cli::parse_from([
            "probviz-server",
            "--allow-origin",
            "http://a.example",
            "--allow-origin",
            "http://b.example",
        ]);
        assert_eq!(cli.allow_origins.len(), 2);
        assert!(cors_layer(&cli.allow_origins).is_ok());
    }

    #[test]
    fn wildcard_and_bad_origin() {
        assert!(cors_layer(&["*".to_string()]).is_ok());
        assert!(cors_layer(&["bad\norigin".to_string()]).is_err());
    }
}
