use std::{
    fs::OpenOptions,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::{Path, PathBuf},
    sync::Arc,
};

use axum::{
    Router,
    extract::{MatchedPath, Request},
};
use axum_server::Handle;
use clap::Parser;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{EnvFilter, Layer, filter, layer::SubscriberExt, util::SubscriberInitExt};

use ledger_api::{
    AppConfig, AppState, DEVELOPMENT, SystemClock, build_router, endpoints, graceful_shutdown,
    idempotency::IdempotencyConfig, transaction::seed_sample_transactions,
};

/// The REST API server for the ledger.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The port to serve the API from.
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    port: u16,

    /// The address to listen on.
    #[arg(long, env = "HOST", default_value_t = IpAddr::V4(Ipv4Addr::LOCALHOST))]
    host: IpAddr,

    /// How long, in seconds, a response is replayed for a repeated idempotency key.
    #[arg(long, env = "IDEMPOTENCY_TTL_SECS", default_value_t = 300)]
    idempotency_ttl_secs: u32,

    /// A directory with a built frontend to serve for paths outside `/api`.
    #[arg(long, env = "STATIC_DIR")]
    static_dir: Option<PathBuf>,

    /// The deployment environment reported by the health check.
    #[arg(long, env = "APP_ENV", default_value = DEVELOPMENT)]
    environment: String,

    /// Also write debug level logs to this file.
    #[arg(long, env = "LOG_FILE")]
    log_file: Option<PathBuf>,

    /// Start with an empty store instead of the sample transactions.
    #[arg(long)]
    no_seed: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    setup_logging(args.log_file.as_deref());

    let config = AppConfig {
        environment: args.environment,
        idempotency: IdempotencyConfig {
            ttl: time::Duration::seconds(i64::from(args.idempotency_ttl_secs)),
            ..Default::default()
        },
        static_dir: args.static_dir,
        ..Default::default()
    };
    let state = AppState::new(config, Arc::new(SystemClock));

    if !args.no_seed {
        let mut store = state
            .transaction_store
            .write()
            .expect("Could not lock the transaction store");
        seed_sample_transactions(&mut store);
    }

    tokio::spawn(state.idempotency_cache.clone().sweep_expired());

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = add_tracing_layer(build_router(state));

    let addr = SocketAddr::new(args.host, args.port);
    tracing::info!("HTTP server listening on {}", addr);
    let docs_url = format!("http://{addr}{}", endpoints::API_DOCS);
    tracing::info!("API docs available at {docs_url}");
    axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
        .expect("Could not start the server");
}

fn setup_logging(log_file: Option<&Path>) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stdout_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_filter(env_filter);

    let debug_log = log_file.map(|path| {
        let log_file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .expect("Could not create log file");

        tracing_subscriber::fmt::layer()
            .pretty()
            .with_ansi(false)
            .with_writer(Arc::new(log_file))
            .with_filter(filter::LevelFilter::DEBUG)
    });

    tracing_subscriber::registry()
        .with(stdout_log)
        .with(debug_log)
        .init();
}

fn add_tracing_layer(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request| {
            let method = req.method();
            let uri = req.uri();

            let matched_path = req
                .extensions()
                .get::<MatchedPath>()
                .map(|matched_path| matched_path.as_str());

            tracing::debug_span!("request", %method, %uri, matched_path)
        })
        // By default, `TraceLayer` will log 5xx responses but the logging
        // middleware already logs every response with its status.
        .on_failure(());

    router.layer(tracing_layer)
}
