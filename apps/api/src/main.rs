use std::net::SocketAddr;
use std::sync::Arc;
use dotenv::dotenv;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{self, TraceLayer};
use tracing::{info, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod router;

use assignment_cell::AssignmentService;
use notification_cell::{LogDispatcher, MailDispatcher, NotificationDispatcher};
use shared_config::AppConfig;
use therapist_cell::TherapistService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Loading Env Vars
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting massage booking API server");

    // Load configuration and therapist roster
    let config = Arc::new(AppConfig::from_env());
    let roster = Arc::new(TherapistService::from_file(&config.roster_path)?);

    let dispatcher: Arc<dyn NotificationDispatcher> = if config.is_mail_configured() {
        Arc::new(MailDispatcher::new(&config))
    } else {
        Arc::new(LogDispatcher)
    };

    let assignment = Arc::new(AssignmentService::new(
        Arc::clone(&config),
        Arc::clone(&roster),
        dispatcher,
    ));

    // Set up CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the application router
    let app = router::create_router(config, roster, assignment)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(trace::DefaultMakeSpan::new().level(Level::INFO))
                .on_response(trace::DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors);

    // Run the server
    let addr = SocketAddr::from(([0, 0, 0, 0], 3000));
    info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
