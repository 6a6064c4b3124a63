use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rosterd::config::AppConfig;
use rosterd::member::{
    self, InMemoryMemberRepository, MemberRepository, PostgresMemberRepository,
};
use rosterd::shared::AppState;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rosterd=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting roster service");

    let config = AppConfig::from_env();

    // Create shared application state with dependency injection
    // Easy to switch between implementations:
    let member_repository: Arc<dyn MemberRepository + Send + Sync> = match &config.database_url {
        Some(url) => {
            let pool = sqlx::PgPool::connect(url)
                .await
                .expect("Failed to connect to database");
            Arc::new(PostgresMemberRepository::new(pool))
        }
        None => {
            info!("DATABASE_URL not set, using in-memory member store");
            Arc::new(InMemoryMemberRepository::new())
        }
    };

    let app_state = AppState::new(member_repository, config.paging, config.default_page_size);

    // build our application
    let app = Router::new()
        .route(
            "/members",
            get(member::list_members).post(member::create_member),
        )
        .route(
            "/members/:id",
            get(member::get_member)
                .put(member::update_member)
                .delete(member::delete_member),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // run our app with hyper
    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .unwrap();
    info!("Server running on http://{}", config.bind_addr);
    axum::serve(listener, app).await.unwrap();
}
