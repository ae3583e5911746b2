#![warn(clippy::pedantic)]

mod config;
mod error;
mod extract;
mod model;
mod openapi;
mod ownership;
mod route;
mod stats;
mod store;
mod token;
mod trace;

use std::sync::Arc;

use aide::openapi::OpenApi;
use argon2::Argon2;
use axum::{extract::FromRef, http::HeaderName, Extension, Router};
use tower::ServiceBuilder;
use tower_http::{
	compression::CompressionLayer,
	cors::CorsLayer,
	request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
	trace::TraceLayer,
};

pub type Database = Arc<dyn store::Store>;
pub type AppState = State;

/// The shared application state.
///
/// This should contain all shared dependencies that handlers need to access,
/// such as the store, a hash configuration (if it's expensive to create),
/// or the token signing keys.
#[derive(Clone, FromRef)]
pub struct State {
	pub database: Database,
	pub hasher: Argon2<'static>,
	pub tokens: token::Tokens,
}

impl State {
	pub fn new(database: Database, tokens: token::Tokens) -> Self {
		Self {
			database,
			hasher: Argon2::default(),
			tokens,
		}
	}
}

/// Builds the full router: the API, its documentation and the middleware stack.
pub fn app(state: State) -> Router {
	let mut api = OpenApi::default();
	let request_id = HeaderName::from_static("x-request-id");

	aide::axum::ApiRouter::new()
		.nest("/api/blogs", route::blog::routes())
		.nest("/api/users", route::user::routes())
		.nest("/api/login", route::auth::routes())
		.nest("/docs", route::docs::routes())
		.finish_api_with(&mut api, openapi::docs)
		.layer(Extension(Arc::new(api)))
		.layer(
			ServiceBuilder::new()
				.layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
				.layer(TraceLayer::new_for_http())
				.layer(PropagateRequestIdLayer::new(request_id))
				.layer(CorsLayer::permissive())
				.layer(CompressionLayer::new()),
		)
		.with_state(state)
}

async fn shutdown_signal() {
	let ctrl_c = async {
		tokio::signal::ctrl_c()
			.await
			.expect("failed to install Ctrl+C handler");
	};

	#[cfg(unix)]
	let terminate = async {
		tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
			.expect("failed to install signal handler")
			.recv()
			.await;
	};

	#[cfg(not(unix))]
	let terminate = std::future::pending::<()>();

	tokio::select! {
		() = ctrl_c => {},
		() = terminate => {},
	}

	tracing::info!("shutting down");
}

#[tokio::main]
async fn main() {
	dotenvy::dotenv().ok();

	let config = config::Config::from_env().expect("invalid configuration");
	let _guard =
		trace::init_tracing_subscriber(&config).expect("failed to initialize tracing subscriber");

	let database: Database = match config.database_url {
		Some(ref url) => Arc::new(
			store::PgStore::connect(url)
				.await
				.expect("failed to connect to database"),
		),
		None => {
			tracing::warn!("DATABASE_URL is not set, data will only be kept in memory");
			Arc::new(store::MemoryStore::new())
		}
	};

	let tokens = token::Tokens::new(config.secret.as_bytes(), config.token_ttl);
	let app = app(State::new(database, tokens));

	let listener = tokio::net::TcpListener::bind((config.host, config.port))
		.await
		.expect("failed to bind to port");

	tracing::info!(host = %config.host, port = config.port, "listening");

	axum::serve(listener, app)
		.with_graceful_shutdown(shutdown_signal())
		.await
		.expect("server error");
}
