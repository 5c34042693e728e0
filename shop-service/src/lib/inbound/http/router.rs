use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::routing::put;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::accounts::current_account;
use super::handlers::accounts::login;
use super::handlers::accounts::logout;
use super::handlers::accounts::register;
use super::handlers::carts::add_cart_item;
use super::handlers::carts::clear_cart;
use super::handlers::carts::get_cart;
use super::handlers::carts::remove_cart_item;
use super::handlers::carts::update_cart_item;
use super::handlers::health::health;
use super::handlers::orders::get_order;
use super::handlers::orders::list_orders;
use super::handlers::orders::place_order;
use super::middleware::authenticate as auth_middleware;
use crate::config::StorageBackend;
use crate::domain::account::ports::AccountRepository;
use crate::domain::account::ports::AccountServicePort;
use crate::domain::account::service::AccountService;
use crate::domain::cart::ports::CartRepository;
use crate::domain::cart::ports::CartServicePort;
use crate::domain::cart::service::CartService;
use crate::domain::catalog::ports::Catalog;
use crate::domain::order::ports::OrderRepository;
use crate::domain::order::ports::OrderServicePort;
use crate::domain::order::service::OrderService;

#[derive(Clone)]
pub struct AppState {
    pub account_service: Arc<dyn AccountServicePort>,
    pub cart_service: Arc<dyn CartServicePort>,
    pub order_service: Arc<dyn OrderServicePort>,
    pub storage_backend: StorageBackend,
}

impl AppState {
    /// Wire the domain services over one set of storage adapters.
    pub fn new<AR, CR, OR, C>(
        accounts: Arc<AR>,
        carts: Arc<CR>,
        orders: Arc<OR>,
        catalog: Arc<C>,
        authenticator: Arc<Authenticator>,
        storage_backend: StorageBackend,
    ) -> Self
    where
        AR: AccountRepository,
        CR: CartRepository,
        OR: OrderRepository,
        C: Catalog,
    {
        Self {
            account_service: Arc::new(AccountService::new(accounts, authenticator)),
            cart_service: Arc::new(CartService::new(Arc::clone(&carts), Arc::clone(&catalog))),
            order_service: Arc::new(OrderService::new(orders, carts, catalog)),
            storage_backend,
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health))
        .route("/api/users/register", post(register))
        .route("/api/users/login", post(login));

    let protected_routes = Router::new()
        .route("/api/users/logout", post(logout))
        .route("/api/users/me", get(current_account))
        .route(
            "/api/carts",
            get(get_cart).post(add_cart_item).delete(clear_cart),
        )
        .route(
            "/api/carts/:item_id",
            put(update_cart_item).delete(remove_cart_item),
        )
        .route("/api/orders", post(place_order).get(list_orders))
        .route("/api/orders/:order_id", get(get_order))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            // Headers are left out: they carry bearer tokens
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(
            ServiceBuilder::new()
                .layer(trace_layer)
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
