pub mod dto;
pub mod handlers;
pub mod repo;

use axum::{
    extract::Request,
    middleware::{self, Next},
    routing::{delete, get, post},
    Router,
};

use crate::{auth::gate, state::AppState};

const ADMIN_ONLY: &[&str] = &["Admin"];

/// Employee routes. Register, list and delete sit behind the authentication
/// gate plus an Admin role check; login, view and update are open.
pub fn router(state: AppState) -> Router<AppState> {
    let admin = Router::new()
        .route("/register", post(handlers::register))
        .route("/", get(handlers::list_employees))
        .route("/:id", delete(handlers::delete_employee))
        .route_layer(middleware::from_fn(|req: Request, next: Next| {
            gate::require_roles(ADMIN_ONLY, req, next)
        }))
        .route_layer(middleware::from_fn_with_state(state, gate::authenticate));

    let open = Router::new()
        .route("/login", post(handlers::login))
        .route(
            "/:id",
            get(handlers::view_employee).patch(handlers::update_employee),
        );

    admin.merge(open)
}
