// src/routes.rs

use axum::{
    Router,
    http::Method,
    middleware,
    routing::{delete, get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{auth, student, teacher},
    state::AppState,
    utils::jwt::{auth_middleware, require_student, require_teacher},
};

/// Assembles the main application router.
///
/// * Merges all sub-routers (auth, teacher, student).
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (Database Pool + Config).
pub fn create_router(state: AppState) -> Router {
    let origins = [
        "http://localhost:3000".parse().unwrap(),
        "http://127.0.0.1:3000".parse().unwrap(),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login));

    // Double middleware protection: Auth first, then role check.
    let teacher_routes = Router::new()
        .route("/dashboard", get(teacher::dashboard))
        .route("/tests", post(teacher::create_test))
        .route(
            "/tests/{id}",
            get(teacher::get_test).put(teacher::update_test),
        )
        .route("/students", post(teacher::enroll_student))
        .route("/students/{id}", delete(teacher::unenroll_student))
        .layer(middleware::from_fn(require_teacher))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let student_routes = Router::new()
        .route("/dashboard", get(student::dashboard))
        .route("/tests/{id}", get(student::get_test))
        .route("/tests/{id}/submit", post(student::submit_test))
        .route("/results/{id}", get(student::get_result))
        .layer(middleware::from_fn(require_student))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .nest("/api/auth", auth_routes)
        .nest("/api/teacher", teacher_routes)
        .nest("/api/student", student_routes)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
