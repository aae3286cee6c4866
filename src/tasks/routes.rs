use axum::{
    routing::{get, post},
    Router,
};

use super::handlers;

/// Task routes; all of them require a session token
pub fn tasks_routes() -> Router {
    Router::new()
        .route(
            "/tasks",
            post(handlers::create_task).get(handlers::list_tasks),
        )
        .route(
            "/tasks/:id",
            get(handlers::get_task)
                .patch(handlers::update_task)
                .delete(handlers::delete_task),
        )
        .route("/tasks/:id/mark-done", post(handlers::mark_task_done))
}
