//! Student HTTP Routes
//!
//! CRUD endpoints over the student store.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use crate::store::{NewStudent, StoreResult, Student, StudentFilter, StudentStore};

// ==================
// Shared State
// ==================

/// Student state shared across handlers
pub struct StudentState {
    pub store: Arc<StudentStore>,
}

impl StudentState {
    pub fn new(store: Arc<StudentStore>) -> Self {
        Self { store }
    }
}

// ==================
// Student Routes
// ==================

/// Create student routes
pub fn student_routes(state: Arc<StudentState>) -> Router {
    Router::new()
        .route("/students", get(list_students_handler).post(create_student_handler))
        .route("/students/", get(list_students_handler).post(create_student_handler))
        .route(
            "/students/:id",
            get(get_student_handler)
                .put(update_student_handler)
                .delete(delete_student_handler),
        )
        .with_state(state)
}

// ==================
// Handlers
// ==================

async fn list_students_handler(
    State(state): State<Arc<StudentState>>,
    Query(filter): Query<StudentFilter>,
) -> Json<Vec<Student>> {
    Json(state.store.list(&filter.normalized()))
}

async fn get_student_handler(
    State(state): State<Arc<StudentState>>,
    Path(id): Path<Uuid>,
) -> StoreResult<Json<Student>> {
    state.store.get(id).map(Json)
}

async fn create_student_handler(
    State(state): State<Arc<StudentState>>,
    Json(fields): Json<NewStudent>,
) -> Json<Student> {
    Json(state.store.create(fields))
}

async fn update_student_handler(
    State(state): State<Arc<StudentState>>,
    Path(id): Path<Uuid>,
    Json(fields): Json<NewStudent>,
) -> StoreResult<Json<Student>> {
    state.store.update(id, fields).map(Json)
}

async fn delete_student_handler(
    State(state): State<Arc<StudentState>>,
    Path(id): Path<Uuid>,
) -> StoreResult<StatusCode> {
    state.store.delete(id)?;
    Ok(StatusCode::NO_CONTENT)
}
