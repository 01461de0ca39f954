//! JSON REST API for the gradebook.
//!
//! Exposes an axum [`Router`] backed by any
//! [`gradebook_core::store::GradeStore`]. The caller's identity arrives in
//! the `x-instructor-id` header from an upstream authenticator; TLS and
//! authentication themselves are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", gradebook_api::api_router(store.clone()))
//! ```

pub mod assessments;
pub mod classes;
pub mod error;
pub mod extract;
pub mod grades;
pub mod questions;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post, put},
};
use gradebook_core::store::GradeStore;

pub use error::ApiError;
pub use extract::INSTRUCTOR_HEADER;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: GradeStore + 'static,
{
  Router::new()
    // Classes and roster
    .route("/classes", get(classes::list::<S>).post(classes::create::<S>))
    .route(
      "/classes/{id}/roster",
      get(classes::roster::<S>).post(classes::enroll::<S>),
    )
    .route(
      "/classes/{id}/roster/{student_id}",
      put(classes::set_status::<S>),
    )
    .route("/students", post(classes::add_student::<S>))
    // Assessments
    .route(
      "/classes/{id}/assessments",
      get(assessments::list::<S>).post(assessments::create::<S>),
    )
    .route("/assessments/{id}/submissions", post(assessments::submit::<S>))
    // Grades
    .route("/grades", put(grades::record::<S>))
    .route("/grades/bulk", post(grades::bulk::<S>))
    .route(
      "/classes/{id}/students/{student_id}/aggregate",
      get(grades::student_aggregate::<S>),
    )
    .route("/classes/{id}/summary", get(grades::class_summary::<S>))
    // Questions
    .route(
      "/quizzes/{id}/questions",
      get(questions::list::<S>).post(questions::add::<S>),
    )
    .route("/quizzes/{id}/questions/import", post(questions::import::<S>))
    .with_state(store)
}

// ─── Integration tests ───────────────────────────────────────────────────────
