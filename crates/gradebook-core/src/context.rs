//! The per-request caller identity.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who is making the request. Built once per request by the transport layer
/// and passed explicitly into every operation in [`crate::ops`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstructorContext {
  pub instructor_id: Uuid,
}

impl InstructorContext {
  pub fn new(instructor_id: Uuid) -> Self { Self { instructor_id } }
}
