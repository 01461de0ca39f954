//! Core types and trait definitions for the gradebook.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! Storage backends implement [`store::GradeStore`]; the authorized
//! instructor operations in [`ops`] are generic over it.

pub mod aggregate;
pub mod assessment;
pub mod class;
pub mod context;
pub mod error;
pub mod grade;
pub mod ops;
pub mod question;
pub mod store;

pub use context::InstructorContext;
pub use error::{Error, Result};
