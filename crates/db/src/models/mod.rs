//! Row models and create/update DTOs, one module per table.

pub mod comment;
pub mod notification;
pub mod project;
pub mod report;
pub mod user;
