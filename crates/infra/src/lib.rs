//! Infrastructure layer: document persistence boundary and repositories.

pub mod document_store;
pub mod repository;
