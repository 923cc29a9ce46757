//! Request handlers.
//!
//! Each submodule provides async handler functions for one resource.
//! Handlers delegate to the corresponding repository in `folio_db` and map
//! errors via [`AppError`](crate::error::AppError).

pub mod import;
pub mod post;
pub mod section;
pub mod story;
pub mod upload;
