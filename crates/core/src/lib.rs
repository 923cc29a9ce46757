//! Domain logic for the Folio story backend.
//!
//! Nothing in this crate talks to the database. Repositories in `folio_db`
//! load rows and hand plain data to the functions here (ordering, assembly,
//! import conversion), and the API layer uses the upload and mirror helpers
//! directly.

pub mod error;
pub mod import;
pub mod media;
pub mod mirror;
pub mod ordering;
pub mod pagination;
pub mod section;
pub mod story;
pub mod types;
pub mod upload;
