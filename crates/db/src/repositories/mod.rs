//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` (or any `PgExecutor`) as the first argument.

pub mod post_repo;
pub mod section_repo;
pub mod story_repo;
pub mod story_version_repo;

pub use post_repo::PostRepo;
pub use section_repo::SectionRepo;
pub use story_repo::StoryRepo;
pub use story_version_repo::StoryVersionRepo;
