pub mod group;
pub mod markdown;

pub use group::group_by_project;
pub use markdown::render_markdown;
