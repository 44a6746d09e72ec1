//! CLI command handlers, one per file.

mod classify;
mod escape;
mod group_path;
mod rewrite;

pub use classify::run_classify;
pub use escape::run_escape;
pub use group_path::{load_group_tree, run_group_path};
pub use rewrite::run_rewrite;
