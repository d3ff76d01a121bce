//! Content module - post records and the loaders that produce them

mod excerpt;
mod frontmatter;
pub mod loader;
mod post;

use std::path::PathBuf;
use thiserror::Error;

pub use excerpt::plain_excerpt;
pub use frontmatter::{parse_date_string, FrontMatter};
pub use loader::ContentLoader;
pub use post::{sort_newest_first, Post};

/// Errors raised while assembling a post collection
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("duplicate post path `{0}`")]
    DuplicatePath(String),

    #[error("invalid post collection {file:?}: {source}")]
    InvalidCollection {
        file: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
