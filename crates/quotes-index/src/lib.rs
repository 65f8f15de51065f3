use std::path::PathBuf;

use thiserror::Error;

pub mod bundle;
pub mod pick;

pub use bundle::{build_index, collect_language_files, load_index, write_index};
pub use pick::{compose_block, pick_unique, sanitize_lines, PickError, PickPlan};

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("quotes directory not found: {}", .0.display())]
    MissingInputDir(PathBuf),

    #[error("failed listing {}: {source}", path.display())]
    ListDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed reading {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed writing {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed serializing index: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("{} is not a valid index document: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
