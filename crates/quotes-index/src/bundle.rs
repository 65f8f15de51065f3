use std::fs;
use std::path::Path;

use quotes_model::{is_language_file, QuoteIndex};

use crate::IndexError;

/// Bundle every `*.txt` file in `input_dir` into one JSON object at
/// `output_file`, keyed by file name.
///
/// All files are read before anything is written, so a read failure leaves
/// any previous index untouched. Parent directories of the output are
/// created as needed. Returns the number of files bundled.
pub fn build_index(input_dir: &Path, output_file: &Path) -> Result<usize, IndexError> {
    let index = collect_language_files(input_dir)?;
    write_index(&index, output_file)?;
    tracing::info!(
        input = %input_dir.display(),
        path = %output_file.display(),
        files = index.len(),
        "Wrote quotes index"
    );
    Ok(index.len())
}

/// Read every language file in `input_dir` into an index, in name order.
pub fn collect_language_files(input_dir: &Path) -> Result<QuoteIndex, IndexError> {
    if !input_dir.is_dir() {
        return Err(IndexError::MissingInputDir(input_dir.to_path_buf()));
    }

    let list_err = |source: std::io::Error| IndexError::ListDir {
        path: input_dir.to_path_buf(),
        source,
    };

    let mut index = QuoteIndex::new();
    for entry in fs::read_dir(input_dir).map_err(list_err)? {
        let entry = entry.map_err(list_err)?;
        let Ok(name) = entry.file_name().into_string() else {
            tracing::warn!(path = %entry.path().display(), "Skipping non UTF-8 file name");
            continue;
        };
        if !is_language_file(&name) {
            continue;
        }

        let path = entry.path();
        let text = fs::read_to_string(&path).map_err(|source| IndexError::Read {
            path: path.clone(),
            source,
        })?;
        tracing::debug!(path = %path.display(), bytes = text.len(), "Read language file");
        index.insert(name, text);
    }

    Ok(index)
}

/// Serialize an index to `output_file`, replacing whatever was there.
///
/// Non-ASCII text is written as-is rather than `\u` escaped.
pub fn write_index(index: &QuoteIndex, output_file: &Path) -> Result<(), IndexError> {
    let json = serde_json::to_string(index).map_err(IndexError::Serialize)?;

    if let Some(parent) = output_file.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| IndexError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    fs::write(output_file, json).map_err(|source| IndexError::Write {
        path: output_file.to_path_buf(),
        source,
    })
}

/// Load a previously built index document.
pub fn load_index(path: &Path) -> Result<QuoteIndex, IndexError> {
    let text = fs::read_to_string(path).map_err(|source| IndexError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| IndexError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
