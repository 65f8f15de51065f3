use std::collections::BTreeMap;

/// Index document: language filename (e.g. `en.txt`) to the file's full text.
///
/// A `BTreeMap` keeps keys in lexicographic order, so serialized output is
/// deterministic.
pub type QuoteIndex = BTreeMap<String, String>;

/// Extension of per-language quote files, including the dot.
pub const LANGUAGE_FILE_EXT: &str = ".txt";

/// File name holding quotes for a language code, e.g. `"en"` -> `"en.txt"`.
pub fn language_file_name(code: &str) -> String {
    format!("{code}{LANGUAGE_FILE_EXT}")
}

pub fn is_language_file(name: &str) -> bool {
    name.ends_with(LANGUAGE_FILE_EXT)
}
