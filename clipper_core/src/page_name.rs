/// Stands in for `/` in the file names of namespaced pages (`a/b` is `a___b.md`).
pub const NAMESPACE_SEPARATOR_ENCODING: &str = "___";
pub const NAMESPACE_SEPARATOR: &str = "/";
pub const PAGE_EXTENSION: &str = "md";

/// Page name for a note file stem, e.g. `projects___clipper` is `projects/clipper`.
pub fn page_name_from_stem(stem: &str) -> String {
    stem.replace(NAMESPACE_SEPARATOR_ENCODING, NAMESPACE_SEPARATOR)
}
