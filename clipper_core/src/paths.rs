//! Expansion of user-supplied workspace paths.
//!
//! Environment variables (`$VAR`, `${VAR}`) are substituted first, then a leading
//! `~` is replaced by the home directory, and whatever remains relative is made
//! absolute against the current directory. Unset variables are left as written.

use path_absolutize::Absolutize;
use std::path::{Path, PathBuf};

/// Expands `raw` against the process environment and the user's home directory.
pub fn expand_path(raw: &str) -> PathBuf {
    expand_path_with(raw, dirs::home_dir().as_deref(), |name| {
        std::env::var(name).ok()
    })
}

pub fn expand_path_with<F>(raw: &str, home: Option<&Path>, lookup: F) -> PathBuf
where
    F: Fn(&str) -> Option<String>,
{
    let expanded = expand_home(&expand_vars(raw, &lookup), home);
    match expanded.absolutize() {
        Ok(absolute) => absolute.into_owned(),
        Err(_) => expanded,
    }
}

fn expand_vars<F>(raw: &str, lookup: &F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        let (name, consumed) = match after.strip_prefix('{') {
            Some(braced) => match braced.find('}') {
                Some(end) => (&braced[..end], end + 2),
                None => ("", 0),
            },
            None => {
                let end = after
                    .find(|c: char| !(c.is_alphanumeric() || c == '_'))
                    .unwrap_or(after.len());
                (&after[..end], end)
            }
        };

        match Some(name).filter(|n| !n.is_empty()).and_then(lookup) {
            Some(value) => {
                out.push_str(&value);
                rest = &after[consumed..];
            }
            None => {
                out.push('$');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

fn expand_home(path: &str, home: Option<&Path>) -> PathBuf {
    let Some(home) = home else {
        return PathBuf::from(path);
    };

    if path == "~" {
        return home.to_path_buf();
    }
    let rest = match path.strip_prefix("~/") {
        Some(rest) => Some(rest),
        None if cfg!(windows) => path.strip_prefix("~\\"),
        None => None,
    };
    match rest {
        Some(rest) => home.join(rest),
        None => PathBuf::from(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn env(name: &str) -> Option<String> {
        match name {
            "NOTES" => Some("/srv/notes".to_string()),
            "GRAPH" => Some("work".to_string()),
            _ => None,
        }
    }

    fn expand(raw: &str) -> PathBuf {
        expand_path_with(raw, Some(Path::new("/home/ana")), env)
    }

    #[test]
    fn test_home_is_expanded() {
        assert_eq!(PathBuf::from("/home/ana/Documents/logseq"), expand("~/Documents/logseq"));
        assert_eq!(PathBuf::from("/home/ana"), expand("~"));
    }

    #[test]
    fn test_environment_variables_are_expanded() {
        assert_eq!(PathBuf::from("/srv/notes/work"), expand("$NOTES/$GRAPH"));
        assert_eq!(PathBuf::from("/srv/notes/work-graph"), expand("${NOTES}/${GRAPH}-graph"));
    }

    #[test]
    fn test_variables_expand_before_home() {
        let lookup = |name: &str| (name == "BASE").then(|| "~/vaults".to_string());
        assert_eq!(
            PathBuf::from("/home/ana/vaults/logseq"),
            expand_path_with("$BASE/logseq", Some(Path::new("/home/ana")), lookup)
        );
    }

    #[test]
    fn test_unset_variables_are_left_alone() {
        assert_eq!(PathBuf::from("/data/$MISSING/x"), expand("/data/$MISSING/x"));
        assert_eq!(PathBuf::from("/data/${MISSING}"), expand("/data/${MISSING}"));
        assert_eq!(PathBuf::from("/data/$"), expand("/data/$"));
    }

    #[test]
    fn test_relative_paths_become_absolute() {
        let expanded = expand("graphs/logseq");
        assert!(expanded.is_absolute());
        assert!(expanded.ends_with("graphs/logseq"));
    }

    #[test]
    fn test_missing_home_leaves_tilde() {
        let expanded = expand_path_with("~/notes", None, env);
        assert!(expanded.ends_with("~/notes"));
    }
}
