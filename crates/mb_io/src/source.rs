//! Document locators: a local path or an `http(s)://` URL.

use std::fmt;
use std::path::PathBuf;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Source {
    Local(PathBuf),
    Http(String),
}

impl Source {
    /// `http://` / `https://` (any case) → `Http`; everything else is a local path.
    pub fn parse(s: &str) -> Self {
        let trimmed = s.trim();
        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Source::Http(trimmed.to_string())
        } else {
            Source::Local(PathBuf::from(trimmed))
        }
    }

    /// Final path segment, used in user-facing messages ("rules.json").
    pub fn file_name(&self) -> String {
        match self {
            Source::Local(p) => p
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| p.display().to_string()),
            Source::Http(url) => {
                let no_query = url.split(['?', '#']).next().unwrap_or(url);
                no_query
                    .rsplit('/')
                    .find(|seg| !seg.is_empty())
                    .unwrap_or(no_query)
                    .to_string()
            }
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Local(p) => write!(f, "{}", p.display()),
            Source::Http(url) => f.write_str(url),
        }
    }
}

impl From<&str> for Source {
    fn from(s: &str) -> Self {
        Source::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_and_paths_are_told_apart() {
        assert_eq!(Source::parse("https://x/rules.json"), Source::Http("https://x/rules.json".into()));
        assert_eq!(Source::parse("HTTP://x/a"), Source::Http("HTTP://x/a".into()));
        assert_eq!(Source::parse("./summary.json"), Source::Local(PathBuf::from("./summary.json")));
        // Only http(s) is fetched over the network.
        assert!(matches!(Source::parse("file:///tmp/a.json"), Source::Local(_)));
    }

    #[test]
    fn file_name_for_messages() {
        assert_eq!(Source::parse("data/rules.json").file_name(), "rules.json");
        assert_eq!(Source::parse("https://h/out/summary.json?v=3").file_name(), "summary.json");
        assert_eq!(Source::parse("https://h/out/").file_name(), "out");
    }
}
