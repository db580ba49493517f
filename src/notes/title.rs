//! Display titles for notes.

use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

/// YAML front matter block at the very start of the file.
static FRONT_MATTER: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?s)\A---[ \t]*\r?\n(.*?)\r?\n---[ \t]*(?:\r?\n|\z)").ok());

static TITLE_FIELD: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?m)^title:[ \t]*(.+?)[ \t]*\r?$").ok());

static HEADING: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?m)^#[ \t]+(.+?)[ \t]*\r?$").ok());

/// Title of the note at `path`.
///
/// Front matter `title:`, else the first level-one heading, else the stem.
pub fn extract_title(path: &Path) -> String {
    fs::read_to_string(path)
        .ok()
        .and_then(|content| title_from_content(&content))
        .unwrap_or_else(|| stem(path))
}

fn title_from_content(content: &str) -> Option<String> {
    let front_matter = FRONT_MATTER
        .as_ref()
        .and_then(|re| re.captures(content))
        .and_then(|caps| caps.get(1));

    if let Some(block) = front_matter
        && let Some(caps) = TITLE_FIELD.as_ref().and_then(|re| re.captures(block.as_str()))
    {
        let title = caps[1].trim_matches(['"', '\'']).trim();
        if !title.is_empty() {
            return Some(title.to_string());
        }
    }

    HEADING
        .as_ref()
        .and_then(|re| re.captures(content))
        .map(|caps| caps[1].to_string())
}

fn stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_front_matter_title() {
        let content = "---\ntitle: \"Weekly review\"\ntags: [a]\n---\n# Heading\n";
        assert_eq!(title_from_content(content).as_deref(), Some("Weekly review"));
    }

    #[test]
    fn test_front_matter_single_quotes_and_crlf() {
        let content = "---\r\ntitle: 'Plans'\r\n---\r\nbody";
        assert_eq!(title_from_content(content).as_deref(), Some("Plans"));
    }

    #[test]
    fn test_heading_fallback() {
        let content = "---\nauthor: me\n---\nintro\n\n# First   \n## Second\n# Third";
        assert_eq!(title_from_content(content).as_deref(), Some("First"));
    }

    #[test]
    fn test_subheading_is_not_a_title() {
        assert_eq!(title_from_content("## Only sub\ntext"), None);
        assert_eq!(title_from_content("#hashtag"), None);
    }

    #[test]
    fn test_front_matter_only_at_start() {
        let content = "text\n---\ntitle: Nope\n---\n";
        assert_eq!(title_from_content(content), None);
    }

    #[test]
    fn test_stem_fallback() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("plain-note.md");
        fs::write(&path, "just text").unwrap();
        assert_eq!(extract_title(&path), "plain-note");
        assert_eq!(extract_title(&dir.path().join("missing.md")), "missing");
    }
}
