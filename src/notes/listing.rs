//! Directory listing pages.

use std::cmp::Ordering;
use std::fmt::Write;
use std::fs;
use std::io;
use std::path::Path;
use std::time::SystemTime;

use crate::config::ServeConfig;
use crate::embed::serve::{LISTING_HTML, ListingVars};
use crate::utils::date::DateTimeUtc;
use crate::utils::html::escape;
use crate::utils::path::{encode_query_value, encode_url_path, query_pairs, relative_url};

use super::extract_title;

/// Listings reload on their own so new notes show up.
const AUTO_REFRESH_MS: u64 = 30_000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    Name,
    Title,
    Modified,
}

impl SortKey {
    const ALL: [Self; 3] = [Self::Name, Self::Title, Self::Modified];

    fn parse(s: &str) -> Self {
        match s {
            "title" => Self::Title,
            "modified" => Self::Modified,
            _ => Self::Name,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Title => "title",
            Self::Modified => "modified",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Title => "Title",
            Self::Modified => "Modified",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

impl SortDir {
    fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// `?sort=&dir=&q=` parameters of a listing request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingQuery {
    pub sort: SortKey,
    pub dir: SortDir,
    pub filter: String,
}

impl ListingQuery {
    /// Parse from a request URL. Unknown values fall back to defaults.
    pub fn from_url(url: &str) -> Self {
        let mut query = Self::default();
        for (key, value) in query_pairs(url) {
            match key.as_str() {
                "sort" => query.sort = SortKey::parse(&value),
                "dir" if value == "desc" => query.dir = SortDir::Desc,
                "q" => query.filter = value.trim().to_string(),
                _ => {}
            }
        }
        query
    }

    fn matches(&self, entry: &Entry) -> bool {
        if self.filter.is_empty() {
            return true;
        }
        let needle = self.filter.to_lowercase();
        entry.name.to_lowercase().contains(&needle) || entry.title.to_lowercase().contains(&needle)
    }

    fn compare(&self, a: &Entry, b: &Entry) -> Ordering {
        let by_key = match self.sort {
            SortKey::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            SortKey::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
            SortKey::Modified => a.modified.cmp(&b.modified),
        };
        let by_key = match self.dir {
            SortDir::Asc => by_key,
            SortDir::Desc => by_key.reverse(),
        };
        // Directories first regardless of direction
        b.is_dir.cmp(&a.is_dir).then(by_key)
    }
}

/// One row of a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    /// Absolute URL path, already encoded.
    pub href: String,
    pub is_dir: bool,
    pub title: String,
    pub modified: Option<SystemTime>,
}

/// Contents of one directory under the notes root.
#[derive(Debug)]
pub struct Listing {
    /// Path relative to the notes root, `/`-separated, empty for the root.
    pub rel: String,
    pub parent: Option<Entry>,
    pub entries: Vec<Entry>,
    pub query: ListingQuery,
}

impl Listing {
    /// Read, filter, and sort `dir`.
    pub fn read(config: &ServeConfig, dir: &Path, query: ListingQuery) -> io::Result<Self> {
        let rel = relative_url(dir, &config.notes_dir).unwrap_or_default();

        let mut entries = Vec::new();
        for item in fs::read_dir(dir)? {
            let item = item?;
            let name = item.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') {
                continue;
            }

            let path = item.path();
            let is_dir = path.is_dir();
            if !is_dir && !(path.is_file() && config.is_document(&path)) {
                continue;
            }

            let entry = Entry {
                href: format!("/{}", encode_url_path(&join_rel(&rel, &name))),
                title: if is_dir { name.clone() } else { extract_title(&path) },
                modified: item.metadata().and_then(|m| m.modified()).ok(),
                name,
                is_dir,
            };
            if query.matches(&entry) {
                entries.push(entry);
            }
        }
        entries.sort_by(|a, b| query.compare(a, b));

        let parent = (!rel.is_empty()).then(|| {
            let up = rel.rsplit_once('/').map_or("", |(parent, _)| parent);
            Entry {
                name: "..".into(),
                href: format!("/{}", encode_url_path(up)),
                is_dir: true,
                title: "Parent Directory".into(),
                modified: None,
            }
        });

        Ok(Self {
            rel,
            parent,
            entries,
            query,
        })
    }

    /// Render the listing page with an optional user stylesheet.
    pub fn render(&self, style: Option<&str>) -> String {
        let title = format!("/{}", self.rel);
        let style = style
            .map(|css| format!("<style>\n{css}\n</style>"))
            .unwrap_or_default();

        LISTING_HTML.render(&ListingVars {
            title: &escape(&title),
            style: &style,
            breadcrumbs: &self.breadcrumbs(),
            query: &escape(&self.query.filter),
            sort: self.query.sort.as_str(),
            dir: self.query.dir.as_str(),
            sort_links: &self.sort_links(),
            rows: &self.rows(),
            auto_refresh: AUTO_REFRESH_MS,
        })
    }

    fn breadcrumbs(&self) -> String {
        let mut html = String::from("<a href=\"/\">Home</a>");
        let mut prefix = String::new();
        for part in self.rel.split('/').filter(|p| !p.is_empty()) {
            prefix = join_rel(&prefix, part);
            let _ = write!(
                html,
                " &gt; <a href=\"/{}\">{}</a>",
                escape(&encode_url_path(&prefix)),
                escape(part)
            );
        }
        html
    }

    fn sort_links(&self) -> String {
        let filter = if self.query.filter.is_empty() {
            String::new()
        } else {
            format!("&amp;q={}", encode_query_value(&self.query.filter))
        };

        SortKey::ALL
            .iter()
            .map(|&key| {
                let active = key == self.query.sort;
                let next_dir = if active && self.query.dir == SortDir::Asc {
                    SortDir::Desc
                } else {
                    SortDir::Asc
                };
                let indicator = match (active, self.query.dir) {
                    (false, _) => "",
                    (true, SortDir::Asc) => " \u{25B2}",
                    (true, SortDir::Desc) => " \u{25BC}",
                };
                format!(
                    "<a class=\"sort-link\" href=\"?sort={}&amp;dir={}{}\">{}{}</a>",
                    key.as_str(),
                    next_dir.as_str(),
                    filter,
                    key.label(),
                    indicator
                )
            })
            .collect::<Vec<_>>()
            .join("\n  ")
    }

    fn rows(&self) -> String {
        let mut html = String::new();
        for entry in self.parent.iter().chain(&self.entries) {
            let class = if entry.is_dir { "folder" } else { "file" };
            let _ = write!(
                html,
                "<li><a href=\"{}\" class=\"{}\">{}",
                escape(&entry.href),
                class,
                escape(&entry.title)
            );
            if !entry.is_dir && entry.name != entry.title {
                let _ = write!(html, " <span class=\"filename\">({})</span>", escape(&entry.name));
            }
            html.push_str("</a>");
            if let Some(modified) = entry.modified {
                let _ = write!(
                    html,
                    "<span class=\"mod-time\">{}</span>",
                    DateTimeUtc::from_system_time(modified)
                );
            }
            html.push_str("</li>\n");
        }
        html
    }
}

fn join_rel(base: &str, name: &str) -> String {
    if base.is_empty() {
        name.to_string()
    } else {
        format!("{base}/{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;
    use std::fs::File;
    use std::time::{Duration, UNIX_EPOCH};
    use tempfile::TempDir;

    fn touch(path: &Path, content: &str, secs: u64) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
        File::options()
            .write(true)
            .open(path)
            .unwrap()
            .set_modified(UNIX_EPOCH + Duration::from_secs(secs))
            .unwrap();
    }

    fn setup() -> (TempDir, ServeConfig) {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        touch(&root.join("b.md"), "# Alpha", 300);
        touch(&root.join("a.md"), "# Zulu", 100);
        touch(&root.join("c.txt"), "no heading", 200);
        touch(&root.join("image.png"), "", 100);
        touch(&root.join(".secret.md"), "", 100);
        fs::create_dir(root.join("zdir")).unwrap();
        fs::create_dir(root.join("adir")).unwrap();
        let config = test_config(root);
        (dir, config)
    }

    fn names(listing: &Listing) -> Vec<&str> {
        listing.entries.iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn test_query_from_url() {
        let q = ListingQuery::from_url("/x?sort=modified&dir=desc&q=+plan+");
        assert_eq!(q.sort, SortKey::Modified);
        assert_eq!(q.dir, SortDir::Desc);
        assert_eq!(q.filter, "plan");

        let q = ListingQuery::from_url("/x?sort=bogus&dir=sideways");
        assert_eq!(q, ListingQuery::default());
    }

    #[test]
    fn test_sort_by_name_dirs_first() {
        let (_dir, config) = setup();
        let listing = Listing::read(&config, &config.notes_dir, ListingQuery::default()).unwrap();
        assert_eq!(names(&listing), ["adir", "zdir", "a.md", "b.md", "c.txt"]);
        assert!(listing.parent.is_none());
    }

    #[test]
    fn test_sort_desc_keeps_dirs_first() {
        let (_dir, config) = setup();
        let query = ListingQuery::from_url("/?dir=desc");
        let listing = Listing::read(&config, &config.notes_dir, query).unwrap();
        assert_eq!(names(&listing), ["zdir", "adir", "c.txt", "b.md", "a.md"]);
    }

    #[test]
    fn test_sort_by_title_and_modified() {
        let (_dir, config) = setup();
        let by_title = Listing::read(
            &config,
            &config.notes_dir,
            ListingQuery::from_url("/?sort=title"),
        )
        .unwrap();
        assert_eq!(&names(&by_title)[2..], ["b.md", "c.txt", "a.md"]);

        let by_time = Listing::read(
            &config,
            &config.notes_dir,
            ListingQuery::from_url("/?sort=modified"),
        )
        .unwrap();
        assert_eq!(&names(&by_time)[2..], ["a.md", "c.txt", "b.md"]);
    }

    #[test]
    fn test_filter_matches_name_or_title() {
        let (_dir, config) = setup();
        let listing =
            Listing::read(&config, &config.notes_dir, ListingQuery::from_url("/?q=ALPHA")).unwrap();
        assert_eq!(names(&listing), ["b.md"]);

        let listing =
            Listing::read(&config, &config.notes_dir, ListingQuery::from_url("/?q=dir")).unwrap();
        assert_eq!(names(&listing), ["adir", "zdir"]);
    }

    #[test]
    fn test_subdirectory_parent_link() {
        let (_dir, config) = setup();
        touch(&config.notes_dir.join("adir/deep/n.md"), "", 100);
        let listing = Listing::read(
            &config,
            &config.notes_dir.join("adir/deep"),
            ListingQuery::default(),
        )
        .unwrap();

        assert_eq!(listing.rel, "adir/deep");
        let parent = listing.parent.as_ref().unwrap();
        assert_eq!(parent.href, "/adir");
        assert_eq!(listing.entries[0].href, "/adir/deep/n.md");
    }

    #[test]
    fn test_render() {
        let (_dir, config) = setup();
        touch(&config.notes_dir.join("zdir/my <note>.md"), "# A & B", 100);
        let query = ListingQuery::from_url("/zdir?sort=name&q=a");
        let html = Listing::read(&config, &config.notes_dir.join("zdir"), query)
            .unwrap()
            .render(Some("li { color: red }"));

        assert!(html.contains("<title>Notes: /zdir</title>"));
        assert!(html.contains("<style>\nli { color: red }\n</style>"));
        assert!(html.contains("href=\"/zdir/my%20%3Cnote%3E.md\""));
        assert!(html.contains("A &amp; B <span class=\"filename\">(my &lt;note&gt;.md)</span>"));
        assert!(html.contains("<a href=\"/\" class=\"folder\">Parent Directory</a>"));
        assert!(html.contains("1970-01-01 00:01:40"));
        assert!(html.contains("href=\"?sort=name&amp;dir=desc&amp;q=a\">Name \u{25B2}</a>"));
        assert!(html.contains("&gt; <a href=\"/zdir\">zdir</a>"));
        assert!(html.contains("setTimeout(function () { window.location.reload(); }, 30000);"));
    }
}
