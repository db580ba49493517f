//! Embedded static resources.
//!
//! - `template` - Template types for typed variable injection
//! - `serve` - Server templates (poll.js, listing.html)

mod template;

pub use template::{Template, TemplateVars};

pub mod serve {
    use super::{Template, TemplateVars};

    /// Variables for poll.js.
    pub struct PollVars<'a> {
        /// Freshness endpoint for this note, already URL-encoded.
        pub check_url: &'a str,
        /// Milliseconds between polls.
        pub interval: u64,
    }

    impl TemplateVars for PollVars<'_> {
        fn apply(&self, content: &str) -> String {
            content
                .replace(
                    "__CHECK_URL__",
                    &serde_json::to_string(self.check_url).unwrap_or_else(|_| "\"\"".into()),
                )
                .replace("__REFRESH_INTERVAL__", &self.interval.to_string())
        }
    }

    /// Freshness poll script injected into every rendered note.
    pub const POLL_JS: Template<PollVars<'static>> = Template::new(include_str!("serve/poll.js"));

    /// Variables for listing.html. Every field is pre-escaped HTML.
    pub struct ListingVars<'a> {
        pub title: &'a str,
        pub style: &'a str,
        pub breadcrumbs: &'a str,
        pub query: &'a str,
        pub sort: &'a str,
        pub dir: &'a str,
        pub sort_links: &'a str,
        pub rows: &'a str,
        /// Milliseconds before the page reloads to pick up new notes.
        pub auto_refresh: u64,
    }

    impl TemplateVars for ListingVars<'_> {
        fn apply(&self, content: &str) -> String {
            // __ROWS__ last: row content may itself contain placeholder-like text.
            content
                .replace("__TITLE__", self.title)
                .replace("__STYLE__", self.style)
                .replace("__BREADCRUMBS__", self.breadcrumbs)
                .replace("__QUERY__", self.query)
                .replace("__SORT__", self.sort)
                .replace("__DIR__", self.dir)
                .replace("__SORT_LINKS__", self.sort_links)
                .replace("__AUTO_REFRESH__", &self.auto_refresh.to_string())
                .replace("__ROWS__", self.rows)
        }
    }

    /// Directory listing page.
    pub const LISTING_HTML: Template<ListingVars<'static>> =
        Template::new(include_str!("serve/listing.html"));
}

#[cfg(test)]
mod tests {
    use super::serve::*;
    use super::template::unfilled_placeholders;

    #[test]
    fn test_poll_script_vars() {
        let js = POLL_JS.render(&PollVars {
            check_url: "/api/check_modified/a%20b.md",
            interval: 750,
        });
        assert!(js.contains("\"/api/check_modified/a%20b.md\""));
        assert!(js.contains("var interval = 750;"));
        assert!(js.starts_with("<script>"));
        assert!(unfilled_placeholders(&js).is_empty());
    }

    #[test]
    fn test_listing_vars() {
        let html = LISTING_HTML.render(&ListingVars {
            title: "/daily",
            style: "",
            breadcrumbs: "<a href=\"/\">Home</a>",
            query: "",
            sort: "name",
            dir: "asc",
            sort_links: "",
            rows: "<li>x</li>",
            auto_refresh: 30_000,
        });
        assert!(html.contains("<title>Notes: /daily</title>"));
        assert!(html.contains("<li>x</li>"));
        assert!(html.contains("window.location.reload(); }, 30000);"));
        assert!(unfilled_placeholders(&html).is_empty());
    }
}
