//! Embedded assets with `__NAME__` placeholders.
//!
//! Each asset is paired with exactly one [`TemplateVars`] type, so a page can
//! only be rendered with the variables it was written for.

use std::marker::PhantomData;

/// Fills the placeholders of one asset.
pub trait TemplateVars {
    fn apply(&self, content: &str) -> String;
}

/// A compile-time asset, typed by the variables it takes.
pub struct Template<V> {
    source: &'static str,
    vars: PhantomData<fn() -> V>,
}

impl<V> Template<V> {
    pub const fn new(source: &'static str) -> Self {
        Self {
            source,
            vars: PhantomData,
        }
    }
}

impl<V: TemplateVars> Template<V> {
    pub fn render(&self, vars: &V) -> String {
        vars.apply(self.source)
    }
}

/// Placeholder names left in rendered text, e.g. `["ROWS"]`.
#[cfg(test)]
pub(crate) fn unfilled_placeholders(text: &str) -> Vec<&str> {
    let mut names = Vec::new();
    let mut rest = text;
    while let Some(start) = rest.find("__") {
        let after = &rest[start + 2..];
        match after.find("__") {
            Some(end)
                if end > 0
                    && after[..end]
                        .bytes()
                        .all(|b| b.is_ascii_uppercase() || b == b'_') =>
            {
                names.push(&after[..end]);
                rest = &after[end + 2..];
            }
            _ => rest = after,
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unfilled_placeholders() {
        assert_eq!(
            unfilled_placeholders("a __TITLE__ b __REFRESH_INTERVAL__ c"),
            ["TITLE", "REFRESH_INTERVAL"]
        );
        assert!(unfilled_placeholders("x.__proto__ and ____ only").is_empty());
    }

    #[test]
    fn test_render_applies_vars() {
        struct Name(&'static str);
        impl TemplateVars for Name {
            fn apply(&self, content: &str) -> String {
                content.replace("__NAME__", self.0)
            }
        }

        const GREETING: Template<Name> = Template::new("hello __NAME__");
        assert_eq!(GREETING.render(&Name("notes")), "hello notes");
    }
}
