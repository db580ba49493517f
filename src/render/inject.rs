//! Post-processing of converter output.
//!
//! Pure string rewriting, independent of what the converter emitted:
//!
//! - style: before the first `</head>`, else prepended
//! - script: before the last `</body>`, else appended

const HEAD_CLOSE: &str = "</head>";
const BODY_CLOSE: &str = "</body>";

/// Embed `style` (raw CSS) and `script` (a complete `<script>` element).
pub fn inject(content: &str, style: Option<&str>, script: &str) -> String {
    let style = style.map(|css| format!("<style>\n{css}\n</style>\n"));
    let extra = style.as_ref().map_or(0, String::len) + script.len();
    let mut out = String::with_capacity(content.len() + extra);

    let rest = match (&style, find_ignore_case(content, HEAD_CLOSE, false)) {
        (Some(style), Some(pos)) => {
            out.push_str(&content[..pos]);
            out.push_str(style);
            &content[pos..]
        }
        (Some(style), None) => {
            out.push_str(style);
            content
        }
        (None, _) => content,
    };

    match find_ignore_case(rest, BODY_CLOSE, true) {
        Some(pos) => {
            out.push_str(&rest[..pos]);
            out.push_str(script);
            out.push_str(&rest[pos..]);
        }
        None => {
            out.push_str(rest);
            out.push_str(script);
        }
    }

    out
}

/// Byte offset of an ASCII `needle`, case-insensitively; first or last match.
fn find_ignore_case(haystack: &str, needle: &str, last: bool) -> Option<usize> {
    let hay = haystack.as_bytes();
    let needle = needle.as_bytes();
    if hay.len() < needle.len() {
        return None;
    }
    let matches = |i: &usize| hay[*i..*i + needle.len()].eq_ignore_ascii_case(needle);
    let mut positions = 0..=hay.len() - needle.len();
    if last {
        positions.rev().find(matches)
    } else {
        positions.find(matches)
    }
}
