use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::Serialize;
use tracing::{debug, warn};
use xidoc_core::{
    Diagnostic, DiagnosticSeverity, E_CODE_UNCLOSED, Highlighter, Language, SourceMap, Span,
    W_CODE_UNTAGGED, W_LANG_UNSUPPORTED, classify, text_content,
};

/// Class the tagging step gives to blocks that are not code. Such blocks
/// are escaped without a warning.
const PLAINTEXT_CLASS: &str = "language-plaintext";

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct PassStats {
    /// Blocks colored by a known language.
    pub highlighted: usize,
    /// Blocks with a language class the highlighter does not know.
    pub escaped: usize,
    /// Blocks without any language class, left untouched.
    pub untagged: usize,
}

#[derive(Clone, Debug)]
pub struct Rendered {
    pub html: String,
    pub diagnostics: Vec<Diagnostic>,
    pub stats: PassStats,
}

impl Rendered {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

/// Replaces the content of every `<pre>` … `<code class="language-*">`
/// block with its highlighted markup.
pub(crate) fn highlight_document(html: &str, highlighter: &Highlighter) -> Rendered {
    let map = SourceMap::new(html);
    let mut out = String::with_capacity(html.len() + html.len() / 4);
    let mut diagnostics = Vec::new();
    let mut stats = PassStats::default();
    let mut cursor = 0usize;

    while let Some(pre_start) = find_tag(html, cursor, "pre") {
        let Some(pre_open_end) = html[pre_start..].find('>').map(|idx| pre_start + idx) else {
            break;
        };
        let body_start = pre_open_end + 1;
        let body_end = find_ignore_case(html, body_start, "</pre>").unwrap_or(html.len());

        let Some(code_start) = find_tag(&html[..body_end], body_start, "code") else {
            out.push_str(&html[cursor..body_end]);
            cursor = body_end;
            continue;
        };
        let code_tag_end = html[code_start..].find('>').map(|idx| code_start + idx);
        let code_close =
            code_tag_end.and_then(|tag_end| find_ignore_case(html, tag_end + 1, "</code>"));
        let (Some(code_tag_end), Some(code_close)) = (code_tag_end, code_close) else {
            let span = Span {
                start: code_start,
                end: html.len(),
            };
            warn!(offset = code_start, "code block is never closed");
            diagnostics.push(Diagnostic::new(
                map.range(span),
                DiagnosticSeverity::Error,
                E_CODE_UNCLOSED,
                "<code> element has no closing </code>; the rest of the page is left as is",
            ));
            break;
        };

        let code_tag = &html[code_start..=code_tag_end];
        let tag_span = Span {
            start: code_start,
            end: code_tag_end + 1,
        };
        let inner = &html[code_tag_end + 1..code_close];
        out.push_str(&html[cursor..=code_tag_end]);

        match extract_language(code_tag) {
            Some(class) => {
                let text = text_content(inner);
                let language = Language::from_tag(&class);
                match language {
                    Some(language) => {
                        debug!(language = language.name(), bytes = text.len(), "highlighting block");
                        stats.highlighted += 1;
                    }
                    None => {
                        stats.escaped += 1;
                        if class != PLAINTEXT_CLASS {
                            diagnostics.push(Diagnostic::new(
                                map.range(tag_span),
                                DiagnosticSeverity::Warning,
                                W_LANG_UNSUPPORTED,
                                format!("`{}` is not highlighted; the block is only escaped", class),
                            ));
                        }
                    }
                }
                out.push_str(&highlighter.highlight(&text, &class));
            }
            None => {
                stats.untagged += 1;
                diagnostics.push(Diagnostic::new(
                    map.range(tag_span),
                    DiagnosticSeverity::Warning,
                    W_CODE_UNTAGGED,
                    "code block has no language-* class",
                ));
                out.push_str(inner);
            }
        }
        cursor = code_close;
    }

    out.push_str(&html[cursor..]);
    Rendered {
        html: out,
        diagnostics,
        stats,
    }
}

static UNTAGGED_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?is)(?P<open><pre(?:\s[^>]*)?>\s*<code)(?P<attrs>(?:\s[^>]*)?)>(?P<body>.*?)(?P<close></code>\s*</pre>)",
    )
    .expect("static pattern is valid")
});

/// Gives every `<pre>` block whose `<code>` has no class attribute the
/// `language-*` class its content looks like. Tag names match in any case
/// and whitespace may separate `<pre>` from `<code>`.
pub fn tag_code_blocks(html: &str) -> String {
    UNTAGGED_BLOCK
        .replace_all(html, |caps: &Captures| {
            let attrs = &caps["attrs"];
            if has_attr(attrs, "class") {
                return caps[0].to_string();
            }
            let class = classify(&text_content(&caps["body"]));
            debug!(class = class.class_name(), "tagging code block");
            format!(
                "{} class=\"{}\"{}>{}{}",
                &caps["open"],
                class.class_name(),
                attrs,
                &caps["body"],
                &caps["close"]
            )
        })
        .into_owned()
}

/// Byte offset of the first ASCII-case-insensitive match of `needle` at or
/// after `from`. `needle` must start with an ASCII byte.
fn find_ignore_case(html: &str, from: usize, needle: &str) -> Option<usize> {
    let needle = needle.as_bytes();
    html.as_bytes()
        .get(from..)?
        .windows(needle.len())
        .position(|window| window.eq_ignore_ascii_case(needle))
        .map(|idx| from + idx)
}

/// Start of the next `<name` tag, in any letter case.
fn find_tag(html: &str, from: usize, name: &str) -> Option<usize> {
    let needle = format!("<{}", name);
    let mut pos = from;
    while let Some(start) = find_ignore_case(html, pos, &needle) {
        let after = start + needle.len();
        match html[after..].chars().next() {
            Some(ch) if ch == '>' || ch == '/' || ch.is_ascii_whitespace() => return Some(start),
            Some(_) => pos = after,
            None => return None,
        }
    }
    None
}

fn extract_language(code_tag: &str) -> Option<String> {
    let class_attr = extract_attr(code_tag, "class")?;
    class_attr
        .split_whitespace()
        .find(|class_name| class_name.starts_with("language-"))
        .map(str::to_string)
}

fn has_attr(attrs: &str, name: &str) -> bool {
    attr_position(&attrs.to_ascii_lowercase(), &format!("{}=", name)).is_some()
}

/// Offset of `needle` where it starts an attribute, i.e. follows whitespace.
/// `lower` is the ASCII-lowercased tag.
fn attr_position(lower: &str, needle: &str) -> Option<usize> {
    lower
        .match_indices(needle)
        .map(|(idx, _)| idx)
        .find(|idx| {
            lower[..*idx]
                .chars()
                .next_back()
                .is_some_and(|ch| ch.is_ascii_whitespace())
        })
}

/// Value of a quoted attribute. The name matches in any case and may
/// follow any whitespace.
fn extract_attr(tag: &str, name: &str) -> Option<String> {
    let lower = tag.to_ascii_lowercase();
    for quote in ['"', '\''] {
        let needle = format!("{}={}", name, quote);
        if let Some(found) = attr_position(&lower, &needle) {
            let start = found + needle.len();
            let end = tag[start..].find(quote)?;
            return Some(tag[start..start + end].to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::{extract_language, find_tag, highlight_document, tag_code_blocks};
    use xidoc_core::Highlighter;

    #[test]
    fn find_tag_skips_longer_names() {
        let html = "<prelude><pre class=\"x\">";
        assert_eq!(find_tag(html, 0, "pre"), Some(9));
        assert_eq!(find_tag("<code>", 0, "code"), Some(0));
        assert_eq!(find_tag("<codex", 0, "code"), None);
        assert_eq!(find_tag("<P><PRE>", 0, "pre"), Some(3));
    }

    #[test]
    fn uppercase_tags_are_highlighted() {
        let html = "<PRE>\n  <CODE CLASS=\"language-lua\">local x</Code>\n</PRE>";
        let rendered = highlight_document(html, &Highlighter::with_class_prefix("xi-"));
        assert_eq!(
            rendered.html,
            "<PRE>\n  <CODE CLASS=\"language-lua\"><span class=\"xi-keyword\">local</span> x</Code>\n</PRE>"
        );
        assert_eq!(rendered.stats.highlighted, 1);
        assert!(rendered.diagnostics.is_empty());
    }

    #[test]
    fn language_class_is_found_among_others() {
        assert_eq!(
            extract_language("<code class=\"block language-lua wide\">"),
            Some("language-lua".to_string())
        );
        assert_eq!(
            extract_language("<code class='language-glsl'>"),
            Some("language-glsl".to_string())
        );
        assert_eq!(extract_language("<code data-class=\"language-cpp\">"), None);
        assert_eq!(extract_language("<code>"), None);
        assert_eq!(
            extract_language("<code\n\tClass=\"language-cpp\">"),
            Some("language-cpp".to_string())
        );
    }

    #[test]
    fn tagging_keeps_existing_classes() {
        let html = "<pre><code class=\"language-lua\">int x;</code></pre>";
        assert_eq!(tag_code_blocks(html), html);
    }

    #[test]
    fn tagging_classifies_escaped_content() {
        let html = "<pre><code>template&lt;typename T&gt;\nstruct Pool;</code></pre>\n<pre><code id=\"tree\">Xi Engine/\n└── Game</code></pre>";
        let tagged = tag_code_blocks(html);
        assert!(tagged.contains("<pre><code class=\"language-cpp\">template&lt;"));
        assert!(tagged.contains("<pre><code class=\"language-plaintext\" id=\"tree\">Xi Engine/"));
    }

    #[test]
    fn tagging_allows_whitespace_and_any_case() {
        let html = "<PRE class=\"box\">\n<Code>local t = {}\nend</Code>\n</PRE>";
        assert_eq!(
            tag_code_blocks(html),
            "<PRE class=\"box\">\n<Code class=\"language-lua\">local t = {}\nend</Code>\n</PRE>"
        );
    }

    #[test]
    fn tagging_skips_unquoted_class() {
        let html = "<pre><code class=language-cpp>int x;</code></pre>";
        assert_eq!(tag_code_blocks(html), html);
    }
}
