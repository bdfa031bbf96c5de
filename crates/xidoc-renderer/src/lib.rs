mod error;
mod pass;

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::path::Path;

use ammonia::Builder;
use xidoc_core::{Category, Highlighter, Palette, SpanStyle};

pub use error::RenderError;
pub use pass::{PassStats, Rendered, tag_code_blocks};

pub const DEFAULT_CLASS_PREFIX: &str = "xi-";
pub const STYLESHEET_FILE: &str = "xidoc.css";

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Theme {
    Auto,
    Light,
    Dark,
}

#[derive(Debug, Clone)]
pub struct Renderer {
    theme: Theme,
    custom_vars: BTreeMap<String, String>,
    class_prefix: Option<String>,
}

impl Renderer {
    pub fn new(theme: Theme) -> Self {
        Self {
            theme,
            custom_vars: BTreeMap::new(),
            class_prefix: None,
        }
    }

    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_vars.insert(key.into(), value.into());
        self
    }

    /// Emit `<span class="…">` instead of inline colors, to be styled by
    /// [`Renderer::stylesheet`].
    pub fn with_class_spans(mut self, prefix: impl Into<String>) -> Self {
        self.class_prefix = Some(prefix.into());
        self
    }

    pub fn highlighter(&self) -> Highlighter {
        match &self.class_prefix {
            Some(prefix) => Highlighter::with_class_prefix(prefix.clone()),
            None => Highlighter::new(SpanStyle::Inline(match self.theme {
                Theme::Light => light_palette(),
                Theme::Auto | Theme::Dark => Palette::one_dark(),
            })),
        }
    }

    pub fn highlight_html(&self, html: &str) -> Rendered {
        pass::highlight_document(html, &self.highlighter())
    }

    pub fn stylesheet(&self) -> String {
        let mut out = String::new();
        let light_vars = palette_vars(&light_palette());
        let dark_vars = palette_vars(&Palette::one_dark());

        match self.theme {
            Theme::Auto => {
                out.push_str(&root_block(&light_vars, true));
                out.push_str("@media (prefers-color-scheme: dark) {\n");
                out.push_str(&indent_root_block(&dark_vars));
                out.push_str("}\n");
            }
            Theme::Light => out.push_str(&root_block(&light_vars, true)),
            Theme::Dark => out.push_str(&root_block(&dark_vars, true)),
        }

        if !self.custom_vars.is_empty() {
            out.push_str(&root_block(&self.custom_vars, false));
        }

        let prefix = self
            .class_prefix
            .as_deref()
            .unwrap_or(DEFAULT_CLASS_PREFIX);
        for category in Category::ALL {
            out.push_str(&format!(
                ".{}{} {{ color: var(--xidoc-{}); }}\n",
                prefix,
                category.name(),
                category.name()
            ));
        }
        out
    }

    /// Cleans a highlighted fragment down to the elements and attributes
    /// documentation pages use.
    pub fn sanitize(&self, html: &str) -> String {
        let tags: HashSet<&'static str> = [
            "a",
            "blockquote",
            "br",
            "code",
            "div",
            "em",
            "h1",
            "h2",
            "h3",
            "h4",
            "h5",
            "h6",
            "hr",
            "li",
            "nav",
            "ol",
            "p",
            "pre",
            "section",
            "span",
            "strong",
            "table",
            "tbody",
            "td",
            "th",
            "thead",
            "tr",
            "ul",
        ]
        .iter()
        .copied()
        .collect();

        let mut generic_attributes: HashSet<&'static str> = HashSet::new();
        generic_attributes.insert("class");
        generic_attributes.insert("id");

        let mut tag_attributes = HashMap::new();
        tag_attributes.insert("a", ["href", "title"].iter().copied().collect());
        // Inline span colors.
        tag_attributes.insert("span", ["style"].iter().copied().collect());

        Builder::new()
            .tags(tags)
            .generic_attributes(generic_attributes)
            .tag_attributes(tag_attributes)
            .clean(html)
            .to_string()
    }

    pub fn generate_files(&self, out_dir: &Path) -> Result<(), RenderError> {
        fs::create_dir_all(out_dir).map_err(|source| RenderError::CreateDir {
            path: out_dir.to_path_buf(),
            source,
        })?;
        let path = out_dir.join(STYLESHEET_FILE);
        fs::write(&path, self.stylesheet()).map_err(|source| RenderError::Write { path, source })
    }
}

/// One Light counterparts of the dark palette.
fn light_palette() -> Palette {
    Palette {
        string: "#50a14f".to_string(),
        number: "#986801".to_string(),
        keyword: "#a626a4".to_string(),
        ty: "#c18401".to_string(),
        function: "#4078f2".to_string(),
    }
}

fn palette_vars(palette: &Palette) -> BTreeMap<String, String> {
    Category::ALL
        .into_iter()
        .map(|category| {
            (
                format!("--xidoc-{}", category.name()),
                palette.color(category).to_string(),
            )
        })
        .collect()
}

fn format_vars(vars: &BTreeMap<String, String>, indent: &str) -> String {
    let mut out = String::new();
    for (key, value) in vars {
        out.push_str(indent);
        out.push_str(key);
        out.push_str(": ");
        out.push_str(value);
        out.push_str(";\n");
    }
    out
}

fn root_block(vars: &BTreeMap<String, String>, include_color_scheme: bool) -> String {
    let mut out = String::new();
    out.push_str(":root {\n");
    if include_color_scheme {
        out.push_str("  color-scheme: light dark;\n");
    }
    out.push_str(&format_vars(vars, "  "));
    out.push_str("}\n");
    out
}

fn indent_root_block(vars: &BTreeMap<String, String>) -> String {
    let mut out = String::new();
    out.push_str("  :root {\n");
    out.push_str("    color-scheme: light dark;\n");
    out.push_str(&format_vars(vars, "    "));
    out.push_str("  }\n");
    out
}
