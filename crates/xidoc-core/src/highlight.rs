use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::escape::{escape_html, push_escaped};
use crate::language::{Language, RuleTable};
use crate::span::Span;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    String,
    Number,
    Keyword,
    Type,
    Function,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::String,
        Category::Number,
        Category::Keyword,
        Category::Type,
        Category::Function,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Category::String => "string",
            Category::Number => "number",
            Category::Keyword => "keyword",
            Category::Type => "type",
            Category::Function => "function",
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Palette {
    pub string: String,
    pub number: String,
    pub keyword: String,
    pub ty: String,
    pub function: String,
}

impl Palette {
    /// The One Dark colors the documentation theme was designed around.
    pub fn one_dark() -> Self {
        Self {
            string: "#98c379".to_string(),
            number: "#d19a66".to_string(),
            keyword: "#c678dd".to_string(),
            ty: "#e5c07b".to_string(),
            function: "#61afef".to_string(),
        }
    }

    pub fn color(&self, category: Category) -> &str {
        match category {
            Category::String => &self.string,
            Category::Number => &self.number,
            Category::Keyword => &self.keyword,
            Category::Type => &self.ty,
            Category::Function => &self.function,
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::one_dark()
    }
}

/// How a category span is written into the markup.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SpanStyle {
    /// `<span style="color: …;">`, self-contained output.
    Inline(Palette),
    /// `<span class="{prefix}{category}">`, colored by a stylesheet.
    Class(String),
}

impl Default for SpanStyle {
    fn default() -> Self {
        SpanStyle::Inline(Palette::default())
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Token {
    pub span: Span,
    pub category: Category,
}

/// A highlighted block together with the text it was produced from.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Highlighted {
    pub language: Option<Language>,
    pub source: String,
    pub markup: String,
}

#[derive(Clone, Debug, Default)]
pub struct Highlighter {
    style: SpanStyle,
}

impl Highlighter {
    pub fn new(style: SpanStyle) -> Self {
        Self { style }
    }

    pub fn with_class_prefix(prefix: impl Into<String>) -> Self {
        Self::new(SpanStyle::Class(prefix.into()))
    }

    pub fn style(&self) -> &SpanStyle {
        &self.style
    }

    /// Highlights `text` for the language named by `tag`. Unknown tags
    /// produce escaped text with no spans.
    pub fn highlight(&self, text: &str, tag: &str) -> String {
        match Language::from_tag(tag) {
            Some(language) => self.highlight_language(text, language),
            None => escape_html(text),
        }
    }

    pub fn highlight_language(&self, text: &str, language: Language) -> String {
        let mut out = String::with_capacity(text.len() + text.len() / 2);
        let mut cursor = 0usize;
        for token in tokenize(text, language) {
            push_escaped(&mut out, &text[cursor..token.span.start]);
            self.push_span(&mut out, token.category, &text[token.span.start..token.span.end]);
            cursor = token.span.end;
        }
        push_escaped(&mut out, &text[cursor..]);
        out
    }

    pub fn highlight_block(&self, text: &str, tag: &str) -> Highlighted {
        Highlighted {
            language: Language::from_tag(tag),
            source: text.to_string(),
            markup: self.highlight(text, tag),
        }
    }

    fn push_span(&self, out: &mut String, category: Category, text: &str) {
        match &self.style {
            SpanStyle::Inline(palette) => {
                out.push_str("<span style=\"color: ");
                push_escaped(out, palette.color(category));
                out.push_str(";\">");
            }
            SpanStyle::Class(prefix) => {
                out.push_str("<span class=\"");
                push_escaped(out, prefix);
                out.push_str(category.name());
                out.push_str("\">");
            }
        }
        push_escaped(out, text);
        out.push_str("</span>");
    }
}

/// Highlights with the default inline One Dark styling.
pub fn highlight(text: &str, tag: &str) -> String {
    Highlighter::default().highlight(text, tag)
}

static CPP_PATTERN: Lazy<Regex> = Lazy::new(|| compile(Language::Cpp.rules()));
static GLSL_PATTERN: Lazy<Regex> = Lazy::new(|| compile(Language::Glsl.rules()));
static LUA_PATTERN: Lazy<Regex> = Lazy::new(|| compile(Language::Lua.rules()));

fn pattern(language: Language) -> &'static Regex {
    match language {
        Language::Cpp => &*CPP_PATTERN,
        Language::Glsl => &*GLSL_PATTERN,
        Language::Lua => &*LUA_PATTERN,
    }
}

fn compile(rules: &RuleTable) -> Regex {
    let source = pattern_source(rules);
    Regex::new(&source).expect("rule table patterns are static and valid")
}

// Alternatives are listed in precedence order; at any offset the first one
// that matches wins, so each character belongs to at most one token.
fn pattern_source(rules: &RuleTable) -> String {
    let mut alternatives: Vec<String> = Vec::new();
    if rules.preprocessor {
        alternatives.push(r"(?P<directive>^#.*$)".to_string());
    }
    if rules.strings {
        // Literals end at the line; a stray quote never pairs across lines.
        alternatives.push(
            r#"(?P<string>"(?:\\.|[^"\\\r\n])*"|'(?:\\.|[^'\\\r\n])*')"#.to_string(),
        );
    }
    let suffix = if rules.number_suffixes.is_empty() {
        String::new()
    } else {
        let repeat = if rules.repeat_suffix { '*' } else { '?' };
        format!("[{}]{}", regex::escape(rules.number_suffixes), repeat)
    };
    alternatives.push(format!(r"(?P<number>\b[0-9]+\.?[0-9]*{}\b)", suffix));
    alternatives.push(r"(?P<word>\b[A-Za-z_][A-Za-z0-9_]*\b)".to_string());
    format!("(?mR){}", alternatives.join("|"))
}

/// Splits `text` into classified tokens, in order and non-overlapping.
/// Unclassified text between tokens is not reported.
pub fn tokenize(text: &str, language: Language) -> Vec<Token> {
    let rules = language.rules();
    let mut tokens = Vec::new();
    for caps in pattern(language).captures_iter(text) {
        let (m, category) = if let Some(m) = caps.name("directive") {
            (m, Some(Category::Keyword))
        } else if let Some(m) = caps.name("string") {
            (m, Some(Category::String))
        } else if let Some(m) = caps.name("number") {
            (m, Some(Category::Number))
        } else if let Some(m) = caps.name("word") {
            (m, classify_word(rules, m.as_str(), &text[m.end()..]))
        } else {
            continue;
        };
        if let Some(category) = category {
            tokens.push(Token {
                span: Span {
                    start: m.start(),
                    end: m.end(),
                },
                category,
            });
        }
    }
    tokens
}

fn classify_word(rules: &RuleTable, word: &str, rest: &str) -> Option<Category> {
    if rules.is_keyword(word) {
        Some(Category::Keyword)
    } else if rules.is_type(word) {
        Some(Category::Type)
    } else if rules.is_function(word) || (rules.call_functions && opens_call(rest)) {
        Some(Category::Function)
    } else {
        None
    }
}

fn opens_call(rest: &str) -> bool {
    rest.trim_start().starts_with('(')
}
