mod classify;
mod diagnostic;
mod escape;
mod highlight;
mod language;
pub mod page;
mod source_map;
mod span;

pub use classify::{CodeClass, classify};
pub use diagnostic::{
    Diagnostic, DiagnosticSeverity, E_CODE_UNCLOSED, W_CODE_UNTAGGED, W_LANG_UNSUPPORTED,
};
pub use escape::{escape_html, strip_markup, text_content, unescape_html};
pub use highlight::{
    Category, Highlighted, Highlighter, Palette, SpanStyle, Token, highlight, tokenize,
};
pub use language::{CPP, GLSL, LUA, Language, RuleTable};
pub use source_map::{Position, Range, SourceMap};
pub use span::Span;
