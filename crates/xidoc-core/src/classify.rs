use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::language::Language;

/// Language guessed for a code block that was written without a class.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CodeClass {
    Cpp,
    Glsl,
    Lua,
    Plaintext,
}

impl CodeClass {
    pub fn class_name(self) -> &'static str {
        match self {
            CodeClass::Cpp => "language-cpp",
            CodeClass::Glsl => "language-glsl",
            CodeClass::Lua => "language-lua",
            CodeClass::Plaintext => "language-plaintext",
        }
    }

    pub fn language(self) -> Option<Language> {
        match self {
            CodeClass::Cpp => Some(Language::Cpp),
            CodeClass::Glsl => Some(Language::Glsl),
            CodeClass::Lua => Some(Language::Lua),
            CodeClass::Plaintext => None,
        }
    }
}

const GLSL_STRONG: &[&str] = &[
    "vec2",
    "vec3",
    "vec4",
    "mat2",
    "mat3",
    "mat4",
    "uniform ",
    "varying ",
    "attribute ",
    "gl_Position",
    "gl_FragColor",
    "texture2D",
    "sampler2D",
    "precision mediump",
    "precision highp",
    "precision lowp",
];

const CPP_STRONG: &[&str] = &[
    "class ",
    "struct ",
    "template<",
    "namespace ",
    "#pragma once",
    "public:",
    "private:",
    "protected:",
    "virtual ",
    "override",
    "#include <",
    "#include \"",
    "std::",
    "::",
    "nullptr",
    "constexpr ",
    "static_cast<",
    "uint32_t",
    "size_t",
];

const PLAINTEXT_MARKERS: &[&str] = &[
    "├──",
    "└──",
    "│   ",
    "┌─",
    "┐",
    "└─",
    "┘",
    "├─",
    "┤",
    "┴",
    "┬",
    "Xi Engine/",
    "Engine/",
    "Pool:",
    "Layout:",
    "Grammar Rules:",
    "Execute:",
    "Update Phase:",
    "Render Phase:",
    "→",
    "←",
    "▼",
    "▲",
    "Input:",
    "Output:",
    "Token{",
    "Before removing",
    "After swap",
    "Index map:",
    "Data flows:",
    "requiredMask =",
    "entityMask =",
    "Step 1:",
    "Step 2:",
    "Step 3:",
    "// Before",
    "// After",
];

const BOX_DRAWING: &[char] = &['┌', '┐', '└', '┘', '├', '┤', '│', '─', '┬', '┴'];

static END_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bend\b").expect("static pattern is valid"));

/// Guesses the language of an unlabelled code block from its text.
pub fn classify(code: &str) -> CodeClass {
    let code = code.trim();

    if code.starts_with('[')
        && code.ends_with(']')
        && code.matches('[').count() <= 5
        && !code.contains('\n')
    {
        return CodeClass::Plaintext;
    }

    // Pseudo-code reads like Lua but is prose.
    if code.contains("function ")
        && code.contains(':')
        && code.contains("while ")
        && code.contains(" != ")
    {
        return CodeClass::Plaintext;
    }

    if code.contains("├──") || code.contains("└──") || code.starts_with("Xi Engine/") {
        return CodeClass::Plaintext;
    }
    if code.contains(BOX_DRAWING) {
        return CodeClass::Plaintext;
    }
    if ["Pool:", "Layout:", "→", "Index map:"]
        .iter()
        .any(|marker| code.contains(marker))
    {
        return CodeClass::Plaintext;
    }
    if ["Grammar Rules:", "Execute:", "Step 1:", "Step 2:"]
        .iter()
        .any(|marker| code.contains(marker))
    {
        return CodeClass::Plaintext;
    }
    if ((code.contains("Before ") && code.contains("After ")) || code.starts_with("//"))
        && !code.contains("class ")
        && !code.contains("void ")
    {
        return CodeClass::Plaintext;
    }

    if contains_any(code, GLSL_STRONG) {
        return CodeClass::Glsl;
    }

    let opens_lua_block =
        code.contains("function ") || code.contains("function(") || code.contains("local ");
    if opens_lua_block && END_WORD.is_match(code) {
        return CodeClass::Lua;
    }

    if contains_any(code, CPP_STRONG) {
        return CodeClass::Cpp;
    }

    let c_shaped = code.contains('{') && code.contains('}') && code.contains(';');
    if c_shaped && (code.contains("void ") || code.contains("class ") || code.contains("struct ")) {
        return CodeClass::Cpp;
    }
    if contains_any(code, PLAINTEXT_MARKERS) {
        return CodeClass::Plaintext;
    }
    if c_shaped {
        return CodeClass::Cpp;
    }
    CodeClass::Plaintext
}

fn contains_any(code: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| code.contains(needle))
}
