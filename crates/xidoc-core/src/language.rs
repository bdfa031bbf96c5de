use serde::Serialize;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Cpp,
    Glsl,
    Lua,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::Cpp, Language::Glsl, Language::Lua];

    /// Resolves a tag such as `language-cpp`. Containment is tested in the
    /// order cpp, glsl, lua; any other tag is unknown. The first contained
    /// name wins, so `language-lua-glsl` is GLSL.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|language| tag.contains(language.name()))
    }

    pub fn name(self) -> &'static str {
        match self {
            Language::Cpp => "cpp",
            Language::Glsl => "glsl",
            Language::Lua => "lua",
        }
    }

    pub fn rules(self) -> &'static RuleTable {
        match self {
            Language::Cpp => &CPP,
            Language::Glsl => &GLSL,
            Language::Lua => &LUA,
        }
    }
}

/// Static highlighting rules for one language.
#[derive(Debug)]
pub struct RuleTable {
    /// Double- and single-quoted literals with backslash escapes.
    pub strings: bool,
    /// Characters allowed after the digits of a numeric literal.
    pub number_suffixes: &'static str,
    /// Whether the suffix may repeat (`10ul`) or appear at most once.
    pub repeat_suffix: bool,
    pub keywords: &'static [&'static str],
    pub types: &'static [&'static str],
    pub functions: &'static [&'static str],
    /// Identifiers directly followed by `(` are calls.
    pub call_functions: bool,
    /// Lines starting with `#` are directives.
    pub preprocessor: bool,
}

impl RuleTable {
    pub(crate) fn is_keyword(&self, word: &str) -> bool {
        self.keywords.contains(&word)
    }

    pub(crate) fn is_type(&self, word: &str) -> bool {
        self.types.contains(&word)
    }

    pub(crate) fn is_function(&self, word: &str) -> bool {
        self.functions.contains(&word)
    }
}

pub static CPP: RuleTable = RuleTable {
    strings: true,
    number_suffixes: "fFuUlL",
    repeat_suffix: true,
    keywords: &[
        "alignas",
        "alignof",
        "and",
        "and_eq",
        "asm",
        "atomic_cancel",
        "atomic_commit",
        "atomic_noexcept",
        "auto",
        "bitand",
        "bitor",
        "bool",
        "break",
        "case",
        "catch",
        "char",
        "char8_t",
        "char16_t",
        "char32_t",
        "class",
        "compl",
        "concept",
        "const",
        "consteval",
        "constexpr",
        "constinit",
        "const_cast",
        "continue",
        "co_await",
        "co_return",
        "co_yield",
        "decltype",
        "default",
        "delete",
        "do",
        "double",
        "dynamic_cast",
        "else",
        "enum",
        "explicit",
        "export",
        "extern",
        "false",
        "float",
        "for",
        "friend",
        "goto",
        "if",
        "inline",
        "int",
        "long",
        "mutable",
        "namespace",
        "new",
        "noexcept",
        "not",
        "not_eq",
        "nullptr",
        "operator",
        "or",
        "or_eq",
        "private",
        "protected",
        "public",
        "reflexpr",
        "register",
        "reinterpret_cast",
        "requires",
        "return",
        "short",
        "signed",
        "sizeof",
        "static",
        "static_assert",
        "static_cast",
        "struct",
        "switch",
        "synchronized",
        "template",
        "this",
        "thread_local",
        "throw",
        "true",
        "try",
        "typedef",
        "typeid",
        "typename",
        "union",
        "unsigned",
        "using",
        "virtual",
        "void",
        "volatile",
        "wchar_t",
        "while",
        "xor",
        "xor_eq",
        "override",
        "final",
        "import",
        "module",
    ],
    types: &[
        "std",
        "string",
        "vector",
        "map",
        "set",
        "unordered_map",
        "unordered_set",
        "shared_ptr",
        "unique_ptr",
        "weak_ptr",
        "function",
        "size_t",
        "uint32_t",
        "uint64_t",
        "int32_t",
        "int64_t",
        "glm",
        "vec2",
        "vec3",
        "vec4",
        "mat3",
        "mat4",
    ],
    functions: &[],
    call_functions: false,
    preprocessor: true,
};

pub static GLSL: RuleTable = RuleTable {
    strings: false,
    number_suffixes: "fF",
    repeat_suffix: false,
    keywords: &[
        "attribute",
        "const",
        "uniform",
        "varying",
        "break",
        "continue",
        "do",
        "for",
        "while",
        "if",
        "else",
        "in",
        "out",
        "inout",
        "true",
        "false",
        "discard",
        "return",
        "struct",
        "layout",
        "precision",
        "highp",
        "mediump",
        "lowp",
    ],
    types: &[
        "float",
        "int",
        "void",
        "bool",
        "mat2",
        "mat3",
        "mat4",
        "vec2",
        "vec3",
        "vec4",
        "ivec2",
        "ivec3",
        "ivec4",
        "bvec2",
        "bvec3",
        "bvec4",
        "sampler2D",
        "samplerCube",
    ],
    functions: &[
        "sin",
        "cos",
        "tan",
        "asin",
        "acos",
        "atan",
        "pow",
        "exp",
        "log",
        "exp2",
        "log2",
        "sqrt",
        "inversesqrt",
        "abs",
        "sign",
        "floor",
        "ceil",
        "fract",
        "mod",
        "min",
        "max",
        "clamp",
        "mix",
        "step",
        "smoothstep",
        "length",
        "distance",
        "dot",
        "cross",
        "normalize",
        "reflect",
        "refract",
        "texture",
        "texture2D",
        "textureCube",
    ],
    call_functions: false,
    preprocessor: true,
};

pub static LUA: RuleTable = RuleTable {
    strings: true,
    number_suffixes: "",
    repeat_suffix: false,
    keywords: &[
        "and", "break", "do", "else", "elseif", "end", "false", "for", "function", "if", "in",
        "local", "nil", "not", "or", "repeat", "return", "then", "true", "until", "while",
    ],
    types: &[],
    functions: &[],
    call_functions: true,
    preprocessor: false,
};
