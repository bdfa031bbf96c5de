use xidoc_core::{
    Category, Highlighter, Language, Palette, escape_html, highlight, text_content, tokenize,
};

fn span(category: Category, text: &str) -> String {
    format!(
        "<span style=\"color: {};\">{}</span>",
        Palette::one_dark().color(category),
        text
    )
}

#[test]
fn cpp_declaration_marks_keyword_and_number() {
    let html = highlight("int x = 42;", "language-cpp");
    let expected = format!(
        "{} x = {};",
        span(Category::Keyword, "int"),
        span(Category::Number, "42")
    );
    assert_eq!(html, expected);
}

#[test]
fn escaped_quote_stays_inside_string() {
    let html = highlight("\"hello\\\"world\"", "language-cpp");
    let expected = span(Category::String, "&quot;hello\\&quot;world&quot;");
    assert_eq!(html, expected);
}

#[test]
fn glsl_types_and_builtins() {
    let html = highlight("vec3 normalize(vec3 v)", "language-glsl");
    let expected = format!(
        "{} {}({} v)",
        span(Category::Type, "vec3"),
        span(Category::Function, "normalize"),
        span(Category::Type, "vec3")
    );
    assert_eq!(html, expected);
}

#[test]
fn lua_local_and_number() {
    let html = highlight("local x = 5", "language-lua");
    let expected = format!(
        "{} x = {}",
        span(Category::Keyword, "local"),
        span(Category::Number, "5")
    );
    assert_eq!(html, expected);
}

#[test]
fn directive_line_is_one_keyword_span() {
    let html = highlight("#define MAX 10", "language-cpp");
    assert_eq!(html, span(Category::Keyword, "#define MAX 10"));
}

#[test]
fn directive_stops_at_line_end() {
    let html = highlight("#include <vector>\r\nint a;", "language-cpp");
    let expected = format!(
        "{}\r\n{} a;",
        span(Category::Keyword, "#include &lt;vector&gt;"),
        span(Category::Keyword, "int")
    );
    assert_eq!(html, expected);
}

#[test]
fn stray_quotes_do_not_swallow_directives() {
    let html = highlight("// don't\n#define MAX 10\nchar c = 'a';", "language-cpp");
    let expected = format!(
        "// don&#039;t\n{}\n{} c = {};",
        span(Category::Keyword, "#define MAX 10"),
        span(Category::Keyword, "char"),
        span(Category::String, "&#039;a&#039;")
    );
    assert_eq!(html, expected);
}

#[test]
fn strings_end_at_the_line() {
    assert_eq!(highlight("\"a\nb\"", "lua"), "&quot;a\nb&quot;");
    assert_eq!(highlight("'a\r\nb'", "cpp"), "&#039;a\r\nb&#039;");
}

#[test]
fn indented_hash_is_not_a_directive() {
    let html = highlight("  #pragma once", "language-glsl");
    assert_eq!(html, "  #pragma once");
}

#[test]
fn unknown_tag_is_escaped_only() {
    let text = "def f(x): return '<' + \"&\"";
    assert_eq!(highlight(text, "language-python"), escape_html(text));
    assert_eq!(highlight(text, ""), escape_html(text));
}

#[test]
fn keywords_inside_strings_are_not_rewrapped() {
    let html = highlight("\"return int 42\"", "cpp");
    assert_eq!(html, span(Category::String, "&quot;return int 42&quot;"));
}

#[test]
fn words_match_whole_identifiers_only() {
    assert_eq!(highlight("integer intx _int", "cpp"), "integer intx _int");
    assert_eq!(highlight("localize", "lua"), "localize");
    assert_eq!(highlight("vec3a", "glsl"), "vec3a");
}

#[test]
fn number_suffixes_follow_language() {
    let cpp = tokenize("10ul 1.5f", Language::Cpp);
    assert_eq!(cpp.len(), 2);
    assert_eq!(cpp[0].span.len(), 4);

    // GLSL allows a single f suffix, Lua none at all.
    assert!(tokenize("10ul", Language::Glsl).is_empty());
    assert_eq!(
        highlight("2.0f", "glsl"),
        span(Category::Number, "2.0f")
    );
    assert_eq!(highlight("2f", "lua"), "2f");
}

#[test]
fn digits_inside_identifiers_are_not_numbers() {
    assert_eq!(highlight("x1 = y2", "lua"), "x1 = y2");
}

#[test]
fn glsl_has_no_string_literals() {
    let html = highlight("\"vec3\"", "glsl");
    assert_eq!(html, format!("&quot;{}&quot;", span(Category::Type, "vec3")));
}

#[test]
fn cpp_types_after_keywords() {
    let html = highlight("std::vector<int> v;", "cpp");
    let expected = format!(
        "{}::{}&lt;{}&gt; v;",
        span(Category::Type, "std"),
        span(Category::Type, "vector"),
        span(Category::Keyword, "int")
    );
    assert_eq!(html, expected);
}

#[test]
fn lua_calls_are_functions() {
    let html = highlight("print (\"hi\")", "lua");
    let expected = format!(
        "{} ({})",
        span(Category::Function, "print"),
        span(Category::String, "&quot;hi&quot;")
    );
    assert_eq!(html, expected);
}

#[test]
fn single_quoted_strings_use_entity() {
    let html = highlight("char c = 'a';", "cpp");
    let expected = format!(
        "{} c = {};",
        span(Category::Keyword, "char"),
        span(Category::String, "&#039;a&#039;")
    );
    assert_eq!(html, expected);
}

#[test]
fn unterminated_quote_is_left_plain() {
    let html = highlight("\"open ended", "cpp");
    assert_eq!(html, "&quot;open ended");
    assert_eq!(text_content(&html), "\"open ended");
}

#[test]
fn pathological_inputs_return() {
    for tag in ["cpp", "glsl", "lua", "none"] {
        assert_eq!(highlight("", tag), "");
        assert_eq!(highlight("<>&\"'", tag), "&lt;&gt;&amp;&quot;&#039;");
        assert_eq!(text_content(&highlight("'\\", tag)), "'\\");
    }
}

#[test]
fn class_spans_carry_category_names() {
    let highlighter = Highlighter::with_class_prefix("xi-");
    let html = highlighter.highlight("float f = 1.0;", "language-glsl");
    assert_eq!(
        html,
        "<span class=\"xi-type\">float</span> f = <span class=\"xi-number\">1.0</span>;"
    );
}

#[test]
fn highlighted_block_keeps_source() {
    let block = Highlighter::default().highlight_block("a < b", "cpp");
    assert_eq!(block.language, Some(Language::Cpp));
    assert_eq!(block.source, "a < b");
    assert_eq!(block.markup, "a &lt; b");
}
