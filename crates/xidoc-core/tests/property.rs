use std::panic;

use xidoc_core::{Category, Language, Palette, escape_html, highlight, text_content, tokenize};

const CASES: usize = 300;
const MAX_LEN: usize = 256;
const CHARSET: &[char] = &[
    'a', 'e', 'i', 'n', 't', 'l', 'o', 'c', 'f', 'v', 'u', 'x', '_', '0', '1', '5', '9', '.', ' ',
    '\n', '\r', '\t', '#', '"', '\'', '\\', '<', '>', '&', ';', '(', ')', '{', '}', '→', 'é',
];
const TAGS: &[&str] = &["language-cpp", "language-glsl", "language-lua", "python", ""];

#[test]
fn highlighter_never_panics_on_random_input() -> Result<(), Box<dyn std::error::Error>> {
    let mut rng = Lcg::new(0x5eed_1234_abcd_0001);
    for case in 0..CASES {
        let len = rng.gen_range(0, MAX_LEN + 1);
        let source = random_string(&mut rng, len);
        for tag in TAGS {
            let result = panic::catch_unwind(|| highlight(&source, tag));
            if result.is_err() {
                return Err(format!("highlight panicked for case {} ({}): {:?}", case, tag, source).into());
            }
        }
    }
    Ok(())
}

#[test]
fn text_survives_highlighting() -> Result<(), Box<dyn std::error::Error>> {
    let mut rng = Lcg::new(0x0dd5_eed5_7788_9900);
    for case in 0..CASES {
        let len = rng.gen_range(0, MAX_LEN + 1);
        let source = random_string(&mut rng, len);
        for tag in TAGS {
            let recovered = text_content(&highlight(&source, tag));
            if recovered != source {
                return Err(format!(
                    "round trip failed for case {} ({}):\n{:?}\n{:?}",
                    case, tag, source, recovered
                )
                .into());
            }
        }
    }
    Ok(())
}

#[test]
fn markup_is_well_formed() -> Result<(), Box<dyn std::error::Error>> {
    let mut rng = Lcg::new(0x9a9a_1b1b_2c2c_3d3d);
    for _ in 0..CASES {
        let len = rng.gen_range(0, MAX_LEN + 1);
        // XML rejects most control characters, so keep to printable text here.
        let source: String = random_string(&mut rng, len)
            .chars()
            .filter(|ch| *ch != '\r')
            .collect();
        for tag in TAGS {
            let wrapped = format!("<code>{}</code>", highlight(&source, tag));
            let doc = roxmltree::Document::parse(&wrapped)?;
            let text: String = doc
                .descendants()
                .filter(|node| node.is_text())
                .filter_map(|node| node.text())
                .collect();
            assert_eq!(text, source);
            for node in doc.descendants().filter(|node| node.is_element()) {
                let name = node.tag_name().name();
                assert!(name == "code" || name == "span", "unexpected element {}", name);
                if name == "span" {
                    assert!(
                        node.children().all(|child| child.is_text()),
                        "spans must not nest"
                    );
                }
            }
        }
    }
    Ok(())
}

#[test]
fn output_is_deterministic() {
    let mut rng = Lcg::new(0x1111_2222_3333_4444);
    for _ in 0..50 {
        let len = rng.gen_range(0, MAX_LEN + 1);
        let source = random_string(&mut rng, len);
        for tag in TAGS {
            assert_eq!(highlight(&source, tag), highlight(&source, tag));
        }
    }
}

#[test]
fn tokens_are_ordered_and_on_char_boundaries() {
    let mut rng = Lcg::new(0x7777_8888_9999_aaaa);
    for _ in 0..CASES {
        let len = rng.gen_range(0, MAX_LEN + 1);
        let source = random_string(&mut rng, len);
        for language in Language::ALL {
            let mut last_end = 0;
            for token in tokenize(&source, language) {
                assert!(token.span.start >= last_end);
                assert!(!token.span.is_empty());
                assert!(token.span.slice(&source).is_some());
                last_end = token.span.end;
            }
        }
    }
}

#[test]
fn hash_lines_are_single_keyword_spans() {
    let mut rng = Lcg::new(0x2468_ace0_1357_9bdf);
    let keyword = Palette::one_dark().color(Category::Keyword).to_string();
    for case in 0..CASES {
        let len = rng.gen_range(0, MAX_LEN + 1);
        let source = random_string(&mut rng, len);
        for language in [Language::Cpp, Language::Glsl] {
            let tokens = tokenize(&source, language);
            let html = highlight(&source, language.name());
            for (start, end) in directive_lines(&source) {
                let covering: Vec<_> = tokens
                    .iter()
                    .filter(|token| token.span.start < end && token.span.end > start)
                    .collect();
                assert_eq!(
                    covering.len(),
                    1,
                    "case {} ({}): line {:?} in {:?}",
                    case,
                    language.name(),
                    &source[start..end],
                    source
                );
                assert_eq!(covering[0].category, Category::Keyword);
                assert_eq!((covering[0].span.start, covering[0].span.end), (start, end));

                let expected = format!(
                    "<span style=\"color: {};\">{}</span>",
                    keyword,
                    escape_html(&source[start..end])
                );
                assert!(html.contains(&expected), "case {}: {:?}", case, source);
            }
        }
    }
}

/// Byte ranges of the lines that start with `#`. `\r`, `\n` and `\r\n`
/// all end a line.
fn directive_lines(text: &str) -> Vec<(usize, usize)> {
    let mut lines = Vec::new();
    let mut start = 0;
    loop {
        let end = text[start..]
            .find(['\r', '\n'])
            .map_or(text.len(), |idx| start + idx);
        if text[start..end].starts_with('#') {
            lines.push((start, end));
        }
        if end == text.len() {
            return lines;
        }
        start = end + 1;
    }
}

fn random_string(rng: &mut Lcg, len: usize) -> String {
    (0..len)
        .map(|_| CHARSET[rng.gen_range(0, CHARSET.len())])
        .collect()
}

struct Lcg {
    state: u64,
}

impl Lcg {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next(&mut self) -> u64 {
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        self.state
    }

    fn gen_range(&mut self, min: usize, max: usize) -> usize {
        if max <= min {
            return min;
        }
        let span = max - min;
        let value = (self.next() >> 1) as usize;
        min + (value % span)
    }
}
