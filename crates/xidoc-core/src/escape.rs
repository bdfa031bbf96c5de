/// Escapes the five HTML metacharacters. Everything else, control
/// characters included, is copied through unchanged.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    push_escaped(&mut out, text);
    out
}

pub(crate) fn push_escaped(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(ch),
        }
    }
}

/// Named references decoded by [`unescape_html`]: the escaper's own output
/// plus the ones documentation pages write by hand.
const NAMED_ENTITIES: &[(&str, char)] = &[
    ("amp", '&'),
    ("lt", '<'),
    ("gt", '>'),
    ("quot", '"'),
    ("apos", '\''),
    ("nbsp", '\u{a0}'),
    ("copy", '©'),
    ("reg", '®'),
    ("trade", '™'),
    ("deg", '°'),
    ("plusmn", '±'),
    ("times", '×'),
    ("divide", '÷'),
    ("middot", '·'),
    ("bull", '•'),
    ("hellip", '…'),
    ("ndash", '–'),
    ("mdash", '—'),
    ("lsquo", '‘'),
    ("rsquo", '’'),
    ("ldquo", '“'),
    ("rdquo", '”'),
    ("laquo", '«'),
    ("raquo", '»'),
    ("sect", '§'),
    ("para", '¶'),
    ("euro", '€'),
    ("pound", '£'),
    ("yen", '¥'),
    ("cent", '¢'),
    ("larr", '←'),
    ("rarr", '→'),
    ("uarr", '↑'),
    ("darr", '↓'),
    ("harr", '↔'),
    ("le", '≤'),
    ("ge", '≥'),
    ("ne", '≠'),
    ("shy", '\u{ad}'),
    ("zwj", '\u{200d}'),
    ("zwnj", '\u{200c}'),
];

// `&#x10FFFF;` is the longest reference decoded.
const MAX_REFERENCE_LEN: usize = 12;

/// Reverses [`escape_html`]. Decimal and hex character references and the
/// common named entities are decoded; anything else is left as written.
pub fn unescape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        match decode_entity(tail) {
            Some((ch, len)) => {
                out.push(ch);
                rest = &tail[len..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Decodes the reference at the start of `tail`, which begins with `&`.
/// Returns the character and the bytes consumed; the `;` is required.
fn decode_entity(tail: &str) -> Option<(char, usize)> {
    let body_end = tail
        .bytes()
        .take(MAX_REFERENCE_LEN)
        .position(|byte| byte == b';')?;
    let body = &tail[1..body_end];
    let ch = match body.strip_prefix('#') {
        Some(number) => decode_numeric(number)?,
        None => NAMED_ENTITIES
            .iter()
            .find(|(name, _)| *name == body)
            .map(|(_, ch)| *ch)?,
    };
    Some((ch, body_end + 1))
}

fn decode_numeric(number: &str) -> Option<char> {
    let (digits, radix) = match number.strip_prefix(['x', 'X']) {
        Some(hex) => (hex, 16),
        None => (number, 10),
    };
    if digits.is_empty() || digits.len() > 8 || !digits.chars().all(|ch| ch.is_digit(radix)) {
        return None;
    }
    let value = u32::from_str_radix(digits, radix).ok()?;
    // NUL, surrogates and out-of-range values become U+FFFD, as in browsers.
    if value == 0 {
        return Some(char::REPLACEMENT_CHARACTER);
    }
    Some(char::from_u32(value).unwrap_or(char::REPLACEMENT_CHARACTER))
}

/// Drops every `<...>` tag and keeps the text between them. An unclosed
/// `<` is kept as text.
pub fn strip_markup(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut rest = html;
    while let Some(open) = rest.find('<') {
        out.push_str(&rest[..open]);
        match rest[open..].find('>') {
            Some(close) => rest = &rest[open + close + 1..],
            None => {
                out.push_str(&rest[open..]);
                return out;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Text content of an HTML fragment, as a browser's `textContent` would
/// report it: tags dropped, character references decoded.
pub fn text_content(html: &str) -> String {
    unescape_html(&strip_markup(html))
}
