//! Post-processing of converter text before it is returned to callers.
//!
//! Converters emit text that still carries HTML character references
//! (`R&amp;D`, `&lt;b&gt;`, `&#8217;`). Every free-text field in a response
//! goes through [`decode_entities`] so callers receive plain characters.
//!
//! Decoding follows the HTML5 tokenizer's rules for text content:
//!
//! * The closing `;` is optional. `&amp`, `&#38` and `&copy 2024` decode.
//! * A name without `;` only resolves if it is one of the legacy entities,
//!   and the longest legacy prefix wins: `&copyright` → `©right`.
//! * A reference that does not resolve is left exactly as written, and a bare
//!   `&` is never an error.

use once_cell::sync::Lazy;
use quick_xml::escape::resolve_html5_entity;
use regex::{Captures, Regex};

/// Numeric reference, or up to 32 name characters, each with an optional `;`.
static RE_CHAR_REF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&(#[0-9]+;?|#[xX][0-9a-fA-F]+;?|[^\t\n\x0C <&#;]{1,32};?)").unwrap()
});

/// Named references that resolve without a trailing `;`.
const LEGACY_ENTITIES: &[&str] = &[
    "AElig", "AMP", "Aacute", "Acirc", "Agrave", "Aring", "Atilde", "Auml", "COPY", "Ccedil",
    "ETH", "Eacute", "Ecirc", "Egrave", "Euml", "GT", "Iacute", "Icirc", "Igrave", "Iuml", "LT",
    "Ntilde", "Oacute", "Ocirc", "Ograve", "Oslash", "Otilde", "Ouml", "QUOT", "REG", "THORN",
    "Uacute", "Ucirc", "Ugrave", "Uuml", "Yacute", "aacute", "acirc", "acute", "aelig", "agrave",
    "amp", "aring", "atilde", "auml", "brvbar", "ccedil", "cedil", "cent", "copy", "curren", "deg",
    "divide", "eacute", "ecirc", "egrave", "eth", "euml", "frac12", "frac14", "frac34", "gt",
    "iacute", "icirc", "iexcl", "igrave", "iquest", "iuml", "laquo", "lt", "macr", "micro",
    "middot", "nbsp", "not", "ntilde", "oacute", "ocirc", "ograve", "ordf", "ordm", "oslash",
    "otilde", "ouml", "para", "plusmn", "pound", "quot", "raquo", "reg", "sect", "shy", "sup1",
    "sup2", "sup3", "szlig", "thorn", "times", "uacute", "ucirc", "ugrave", "uml", "uuml",
    "yacute", "yen", "yuml",
];

/// Decode named (HTML5) and numeric character references.
///
/// * `&amp;` `&lt;` `&gt;` `&quot;` `&apos;` and the rest of the HTML5 named
///   set resolve to their characters.
/// * `&#38;` and `&#x26;` resolve to the code point. NUL, surrogates and values
///   beyond U+10FFFF become U+FFFD. C1 controls 0x80–0x9F are read as
///   Windows-1252, as browsers do. Other control characters and
///   noncharacters are dropped.
/// * Unknown names (`&bogus;`) and unterminated references (`AT&T`) are kept.
pub fn decode_entities(input: &str) -> String {
    if !input.contains('&') {
        return input.to_string();
    }
    RE_CHAR_REF
        .replace_all(input, |caps: &Captures| decode_reference(&caps[1]))
        .into_owned()
}

/// Number of whitespace-separated tokens; 0 for empty or blank text.
///
/// The ASCII information separators (U+001C–U+001F) count as whitespace too.
pub fn word_count(text: &str) -> usize {
    text.split(|c: char| c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c))
        .filter(|word| !word.is_empty())
        .count()
}

/// `reference` is the match without its leading `&`.
fn decode_reference(reference: &str) -> String {
    if let Some(number) = reference.strip_prefix('#') {
        let number = number.trim_end_matches(';');
        let cp = match number.strip_prefix('x').or_else(|| number.strip_prefix('X')) {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => number.parse::<u32>().ok(),
        };
        return decode_code_point(cp);
    }

    let exact = match reference.strip_suffix(';') {
        Some(name) => resolve_html5_entity(name),
        None => resolve_legacy(reference),
    };
    if let Some(resolved) = exact {
        return resolved.to_string();
    }

    // Longest legacy prefix of at least two characters.
    let mut bounds: Vec<usize> = reference.char_indices().skip(2).map(|(i, _)| i).collect();
    bounds.reverse();
    for end in bounds {
        if let Some(resolved) = resolve_legacy(&reference[..end]) {
            return format!("{resolved}{}", &reference[end..]);
        }
    }
    format!("&{reference}")
}

fn resolve_legacy(name: &str) -> Option<&'static str> {
    if LEGACY_ENTITIES.contains(&name) {
        resolve_html5_entity(name)
    } else {
        None
    }
}

fn decode_code_point(cp: Option<u32>) -> String {
    // Overflowing u32 is necessarily beyond U+10FFFF.
    let Some(cp) = cp else {
        return '\u{FFFD}'.to_string();
    };
    match cp {
        0 | 0xD800..=0xDFFF | 0x0011_0000.. => '\u{FFFD}'.to_string(),
        0x80..=0x9F => windows_1252_c1(cp)
            .or_else(|| char::from_u32(cp))
            .map(String::from)
            .unwrap_or_default(),
        _ if is_dropped_code_point(cp) => String::new(),
        _ => char::from_u32(cp).map(String::from).unwrap_or_default(),
    }
}

/// Controls and noncharacters that decode to nothing.
fn is_dropped_code_point(cp: u32) -> bool {
    matches!(cp, 0x01..=0x08 | 0x0B | 0x0E..=0x1F | 0x7F | 0xFDD0..=0xFDEF)
        || cp & 0xFFFE == 0xFFFE
}

/// C1 code points that HTML reinterprets as Windows-1252.
fn windows_1252_c1(cp: u32) -> Option<char> {
    let c = match cp {
        0x80 => '\u{20AC}',
        0x82 => '\u{201A}',
        0x83 => '\u{0192}',
        0x84 => '\u{201E}',
        0x85 => '\u{2026}',
        0x86 => '\u{2020}',
        0x87 => '\u{2021}',
        0x88 => '\u{02C6}',
        0x89 => '\u{2030}',
        0x8A => '\u{0160}',
        0x8B => '\u{2039}',
        0x8C => '\u{0152}',
        0x8E => '\u{017D}',
        0x91 => '\u{2018}',
        0x92 => '\u{2019}',
        0x93 => '\u{201C}',
        0x94 => '\u{201D}',
        0x95 => '\u{2022}',
        0x96 => '\u{2013}',
        0x97 => '\u{2014}',
        0x98 => '\u{02DC}',
        0x99 => '\u{2122}',
        0x9A => '\u{0161}',
        0x9B => '\u{203A}',
        0x9C => '\u{0153}',
        0x9E => '\u{017E}',
        0x9F => '\u{0178}',
        _ => return None,
    };
    Some(c)
}
