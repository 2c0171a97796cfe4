//! Naming conventions for derived output keys.
//!
//! Only the handful of English rules that conventional relation names need.

use alloc::string::String;
use alloc::vec::Vec;

/// `(singular, plural)`
const IRREGULARS: &[(&str, &str)] = &[
    ("person", "people"),
    ("child", "children"),
    ("man", "men"),
    ("woman", "women"),
    ("mouse", "mice"),
];

const SIBILANTS: &[&str] = &["s", "x", "z", "ch", "sh"];

/// Strips `last` when it is the whole word or its last `_`-separated part.
fn strip_word<'w>(word: &'w str, last: &str) -> Option<&'w str> {
    let stem = word.strip_suffix(last)?;
    (stem.is_empty() || stem.ends_with('_')).then_some(stem)
}

fn ends_with_consonant_y(word: &str) -> bool {
    let mut chars = word.chars().rev();
    matches!(
        (chars.next(), chars.next()),
        (Some('y'), Some(c)) if !matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
    )
}

/// Returns the plural form of `word`.
pub(crate) fn pluralize(word: &str) -> String {
    if word.is_empty() {
        return String::new();
    }
    for (singular, plural) in IRREGULARS {
        if let Some(stem) = strip_word(word, singular) {
            return [stem, plural].concat();
        }
        if strip_word(word, plural).is_some() {
            return word.into();
        }
    }
    if ends_with_consonant_y(word) {
        return [&word[..word.len() - 1], "ies"].concat();
    }
    if SIBILANTS.iter().any(|s| word.ends_with(s)) {
        return [word, "es"].concat();
    }
    [word, "s"].concat()
}

/// Returns the singular form of `word`.
pub(crate) fn singularize(word: &str) -> String {
    for (singular, plural) in IRREGULARS {
        if let Some(stem) = strip_word(word, plural) {
            return [stem, singular].concat();
        }
    }
    if let Some(stem) = word.strip_suffix("ies") {
        return [stem, "y"].concat();
    }
    // `statuses` -> `status`, but `houses` -> `house`.
    if let Some(stem) = word.strip_suffix("uses")
        && !stem.ends_with(['a', 'e', 'i', 'o', 'u'])
    {
        return [stem, "us"].concat();
    }
    if let Some(stem) = word.strip_suffix("es") {
        // `types` -> `type`, but `boxes` -> `box` and `addresses` -> `address`.
        if stem.ends_with("ss") || SIBILANTS[1..].iter().any(|s| stem.ends_with(s)) {
            return stem.into();
        }
    }
    if word.ends_with("ss") {
        return word.into();
    }
    match word.strip_suffix('s') {
        Some(stem) => stem.into(),
        None => word.into(),
    }
}

/// Strips generic arguments and the module path: `a::b::Foo<c::D>` -> `Foo`.
pub(crate) fn demodulize(path: &str) -> &str {
    let path = match path.find('<') {
        Some(index) => &path[..index],
        None => path,
    };
    match path.rfind("::") {
        Some(index) => &path[index + 2..],
        None => path,
    }
}

/// Converts a camel-cased identifier to lowercase with underscores.
///
/// `HTMLParser` -> `html_parser`, `AdminSerializer` -> `admin_serializer`.
pub(crate) fn underscore(ident: &str) -> String {
    let chars: Vec<char> = ident.chars().collect();
    let mut out = String::with_capacity(ident.len() + 4);
    for (index, &c) in chars.iter().enumerate() {
        if c.is_uppercase() {
            if index > 0 {
                let prev = chars[index - 1];
                let next_lower = chars.get(index + 1).is_some_and(|n| n.is_lowercase());
                if prev.is_lowercase()
                    || prev.is_ascii_digit()
                    || (prev.is_uppercase() && next_lower)
                {
                    out.push('_');
                }
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

// -----------------------------------------------------------------------------
// Tests
