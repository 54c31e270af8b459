//! English-centric naming helpers used for table, key and model name guesses.

const UNCOUNTABLE: &[&str] = &[
    "data",
    "equipment",
    "fish",
    "information",
    "metadata",
    "money",
    "news",
    "rice",
    "series",
    "sheep",
    "species",
];

const IRREGULAR: &[(&str, &str)] = &[
    ("child", "children"),
    ("foot", "feet"),
    ("goose", "geese"),
    ("man", "men"),
    ("mouse", "mice"),
    ("ox", "oxen"),
    ("person", "people"),
    ("tooth", "teeth"),
    ("woman", "women"),
];

/// Plurals ending in `ies` whose singular ends in `ie`
const IE_PLURALS: &[&str] = &["cookies", "movies", "pies", "ties", "zombies"];

/// Split a word into everything before its last segment and the last segment.
/// Segments are separated by `_` or start at an uppercase letter.
fn split_last_segment(word: &str) -> (&str, &str) {
    let boundary = word
        .char_indices()
        .rev()
        .find(|(i, c)| *i > 0 && (c.is_ascii_uppercase() || *c == '_'))
        .map(|(i, c)| if c == '_' { i + 1 } else { i })
        .unwrap_or(0);
    word.split_at(boundary)
}

/// Replace `segment` with `replacement`, keeping a leading capital.
fn match_case(segment: &str, replacement: &str) -> String {
    let capitalized = segment.chars().next().is_some_and(|c| c.is_uppercase());
    if capitalized {
        upper_first(replacement)
    } else {
        replacement.to_string()
    }
}

fn upper_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn lower_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Simple pluralization (English-centric)
pub fn plural(word: &str) -> String {
    let (head, last) = split_last_segment(word);
    let lower = last.to_lowercase();

    if lower.is_empty() || UNCOUNTABLE.contains(&lower.as_str()) {
        return word.to_string();
    }
    if let Some((_, many)) = IRREGULAR.iter().find(|(one, _)| *one == lower) {
        return format!("{}{}", head, match_case(last, many));
    }
    if IRREGULAR.iter().any(|(_, many)| *many == lower) {
        return word.to_string();
    }

    let bytes = lower.as_bytes();
    let before_last = if bytes.len() > 1 { bytes[bytes.len() - 2] } else { b'a' };
    let is_vowel = |b: u8| matches!(b, b'a' | b'e' | b'i' | b'o' | b'u');

    if lower.ends_with('y') && !is_vowel(before_last) {
        format!("{}ies", &word[..word.len() - 1])
    } else if lower.ends_with('s')
        || lower.ends_with("sh")
        || lower.ends_with("ch")
        || lower.ends_with('x')
        || lower.ends_with('z')
    {
        format!("{}es", word)
    } else {
        format!("{}s", word)
    }
}

/// Simple singularization (English-centric)
pub fn singular(word: &str) -> String {
    let (head, last) = split_last_segment(word);
    let lower = last.to_lowercase();

    if lower.is_empty() || UNCOUNTABLE.contains(&lower.as_str()) {
        return word.to_string();
    }
    if let Some((one, _)) = IRREGULAR.iter().find(|(_, many)| *many == lower) {
        return format!("{}{}", head, match_case(last, one));
    }
    if IRREGULAR.iter().any(|(one, _)| *one == lower) {
        return word.to_string();
    }

    let strip = |n: usize| word[..word.len() - n].to_string();

    if IE_PLURALS.contains(&lower.as_str()) {
        strip(1)
    } else if lower.ends_with("ies") && lower.len() > 3 {
        format!("{}y", strip(3))
    } else if lower.ends_with("ouses") {
        strip(1)
    } else if lower.ends_with("sses")
        || lower.ends_with("uses")
        || lower.ends_with("ches")
        || lower.ends_with("shes")
        || lower.ends_with("xes")
        || lower.ends_with("zes")
    {
        strip(2)
    } else if lower.ends_with("ss") || lower.ends_with("us") || lower.ends_with("is") {
        word.to_string()
    } else if lower.ends_with('s') && lower.len() > 1 {
        strip(1)
    } else {
        word.to_string()
    }
}

/// Convert to snake_case
pub fn snake(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c == '-' || c == ' ' || c == '_' {
            if !result.is_empty() && !result.ends_with('_') {
                result.push('_');
            }
            continue;
        }

        if c.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            let boundary = prev.is_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_uppercase() && next_is_lower);
            if boundary && !result.ends_with('_') {
                result.push('_');
            }
        }

        result.extend(c.to_lowercase());
    }

    result
}

/// Convert to StudlyCase (PascalCase)
pub fn studly(s: &str) -> String {
    s.split(|c| c == '_' || c == '-' || c == ' ')
        .filter(|part| !part.is_empty())
        .map(upper_first)
        .collect()
}

/// Convert to camelCase
pub fn camel(s: &str) -> String {
    lower_first(&studly(s))
}
