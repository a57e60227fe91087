//! Edit-distance similarity and field normalization.
//!
//! Comparisons are exact on the characters given: no case folding, trimming or
//! accent stripping happens here. Callers that want case-insensitive matching
//! fold both sides first (see [`fold_case`]).

/// Levenshtein distance with unit insert/delete/substitute costs.
///
/// Lengths are measured in Unicode scalar values. Uses two rolling rows sized
/// to the shorter input.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let (long, short) = if a_chars.len() >= b_chars.len() {
        (a_chars, b_chars)
    } else {
        (b_chars, a_chars)
    };

    if short.is_empty() {
        return long.len();
    }

    let mut prev: Vec<usize> = (0..=short.len()).collect();
    let mut curr = vec![0usize; short.len() + 1];

    for (i, long_ch) in long.iter().enumerate() {
        curr[0] = i + 1;
        for (j, short_ch) in short.iter().enumerate() {
            let cost = usize::from(long_ch != short_ch);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[short.len()]
}

/// Normalized similarity in [0, 1]: `(max_len - distance) / max_len`.
///
/// Two empty strings are identical (1.0); one empty string against a
/// non-empty one scores 0.0.
pub fn similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    let distance = edit_distance(a, b);
    (max_len - distance) as f64 / max_len as f64
}

/// Keep only the ASCII digits `0-9` of a phone-like value.
pub fn normalize_phone(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Lower-case a value for opt-in case-insensitive comparison.
pub fn fold_case(raw: &str) -> String {
    raw.to_lowercase()
}
