// String similarity helpers used for near-duplicate detection.
//
// Everything works on chars, not bytes, so multi-byte text isn't penalized.

/// Levenshtein edit distance (insertions, deletions, substitutions).
///
/// Two-row dynamic programming, O(n*m) time and O(m) memory.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = if ca == cb { 0 } else { 1 };
            curr[j + 1] = (curr[j] + 1).min(prev[j + 1] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// `1 - distance / len(longer)`, in [0, 1]. Case-sensitive.
pub fn similarity(a: &str, b: &str) -> f64 {
    let (len_a, len_b) = (a.chars().count(), b.chars().count());
    let (longer, shorter, longer_len) = if len_a >= len_b {
        (a, b, len_a)
    } else {
        (b, a, len_b)
    };

    if longer_len == 0 {
        return 1.0;
    }

    1.0 - levenshtein(longer, shorter) as f64 / longer_len as f64
}
