//! The "fallback on empty/invalid" helper used across extraction,
//! normalization, and merging so the validity contract stays uniform.

/// Keep `candidate` entries that satisfy `valid`; if none survive,
/// use `fallback` instead. The result is truncated to `cap` entries.
pub fn valid_or<T>(
    candidate: Vec<T>,
    valid: impl Fn(&T) -> bool,
    fallback: Vec<T>,
    cap: usize,
) -> Vec<T> {
    let mut kept: Vec<T> = candidate.into_iter().filter(|v| valid(v)).collect();
    if kept.is_empty() {
        kept = fallback;
    }
    kept.truncate(cap);
    kept
}

/// Use `candidate` unless it is empty, in which case use `fallback`.
pub fn non_empty_or<T>(candidate: Vec<T>, fallback: Vec<T>) -> Vec<T> {
    if candidate.is_empty() {
        fallback
    } else {
        candidate
    }
}
