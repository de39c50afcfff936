//! Symbol similarity matching.
//!
//! Scores follow the Ratcliff/Obershelp "gestalt" ratio used by `difflib`:
//! twice the number of matched characters over the combined length, where
//! matches are found by recursively taking the longest common block. Text is
//! compared case-insensitively.

use crate::scope::{NamespaceOrigin, ScopeLayer};

/// A scored suggestion and where it was found.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct SymbolCandidate {
    pub name: String,
    pub origin: NamespaceOrigin,
    pub score: f64,
}

/// Ratio in `[0, 1]`; `1.0` means equal ignoring case.
#[must_use]
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let left: Vec<char> = a.chars().flat_map(char::to_lowercase).collect();
    let right: Vec<char> = b.chars().flat_map(char::to_lowercase).collect();
    let total = left.len() + right.len();
    if total == 0 {
        return 1.0;
    }
    let matches: usize = matching_blocks(&left, &right).iter().map(|&(_, _, size)| size).sum();
    (2.0 * matches as f64) / (total as f64)
}

/// Names that are never offered as suggestions unless asked for: dunder
/// members and names that are not identifiers at all.
#[must_use]
pub fn is_noise(name: &str) -> bool {
    if name.len() > 4 && name.starts_with("__") && name.ends_with("__") {
        return true;
    }
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first == '_' || first.is_alphabetic() => {}
        _ => return true,
    }
    !chars.all(|c| c == '_' || c.is_alphanumeric())
}

/// Candidates scoring at least `threshold`, best first.
///
/// Equal scores keep their original iteration order, so the result is
/// deterministic for a given input. Noise names are dropped before scoring
/// unless `include_noise` is set, and `target` itself is never returned.
#[must_use]
pub fn best_matches_with<'c, I>(
    target: &str,
    candidates: I,
    max_results: usize,
    threshold: f64,
    include_noise: bool,
) -> Vec<String>
where
    I: IntoIterator<Item = &'c str>,
{
    let mut scored: Vec<(f64, &str)> = Vec::new();
    for candidate in candidates {
        if candidate == target || (!include_noise && is_noise(candidate)) {
            continue;
        }
        if scored.iter().any(|(_, seen)| *seen == candidate) {
            continue;
        }
        let ratio = similarity_ratio(target, candidate);
        if ratio >= threshold {
            scored.push((ratio, candidate));
        }
    }
    // sort_by is stable: ties keep candidate order
    scored.sort_by(|left, right| right.0.total_cmp(&left.0));
    scored
        .into_iter()
        .take(max_results)
        .map(|(_, name)| name.to_owned())
        .collect()
}

/// [`best_matches_with`] filtering noise names.
///
/// ```
/// use lucid::similarity::best_matches;
///
/// let found = best_matches("append", ["appendh", "extend", "insert"], 3, 0.6);
/// assert_eq!(found, vec!["appendh".to_owned()]);
/// ```
#[must_use]
pub fn best_matches<'c, I>(target: &str, candidates: I, max_results: usize, threshold: f64) -> Vec<String>
where
    I: IntoIterator<Item = &'c str>,
{
    best_matches_with(target, candidates, max_results, threshold, false)
}

/// Scores every scope layer separately and returns the matches of the first
/// (most local) layer that has any.
///
/// A misspelt name is far more likely to refer to something nearby, so an
/// enclosing-scope match wins over a better-scoring builtin.
#[must_use]
pub fn ranked_candidates(
    target: &str,
    layers: &[ScopeLayer],
    max_results: usize,
    threshold: f64,
) -> Vec<SymbolCandidate> {
    for layer in layers {
        let names = best_matches(target, layer.names.iter().map(String::as_str), max_results, threshold);
        if !names.is_empty() {
            return names
                .into_iter()
                .map(|name| SymbolCandidate {
                    score: similarity_ratio(target, &name),
                    name,
                    origin: layer.origin.clone(),
                })
                .collect();
        }
    }
    Vec::new()
}

/// Matching blocks as `(left_start, right_start, size)`, terminated by a
/// zero-sized sentinel.
fn matching_blocks(left: &[char], right: &[char]) -> Vec<(usize, usize, usize)> {
    let mut queue = vec![(0, left.len(), 0, right.len())];
    let mut blocks = Vec::new();
    while let Some((alo, ahi, blo, bhi)) = queue.pop() {
        let (i, j, size) = longest_common_block(left, right, alo, ahi, blo, bhi);
        if size == 0 {
            continue;
        }
        blocks.push((i, j, size));
        if alo < i && blo < j {
            queue.push((alo, i, blo, j));
        }
        if i + size < ahi && j + size < bhi {
            queue.push((i + size, ahi, j + size, bhi));
        }
    }
    blocks.sort_unstable();
    blocks.push((left.len(), right.len(), 0));
    blocks
}

/// Longest common run inside the given windows; earliest in `left`, then
/// earliest in `right`, on ties.
fn longest_common_block(
    left: &[char],
    right: &[char],
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let mut best = (alo, blo, 0usize);
    for i in alo..ahi {
        for j in blo..bhi {
            let mut k = 0usize;
            while i + k < ahi && j + k < bhi && left[i + k] == right[j + k] {
                k += 1;
            }
            if k > best.2 {
                best = (i, j, k);
            }
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn ratio_matches_gestalt_scores() {
        assert!(close(similarity_ratio("appendh", "append"), 12.0 / 13.0));
        assert!(close(similarity_ratio("cost", "cos"), 6.0 / 7.0));
        assert!(close(similarity_ratio("cost", "cosh"), 0.75));
        assert!(close(similarity_ratio("cost", "acosh"), 6.0 / 9.0));
        assert!(close(similarity_ratio("", ""), 1.0));
    }

    #[test]
    fn ratio_ignores_case() {
        assert!(close(similarity_ratio("Pen", "pen"), 1.0));
    }

    #[test]
    fn module_threshold_excludes_distant_names() {
        let found = best_matches("cost", ["acosh", "cos", "cosh", "comb"], 5, 0.7);
        assert_eq!(found, vec!["cos".to_owned(), "cosh".to_owned()]);
    }

    #[test]
    fn ties_keep_iteration_order() {
        let found = best_matches("ab", ["ac", "ad", "ae"], 3, 0.5);
        assert_eq!(found, vec!["ac".to_owned(), "ad".to_owned(), "ae".to_owned()]);
        let found = best_matches("ab", ["ae", "ad", "ac"], 2, 0.5);
        assert_eq!(found, vec!["ae".to_owned(), "ad".to_owned()]);
    }

    #[test]
    fn noise_is_filtered_unless_requested() {
        let names = ["__init__", "__len__", "init"];
        assert_eq!(best_matches("__init", names, 3, 0.6), vec!["init".to_owned()]);
        let with_noise = best_matches_with("__init", names, 3, 0.6, true);
        assert_eq!(with_noise.first().map(String::as_str), Some("__init__"));
    }

    #[test]
    fn nothing_above_threshold_is_empty() {
        assert!(best_matches("zzz", ["append", "extend"], 3, 0.6).is_empty());
    }

    #[test]
    fn target_itself_is_not_suggested() {
        assert!(best_matches("count", ["count"], 3, 0.6).is_empty());
    }
}
