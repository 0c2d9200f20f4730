//! Multi-token fuzzy filtering
//!
//! The query is split on whitespace. The first token is matched against every
//! candidate; each following token is matched only against the survivors of
//! the previous one, so token order changes the final ranking. Highlight
//! positions from all tokens are merged, but the score that decides the
//! order is the one from the last token.

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use tokio_util::sync::CancellationToken;

/// Candidates matched between two cancellation checks.
const CANCEL_CHECK_INTERVAL: usize = 512;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuzzyMatch {
    /// Position of the candidate in the input slice
    pub index: usize,
    pub name: String,
    pub score: i64,
    /// Matched character (not byte) positions, sorted and unique
    pub positions: Vec<usize>,
}

/// Rank `candidates` against `query`, best first. An empty query keeps every
/// candidate in input order.
pub fn search(query: &str, candidates: &[String]) -> Vec<FuzzyMatch> {
    search_cancellable(query, candidates, &CancellationToken::new()).unwrap_or_default()
}

/// Same as [`search`], but gives up and returns `None` once `token` is
/// cancelled.
pub fn search_cancellable(
    query: &str,
    candidates: &[String],
    token: &CancellationToken,
) -> Option<Vec<FuzzyMatch>> {
    let mut tokens = query.split_whitespace();
    let first = match tokens.next() {
        Some(first) => first,
        None => {
            return Some(
                candidates
                    .iter()
                    .enumerate()
                    .map(|(index, name)| FuzzyMatch {
                        index,
                        name: name.clone(),
                        score: 0,
                        positions: Vec::new(),
                    })
                    .collect(),
            )
        }
    };

    let matcher = SkimMatcherV2::default();
    let mut survivors = Vec::new();
    for (index, name) in candidates.iter().enumerate() {
        if index % CANCEL_CHECK_INTERVAL == 0 && token.is_cancelled() {
            return None;
        }
        if let Some((score, positions)) = matcher.fuzzy_indices(name, first) {
            survivors.push(FuzzyMatch {
                index,
                name: name.clone(),
                score,
                positions,
            });
        }
    }

    for pattern in tokens {
        let mut next = Vec::with_capacity(survivors.len());
        for (i, mut survivor) in survivors.into_iter().enumerate() {
            if i % CANCEL_CHECK_INTERVAL == 0 && token.is_cancelled() {
                return None;
            }
            if let Some((score, positions)) = matcher.fuzzy_indices(&survivor.name, pattern) {
                survivor.score = score;
                survivor.positions = merge_positions(&survivor.positions, &positions);
                next.push(survivor);
            }
        }
        survivors = next;
    }

    if token.is_cancelled() {
        return None;
    }
    survivors.sort_by(|a, b| b.score.cmp(&a.score));
    Some(survivors)
}

fn merge_positions(a: &[usize], b: &[usize]) -> Vec<usize> {
    let mut merged: Vec<usize> = a.iter().chain(b).copied().collect();
    merged.sort_unstable();
    merged.dedup();
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    fn order(matches: &[FuzzyMatch]) -> Vec<&str> {
        matches.iter().map(|m| m.name.as_str()).collect()
    }

    #[test]
    fn test_empty_query_keeps_everything_in_order() {
        let names = candidates(&["b", "a", "c"]);
        assert_eq!(order(&search("   ", &names)), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_non_matching_candidates_are_dropped() {
        let names = candidates(&["src/main.rs", "Cargo.toml", "README.md"]);
        let results = search("main", &names);
        assert_eq!(order(&results), vec!["src/main.rs"]);
        assert_eq!(results[0].positions, vec![4, 5, 6, 7]);
        assert_eq!(results[0].index, 0);
    }

    #[test]
    fn test_later_tokens_rerank_survivors() {
        let names = candidates(&["abc", "abcd", "xab c y", "zz"]);
        let first_only = search("ab", &names);
        let both = search("ab c", &names);

        assert!(!order(&first_only).contains(&"zz"));
        assert!(!order(&both).contains(&"zz"));
        assert_eq!(both.len(), 3);
        assert_ne!(order(&first_only), order(&both));
        assert_eq!(both[0].name, "xab c y");
    }

    #[test]
    fn test_positions_accumulate_across_tokens() {
        let names = candidates(&["alpha/beta.txt"]);
        let results = search("alp txt", &names);
        assert_eq!(results.len(), 1);
        let positions = &results[0].positions;
        assert!(positions.starts_with(&[0, 1, 2]));
        assert!(positions.ends_with(&[11, 12, 13]));
    }

    #[test]
    fn test_token_filters_only_survivors() {
        let names = candidates(&["foo", "bar"]);
        assert!(search("foo bar", &names).is_empty());
    }

    #[test]
    fn test_cancelled_search_returns_none() {
        let token = CancellationToken::new();
        token.cancel();
        let names = candidates(&["one", "two"]);
        assert_eq!(search_cancellable("o", &names, &token), None);
    }
}
