//! Backtick-quoted resource extraction from issue titles

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;

use super::issues::open_issues;
use crate::model::RunSession;
use crate::Result;

/// Returned by [`most_referenced_resource`] when no title quotes anything
pub const NO_KEYWORDS_FOUND: &str = "No keywords found";

static BACKTICK_TERM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`([^`]+)`").expect("backtick pattern is valid"));

/// Substrings wrapped in single backticks, in order of appearance
pub fn extract_backtick_terms(text: &str) -> Vec<&str> {
    BACKTICK_TERM
        .captures_iter(text)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .collect()
}

/// Distinct backtick terms across open issue titles
pub fn issue_keywords(session: &RunSession) -> Result<HashSet<String>> {
    Ok(open_issues(session)?
        .into_iter()
        .filter_map(|issue| issue.title.as_deref())
        .flat_map(extract_backtick_terms)
        .map(str::to_string)
        .collect())
}

/// Most frequent backtick term across all issues, open or closed.
///
/// Ties go to the term seen first.
pub fn most_referenced_resource_with_count(session: &RunSession) -> Option<(String, usize)> {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();

    for title in session.issues().filter_map(|issue| issue.title.as_deref()) {
        for term in extract_backtick_terms(title) {
            let count = counts.entry(term).or_insert(0);
            if *count == 0 {
                order.push(term);
            }
            *count += 1;
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for term in order {
        let count = counts[term];
        if best.map_or(true, |(_, top)| count > top) {
            best = Some((term, count));
        }
    }
    best.map(|(term, count)| (term.to_string(), count))
}

pub fn most_referenced_resource(session: &RunSession) -> String {
    most_referenced_resource_with_count(session)
        .map(|(term, _)| term)
        .unwrap_or_else(|| NO_KEYWORDS_FOUND.to_string())
}
