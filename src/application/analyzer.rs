//! Technology demand ranking over stored descriptions
//!
//! Each vocabulary term is compiled into a case-insensitive whole-word
//! pattern when the analyzer is built. Counts are recomputed from scratch on
//! every call to [`TechnologyAnalyzer::rank`].

use regex::Regex;

use crate::domain::job_offer::TechnologyStat;

struct TermMatcher {
    term: String,
    pattern: Regex,
}

impl TermMatcher {
    fn new(term: &str) -> Result<Self, regex::Error> {
        // Non-word neighbour or text edge on both sides, so `C#` and `C++`
        // behave like plain words and `Go` never matches inside `Google`
        let pattern = Regex::new(&format!(r"(?i)(?:^|\W){}(?:$|\W)", regex::escape(term)))?;
        Ok(Self {
            term: term.to_string(),
            pattern,
        })
    }
}

/// Ranks vocabulary terms by the number of descriptions mentioning them
pub struct TechnologyAnalyzer {
    matchers: Vec<TermMatcher>,
}

impl TechnologyAnalyzer {
    pub fn new<S: AsRef<str>>(vocabulary: &[S]) -> Result<Self, regex::Error> {
        let matchers = vocabulary
            .iter()
            .map(|term| TermMatcher::new(term.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { matchers })
    }

    /// Count, per term, the descriptions containing it at least once
    ///
    /// Terms with no matches are left out. The result is sorted by count
    /// descending; the sort is stable so ties keep vocabulary order.
    pub fn rank<S: AsRef<str>>(&self, descriptions: &[S]) -> Vec<TechnologyStat> {
        if descriptions.is_empty() {
            return Vec::new();
        }

        let mut stats: Vec<TechnologyStat> = self
            .matchers
            .iter()
            .filter_map(|matcher| {
                let count = descriptions
                    .iter()
                    .filter(|d| matcher.pattern.is_match(d.as_ref()))
                    .count();
                let count = u32::try_from(count).unwrap_or(u32::MAX);
                (count > 0).then(|| TechnologyStat::new(matcher.term.clone(), count))
            })
            .collect();

        stats.sort_by(|a, b| b.count.cmp(&a.count));
        stats
    }
}

/// One-shot ranking without keeping the compiled analyzer around
pub fn rank<V: AsRef<str>, D: AsRef<str>>(
    vocabulary: &[V],
    descriptions: &[D],
) -> Result<Vec<TechnologyStat>, regex::Error> {
    Ok(TechnologyAnalyzer::new(vocabulary)?.rank(descriptions))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranked(vocabulary: &[&str], descriptions: &[&str]) -> Vec<(String, u32)> {
        rank(vocabulary, descriptions)
            .unwrap()
            .into_iter()
            .map(|s| (s.technology, s.count))
            .collect()
    }

    #[test]
    fn go_does_not_match_inside_google() {
        let result = ranked(
            &["Python", "Go", "Java"],
            &["Python and Go developer", "Senior Python engineer", "Google intern"],
        );
        assert_eq!(
            result,
            vec![("Python".to_string(), 2), ("Go".to_string(), 1)]
        );
    }

    #[test]
    fn empty_descriptions_yield_empty_ranking() {
        assert!(ranked(&["Python", "Go"], &[]).is_empty());
    }

    #[test]
    fn ties_keep_vocabulary_order() {
        let result = ranked(&["Java", "Docker", "AWS"], &["AWS Docker Java"]);
        let names: Vec<&str> = result.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, ["Java", "Docker", "AWS"]);
    }

    #[test]
    fn repeats_within_one_description_count_once() {
        assert_eq!(
            ranked(&["Python"], &["Python, python and PYTHON"]),
            vec![("Python".to_string(), 1)]
        );
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(
            ranked(&["JavaScript"], &["javascript", "JAVASCRIPT dev", "Java"]),
            vec![("JavaScript".to_string(), 2)]
        );
    }

    #[test]
    fn symbol_terms_match_as_words() {
        let result = ranked(
            &["C#", "C++", "ASP.NET", "Node.js"],
            &["C# and ASP.NET Core", "Modern C++.", "node.js backend", "Cobol"],
        );
        assert_eq!(
            result,
            vec![
                ("C#".to_string(), 1),
                ("C++".to_string(), 1),
                ("ASP.NET".to_string(), 1),
                ("Node.js".to_string(), 1),
            ]
        );
    }

    #[test]
    fn term_embedded_in_longer_word_is_ignored() {
        assert!(ranked(&["SQL"], &["PostgreSQL and MySQL"]).is_empty());
        assert!(ranked(&["React"], &["Reactive streams"]).is_empty());
    }

    #[test]
    fn punctuation_is_a_boundary() {
        assert_eq!(
            ranked(&["Go"], &["(Go)", "Go, Rust", "Go."]),
            vec![("Go".to_string(), 3)]
        );
    }
}
