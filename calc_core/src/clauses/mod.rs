//! # Code of Practice Clause Search
//!
//! Splits the text of the concrete code into numbered clauses and searches
//! them by clause number or by keywords.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::clauses::ClauseIndex;
//!
//! let text = "\
//! 6.1.2.5 Shear in beams
//! The design shear stress v should not exceed 0.8 times the square root of fcu.
//! 6.1.2.6 Torsion
//! Torsional resistance is provided by closed links.
//! ";
//!
//! let index = ClauseIndex::from_text(text, "example");
//! assert_eq!(index.len(), 2);
//!
//! let hits = index.search("shear stress", 10);
//! assert_eq!(hits[0].number, "6.1.2.5");
//!
//! let hits = index.search("6.1.2.6", 10);
//! assert_eq!(hits[0].title, "Torsion");
//! ```

pub mod heading;
pub mod source;

use std::ops::Range;

use serde::{Deserialize, Serialize};
use tracing::debug;

pub use heading::{is_clause_number, normalize_number, parse_heading, Heading};
pub use source::{load_index, SourceKind};

/// Characters of context kept either side of the first match in a snippet
const SNIPPET_RADIUS: usize = 80;

/// Weight of a match in the clause title relative to one in the body
const TITLE_WEIGHT: u32 = 3;

/// Number given to text before the first heading
pub const PREAMBLE_NUMBER: &str = "";

/// One numbered clause of the code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clause {
    /// Clause number, e.g. "6.1.2.5"; empty for the preamble
    pub number: String,
    pub title: String,
    pub body: String,
    /// 1-based line of the heading in the source text
    pub line: usize,
}

impl Clause {
    /// Nesting depth: "6" is 1, "6.1.2.5" is 4, the preamble is 0
    pub fn depth(&self) -> usize {
        if self.number.is_empty() {
            0
        } else {
            self.number.split('.').count()
        }
    }

    /// Whether this clause is `number` or nested under it
    pub fn is_within(&self, number: &str) -> bool {
        self.number == number
            || (self.number.len() > number.len()
                && self.number.starts_with(number)
                && self.number.as_bytes()[number.len()] == b'.')
    }

    /// "6.1.2.5 Shear in beams"
    pub fn heading(&self) -> String {
        if self.number.is_empty() {
            self.title.clone()
        } else {
            format!("{} {}", self.number, self.title)
        }
    }
}

/// Parsed search query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Query {
    /// Look up a clause and its sub-clauses by number
    ClauseNumber(String),
    /// All terms must occur; quoted phrases count as one term
    Terms(Vec<String>),
    Empty,
}

impl Query {
    pub fn parse(input: &str) -> Query {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Query::Empty;
        }

        let number = normalize_number(trimmed);
        if is_clause_number(number) {
            return Query::ClauseNumber(number.to_string());
        }

        let mut terms: Vec<String> = Vec::new();
        for (i, segment) in trimmed.split('"').enumerate() {
            // odd segments sit between quotes
            if i % 2 == 1 {
                let phrase = segment.split_whitespace().collect::<Vec<_>>().join(" ");
                if !phrase.is_empty() {
                    terms.push(phrase.to_ascii_lowercase());
                }
            } else {
                terms.extend(segment.split_whitespace().map(|w| w.to_ascii_lowercase()));
            }
        }
        terms.dedup();

        if terms.is_empty() {
            Query::Empty
        } else {
            Query::Terms(terms)
        }
    }

    /// Terms to highlight in displayed text
    pub fn highlight_terms(&self) -> Vec<String> {
        match self {
            Query::Terms(terms) => terms.clone(),
            Query::ClauseNumber(_) | Query::Empty => Vec::new(),
        }
    }
}

/// A clause matching a query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Position of the clause in the index
    pub clause_index: usize,
    pub number: String,
    pub title: String,
    pub score: u32,
    /// Collapsed text around the first match
    pub snippet: String,
}

/// Searchable collection of clauses from one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ClauseIndex {
    /// Where the text came from (file name or description)
    pub source: String,
    pub clauses: Vec<Clause>,
}

impl ClauseIndex {
    /// Split document text into clauses.
    pub fn from_text(text: &str, source: impl Into<String>) -> Self {
        let mut clauses: Vec<Clause> = Vec::new();
        let mut preamble = String::new();

        for (line_no, line) in text.lines().enumerate() {
            if let Some(Heading { number, title }) = parse_heading(line) {
                clauses.push(Clause {
                    number,
                    title,
                    body: String::new(),
                    line: line_no + 1,
                });
                continue;
            }

            let target = match clauses.last_mut() {
                Some(clause) => &mut clause.body,
                None => &mut preamble,
            };
            let trimmed = line.trim_end();
            if !trimmed.trim().is_empty() || !target.is_empty() {
                target.push_str(trimmed);
                target.push('\n');
            }
        }

        for clause in &mut clauses {
            let len = clause.body.trim_end().len();
            clause.body.truncate(len);
        }

        if !preamble.trim().is_empty() {
            clauses.insert(
                0,
                Clause {
                    number: PREAMBLE_NUMBER.to_string(),
                    title: "Preamble".to_string(),
                    body: preamble.trim_end().to_string(),
                    line: 1,
                },
            );
        }

        let index = ClauseIndex {
            source: source.into(),
            clauses,
        };
        debug!(source = %index.source, clauses = index.len(), "clause index built");
        index
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Clause with exactly this number
    pub fn get(&self, number: &str) -> Option<&Clause> {
        let number = normalize_number(number);
        self.clauses.iter().find(|c| c.number == number)
    }

    /// Search with a free-text query, returning at most `limit` hits.
    pub fn search(&self, query: &str, limit: usize) -> Vec<SearchHit> {
        self.search_query(&Query::parse(query), limit)
    }

    /// Search with an already parsed query.
    pub fn search_query(&self, query: &Query, limit: usize) -> Vec<SearchHit> {
        let mut hits: Vec<SearchHit> = match query {
            Query::Empty => Vec::new(),
            Query::ClauseNumber(number) => self
                .clauses
                .iter()
                .enumerate()
                .filter(|(_, c)| c.is_within(number))
                .map(|(i, c)| SearchHit {
                    clause_index: i,
                    number: c.number.clone(),
                    title: c.title.clone(),
                    // exact match ranks above its sub-clauses
                    score: if &c.number == number { 2 } else { 1 },
                    snippet: snippet(&c.body, None),
                })
                .collect(),
            Query::Terms(terms) => self
                .clauses
                .iter()
                .enumerate()
                .filter_map(|(i, c)| score_clause(c, terms).map(|score| (i, c, score)))
                .map(|(i, c, score)| {
                    let body_lower = c.body.to_ascii_lowercase();
                    let first = terms
                        .iter()
                        .filter_map(|t| term_ranges(&body_lower, t).first().map(|r| r.start))
                        .min();
                    SearchHit {
                        clause_index: i,
                        number: c.number.clone(),
                        title: c.title.clone(),
                        score,
                        snippet: snippet(&c.body, first),
                    }
                })
                .collect(),
        };

        // stable sort keeps document order among equal scores
        hits.sort_by(|a, b| b.score.cmp(&a.score));
        hits.truncate(limit);
        debug!(?query, hits = hits.len(), "clause search");
        hits
    }

    pub fn to_json(&self) -> crate::CalcResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> crate::CalcResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Total weighted occurrences, or None unless every term occurs somewhere
fn score_clause(clause: &Clause, terms: &[String]) -> Option<u32> {
    let title = clause.title.to_ascii_lowercase();
    let body = clause.body.to_ascii_lowercase();
    let number = clause.number.as_str();

    let mut score = 0;
    for term in terms {
        let in_title = term_ranges(&title, term).len() as u32;
        let in_body = term_ranges(&body, term).len() as u32;
        let in_number = u32::from(number == term);
        if in_title + in_body + in_number == 0 {
            return None;
        }
        score += TITLE_WEIGHT * (in_title + in_number) + in_body;
    }
    Some(score)
}

/// Whitespace-collapsed excerpt around byte offset `at` (or the start).
fn snippet(body: &str, at: Option<usize>) -> String {
    let at = at.unwrap_or(0).min(body.len());

    let mut start = at.saturating_sub(SNIPPET_RADIUS);
    while !body.is_char_boundary(start) {
        start -= 1;
    }
    let mut end = (at + SNIPPET_RADIUS).min(body.len());
    while !body.is_char_boundary(end) {
        end += 1;
    }

    let collapsed = body[start..end].split_whitespace().collect::<Vec<_>>().join(" ");
    let mut out = String::new();
    if start > 0 {
        out.push('…');
    }
    out.push_str(&collapsed);
    if end < body.len() {
        out.push('…');
    }
    out
}

/// Non-overlapping byte ranges of `term` in lowercased `text`.
///
/// Words of a phrase term match across any run of whitespace, so a phrase
/// wrapped onto the next line of extracted text is still found.
fn term_ranges(text: &str, term: &str) -> Vec<Range<usize>> {
    let mut words = term.split_whitespace();
    let Some(first) = words.next() else {
        return Vec::new();
    };
    let rest: Vec<&str> = words.collect();

    let mut ranges = Vec::new();
    let mut from = 0;
    while let Some(offset) = text[from..].find(first) {
        let start = from + offset;
        let mut end = start + first.len();
        let mut matched = true;
        for word in &rest {
            let gap: usize = text[end..]
                .chars()
                .take_while(|c| c.is_whitespace())
                .map(char::len_utf8)
                .sum();
            if gap == 0 || !text[end + gap..].starts_with(word) {
                matched = false;
                break;
            }
            end += gap + word.len();
        }
        if matched {
            ranges.push(start..end);
            from = end;
        } else {
            // resume on the next char boundary
            let mut next = start + 1;
            while !text.is_char_boundary(next) {
                next += 1;
            }
            from = next;
        }
    }
    ranges
}

/// Byte ranges in `text` where any of `terms` occur (ASCII case-insensitive),
/// sorted and merged.
pub fn highlight_ranges(text: &str, terms: &[String]) -> Vec<Range<usize>> {
    let lower = text.to_ascii_lowercase();
    let mut ranges: Vec<Range<usize>> = terms
        .iter()
        .filter(|t| !t.is_empty())
        .flat_map(|t| term_ranges(&lower, t))
        .collect();
    ranges.sort_by_key(|r| r.start);

    let mut merged: Vec<Range<usize>> = Vec::new();
    for r in ranges {
        match merged.last_mut() {
            Some(last) if r.start <= last.end => last.end = last.end.max(r.end),
            _ => merged.push(r),
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
CODE OF PRACTICE FOR STRUCTURAL USE OF CONCRETE 2013

6 ULTIMATE LIMIT STATE DESIGN
6.1 Beams
6.1.2.4 Design formulae for rectangular beams
The lever arm z should not exceed 0.95d.
Where K > K' compression reinforcement is required.
6.1.2.5 Shear in beams
The design shear stress v should not exceed 0.8 times the square root of fcu or 7 MPa.
Minimum links shall be provided in all beams of structural importance.
Table 6.3 gives values of design concrete shear stress vc.
9.2.2 Shear reinforcement
Links should enclose all tension reinforcement; spacing of links should not exceed 0.75d.
";

    fn index() -> ClauseIndex {
        ClauseIndex::from_text(SAMPLE, "sample")
    }

    #[test]
    fn test_splits_into_clauses() {
        let idx = index();
        let numbers: Vec<&str> = idx.clauses().iter().map(|c| c.number.as_str()).collect();
        assert_eq!(numbers, vec!["", "6", "6.1", "6.1.2.4", "6.1.2.5", "9.2.2"]);
        assert_eq!(idx.clauses()[0].title, "Preamble");
        assert_eq!(idx.get("6.1.2.4").unwrap().line, 5);
        assert!(idx.get("6.1.2.5").unwrap().body.contains("Table 6.3"));
    }

    #[test]
    fn test_clause_bodies_trimmed() {
        let idx = index();
        let clause = idx.get("9.2.2").unwrap();
        assert!(!clause.body.ends_with('\n'));
        assert!(idx.get("6").unwrap().body.is_empty());
    }

    #[test]
    fn test_number_search_includes_subclauses() {
        let hits = index().search("6.1", 10);
        let numbers: Vec<&str> = hits.iter().map(|h| h.number.as_str()).collect();
        assert_eq!(numbers, vec!["6.1", "6.1.2.4", "6.1.2.5"]);
    }

    #[test]
    fn test_number_search_does_not_match_prefix_digits() {
        let idx = ClauseIndex::from_text("6.1 Beams\ntext\n6.10 Walls\nmore\n", "t");
        let hits = idx.search("Clause 6.1", 10);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Beams");
    }

    #[test]
    fn test_terms_are_anded() {
        let hits = index().search("shear links", 10);
        let numbers: Vec<&str> = hits.iter().map(|h| h.number.as_str()).collect();
        // 6.1.2.5 mentions shear (title + body) and links; 9.2.2 likewise
        assert_eq!(numbers.len(), 2);
        assert!(numbers.contains(&"6.1.2.5"));
        assert!(numbers.contains(&"9.2.2"));

        assert!(index().search("shear torsion", 10).is_empty());
    }

    #[test]
    fn test_title_matches_rank_higher() {
        let hits = index().search("beams", 10);
        // title match 3, plus 1 for "all beams" in the body
        assert_eq!(hits[0].number, "6.1.2.5");
        assert_eq!(hits[0].score, 4);
        // equal scores stay in document order
        assert_eq!(hits[1].number, "6.1");
        assert_eq!(hits[2].number, "6.1.2.4");
        assert!(hits.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_case_insensitive() {
        let upper = index().search("LEVER ARM", 10);
        let lower = index().search("lever arm", 10);
        assert_eq!(upper, lower);
        assert_eq!(upper[0].number, "6.1.2.4");
    }

    #[test]
    fn test_phrase_query() {
        assert_eq!(
            Query::parse("\"shear  stress\" vc"),
            Query::Terms(vec!["shear stress".to_string(), "vc".to_string()])
        );
        let hits = index().search("\"concrete shear stress\"", 10);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].number, "6.1.2.5");
    }

    #[test]
    fn test_empty_query() {
        assert_eq!(Query::parse("   "), Query::Empty);
        assert!(index().search("", 10).is_empty());
    }

    #[test]
    fn test_limit() {
        assert_eq!(index().search("the", 1).len(), 1);
    }

    #[test]
    fn test_snippet_centres_on_match() {
        let long_body = format!("{} target word {}", "x ".repeat(200), "y ".repeat(200));
        let s = snippet(&long_body, long_body.find("target"));
        assert!(s.starts_with('…'));
        assert!(s.ends_with('…'));
        assert!(s.contains("target word"));
    }

    #[test]
    fn test_snippet_respects_char_boundaries() {
        let body = "é".repeat(100);
        // byte offset 81 falls inside a two-byte character
        let s = snippet(&body, Some(81));
        assert!(s.contains('é'));
    }

    #[test]
    fn test_highlight_ranges_merge() {
        let ranges = highlight_ranges("Shear stress and shear", &["shear".to_string(), "shear stress".to_string()]);
        assert_eq!(ranges, vec![0..12, 17..22]);
    }

    #[test]
    fn test_json_roundtrip() {
        let idx = index();
        let json = idx.to_json().unwrap();
        let back = ClauseIndex::from_json(&json).unwrap();
        assert_eq!(idx, back);
    }

    #[test]
    fn test_clause_depth_and_heading() {
        let idx = index();
        assert_eq!(idx.get("6.1.2.5").unwrap().depth(), 4);
        assert_eq!(idx.clauses()[0].depth(), 0);
        assert_eq!(idx.get("6.1").unwrap().heading(), "6.1 Beams");
    }

    #[test]
    fn test_phrase_matches_across_line_wrap() {
        let idx = ClauseIndex::from_text(
            "6.1.2.5 Shear in beams\nThe design shear\nstress v should not exceed vmax.\n",
            "wrapped.txt",
        );
        let hits = idx.search("\"shear stress\"", 10);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].number, "6.1.2.5");
        assert!(hits[0].snippet.contains("shear stress v"));

        // words must still be adjacent
        assert!(idx.search("\"design stress\"", 10).is_empty());
    }

    #[test]
    fn test_highlight_phrase_across_whitespace() {
        let text = "design shear \n  stress";
        let ranges = highlight_ranges(text, &["shear stress".to_string()]);
        assert_eq!(ranges, vec![7..text.len()]);
        assert_eq!(term_ranges("shearstress", "shear stress"), Vec::<Range<usize>>::new());
    }
}
