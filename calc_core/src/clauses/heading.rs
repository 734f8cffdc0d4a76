//! Clause heading recognition.
//!
//! Extracted code text has no structure left, so clauses are found by
//! looking for lines that start with a clause number followed by a title:
//!
//! ```text
//! 6.1.2.4 Design formulae for rectangular beams
//! Clause 9.2.1.3 Maximum reinforcement
//! 6 ULTIMATE LIMIT STATE DESIGN
//! ```
//!
//! Numbers with a leading zero component ("0.13"), lines with no title, and
//! titles starting in lower case are body text.

/// Most dot-separated components a clause number may have
const MAX_COMPONENTS: usize = 5;

/// Highest top-level section number accepted for undotted headings
const MAX_SECTION: u32 = 20;

/// Titles longer than this are treated as running text
const MAX_TITLE_CHARS: usize = 120;

/// A recognised heading line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    pub number: String,
    pub title: String,
}

/// Whether `s` is a clause number such as `6`, `6.1` or `6.1.2.4`.
pub fn is_clause_number(s: &str) -> bool {
    let parts: Vec<&str> = s.split('.').collect();
    if parts.is_empty() || parts.len() > MAX_COMPONENTS {
        return false;
    }
    let all_numeric = parts
        .iter()
        .all(|p| !p.is_empty() && p.len() <= 3 && p.chars().all(|c| c.is_ascii_digit()));
    if !all_numeric {
        return false;
    }
    matches!(parts[0].parse::<u32>(), Ok(n) if n >= 1)
}

/// Strip an optional "Clause"/"Cl." prefix and trailing dot from a token
pub fn normalize_number(s: &str) -> &str {
    let s = s.trim();
    let s = strip_prefix_ignore_case(s, "clause").unwrap_or(s);
    let s = strip_prefix_ignore_case(s, "cl.").unwrap_or(s);
    s.trim().trim_end_matches('.')
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    if s.len() >= prefix.len() && s.is_char_boundary(prefix.len()) && s[..prefix.len()].eq_ignore_ascii_case(prefix) {
        Some(&s[prefix.len()..])
    } else {
        None
    }
}

/// Parse a heading line, if it is one.
pub fn parse_heading(line: &str) -> Option<Heading> {
    let line = line.trim();
    let line = strip_prefix_ignore_case(line, "clause ").unwrap_or(line).trim_start();

    let (number_token, rest) = match line.split_once(char::is_whitespace) {
        Some((n, r)) => (n, r.trim()),
        None => return None,
    };

    let number = number_token.trim_end_matches('.');
    if !is_clause_number(number) {
        return None;
    }

    let title = rest.trim_start_matches(['-', '–', ':']).trim();
    let first = title.chars().next()?;
    if !first.is_uppercase() || title.chars().count() > MAX_TITLE_CHARS {
        return None;
    }

    if !number.contains('.') {
        // bare integers are usually quantities ("25 MPa"); only accept
        // plausible section numbers with an all-capitals title
        let section: u32 = number.parse().ok()?;
        let upper_title = title.chars().filter(|c| c.is_alphabetic()).all(|c| c.is_uppercase());
        if section > MAX_SECTION || !upper_title || title.len() <= 3 {
            return None;
        }
    }

    Some(Heading {
        number: number.to_string(),
        title: title.to_string(),
    })
}
