//! Delimiter detection from the header line

/// Candidate delimiters, in tie-break order
const CANDIDATES: [char; 3] = [',', ';', '\t'];

/// Infer the field delimiter from the first line of `content`
///
/// Counts each candidate on the first line only; the most frequent wins and
/// ties (including an empty file) resolve to the earlier candidate, so `,`
/// is the default.
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content.lines().next().unwrap_or("");

    let mut best = CANDIDATES[0];
    let mut best_count = 0;
    for candidate in CANDIDATES {
        let count = first_line.matches(candidate).count();
        if count > best_count {
            best = candidate;
            best_count = count;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_majority_wins() {
        assert_eq!(detect_delimiter("a,b;c,d,e"), ',');
        assert_eq!(detect_delimiter("a;b;c,d\n1,2,3,4,5,6"), ';');
        assert_eq!(detect_delimiter("Date\tName\tAmount"), '\t');
    }

    #[test]
    fn test_defaults_to_comma() {
        assert_eq!(detect_delimiter(""), ',');
        assert_eq!(detect_delimiter("single column"), ',');
        assert_eq!(detect_delimiter("a;b,c"), ',');
    }

    #[test]
    fn test_only_first_line_counts() {
        assert_eq!(detect_delimiter("\"Date\";\"Amount\"\n1,2,3,4,5"), ';');
    }
}
