use std::cmp::Ordering;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    // Decimal digits with leading zeros stripped.
    Digits(String),
}

impl Ord for Segment {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Segment::Text(a), Segment::Text(b)) => a.cmp(b),
            (Segment::Digits(a), Segment::Digits(b)) => a.len().cmp(&b.len()).then_with(|| a.cmp(b)),
            (Segment::Text(_), Segment::Digits(_)) => Ordering::Less,
            (Segment::Digits(_), Segment::Text(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for Segment {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Sort key comparing digit runs by value and text runs ignoring case.
///
/// Keys always alternate text and digit segments starting with a (possibly
/// empty) text segment, so segments at the same position share a kind.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct NaturalKey(Vec<Segment>);

/// Splits `name` into alternating text and digit runs.
pub fn natural_key(name: &str) -> NaturalKey {
    let mut segments = Vec::new();
    let mut text = String::new();
    let mut chars = name.chars().peekable();
    while let Some(ch) = chars.next() {
        if !ch.is_ascii_digit() {
            text.extend(ch.to_lowercase());
            continue;
        }
        segments.push(Segment::Text(std::mem::take(&mut text)));
        let mut digits = String::from(ch);
        while let Some(next) = chars.next_if(|next| next.is_ascii_digit()) {
            digits.push(next);
        }
        let value = digits.trim_start_matches('0');
        segments.push(Segment::Digits(value.to_string()));
    }
    segments.push(Segment::Text(text));
    NaturalKey(segments)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Orders paths by the natural key of their file names.
///
/// Names with equal keys (`007` and `7`) fall back to plain name order.
pub fn sort_natural(paths: &mut [PathBuf]) {
    paths.sort_by_cached_key(|path| {
        let name = file_name(path);
        (natural_key(&name), name)
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sorted(names: &[&str]) -> Vec<String> {
        let mut paths: Vec<PathBuf> = names.iter().map(PathBuf::from).collect();
        sort_natural(&mut paths);
        paths.iter().map(|path| file_name(path)).collect()
    }

    #[test]
    fn numeric_prefixes_sort_by_value() {
        assert_eq!(
            sorted(&["900_5_A.xlsx", "1000_5_A.xlsx", "90_5_A.xlsx"]),
            vec!["90_5_A.xlsx", "900_5_A.xlsx", "1000_5_A.xlsx"]
        );
    }

    #[test]
    fn second_number_breaks_ties() {
        assert_eq!(
            sorted(&["1000_20_VOICE.xlsx", "1000_5_VOICE.xlsx", "1000_10_VOICE.xlsx"]),
            vec!["1000_5_VOICE.xlsx", "1000_10_VOICE.xlsx", "1000_20_VOICE.xlsx"]
        );
    }

    #[test]
    fn text_runs_ignore_case() {
        assert_eq!(natural_key("Report_2.XLSX"), natural_key("report_2.xlsx"));
        assert!(natural_key("alpha.xlsx") < natural_key("Beta.xlsx"));
    }

    #[test]
    fn leading_zeros_do_not_change_value() {
        assert_eq!(natural_key("007.xlsx"), natural_key("7.xlsx"));
        assert_eq!(sorted(&["7.xlsx", "007.xlsx"]), vec!["007.xlsx", "7.xlsx"]);
    }

    #[test]
    fn digit_runs_longer_than_u64_still_compare() {
        assert!(natural_key("99999999999999999999999_a") < natural_key("100000000000000000000000_a"));
    }

    proptest! {
        #[test]
        fn numeric_order_matches_integer_order(a in 0u64..1_000_000_000, b in 0u64..1_000_000_000) {
            let left = natural_key(&format!("{a}_5_INBUILT.xlsx"));
            let right = natural_key(&format!("{b}_5_INBUILT.xlsx"));
            prop_assert_eq!(left.cmp(&right), a.cmp(&b));
        }

        #[test]
        fn sorting_is_idempotent(names in proptest::collection::vec("[a-zA-Z0-9_]{0,8}\\.xlsx", 0..12)) {
            let mut once: Vec<PathBuf> = names.iter().map(PathBuf::from).collect();
            sort_natural(&mut once);
            let mut twice = once.clone();
            sort_natural(&mut twice);
            prop_assert_eq!(once, twice);
        }
    }
}
