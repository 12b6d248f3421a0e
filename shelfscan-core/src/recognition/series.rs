//! Series detection from titles and descriptions

use crate::types::SeriesInfo;
use regex::Regex;
use std::sync::OnceLock;

fn title_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            // Mistborn #2
            r"^(.+?)\s*#\s*(\d+)",
            // Mistborn (Book 2)
            r"(?i)^(.+?)\s*\(\s*book\s+(\d+)\s*\)",
            // Mistborn (2)
            r"^(.+?)\s*\(\s*(\d+)\s*\)",
            // Mistborn Volume 2
            r"(?i)^(.+?)\s+volume\s+(\d+)",
        ]
        .iter()
        .map(|p| Regex::new(p).expect("static pattern"))
        .collect()
    })
}

fn description_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)series:\s*([^.,;:\n]+)").expect("static pattern"))
}

/// Find series information in a title, then in a description
///
/// Title patterns are tried in order and the first match wins. A
/// description only yields a series name, never a number.
pub fn extract_series(title: &str, description: Option<&str>) -> Option<SeriesInfo> {
    for re in title_patterns() {
        if let Some(caps) = re.captures(title.trim()) {
            let name = caps[1].trim().trim_end_matches([',', ':', '-']).trim();
            if name.is_empty() {
                continue;
            }
            let number = caps[2].parse().ok();
            return Some(SeriesInfo::new(name, number));
        }
    }

    let caps = description_pattern().captures(description?)?;
    let name = caps[1].trim();
    if name.is_empty() {
        None
    } else {
        Some(SeriesInfo::new(name, None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_number() {
        let series = extract_series("Mistborn #2", None).unwrap();
        assert_eq!(series.name, "Mistborn");
        assert_eq!(series.number, Some(2));
    }

    #[test]
    fn test_book_number() {
        let series = extract_series("The Wheel of Time (Book 11)", None).unwrap();
        assert_eq!(series, SeriesInfo::new("The Wheel of Time", Some(11)));
    }

    #[test]
    fn test_parenthesized_number() {
        let series = extract_series("Discworld (3)", None).unwrap();
        assert_eq!(series, SeriesInfo::new("Discworld", Some(3)));
    }

    #[test]
    fn test_volume_number() {
        let series = extract_series("Saga Volume 4", None).unwrap();
        assert_eq!(series, SeriesInfo::new("Saga", Some(4)));
    }

    #[test]
    fn test_description_mention() {
        let series = extract_series(
            "The Final Empire",
            Some("The first novel. Series: Mistborn Saga, followed by more."),
        )
        .unwrap();
        assert_eq!(series, SeriesInfo::new("Mistborn Saga", None));
    }

    #[test]
    fn test_title_beats_description() {
        let series = extract_series("Dune #1", Some("series: Something Else")).unwrap();
        assert_eq!(series.name, "Dune");
    }

    #[test]
    fn test_no_series() {
        assert_eq!(extract_series("The Hobbit", None), None);
        assert_eq!(
            extract_series("The Hobbit", Some("A hobbit goes on an adventure.")),
            None
        );
    }
}
