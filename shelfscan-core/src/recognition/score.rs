//! Confidence scoring for recognized fragments

use std::collections::HashSet;

/// No metadata match was found
pub const FALLBACK_CONFIDENCE: f32 = 0.3;

/// A match was found but shares little text with the fragment
pub const WEAK_MATCH_CONFIDENCE: f32 = 0.5;

/// Most title words are shared
pub const OVERLAP_MATCH_CONFIDENCE: f32 = 0.7;

/// One title contains the other
pub const STRONG_MATCH_CONFIDENCE: f32 = 0.9;

/// Manual title/author lookup hit
pub const MANUAL_MATCH_CONFIDENCE: f32 = 0.9;

/// Manual ISBN lookup hit
pub const ISBN_MATCH_CONFIDENCE: f32 = 0.95;

/// Share of words needed for an overlap match
pub const OVERLAP_THRESHOLD: f64 = 0.7;

fn words(text: &str) -> HashSet<String> {
    text.split_whitespace().map(str::to_lowercase).collect()
}

/// Common distinct words divided by the smaller distinct word count
pub fn word_overlap(a: &str, b: &str) -> f64 {
    let a = words(a);
    let b = words(b);
    let smaller = a.len().min(b.len());
    if smaller == 0 {
        return 0.0;
    }
    let common = a.intersection(&b).count();
    common as f64 / smaller as f64
}

/// Score how well a metadata title explains the raw fragment
pub fn score_confidence(fragment: &str, matched_title: Option<&str>) -> f32 {
    let Some(title) = matched_title else {
        return FALLBACK_CONFIDENCE;
    };

    let fragment_lower = fragment.trim().to_lowercase();
    let title_lower = title.trim().to_lowercase();

    if !title_lower.is_empty()
        && !fragment_lower.is_empty()
        && (fragment_lower.contains(&title_lower) || title_lower.contains(&fragment_lower))
    {
        return STRONG_MATCH_CONFIDENCE;
    }

    if word_overlap(&fragment_lower, &title_lower) >= OVERLAP_THRESHOLD {
        OVERLAP_MATCH_CONFIDENCE
    } else {
        WEAK_MATCH_CONFIDENCE
    }
}
