//! Turning metadata volumes into candidate fields

use super::series::extract_series;
use crate::types::{CandidateBook, CandidateSource, ImageLinks, IndustryIdentifier, Volume};

/// Category spellings (lowercase) and the genre each maps to
///
/// Only the twenty genres and alternate spellings of the same genre; any other
/// category falls through to the raw value.
const GENRE_TABLE: &[(&str, &str)] = &[
    ("fiction", "Fiction"),
    ("fantasy", "Fantasy"),
    ("science fiction", "Science Fiction"),
    ("sci-fi", "Science Fiction"),
    ("mystery", "Mystery"),
    ("romance", "Romance"),
    ("thriller", "Thriller"),
    ("thrillers", "Thriller"),
    ("horror", "Horror"),
    ("biography", "Biography"),
    ("biography & autobiography", "Biography"),
    ("history", "History"),
    ("self-help", "Self-Help"),
    ("self help", "Self-Help"),
    ("business", "Business"),
    ("technology", "Technology"),
    ("philosophy", "Philosophy"),
    ("religion", "Religion"),
    ("cooking", "Cooking"),
    ("travel", "Travel"),
    ("poetry", "Poetry"),
    ("drama", "Drama"),
    ("comics", "Comics"),
    ("children", "Children"),
];

fn genre_for_category(category: &str) -> Option<&'static str> {
    let key = category.trim().to_lowercase();
    GENRE_TABLE
        .iter()
        .find(|(spelling, _)| *spelling == key)
        .map(|(_, genre)| *genre)
}

/// Genre for a category list
///
/// The first category present in the table decides. When none is, the
/// first raw category is used as-is.
pub fn genre_for_categories(categories: &[String]) -> Option<String> {
    categories
        .iter()
        .find_map(|c| genre_for_category(c))
        .map(str::to_string)
        .or_else(|| categories.first().cloned())
}

/// Cover URL preferring the full thumbnail over the small one
pub fn select_cover_url(links: Option<&ImageLinks>, placeholder: &str) -> String {
    links
        .and_then(|l| l.thumbnail.as_deref().or(l.small_thumbnail.as_deref()))
        .filter(|url| !url.is_empty())
        .unwrap_or(placeholder)
        .to_string()
}

/// ISBN preferring ISBN-13 over ISBN-10
pub fn select_isbn(identifiers: &[IndustryIdentifier]) -> Option<String> {
    let find = |kind: &str| {
        identifiers
            .iter()
            .find(|id| id.kind == kind)
            .map(|id| id.identifier.clone())
    };
    find("ISBN_13").or_else(|| find("ISBN_10"))
}

/// Build a confirmed candidate from a metadata volume
///
/// `fallback_author` is used when the volume lists no authors.
pub fn candidate_from_volume(
    volume: &Volume,
    fallback_author: &str,
    placeholder_cover: &str,
    confidence: f32,
) -> CandidateBook {
    let author = if volume.authors.is_empty() {
        fallback_author.to_string()
    } else {
        volume.authors.join(", ")
    };

    let mut candidate = CandidateBook::new(
        volume.title.trim(),
        author,
        select_cover_url(volume.image_links.as_ref(), placeholder_cover),
        confidence,
        CandidateSource::MetadataLookup,
    );
    candidate.series = extract_series(&volume.title, volume.description.as_deref());
    candidate.genre = genre_for_categories(&volume.categories);
    candidate.published_year = volume.published_year();
    candidate.description = volume.description.clone();
    candidate.isbn = select_isbn(&volume.industry_identifiers);
    candidate.publisher = volume.publisher.clone();
    candidate.page_count = volume.page_count;
    candidate.language = volume.language.clone();
    candidate
}
