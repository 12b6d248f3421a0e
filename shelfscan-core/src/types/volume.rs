//! Bibliographic records returned by a metadata service

use serde::{Deserialize, Serialize};

/// A single volume as described by the metadata service
///
/// Field names follow the Google Books `volumeInfo` object so responses
/// deserialize directly into this type.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Volume {
    /// Volume title
    pub title: String,

    /// Authors in credit order
    pub authors: Vec<String>,

    /// Publisher name
    pub publisher: Option<String>,

    /// Publication date as reported (`YYYY`, `YYYY-MM` or `YYYY-MM-DD`)
    pub published_date: Option<String>,

    /// Book description/summary
    pub description: Option<String>,

    /// Subject categories
    pub categories: Vec<String>,

    /// ISBN and other identifiers
    pub industry_identifiers: Vec<IndustryIdentifier>,

    /// Cover image links
    pub image_links: Option<ImageLinks>,

    /// Language code (ISO 639-1)
    pub language: Option<String>,

    /// Page count
    pub page_count: Option<u32>,
}

impl Volume {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Add an author
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.authors.push(author.into());
        self
    }

    /// Add a category
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.categories.push(category.into());
        self
    }

    /// Add an identifier such as `ISBN_13`
    pub fn with_identifier(mut self, kind: impl Into<String>, identifier: impl Into<String>) -> Self {
        self.industry_identifiers.push(IndustryIdentifier {
            kind: kind.into(),
            identifier: identifier.into(),
        });
        self
    }

    /// Set description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Year taken from the leading digits of the publication date
    pub fn published_year(&self) -> Option<i32> {
        let date = self.published_date.as_deref()?;
        let year: String = date.chars().take(4).collect();
        if year.len() == 4 && year.chars().all(|c| c.is_ascii_digit()) {
            year.parse().ok()
        } else {
            None
        }
    }
}

/// Identifier entry (`ISBN_10`, `ISBN_13`, `OTHER`, ...)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IndustryIdentifier {
    #[serde(rename = "type")]
    pub kind: String,

    pub identifier: String,
}

/// Cover image links in the sizes the service offers
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageLinks {
    pub small_thumbnail: Option<String>,
    pub thumbnail: Option<String>,
}
