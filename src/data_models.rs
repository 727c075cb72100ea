use serde::{Deserialize, Serialize};

/// A validated opensearch response. The three vectors are index-aligned:
/// position `i` across titles, first_paragraphs and urls describes one hit.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub query: String,
    pub titles: Vec<String>,
    pub first_paragraphs: Vec<String>,
    pub urls: Vec<String>,
}

impl SearchResult {
    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }

    /// Iterate the hits row-wise.
    pub fn hits(&self) -> impl Iterator<Item = SearchHit<'_>> {
        self.titles
            .iter()
            .zip(&self.first_paragraphs)
            .zip(&self.urls)
            .map(|((title, first_paragraph), url)| SearchHit {
                title,
                first_paragraph,
                url,
            })
    }
}

/// One row of a search result, borrowed from its parent [`SearchResult`].
#[derive(Debug, Clone, Copy)]
pub struct SearchHit<'a> {
    pub title: &'a str,
    pub first_paragraph: &'a str,
    pub url: &'a str,
}
