//! Display ordering
//!
//! Quotes are shown either by identifier (the order the server assigned
//! them) or alphabetically by author. Switching never touches the network;
//! it only changes how the store is projected into cards.

use std::cmp::Ordering;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::config::Config;
use crate::models::Quote;

/// How quotes are ordered on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    /// Identifier ascending
    #[default]
    ById,
    /// Author, locale-aware ascending
    ByAuthor,
}

impl SortMode {
    /// Initial mode from configuration
    pub fn from_config(config: &Config) -> Self {
        if config.sort_by_author {
            SortMode::ByAuthor
        } else {
            SortMode::ById
        }
    }

    /// The other mode
    pub fn toggled(self) -> Self {
        match self {
            SortMode::ById => SortMode::ByAuthor,
            SortMode::ByAuthor => SortMode::ById,
        }
    }

    /// Whether sorting by author is on
    pub fn is_by_author(self) -> bool {
        self == SortMode::ByAuthor
    }

    /// Label for the sort toggle
    pub fn label(self) -> &'static str {
        match self {
            SortMode::ById => "Sort by Author: OFF",
            SortMode::ByAuthor => "Sort by Author: ON",
        }
    }

    /// Compare two quotes under this mode
    pub fn compare(self, a: &Quote, b: &Quote) -> Ordering {
        match self {
            SortMode::ById => a.id.cmp(&b.id),
            SortMode::ByAuthor => collate(&a.author, &b.author),
        }
    }

    /// Order quotes in place (stable)
    pub fn sort(self, quotes: &mut [&Quote]) {
        quotes.sort_by(|a, b| self.compare(a, b));
    }
}

/// Locale-aware string comparison
///
/// Three levels, each only breaking ties of the one before:
///
/// 1. base letters, ignoring accents and case ("Émile" < "Zola")
/// 2. accents, unaccented first ("e" < "é")
/// 3. case, lowercase first ("ada" < "Ada" < "adam")
pub fn collate(a: &str, b: &str) -> Ordering {
    base_letters(a)
        .cmp(base_letters(b))
        .then_with(|| accented(a).cmp(accented(b)))
        .then_with(|| {
            a.nfd()
                .zip(b.nfd())
                .find_map(|(x, y)| match (x.is_lowercase(), y.is_lowercase()) {
                    (true, false) => Some(Ordering::Less),
                    (false, true) => Some(Ordering::Greater),
                    _ => None,
                })
                .unwrap_or(Ordering::Equal)
        })
}

/// Lowercased letters with combining marks stripped
fn base_letters(s: &str) -> impl Iterator<Item = char> + '_ {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
}

/// Lowercased letters with combining marks kept
fn accented(s: &str) -> impl Iterator<Item = char> + '_ {
    s.nfd().flat_map(char::to_lowercase)
}
