//! Domain types - rows as the store reads and writes them
//!
//! - `Game`: a catalog entry with its genres and linked companies
//! - `Company`: the shared shape of editors and studios
//! - `GameFields`: everything a create/update writes for a game
//! - `GameQuery` / `GamePage`: filtered, paginated listing

use serde::{Deserialize, Serialize};

/// Default number of games per listing page
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// The two kinds of company a game links to.
///
/// Editors and studios share table shape and lifecycle, so the store
/// handles both through this discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompanyKind {
    Editor,
    Studio,
}

impl CompanyKind {
    /// Human readable label used in error messages
    pub fn label(&self) -> &'static str {
        match self {
            CompanyKind::Editor => "Editor",
            CompanyKind::Studio => "Studio",
        }
    }

    /// Entity table
    pub fn table(&self) -> &'static str {
        match self {
            CompanyKind::Editor => "editor",
            CompanyKind::Studio => "studio",
        }
    }

    /// Join table linking games to this kind
    pub fn link_table(&self) -> &'static str {
        match self {
            CompanyKind::Editor => "game_editor",
            CompanyKind::Studio => "game_studio",
        }
    }

    /// Column of the join table referencing this kind
    pub fn link_column(&self) -> &'static str {
        match self {
            CompanyKind::Editor => "editor_id",
            CompanyKind::Studio => "studio_id",
        }
    }

    pub fn all() -> &'static [CompanyKind] {
        &[CompanyKind::Editor, CompanyKind::Studio]
    }
}

impl std::fmt::Display for CompanyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// An editor or a studio
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub id: i64,
    pub name: String,
}

/// A game with its genres and associated company ids
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub id: i64,
    pub name: String,
    pub genres: Vec<String>,
    pub publication_date: Option<i32>,
    pub platform: String,
    pub editor_ids: Vec<i64>,
    pub studio_ids: Vec<i64>,
}

/// Fields written by `create_game` and `update_game`.
///
/// Updates overwrite every field; the id lists replace the current
/// associations wholesale.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameFields {
    pub name: String,
    pub genres: Vec<String>,
    pub publication_date: Option<i32>,
    pub platform: String,
    pub editor_ids: Vec<i64>,
    pub studio_ids: Vec<i64>,
}

/// Filters and page selection for game listings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameQuery {
    /// 1-based page number
    pub page: u32,
    pub page_size: u32,
    pub genre: Option<String>,
    pub platform: Option<String>,
    /// Studio name the game must be linked to
    pub studio: Option<String>,
}

impl Default for GameQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            genre: None,
            platform: None,
            studio: None,
        }
    }
}

impl GameQuery {
    pub(crate) fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.page_size)
    }
}

/// One page of a game listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GamePage {
    pub games: Vec<Game>,
    /// Number of games matching the filters across all pages
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
}

impl GamePage {
    /// Total page count; an empty listing still has one page
    pub fn pages(&self) -> u32 {
        if self.page_size == 0 || self.total == 0 {
            return 1;
        }
        let pages = self.total.div_ceil(u64::from(self.page_size));
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    pub fn next_page(&self) -> Option<u32> {
        (self.page < self.pages()).then(|| self.page + 1)
    }

    pub fn previous_page(&self) -> Option<u32> {
        (self.page > 1).then(|| self.page - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(total: u64, page: u32) -> GamePage {
        GamePage { games: Vec::new(), total, page, page_size: 10 }
    }

    #[test]
    fn test_empty_listing_has_one_page() {
        let p = page(0, 1);
        assert_eq!(p.pages(), 1);
        assert_eq!(p.next_page(), None);
        assert_eq!(p.previous_page(), None);
    }

    #[test]
    fn test_page_navigation() {
        let first = page(25, 1);
        assert_eq!(first.pages(), 3);
        assert_eq!(first.next_page(), Some(2));
        assert_eq!(first.previous_page(), None);

        let last = page(25, 3);
        assert_eq!(last.next_page(), None);
        assert_eq!(last.previous_page(), Some(2));
    }

    #[test]
    fn test_query_offset() {
        let query = GameQuery { page: 3, page_size: 20, ..GameQuery::default() };
        assert_eq!(query.offset(), 40);
        assert_eq!(GameQuery::default().offset(), 0);
    }
}
