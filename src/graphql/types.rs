//! GraphQL response and input types
//!
//! Response types wrap the domain rows; derived fields (`Game.editors`,
//! `Editor.games`, ...) are resolved on demand through the store.

use async_graphql::{Context, InputObject, Object, Result, SimpleObject, ID};

use crate::model::{self, Company, CompanyKind, GameFields, GamePage};
use crate::Error;
use super::with_store;

/// Render a row id as an opaque GraphQL id
pub fn to_id(id: i64) -> ID {
    ID(id.to_string())
}

/// Parse an opaque id; anything that is not a row id cannot match a row
pub fn parse_id(entity: &'static str, id: &ID) -> crate::Result<i64> {
    id.parse::<i64>().map_err(|_| Error::not_found(entity, id.as_str()))
}

/// Trimmed, non-empty value of a required text field
pub fn required_text(field: &str, value: &str) -> crate::Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(Error::InvalidInput(format!("{field} must not be empty")));
    }
    Ok(value.to_string())
}

pub struct Game(pub model::Game);

#[Object]
impl Game {
    async fn id(&self) -> ID {
        to_id(self.0.id)
    }

    async fn name(&self) -> &str {
        &self.0.name
    }

    async fn genres(&self) -> Vec<String> {
        self.0.genres.clone()
    }

    async fn publication_date(&self) -> Option<i32> {
        self.0.publication_date
    }

    async fn platform(&self) -> &str {
        &self.0.platform
    }

    #[graphql(name = "editorIDs")]
    async fn editor_ids(&self) -> Vec<ID> {
        self.0.editor_ids.iter().copied().map(to_id).collect()
    }

    #[graphql(name = "studioIDs")]
    async fn studio_ids(&self) -> Vec<ID> {
        self.0.studio_ids.iter().copied().map(to_id).collect()
    }

    async fn editors(&self, ctx: &Context<'_>) -> Result<Vec<Editor>> {
        let ids = self.0.editor_ids.clone();
        let editors = with_store(ctx, move |store| {
            ids.into_iter().map(|id| store.get_editor(id)).collect::<crate::Result<Vec<_>>>()
        })
        .await?;
        Ok(editors.into_iter().map(Editor).collect())
    }

    async fn studios(&self, ctx: &Context<'_>) -> Result<Vec<Studio>> {
        let ids = self.0.studio_ids.clone();
        let studios = with_store(ctx, move |store| {
            ids.into_iter().map(|id| store.get_studio(id)).collect::<crate::Result<Vec<_>>>()
        })
        .await?;
        Ok(studios.into_iter().map(Studio).collect())
    }
}

async fn linked_games(ctx: &Context<'_>, kind: CompanyKind, id: i64) -> Result<Vec<Game>> {
    let games = with_store(ctx, move |store| store.games_for_company(kind, id)).await?;
    Ok(games.into_iter().map(Game).collect())
}

pub struct Editor(pub Company);

#[Object]
impl Editor {
    async fn id(&self) -> ID {
        to_id(self.0.id)
    }

    async fn name(&self) -> &str {
        &self.0.name
    }

    /// Games this editor published
    async fn games(&self, ctx: &Context<'_>) -> Result<Vec<Game>> {
        linked_games(ctx, CompanyKind::Editor, self.0.id).await
    }
}

pub struct Studio(pub Company);

#[Object]
impl Studio {
    async fn id(&self) -> ID {
        to_id(self.0.id)
    }

    async fn name(&self) -> &str {
        &self.0.name
    }

    /// Games this studio developed
    async fn games(&self, ctx: &Context<'_>) -> Result<Vec<Game>> {
        linked_games(ctx, CompanyKind::Studio, self.0.id).await
    }
}

/// Pagination metadata of a game listing
#[derive(Debug, SimpleObject)]
pub struct Infos {
    pub count: i32,
    pub pages: i32,
    pub next_page: Option<i32>,
    pub previous_pages: Option<i32>,
}

#[derive(SimpleObject)]
pub struct Games {
    pub infos: Infos,
    pub results: Vec<Game>,
}

impl From<GamePage> for Games {
    fn from(page: GamePage) -> Self {
        let clamp = |n: u64| i32::try_from(n).unwrap_or(i32::MAX);
        let infos = Infos {
            count: clamp(page.total),
            pages: clamp(u64::from(page.pages())),
            next_page: page.next_page().map(|p| clamp(u64::from(p))),
            previous_pages: page.previous_page().map(|p| clamp(u64::from(p))),
        };
        Games {
            infos,
            results: page.games.into_iter().map(Game).collect(),
        }
    }
}

#[derive(Debug, InputObject)]
pub struct GameInput {
    pub name: String,
    #[graphql(default)]
    pub genres: Vec<String>,
    pub publication_date: Option<i32>,
    pub platform: String,
    #[graphql(name = "editorIDs", default)]
    pub editor_ids: Vec<ID>,
    #[graphql(name = "studioIDs", default)]
    pub studio_ids: Vec<ID>,
}

impl GameInput {
    /// Validate and convert into store fields.
    ///
    /// A missing publication date is stored as 0.
    pub fn into_fields(self) -> crate::Result<GameFields> {
        let genres = self
            .genres
            .iter()
            .map(|g| required_text("genre", g))
            .collect::<crate::Result<Vec<_>>>()?;
        let editor_ids = self
            .editor_ids
            .iter()
            .map(|id| parse_id(CompanyKind::Editor.label(), id))
            .collect::<crate::Result<Vec<_>>>()?;
        let studio_ids = self
            .studio_ids
            .iter()
            .map(|id| parse_id(CompanyKind::Studio.label(), id))
            .collect::<crate::Result<Vec<_>>>()?;

        Ok(GameFields {
            name: required_text("name", &self.name)?,
            genres,
            publication_date: Some(self.publication_date.unwrap_or(0)),
            platform: required_text("platform", &self.platform)?,
            editor_ids,
            studio_ids,
        })
    }
}

#[derive(Debug, InputObject)]
pub struct EditorInput {
    pub name: String,
}

#[derive(Debug, InputObject)]
pub struct StudioInput {
    pub name: String,
}
