use async_graphql::{Context, ErrorExtensions, Object, Result, ID};

use crate::model::{CompanyKind, GameQuery};
use crate::Error;
use super::types::{parse_id, Editor, Game, Games, Studio};
use super::{with_store, GraphContext};

#[derive(Default)]
pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// Games matching every given filter, one page at a time (pages start at 1)
    async fn games(
        &self,
        ctx: &Context<'_>,
        page: Option<i32>,
        genre: Option<String>,
        platform: Option<String>,
        studio: Option<String>,
    ) -> Result<Games> {
        let page_size = ctx.data::<GraphContext>()?.page_size;
        let page = match page {
            None => 1,
            Some(p) if p >= 1 => p as u32,
            Some(p) => {
                return Err(Error::InvalidInput(format!("page must be at least 1, got {p}")).extend());
            }
        };

        let query = GameQuery { page, page_size, genre, platform, studio };
        let page = with_store(ctx, move |store| store.list_games(&query)).await?;
        Ok(page.into())
    }

    async fn game(&self, ctx: &Context<'_>, id: ID) -> Result<Game> {
        let game = with_store(ctx, move |store| store.get_game(parse_id("Game", &id)?)).await?;
        Ok(Game(game))
    }

    async fn editors(&self, ctx: &Context<'_>) -> Result<Vec<Editor>> {
        let editors = with_store(ctx, |store| store.list_editors()).await?;
        Ok(editors.into_iter().map(Editor).collect())
    }

    async fn editor(&self, ctx: &Context<'_>, id: ID) -> Result<Editor> {
        let label = CompanyKind::Editor.label();
        let editor = with_store(ctx, move |store| store.get_editor(parse_id(label, &id)?)).await?;
        Ok(Editor(editor))
    }

    async fn studios(&self, ctx: &Context<'_>) -> Result<Vec<Studio>> {
        let studios = with_store(ctx, |store| store.list_studios()).await?;
        Ok(studios.into_iter().map(Studio).collect())
    }

    async fn studio(&self, ctx: &Context<'_>, id: ID) -> Result<Studio> {
        let label = CompanyKind::Studio.label();
        let studio = with_store(ctx, move |store| store.get_studio(parse_id(label, &id)?)).await?;
        Ok(Studio(studio))
    }
}
