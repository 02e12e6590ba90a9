use async_graphql::{Context, Object, Result, ID};

use crate::model::CompanyKind;
use super::types::{parse_id, required_text, to_id, Editor, EditorInput, Game, GameInput, Studio, StudioInput};
use super::with_store;

#[derive(Default)]
pub struct MutationRoot;

#[Object]
impl MutationRoot {
    /// Insert a game and link it to the given editors and studios
    async fn create_game(&self, ctx: &Context<'_>, input: GameInput) -> Result<Game> {
        let game = with_store(ctx, move |store| store.create_game(&input.into_fields()?)).await?;
        Ok(Game(game))
    }

    /// Overwrite a game; its editor and studio sets are replaced, not merged
    async fn update_game(&self, ctx: &Context<'_>, id: ID, input: GameInput) -> Result<Game> {
        let game = with_store(ctx, move |store| {
            let id = parse_id("Game", &id)?;
            store.update_game(id, &input.into_fields()?)
        })
        .await?;
        Ok(Game(game))
    }

    async fn delete_game(&self, ctx: &Context<'_>, id: ID) -> Result<ID> {
        let id = with_store(ctx, move |store| store.delete_game(parse_id("Game", &id)?)).await?;
        Ok(to_id(id))
    }

    async fn create_editor(&self, ctx: &Context<'_>, input: EditorInput) -> Result<Editor> {
        let editor = with_store(ctx, move |store| {
            store.create_editor(&required_text("name", &input.name)?)
        })
        .await?;
        Ok(Editor(editor))
    }

    async fn update_editor(&self, ctx: &Context<'_>, id: ID, input: EditorInput) -> Result<Editor> {
        let editor = with_store(ctx, move |store| {
            let id = parse_id(CompanyKind::Editor.label(), &id)?;
            store.update_editor(id, &required_text("name", &input.name)?)
        })
        .await?;
        Ok(Editor(editor))
    }

    /// Delete an editor; its links to games go with it
    async fn delete_editor(&self, ctx: &Context<'_>, id: ID) -> Result<ID> {
        let id = with_store(ctx, move |store| {
            store.delete_editor(parse_id(CompanyKind::Editor.label(), &id)?)
        })
        .await?;
        Ok(to_id(id))
    }

    async fn create_studio(&self, ctx: &Context<'_>, input: StudioInput) -> Result<Studio> {
        let studio = with_store(ctx, move |store| {
            store.create_studio(&required_text("name", &input.name)?)
        })
        .await?;
        Ok(Studio(studio))
    }

    async fn update_studio(&self, ctx: &Context<'_>, id: ID, input: StudioInput) -> Result<Studio> {
        let studio = with_store(ctx, move |store| {
            let id = parse_id(CompanyKind::Studio.label(), &id)?;
            store.update_studio(id, &required_text("name", &input.name)?)
        })
        .await?;
        Ok(Studio(studio))
    }

    /// Delete a studio; its links to games go with it
    async fn delete_studio(&self, ctx: &Context<'_>, id: ID) -> Result<ID> {
        let id = with_store(ctx, move |store| {
            store.delete_studio(parse_id(CompanyKind::Studio.label(), &id)?)
        })
        .await?;
        Ok(to_id(id))
    }
}
