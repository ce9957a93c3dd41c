//! Category detail page.

use axum::extract::{Path, State};
use roster_core::error::CoreError;
use roster_core::forms::has_null_characters;
use roster_db::models::category::Category;
use roster_db::models::person::PersonFilter;
use roster_db::repositories::{CategoryRepo, PersonRepo};
use serde::Serialize;

use super::person::{person_cards, PersonCard};
use crate::error::{AppError, AppResult};
use crate::response::Page;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CategoryDetail {
    pub category: Category,
    pub persons: Vec<PersonCard>,
}

/// GET /category/{slug}/
///
/// Every person in the category, newest first. Not paginated.
pub async fn detail(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Page<CategoryDetail>> {
    // A slug with NUL cannot exist and would be refused by the database.
    let category = if has_null_characters(&slug) {
        None
    } else {
        CategoryRepo::find_by_slug(&state.pool, &slug).await?
    };
    let category = category.ok_or_else(|| {
        AppError::Core(CoreError::NotFoundByKey {
            entity: "Category",
            key: slug.escape_default().to_string(),
        })
    })?;

    let persons = PersonRepo::list_all(&state.pool, &PersonFilter::Category(slug)).await?;
    let persons = person_cards(&state, persons).await?;

    Ok(Page::new("category-detail", CategoryDetail { category, persons }))
}
