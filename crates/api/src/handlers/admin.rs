//! Staff-only category administration.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use roster_core::category::{validate_category_name, validate_slug};
use roster_core::error::CoreError;
use roster_core::images::ADMIN_INLINE_IMAGE_MAX;
use roster_db::models::category::{Category, CreateCategory};
use roster_db::repositories::{CategoryRepo, ImageRepo};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireStaff;
use crate::response::Page;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct AdminCategories {
    pub categories: Vec<Category>,
    /// Image rows shown inline when editing a person from the admin.
    pub inline_image_max: usize,
}

/// GET /admin/categories/
pub async fn list_categories(
    RequireStaff(_staff): RequireStaff,
    State(state): State<AppState>,
) -> AppResult<Page<AdminCategories>> {
    let categories = CategoryRepo::list(&state.pool).await?;

    Ok(Page::new(
        "admin-categories",
        AdminCategories {
            categories,
            inline_image_max: ADMIN_INLINE_IMAGE_MAX,
        },
    ))
}

/// POST /admin/categories/
///
/// A duplicate slug hits `uq_categories_slug` and surfaces as 409.
pub async fn create_category(
    RequireStaff(staff): RequireStaff,
    State(state): State<AppState>,
    Json(input): Json<CreateCategory>,
) -> AppResult<(StatusCode, Json<Category>)> {
    validate_slug(&input.slug)?;
    validate_category_name(&input.name)?;

    let input = CreateCategory {
        slug: input.slug,
        name: input.name.trim().to_string(),
    };
    let category = CategoryRepo::create(&state.pool, &input).await?;

    tracing::info!(slug = %category.slug, user_id = staff.user_id, "Category created");
    Ok((StatusCode::CREATED, Json(category)))
}

/// DELETE /admin/categories/{slug}/
///
/// Persons in the category are deleted with it, along with their image files.
pub async fn delete_category(
    RequireStaff(staff): RequireStaff,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<StatusCode> {
    let paths = ImageRepo::paths_for_category(&state.pool, &slug).await?;
    if !CategoryRepo::delete(&state.pool, &slug).await? {
        return Err(AppError::Core(CoreError::NotFoundByKey {
            entity: "Category",
            key: slug,
        }));
    }
    state.storage.remove_all(&paths).await;

    tracing::info!(%slug, user_id = staff.user_id, removed_files = paths.len(), "Category deleted");
    Ok(StatusCode::NO_CONTENT)
}
