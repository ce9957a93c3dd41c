//! Person pages: detail, create, update and the guarded delete.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use chrono::Utc;
use roster_core::error::CoreError;
use roster_core::forms::{
    CleanedPerson, FormErrors, PersonInput, CREATED_INITIAL_FORMAT, INVALID_CHOICE_MESSAGE,
};
use roster_core::images::{split_primary, MAX_IMAGE_FORMS};
use roster_core::permissions::authorize;
use roster_core::types::DbId;
use roster_db::models::category::Category;
use roster_db::models::flash_message::LEVEL_SUCCESS;
use roster_db::models::image::{Image, ImageChange, NewImage};
use roster_db::models::person::{CreatePerson, Person, UpdatePerson};
use roster_db::repositories::{CategoryRepo, FlashMessageRepo, ImageRepo, PersonRepo};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::forms::{read_person_submission, validate_images, PersonSubmission, ValidImage};
use crate::middleware::auth::{AuthUser, LoginRequired};
use crate::response::{forbidden, Page};
use crate::state::AppState;
use crate::storage::MediaStorage;

/// Flash message recorded after a successful delete.
pub const DELETED_MESSAGE: &str = "Person is deleted!";

// ---------------------------------------------------------------------------
// View models
// ---------------------------------------------------------------------------

/// A stored image as pages see it.
#[derive(Debug, Serialize)]
pub struct ImageView {
    pub id: DbId,
    pub url: String,
}

impl ImageView {
    fn new(storage: &MediaStorage, image: &Image) -> Self {
        Self {
            id: image.id,
            url: storage.url(&image.file_path),
        }
    }
}

/// A person in a listing, with its primary image.
#[derive(Debug, Serialize)]
pub struct PersonCard {
    pub person: Person,
    pub image: Option<ImageView>,
}

/// Attach each person's primary image, keeping the input order.
pub(crate) async fn person_cards(
    state: &AppState,
    persons: Vec<Person>,
) -> AppResult<Vec<PersonCard>> {
    let ids: Vec<DbId> = persons.iter().map(|p| p.id).collect();
    let primaries = ImageRepo::primaries_for(&state.pool, &ids).await?;

    Ok(persons
        .into_iter()
        .map(|person| {
            let image = primaries
                .iter()
                .find(|img| img.person_id == Some(person.id))
                .map(|img| ImageView::new(&state.storage, img));
            PersonCard { person, image }
        })
        .collect())
}

#[derive(Debug, Serialize)]
pub struct PersonDetail {
    pub person: Person,
    /// Primary image (lowest id).
    pub image: Option<ImageView>,
    /// Every other image, ascending by id.
    pub images: Vec<ImageView>,
}

/// Context of the add/update form pages.
#[derive(Debug, Serialize)]
pub struct PersonFormPage {
    /// The person being edited; `None` on create.
    pub person: Option<Person>,
    pub form: PersonInput,
    pub errors: FormErrors,
    pub categories: Vec<Category>,
    pub images: Vec<ImageView>,
    pub max_images: usize,
}

#[derive(Debug, Serialize)]
pub struct DeleteConfirm {
    pub person: Person,
}

// ---------------------------------------------------------------------------
// Detail
// ---------------------------------------------------------------------------

/// GET /person-detail/{id}/
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Page<PersonDetail>> {
    let person = find_person(&state, id).await?;
    let images = ImageRepo::list_by_person(&state.pool, id).await?;

    let (primary, gallery) = split_primary(images, |img| img.id);
    let detail = PersonDetail {
        person,
        image: primary.as_ref().map(|img| ImageView::new(&state.storage, img)),
        images: gallery
            .iter()
            .map(|img| ImageView::new(&state.storage, img))
            .collect(),
    };

    Ok(Page::new("person-detail", detail))
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

/// GET /add-person/
pub async fn add_person_form(
    LoginRequired(_user): LoginRequired,
    State(state): State<AppState>,
) -> AppResult<Page<PersonFormPage>> {
    let categories = CategoryRepo::list(&state.pool).await?;

    Ok(Page::new(
        "add-person",
        PersonFormPage {
            person: None,
            form: PersonInput::initial(Utc::now()),
            errors: FormErrors::new(),
            categories,
            images: Vec::new(),
            max_images: MAX_IMAGE_FORMS,
        },
    ))
}

/// POST /add-person/
///
/// Creates the person and its images in one transaction, owned by the caller.
pub async fn add_person(
    LoginRequired(user): LoginRequired,
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<Response> {
    let submission = read_person_submission(multipart).await?;
    let categories = CategoryRepo::list(&state.pool).await?;

    let (cleaned, uploads) =
        match check_submission(&submission, &categories, &[], state.config.max_upload_bytes) {
            Ok(checked) => checked,
            Err(errors) => {
                tracing::debug!(user_id = user.user_id, ?errors, "Add person form rejected");
                let page = PersonFormPage {
                    person: None,
                    form: submission.person,
                    errors,
                    categories,
                    images: Vec::new(),
                    max_images: MAX_IMAGE_FORMS,
                };
                return Ok(Page::new("add-person", page).with_status(StatusCode::UNPROCESSABLE_ENTITY));
            }
        };

    let files: Vec<NewImage> = store_uploads(&state.storage, &uploads)
        .await?
        .into_iter()
        .map(|change| change.file)
        .collect();

    let input = CreatePerson {
        user_id: user.user_id,
        category_slug: cleaned.category,
        name: cleaned.name,
        contact: cleaned.contact,
        description: cleaned.description,
        address: cleaned.address,
        created: cleaned.created,
    };

    let (person, images) = match PersonRepo::create_with_images(&state.pool, &input, &files).await {
        Ok(created) => created,
        Err(e) => {
            let paths: Vec<&str> = files.iter().map(|f| f.file_path.as_str()).collect();
            state.storage.remove_all(&paths).await;
            return Err(e.into());
        }
    };

    tracing::info!(
        person_id = person.id,
        user_id = user.user_id,
        image_count = images.len(),
        "Person created",
    );

    Ok(Redirect::to(&detail_url(person.id)).into_response())
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

/// GET /update-person/{id}/
pub async fn update_person_form(
    user: Option<AuthUser>,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Response> {
    let person = find_person(&state, id).await?;
    if !authorize(user.map(|u| u.user_id), &person).is_allowed() {
        return Ok(forbidden());
    }

    let categories = CategoryRepo::list(&state.pool).await?;
    let images = ImageRepo::list_by_person(&state.pool, id).await?;

    let page = PersonFormPage {
        form: bound_form(&person),
        person: Some(person),
        errors: FormErrors::new(),
        categories,
        images: images
            .iter()
            .map(|img| ImageView::new(&state.storage, img))
            .collect(),
        max_images: MAX_IMAGE_FORMS,
    };
    Ok(Page::new("update-person", page).into_response())
}

/// POST /update-person/{id}/
///
/// Only the owner may update. Entries with an image id replace that image's
/// file, entries without one add an image; unmentioned images are kept.
pub async fn update_person(
    user: Option<AuthUser>,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<Response> {
    let person = find_person(&state, id).await?;
    let actor = user.map(|u| u.user_id);
    if !authorize(actor, &person).is_allowed() {
        tracing::warn!(person_id = id, ?actor, "Update refused for non-owner");
        return Ok(forbidden());
    }

    let submission = read_person_submission(multipart).await?;
    let categories = CategoryRepo::list(&state.pool).await?;
    let existing = ImageRepo::list_by_person(&state.pool, id).await?;
    let existing_ids: Vec<DbId> = existing.iter().map(|img| img.id).collect();

    let (cleaned, uploads) = match check_submission(
        &submission,
        &categories,
        &existing_ids,
        state.config.max_upload_bytes,
    ) {
        Ok(checked) => checked,
        Err(errors) => {
            tracing::debug!(person_id = id, ?errors, "Update person form rejected");
            let page = PersonFormPage {
                person: Some(person),
                form: submission.person,
                errors,
                categories,
                images: existing
                    .iter()
                    .map(|img| ImageView::new(&state.storage, img))
                    .collect(),
                max_images: MAX_IMAGE_FORMS,
            };
            return Ok(Page::new("update-person", page).with_status(StatusCode::UNPROCESSABLE_ENTITY));
        }
    };

    let changes = store_uploads(&state.storage, &uploads).await?;
    let input = UpdatePerson {
        category_slug: cleaned.category,
        name: cleaned.name,
        contact: cleaned.contact,
        description: cleaned.description,
        address: cleaned.address,
        created: cleaned.created,
    };

    let result = PersonRepo::update_with_images(&state.pool, id, &input, &changes).await;
    let new_paths: Vec<&str> = changes.iter().map(|c| c.file.file_path.as_str()).collect();
    let (person, replaced) = match result {
        Ok(Some(updated)) => updated,
        Ok(None) => {
            state.storage.remove_all(&new_paths).await;
            return Err(AppError::Core(CoreError::NotFound {
                entity: "Person",
                id,
            }));
        }
        Err(e) => {
            state.storage.remove_all(&new_paths).await;
            return Err(e.into());
        }
    };

    state.storage.remove_all(&replaced).await;

    tracing::info!(
        person_id = person.id,
        user_id = person.user_id,
        image_changes = changes.len(),
        "Person updated",
    );

    Ok(Redirect::to(&detail_url(person.id)).into_response())
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

/// GET /delete-person/{id}/
pub async fn delete_person_confirm(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Page<DeleteConfirm>> {
    let person = find_person(&state, id).await?;
    authorize(Some(auth.user_id), &person).into_result("delete this person")?;

    Ok(Page::new("delete-person", DeleteConfirm { person }))
}

/// POST /delete-person/{id}/
///
/// Deletes the person (images cascade), removes its files and leaves a flash
/// message for the next home page view.
pub async fn delete_person(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Redirect> {
    let person = find_person(&state, id).await?;
    authorize(Some(auth.user_id), &person).into_result("delete this person")?;

    let images = ImageRepo::list_by_person(&state.pool, id).await?;
    if !PersonRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Person",
            id,
        }));
    }

    let paths: Vec<&str> = images.iter().map(|img| img.file_path.as_str()).collect();
    state.storage.remove_all(&paths).await;

    FlashMessageRepo::create(&state.pool, auth.user_id, LEVEL_SUCCESS, DELETED_MESSAGE).await?;

    tracing::info!(person_id = id, user_id = auth.user_id, "Person deleted");

    Ok(Redirect::to("/"))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn detail_url(id: DbId) -> String {
    format!("/person-detail/{id}/")
}

async fn find_person(state: &AppState, id: DbId) -> AppResult<Person> {
    PersonRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Person",
            id,
        }))
}

/// The form pre-filled with a stored person's values.
fn bound_form(person: &Person) -> PersonInput {
    PersonInput {
        category: person.category_slug.clone(),
        name: person.name.clone(),
        contact: person.contact.clone(),
        description: person.description.clone(),
        address: person.address.clone().unwrap_or_default(),
        created: person.created.format(CREATED_INITIAL_FORMAT).to_string(),
    }
}

/// Validate the person form and image form-set together so every field error
/// is reported at once.
fn check_submission(
    submission: &PersonSubmission,
    categories: &[Category],
    existing_images: &[DbId],
    max_upload_bytes: usize,
) -> Result<(CleanedPerson, Vec<ValidImage>), FormErrors> {
    let mut errors = submission.errors.clone();

    let cleaned = submission
        .person
        .clean(Utc::now())
        .map_err(|e| errors.merge(e))
        .ok();

    let category = submission.person.category.trim();
    if !category.is_empty() && !categories.iter().any(|c| c.slug == category) {
        errors.add("category", INVALID_CHOICE_MESSAGE);
    }

    let uploads = validate_images(&submission.images, existing_images, max_upload_bytes)
        .map_err(|e| errors.merge(e))
        .ok();

    match (cleaned, uploads) {
        (Some(cleaned), Some(uploads)) if errors.is_empty() => Ok((cleaned, uploads)),
        _ => Err(errors),
    }
}

/// Write validated uploads to media storage. On failure, files written so far
/// are removed again.
async fn store_uploads(
    storage: &MediaStorage,
    uploads: &[ValidImage],
) -> AppResult<Vec<ImageChange>> {
    let mut saved: Vec<ImageChange> = Vec::with_capacity(uploads.len());
    for upload in uploads {
        match storage.save_image(&upload.bytes, upload.kind).await {
            Ok(file) => saved.push(ImageChange {
                replaces: upload.replaces,
                file,
            }),
            Err(e) => {
                let paths: Vec<&str> = saved.iter().map(|c| c.file.file_path.as_str()).collect();
                storage.remove_all(&paths).await;
                return Err(e.into());
            }
        }
    }
    Ok(saved)
}
