//! Home page: paginated listing, search and the "new" filter.

use axum::extract::{Query, State};
use chrono::Utc;
use roster_core::listing::{contains_pattern, recent_cutoff, ListingMode};
use roster_core::pagination::{PageWindow, PERSONS_PER_PAGE};
use roster_db::models::flash_message::FlashMessage;
use roster_db::models::person::PersonFilter;
use roster_db::repositories::{FlashMessageRepo, PersonRepo};
use serde::{Deserialize, Serialize};

use super::person::{person_cards, PersonCard};
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::Page;
use crate::state::AppState;

/// Query parameters for `GET /`.
#[derive(Debug, Default, Deserialize)]
pub struct HomeParams {
    pub q: Option<String>,
    pub filter: Option<String>,
    /// 1-based page number, or `last`.
    pub page: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HomePage {
    pub persons: Vec<PersonCard>,
    pub page: PageWindow,
    /// The search term, echoed back for the search box.
    pub query: Option<String>,
    pub messages: Vec<FlashMessage>,
}

/// GET /
///
/// A non-empty `q` searches contact and description, otherwise a non-empty
/// `filter` restricts to persons created in the last day.
pub async fn index(
    user: Option<AuthUser>,
    State(state): State<AppState>,
    Query(params): Query<HomeParams>,
) -> AppResult<Page<HomePage>> {
    let mode = ListingMode::from_params(params.q.as_deref(), params.filter.as_deref());
    let filter = match &mode {
        ListingMode::All => PersonFilter::All,
        ListingMode::Search(term) => PersonFilter::Matching(contains_pattern(term)),
        ListingMode::Recent => PersonFilter::CreatedSince(recent_cutoff(Utc::now())),
    };

    let total = if mode.can_match() {
        PersonRepo::count(&state.pool, &filter).await?
    } else {
        0
    };
    let window = PageWindow::resolve(params.page.as_deref(), total, PERSONS_PER_PAGE)?;
    let persons = if total > 0 {
        PersonRepo::list(&state.pool, &filter, window.limit(), window.offset()).await?
    } else {
        Vec::new()
    };
    let persons = person_cards(&state, persons).await?;

    let messages = match &user {
        Some(user) => FlashMessageRepo::take_pending(&state.pool, user.user_id).await?,
        None => Vec::new(),
    };

    let template = mode.template();
    let query = match mode {
        ListingMode::Search(term) => Some(term),
        _ => None,
    };

    Ok(Page::new(
        template,
        HomePage {
            persons,
            page: window,
            query,
            messages,
        },
    ))
}
