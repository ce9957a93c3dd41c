//! HTTP-level tests for the home listing, search, "new" filter, pagination
//! and category pages.

mod common;

use axum::http::StatusCode;
use common::{body_json, create_category, create_person, create_user, get};
use roster_db::repositories::ImageRepo;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Listing and pagination
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_home_lists_two_per_page_newest_first(pool: PgPool) {
    let (owner, _) = create_user(&pool, "owner", "user").await;
    create_category(&pool, "work").await;
    create_person(&pool, owner.id, "work", "oldest@x.com", "", 30).await;
    create_person(&pool, owner.id, "work", "middle@x.com", "", 20).await;
    create_person(&pool, owner.id, "work", "newest@x.com", "", 10).await;

    let media = tempfile::tempdir().unwrap();
    let app = common::build_test_app(pool, media.path());

    let json = body_json(get(app.clone(), "/").await).await;
    assert_eq!(json["template"], "index");
    let persons = json["data"]["persons"].as_array().unwrap();
    assert_eq!(persons.len(), 2);
    assert_eq!(persons[0]["person"]["contact"], "newest@x.com");
    assert_eq!(persons[1]["person"]["contact"], "middle@x.com");
    assert_eq!(json["data"]["page"]["number"], 1);
    assert_eq!(json["data"]["page"]["num_pages"], 2);
    assert_eq!(json["data"]["page"]["total"], 3);
    assert_eq!(json["data"]["page"]["has_next"], true);
    assert_eq!(json["data"]["page"]["has_previous"], false);

    let json = body_json(get(app.clone(), "/?page=2").await).await;
    let persons = json["data"]["persons"].as_array().unwrap();
    assert_eq!(persons.len(), 1);
    assert_eq!(persons[0]["person"]["contact"], "oldest@x.com");
    assert_eq!(json["data"]["page"]["has_previous"], true);

    let json = body_json(get(app, "/?page=last").await).await;
    assert_eq!(json["data"]["page"]["number"], 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_out_of_range_pages_are_404(pool: PgPool) {
    let (owner, _) = create_user(&pool, "owner", "user").await;
    create_category(&pool, "work").await;
    create_person(&pool, owner.id, "work", "only@x.com", "", 5).await;

    let media = tempfile::tempdir().unwrap();
    let app = common::build_test_app(pool, media.path());

    for uri in ["/?page=2", "/?page=0", "/?page=abc"] {
        let response = get(app.clone(), uri).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
        let json = body_json(response).await;
        assert_eq!(json["code"], "INVALID_PAGE");
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_empty_listing_has_one_empty_page(pool: PgPool) {
    let media = tempfile::tempdir().unwrap();
    let app = common::build_test_app(pool, media.path());

    let response = get(app, "/").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["data"]["persons"].as_array().unwrap().is_empty());
    assert_eq!(json["data"]["page"]["num_pages"], 1);
    assert!(json["data"]["messages"].as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_listing_cards_carry_primary_image(pool: PgPool) {
    let (owner, _) = create_user(&pool, "owner", "user").await;
    create_category(&pool, "work").await;
    let person = common::create_person_with_images(
        &pool,
        owner.id,
        "work",
        "pics@x.com",
        "",
        1,
        &["first", "second"],
    )
    .await;
    let images = ImageRepo::list_by_person(&pool, person.id).await.unwrap();

    let media = tempfile::tempdir().unwrap();
    let app = common::build_test_app(pool, media.path());

    let json = body_json(get(app, "/").await).await;
    let card = &json["data"]["persons"][0];
    assert_eq!(card["image"]["id"], images[0].id);
    assert_eq!(card["image"]["url"], "/media/images/first.png");
}

// ---------------------------------------------------------------------------
// Search and filter
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_search_matches_contact_or_description(pool: PgPool) {
    let (owner, _) = create_user(&pool, "owner", "user").await;
    create_category(&pool, "work").await;
    create_person(&pool, owner.id, "work", "jane@x.com", "Designer", 3).await;
    create_person(&pool, owner.id, "work", "DESIGN-studio@x.com", "Agency", 2).await;
    create_person(&pool, owner.id, "work", "bob@x.com", "Plumber", 1).await;

    let media = tempfile::tempdir().unwrap();
    let app = common::build_test_app(pool, media.path());

    let json = body_json(get(app.clone(), "/?q=design").await).await;
    assert_eq!(json["template"], "search");
    assert_eq!(json["data"]["query"], "design");
    assert_eq!(json["data"]["page"]["total"], 2);
    for card in json["data"]["persons"].as_array().unwrap() {
        let hay = format!(
            "{} {}",
            card["person"]["contact"].as_str().unwrap(),
            card["person"]["description"].as_str().unwrap()
        )
        .to_lowercase();
        assert!(hay.contains("design"), "{hay} should match");
    }

    let json = body_json(get(app, "/?q=zzz").await).await;
    assert_eq!(json["data"]["page"]["total"], 0);
    assert!(json["data"]["persons"].as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_filter_shows_only_last_day(pool: PgPool) {
    let (owner, _) = create_user(&pool, "owner", "user").await;
    create_category(&pool, "work").await;
    create_person(&pool, owner.id, "work", "old@x.com", "", 3 * 24 * 60).await;
    create_person(&pool, owner.id, "work", "fresh@x.com", "", 5).await;

    let media = tempfile::tempdir().unwrap();
    let app = common::build_test_app(pool, media.path());

    let json = body_json(get(app, "/?filter=1").await).await;
    assert_eq!(json["template"], "new");
    let persons = json["data"]["persons"].as_array().unwrap();
    assert_eq!(persons.len(), 1);
    assert_eq!(persons[0]["person"]["contact"], "fresh@x.com");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_search_takes_precedence_over_filter(pool: PgPool) {
    let (owner, _) = create_user(&pool, "owner", "user").await;
    create_category(&pool, "work").await;
    create_person(&pool, owner.id, "work", "old-bob@x.com", "", 3 * 24 * 60).await;
    create_person(&pool, owner.id, "work", "fresh@x.com", "", 5).await;

    let media = tempfile::tempdir().unwrap();
    let app = common::build_test_app(pool, media.path());

    let json = body_json(get(app.clone(), "/?q=bob&filter=1").await).await;
    assert_eq!(json["template"], "search");
    assert_eq!(json["data"]["persons"][0]["person"]["contact"], "old-bob@x.com");

    // An empty search term counts as absent.
    let json = body_json(get(app, "/?q=&filter=1").await).await;
    assert_eq!(json["template"], "new");
}

// ---------------------------------------------------------------------------
// Category pages
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_category_detail_lists_its_persons(pool: PgPool) {
    let (owner, _) = create_user(&pool, "owner", "user").await;
    create_category(&pool, "work").await;
    create_category(&pool, "family").await;
    create_person(&pool, owner.id, "work", "w@x.com", "", 3).await;
    create_person(&pool, owner.id, "family", "f1@x.com", "", 2).await;
    create_person(&pool, owner.id, "family", "f2@x.com", "", 1).await;
    create_person(&pool, owner.id, "family", "f3@x.com", "", 0).await;

    let media = tempfile::tempdir().unwrap();
    let app = common::build_test_app(pool, media.path());

    let response = get(app, "/category/family/").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["template"], "category-detail");
    assert_eq!(json["data"]["category"]["slug"], "family");
    let persons = json["data"]["persons"].as_array().unwrap();
    assert_eq!(persons.len(), 3, "category pages are not paginated");
    assert!(persons
        .iter()
        .all(|card| card["person"]["category_slug"] == "family"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unknown_category_is_404(pool: PgPool) {
    let media = tempfile::tempdir().unwrap();
    let app = common::build_test_app(pool, media.path());

    let response = get(app, "/category/ghost/").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_null_characters_in_lookups_find_nothing(pool: PgPool) {
    let (owner, _) = create_user(&pool, "owner", "user").await;
    create_category(&pool, "work").await;
    create_person(&pool, owner.id, "work", "ab@x.com", "", 5).await;

    let media = tempfile::tempdir().unwrap();
    let app = common::build_test_app(pool, media.path());

    let response = get(app.clone(), "/?q=a%00b").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["template"], "search");
    assert!(json["data"]["persons"].as_array().unwrap().is_empty());
    assert_eq!(json["data"]["page"]["total"], 0);

    let response = get(app, "/category/wo%00rk/").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
