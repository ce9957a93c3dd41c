//! Shared helpers for the HTTP integration tests.

#![allow(dead_code)]

use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use chrono::{Duration, Utc};
use http_body_util::BodyExt;
use roster_api::auth::jwt::{generate_access_token, JwtConfig};
use roster_api::auth::password::hash_password;
use roster_api::config::ServerConfig;
use roster_api::router::build_app_router;
use roster_api::state::AppState;
use roster_api::storage::MediaStorage;
use roster_core::images::DEFAULT_MAX_UPLOAD_BYTES;
use roster_core::types::DbId;
use roster_db::models::category::CreateCategory;
use roster_db::models::image::NewImage;
use roster_db::models::person::{CreatePerson, Person};
use roster_db::models::user::{CreateUser, User};
use roster_db::repositories::{CategoryRepo, PersonRepo, UserRepo};
use sqlx::PgPool;
use tower::ServiceExt;

pub const TEST_PASSWORD: &str = "test_password_123!";
const TEST_JWT_SECRET: &str = "integration-test-secret-long-enough-for-hs256";
const BOUNDARY: &str = "roster-test-boundary";

/// Build a test `ServerConfig` with safe defaults and the given media root.
pub fn test_config(media_root: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        media_root: media_root.to_path_buf(),
        max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        login_url: "/login/".to_string(),
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            access_token_expiry_mins: 15,
        },
    }
}

/// Build the full application router, with the production middleware stack,
/// over the given pool and media directory.
pub fn build_test_app(pool: PgPool, media_root: &Path) -> Router {
    let config = test_config(media_root);
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        storage: Arc::new(MediaStorage::new(media_root)),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::get(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::get(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    let request = Request::post(uri)
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

/// POST with an empty body, as the delete confirmation form does.
pub async fn post_empty(app: Router, uri: &str, token: Option<&str>) -> Response<Body> {
    let mut builder = Request::post(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    send(app, builder.body(Body::empty()).unwrap()).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::delete(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_multipart(
    app: Router,
    uri: &str,
    form: MultipartForm,
    token: Option<&str>,
) -> Response<Body> {
    let mut builder = Request::post(uri).header(
        "content-type",
        format!("multipart/form-data; boundary={BOUNDARY}"),
    );
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    send(app, builder.body(Body::from(form.finish())).unwrap()).await
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}

/// The `Location` header of a redirect.
pub fn location(response: &Response<Body>) -> String {
    response
        .headers()
        .get("location")
        .expect("redirect must carry a Location header")
        .to_str()
        .unwrap()
        .to_string()
}

/// Extract `{id}` from a `/person-detail/{id}/` location.
pub fn person_id_from_location(location: &str) -> DbId {
    location
        .trim_start_matches("/person-detail/")
        .trim_end_matches('/')
        .parse()
        .expect("location should name a person id")
}

// ---------------------------------------------------------------------------
// Multipart
// ---------------------------------------------------------------------------

/// Minimal `multipart/form-data` body builder.
#[derive(Default)]
pub struct MultipartForm {
    body: Vec<u8>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, filename: &str, bytes: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(bytes);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    /// The usual text fields of a valid person form.
    pub fn person(self, category: &str, name: &str, contact: &str) -> Self {
        self.text("category", category)
            .text("name", name)
            .text("contact", contact)
            .text("description", "")
            .text("address", "")
            .text("created", "")
    }

    fn finish(mut self) -> Vec<u8> {
        self.body
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        self.body
    }
}

/// A valid 4x4 PNG.
pub fn tiny_png() -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    image::RgbImage::new(4, 4)
        .write_to(&mut buf, image::ImageFormat::Png)
        .expect("png encoding should succeed");
    buf.into_inner()
}

// ---------------------------------------------------------------------------
// Seeding
// ---------------------------------------------------------------------------

/// Create a user with the given role and return it with a valid access token.
pub async fn create_user(pool: &PgPool, username: &str, role: &str) -> (User, String) {
    let input = CreateUser {
        username: username.to_string(),
        email: format!("{username}@test.com"),
        password_hash: hash_password(TEST_PASSWORD).expect("hashing should succeed"),
        role: Some(role.to_string()),
    };
    let user = UserRepo::create(pool, &input)
        .await
        .expect("user creation should succeed");
    let token = token_for(&user);
    (user, token)
}

/// Block logins for a user, as an operator would in the database.
pub async fn deactivate_user(pool: &PgPool, user_id: DbId) {
    sqlx::query("UPDATE users SET is_active = false WHERE id = $1")
        .bind(user_id)
        .execute(pool)
        .await
        .expect("deactivation should succeed");
}

pub async fn image_count(pool: &PgPool, person_id: DbId) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM images WHERE person_id = $1")
        .bind(person_id)
        .fetch_one(pool)
        .await
        .expect("image count query should succeed")
}

pub fn token_for(user: &User) -> String {
    let config = test_config(Path::new("unused"));
    generate_access_token(user.id, &user.role, &config.jwt).expect("token generation should succeed")
}

pub async fn create_category(pool: &PgPool, slug: &str) {
    let input = CreateCategory {
        slug: slug.to_string(),
        name: slug.to_uppercase(),
    };
    CategoryRepo::create(pool, &input)
        .await
        .expect("category creation should succeed");
}

/// Insert a person directly, created `minutes_ago` minutes before now.
pub async fn create_person(
    pool: &PgPool,
    owner: DbId,
    category: &str,
    contact: &str,
    description: &str,
    minutes_ago: i64,
) -> Person {
    create_person_with_images(pool, owner, category, contact, description, minutes_ago, &[]).await
}

pub async fn create_person_with_images(
    pool: &PgPool,
    owner: DbId,
    category: &str,
    contact: &str,
    description: &str,
    minutes_ago: i64,
    image_names: &[&str],
) -> Person {
    let input = CreatePerson {
        user_id: owner,
        category_slug: category.to_string(),
        name: format!("Person {contact}"),
        contact: contact.to_string(),
        description: description.to_string(),
        address: None,
        created: Utc::now() - Duration::minutes(minutes_ago),
    };
    let images: Vec<NewImage> = image_names
        .iter()
        .map(|name| NewImage {
            file_path: format!("images/{name}.png"),
            checksum: format!("{name:0>64}"),
        })
        .collect();
    PersonRepo::create_with_images(pool, &input, &images)
        .await
        .expect("person creation should succeed")
        .0
}
