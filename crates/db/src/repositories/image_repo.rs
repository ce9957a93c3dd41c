//! Repository for the `images` table.

use roster_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::image::{Image, NewImage};

const COLUMNS: &str = "id, person_id, file_path, checksum, created_at";

/// Provides CRUD operations for person images.
pub struct ImageRepo;

impl ImageRepo {
    /// All images of a person in insertion order (ascending id).
    ///
    /// The first element is the person's primary image.
    pub async fn list_by_person(pool: &PgPool, person_id: DbId) -> Result<Vec<Image>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM images WHERE person_id = $1 ORDER BY id ASC");
        sqlx::query_as::<_, Image>(&query)
            .bind(person_id)
            .fetch_all(pool)
            .await
    }

    /// Primary images (lowest id per person) for a batch of persons.
    pub async fn primaries_for(
        pool: &PgPool,
        person_ids: &[DbId],
    ) -> Result<Vec<Image>, sqlx::Error> {
        if person_ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!(
            "SELECT DISTINCT ON (person_id) {COLUMNS} FROM images
             WHERE person_id = ANY($1)
             ORDER BY person_id, id ASC"
        );
        sqlx::query_as::<_, Image>(&query)
            .bind(person_ids)
            .fetch_all(pool)
            .await
    }

    /// File paths of every image belonging to persons in a category.
    pub async fn paths_for_category(pool: &PgPool, slug: &str) -> Result<Vec<String>, sqlx::Error> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT i.file_path FROM images i
             JOIN persons p ON p.id = i.person_id
             WHERE p.category_slug = $1",
        )
        .bind(slug)
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(|(path,)| path).collect())
    }

    // -----------------------------------------------------------------------
    // Transaction helpers
    // -----------------------------------------------------------------------

    /// Insert an image attached to `person_id` within an existing transaction.
    pub(crate) async fn insert_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        person_id: DbId,
        input: &NewImage,
    ) -> Result<Image, sqlx::Error> {
        let query = format!(
            "INSERT INTO images (person_id, file_path, checksum)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Image>(&query)
            .bind(person_id)
            .bind(&input.file_path)
            .bind(&input.checksum)
            .fetch_one(&mut **tx)
            .await
    }

    /// Point an existing image at a new file and (re-)attach it to `person_id`.
    ///
    /// Returns the previous file path, or `None` if the image does not exist.
    pub(crate) async fn replace_file_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        image_id: DbId,
        person_id: DbId,
        input: &NewImage,
    ) -> Result<Option<String>, sqlx::Error> {
        let row: Option<(String,)> = sqlx::query_as(
            "WITH previous AS (
                 SELECT id, file_path FROM images WHERE id = $1 FOR UPDATE
             )
             UPDATE images SET person_id = $2, file_path = $3, checksum = $4
             FROM previous
             WHERE images.id = previous.id
             RETURNING previous.file_path",
        )
        .bind(image_id)
        .bind(person_id)
        .bind(&input.file_path)
        .bind(&input.checksum)
        .fetch_optional(&mut **tx)
        .await?;
        Ok(row.map(|r| r.0))
    }
}
