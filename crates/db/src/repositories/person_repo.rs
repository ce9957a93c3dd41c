//! Repository for the `persons` table.

use roster_core::types::DbId;
use sqlx::postgres::PgArguments;
use sqlx::query::QueryAs;
use sqlx::{PgPool, Postgres};

use crate::models::image::{Image, ImageChange, NewImage};
use crate::models::person::{CreatePerson, Person, PersonFilter, UpdatePerson};
use crate::repositories::ImageRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, category_slug, name, contact, description, address, \
                       created, updated_at";

/// Newest entries first; id breaks ties so paging is stable.
const ORDER_BY: &str = "ORDER BY created DESC, id DESC";

/// Provides CRUD and listing operations for persons.
pub struct PersonRepo;

impl PersonRepo {
    /// Insert a person together with its images in one transaction.
    pub async fn create_with_images(
        pool: &PgPool,
        input: &CreatePerson,
        images: &[NewImage],
    ) -> Result<(Person, Vec<Image>), sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO persons (user_id, category_slug, name, contact, description, address, created)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        let person = sqlx::query_as::<_, Person>(&query)
            .bind(input.user_id)
            .bind(&input.category_slug)
            .bind(&input.name)
            .bind(&input.contact)
            .bind(&input.description)
            .bind(&input.address)
            .bind(input.created)
            .fetch_one(&mut *tx)
            .await?;

        let mut created = Vec::with_capacity(images.len());
        for image in images {
            created.push(ImageRepo::insert_in_tx(&mut tx, person.id, image).await?);
        }

        tx.commit().await?;
        Ok((person, created))
    }

    /// Find a person by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Person>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM persons WHERE id = $1");
        sqlx::query_as::<_, Person>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// One page of persons matching `filter`.
    pub async fn list(
        pool: &PgPool,
        filter: &PersonFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Person>, sqlx::Error> {
        let (condition, next) = condition(filter);
        let query = format!(
            "SELECT {COLUMNS} FROM persons WHERE {condition} {ORDER_BY}
             LIMIT ${next} OFFSET ${}",
            next + 1
        );
        bind_filter(sqlx::query_as::<_, Person>(&query), filter)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Every person matching `filter`, unpaged.
    pub async fn list_all(pool: &PgPool, filter: &PersonFilter) -> Result<Vec<Person>, sqlx::Error> {
        let (condition, _) = condition(filter);
        let query = format!("SELECT {COLUMNS} FROM persons WHERE {condition} {ORDER_BY}");
        bind_filter(sqlx::query_as::<_, Person>(&query), filter)
            .fetch_all(pool)
            .await
    }

    /// Number of persons matching `filter`.
    pub async fn count(pool: &PgPool, filter: &PersonFilter) -> Result<i64, sqlx::Error> {
        let (condition, _) = condition(filter);
        let query = format!("SELECT COUNT(*) FROM persons WHERE {condition}");
        let row: (i64,) = bind_filter(sqlx::query_as::<_, (i64,)>(&query), filter)
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }

    /// Replace a person's fields and apply image changes in one transaction.
    ///
    /// Images not mentioned in `changes` are left attached. Returns the updated
    /// person and the file paths that replaced images no longer use, or `None`
    /// if the person does not exist.
    pub async fn update_with_images(
        pool: &PgPool,
        id: DbId,
        input: &UpdatePerson,
        changes: &[ImageChange],
    ) -> Result<Option<(Person, Vec<String>)>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE persons SET
                category_slug = $2,
                name = $3,
                contact = $4,
                description = $5,
                address = $6,
                created = $7
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let person = sqlx::query_as::<_, Person>(&query)
            .bind(id)
            .bind(&input.category_slug)
            .bind(&input.name)
            .bind(&input.contact)
            .bind(&input.description)
            .bind(&input.address)
            .bind(input.created)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(person) = person else {
            return Ok(None);
        };

        let mut replaced = Vec::new();
        for change in changes {
            match change.replaces {
                Some(image_id) => {
                    match ImageRepo::replace_file_in_tx(&mut tx, image_id, person.id, &change.file)
                        .await?
                    {
                        Some(old_path) => replaced.push(old_path),
                        None => {
                            tracing::warn!(
                                image_id,
                                person_id = person.id,
                                "Image to replace no longer exists, attaching as new",
                            );
                            ImageRepo::insert_in_tx(&mut tx, person.id, &change.file).await?;
                        }
                    }
                }
                None => {
                    ImageRepo::insert_in_tx(&mut tx, person.id, &change.file).await?;
                }
            }
        }

        tx.commit().await?;
        Ok(Some((person, replaced)))
    }

    /// Permanently delete a person; its images cascade. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM persons WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// SQL condition for `filter` and the index of the next free bind parameter.
fn condition(filter: &PersonFilter) -> (&'static str, usize) {
    match filter {
        PersonFilter::All => ("TRUE", 1),
        PersonFilter::Matching(_) => ("(contact ILIKE $1 OR description ILIKE $1)", 2),
        PersonFilter::CreatedSince(_) => ("created >= $1", 2),
        PersonFilter::Category(_) => ("category_slug = $1", 2),
    }
}

/// Bind the parameter referenced by [`condition`], if any.
fn bind_filter<'q, O>(
    query: QueryAs<'q, Postgres, O, PgArguments>,
    filter: &PersonFilter,
) -> QueryAs<'q, Postgres, O, PgArguments> {
    match filter {
        PersonFilter::All => query,
        PersonFilter::Matching(pattern) => query.bind(pattern.clone()),
        PersonFilter::CreatedSince(since) => query.bind(*since),
        PersonFilter::Category(slug) => query.bind(slug.clone()),
    }
}
