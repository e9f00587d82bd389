//! Category repository implementation

use sqlx::PgPool;
use uuid::Uuid;
use crate::models::category::{Category, CategoryRequest};
use crate::utils::errors::SeminarHubError;

const CATEGORY_COLUMNS: &str = "id, name, description, icon_name, color_code, display_order, is_active, created_at";

#[derive(Debug, Clone)]
pub struct CategoryRepository {
    pool: PgPool,
}

fn map_duplicate(name: &str) -> impl FnOnce(sqlx::Error) -> SeminarHubError + '_ {
    move |e| {
        if let sqlx::Error::Database(db_err) = &e {
            if db_err.is_unique_violation() {
                return SeminarHubError::DuplicateName(name.to_string());
            }
        }
        SeminarHubError::from(e)
    }
}

impl CategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new category
    pub async fn create(&self, category: Category) -> Result<Category, SeminarHubError> {
        let name = category.name.clone();

        let category = sqlx::query_as::<_, Category>(&format!(
            r#"
            INSERT INTO categories (id, name, description, icon_name, color_code, display_order, is_active, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            CATEGORY_COLUMNS
        ))
        .bind(category.id)
        .bind(category.name)
        .bind(category.description)
        .bind(category.icon_name)
        .bind(category.color_code)
        .bind(category.display_order)
        .bind(category.is_active)
        .bind(category.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_duplicate(&name))?;

        Ok(category)
    }

    /// Find category by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>, SeminarHubError> {
        let category = sqlx::query_as::<_, Category>(&format!("SELECT {} FROM categories WHERE id = $1", CATEGORY_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(category)
    }

    /// Update category
    pub async fn update(&self, id: Uuid, request: &CategoryRequest) -> Result<Option<Category>, SeminarHubError> {
        let category = sqlx::query_as::<_, Category>(&format!(
            r#"
            UPDATE categories
            SET name = $2,
                description = $3,
                icon_name = $4,
                color_code = $5,
                display_order = $6,
                is_active = $7
            WHERE id = $1
            RETURNING {}
            "#,
            CATEGORY_COLUMNS
        ))
        .bind(id)
        .bind(&request.name)
        .bind(&request.description)
        .bind(&request.icon_name)
        .bind(&request.color_code)
        .bind(request.display_order)
        .bind(request.is_active)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_duplicate(&request.name))?;

        Ok(category)
    }

    /// Activate or deactivate a category
    pub async fn set_active(&self, id: Uuid, active: bool) -> Result<Option<Category>, SeminarHubError> {
        let category = sqlx::query_as::<_, Category>(&format!(
            "UPDATE categories SET is_active = $2 WHERE id = $1 RETURNING {}",
            CATEGORY_COLUMNS
        ))
        .bind(id)
        .bind(active)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    /// Check whether a category name is taken
    pub async fn name_exists(&self, name: &str) -> Result<bool, SeminarHubError> {
        let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM categories WHERE name = $1)")
            .bind(name)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists.0)
    }

    /// List categories in display order
    pub async fn list(&self, active_only: bool) -> Result<Vec<Category>, SeminarHubError> {
        let categories = sqlx::query_as::<_, Category>(&format!(
            r#"
            SELECT {}
            FROM categories
            WHERE ($1 = false OR is_active = true)
            ORDER BY display_order ASC, name ASC
            "#,
            CATEGORY_COLUMNS
        ))
        .bind(active_only)
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    /// Count total categories
    pub async fn count(&self) -> Result<i64, SeminarHubError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM categories")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }
}
