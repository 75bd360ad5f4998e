//! Taxis repository

use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::taxi::{CreateTaxi, Taxi, UpdateTaxi},
};

#[derive(Clone)]
pub struct TaxisRepository {
    pool: Pool<Postgres>,
}

impl TaxisRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List taxis, newest first
    pub async fn list(&self, active_only: bool) -> AppResult<Vec<Taxi>> {
        let query = if active_only {
            "SELECT * FROM taxis WHERE is_active = TRUE ORDER BY created_at DESC"
        } else {
            "SELECT * FROM taxis ORDER BY created_at DESC"
        };

        let rows = sqlx::query_as::<_, Taxi>(query)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Get taxi by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Taxi> {
        sqlx::query_as::<_, Taxi>("SELECT * FROM taxis WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Taxi not found".to_string()))
    }

    /// Get taxi by its normalized code
    pub async fn get_by_code(&self, code: &str) -> AppResult<Option<Taxi>> {
        let taxi = sqlx::query_as::<_, Taxi>("SELECT * FROM taxis WHERE taxi_code = $1")
            .bind(code)
            .fetch_optional(&self.pool)
            .await?;
        Ok(taxi)
    }

    /// Create a taxi; `code` must already be normalized
    pub async fn create(&self, code: &str, data: &CreateTaxi) -> AppResult<Taxi> {
        sqlx::query_as::<_, Taxi>(
            r#"
            INSERT INTO taxis (taxi_code, plate_number, driver_name, notes, is_active)
            VALUES ($1, $2, $3, $4, TRUE)
            RETURNING *
            "#,
        )
        .bind(code)
        .bind(&data.plate_number)
        .bind(&data.driver_name)
        .bind(&data.notes)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::conflict_on_unique(e, "Taxi code already exists"))
    }

    /// Update the mutable fields of a taxi
    pub async fn update(&self, id: Uuid, data: &UpdateTaxi) -> AppResult<Taxi> {
        let mut sets = Vec::new();
        let mut idx = 1;

        macro_rules! add_field {
            ($field:expr, $name:expr) => {
                if $field.is_some() {
                    sets.push(format!("{} = ${}", $name, idx));
                    idx += 1;
                }
            };
        }

        add_field!(data.plate_number, "plate_number");
        add_field!(data.driver_name, "driver_name");
        add_field!(data.notes, "notes");
        add_field!(data.is_active, "is_active");

        if sets.is_empty() {
            return self.get_by_id(id).await;
        }

        let query = format!(
            "UPDATE taxis SET {} WHERE id = ${} RETURNING *",
            sets.join(", "),
            idx
        );

        let mut builder = sqlx::query_as::<_, Taxi>(&query);

        macro_rules! bind_field {
            ($field:expr) => {
                if let Some(ref val) = $field {
                    builder = builder.bind(val);
                }
            };
        }

        bind_field!(data.plate_number);
        bind_field!(data.driver_name);
        bind_field!(data.notes);
        bind_field!(data.is_active);

        builder
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Taxi not found".to_string()))
    }

    /// Delete a taxi; its scans and customers keep their rows with the reference cleared
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM taxis WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Taxi not found".to_string()));
        }
        Ok(())
    }
}
