//! Customers repository

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::customer::{Customer, CustomerRow, CustomerWithTaxi},
};

#[derive(Clone)]
pub struct CustomersRepository {
    pool: Pool<Postgres>,
}

impl CustomersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List customers with their first taxi, newest first
    pub async fn list(&self, purchased_only: bool) -> AppResult<Vec<CustomerWithTaxi>> {
        let query = format!(
            r#"
            SELECT c.*, t.taxi_code AS first_taxi_code, t.plate_number AS first_taxi_plate
            FROM customers c
            LEFT JOIN taxis t ON t.id = c.first_taxi_id
            {}
            ORDER BY c.created_at DESC
            "#,
            if purchased_only { "WHERE c.has_purchased = TRUE" } else { "" }
        );

        let rows = sqlx::query_as::<_, CustomerRow>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(CustomerWithTaxi::from).collect())
    }

    /// Get customer by LINE user id
    pub async fn get(&self, line_user_id: &str) -> AppResult<Option<Customer>> {
        let customer =
            sqlx::query_as::<_, Customer>("SELECT * FROM customers WHERE line_user_id = $1")
                .bind(line_user_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(customer)
    }

    /// Set purchase flag and/or note; `None` keeps the stored value
    pub async fn update_purchase(
        &self,
        line_user_id: &str,
        has_purchased: Option<bool>,
        purchase_note: Option<Option<&str>>,
    ) -> AppResult<Customer> {
        sqlx::query_as::<_, Customer>(
            r#"
            UPDATE customers
            SET has_purchased = COALESCE($2, has_purchased),
                purchase_note = CASE WHEN $3 THEN $4 ELSE purchase_note END,
                updated_at = NOW()
            WHERE line_user_id = $1
            RETURNING *
            "#,
        )
        .bind(line_user_id)
        .bind(has_purchased)
        .bind(purchase_note.is_some())
        .bind(purchase_note.flatten())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Customer not found".to_string()))
    }
}
