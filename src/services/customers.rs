//! Customer listing and purchase tagging

use crate::{
    error::{AppError, AppResult},
    models::customer::{Customer, CustomerWithTaxi, UpdateCustomer},
    repository::Repository,
};

const MAX_PURCHASE_NOTE_LEN: usize = 2000;

#[derive(Clone)]
pub struct CustomersService {
    repository: Repository,
}

impl CustomersService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List customers, optionally only those who purchased
    pub async fn list(&self, purchased_only: bool) -> AppResult<Vec<CustomerWithTaxi>> {
        self.repository.customers.list(purchased_only).await
    }

    /// Set the purchase flag and/or note of a customer
    pub async fn update_purchase(&self, line_user_id: &str, data: &UpdateCustomer) -> AppResult<Customer> {
        if let Some(Some(note)) = &data.purchase_note {
            if note.chars().count() > MAX_PURCHASE_NOTE_LEN {
                return Err(AppError::Validation(format!(
                    "Purchase note must be at most {} characters",
                    MAX_PURCHASE_NOTE_LEN
                )));
            }
        }

        let note = data.purchase_note.as_ref().map(|n| n.as_deref());
        let customer = self
            .repository
            .customers
            .update_purchase(line_user_id, data.has_purchased, note)
            .await?;

        tracing::info!(
            line_user_id = %customer.line_user_id,
            has_purchased = customer.has_purchased,
            "Customer purchase status updated"
        );
        Ok(customer)
    }
}
