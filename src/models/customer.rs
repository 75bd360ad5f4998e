//! Customer model and registration types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// One unique rider, keyed by their LINE user id
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Customer {
    pub line_user_id: String,
    pub display_name: Option<String>,
    pub picture_url: Option<String>,
    /// Taxi that produced the rider's first scan
    pub first_taxi_id: Option<Uuid>,
    pub total_scans: i32,
    pub has_purchased: bool,
    pub purchase_note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Short taxi reference embedded in customer listings
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FirstTaxi {
    pub taxi_code: String,
    pub plate_number: Option<String>,
}

/// Customer row joined with its first taxi
#[derive(Debug, Clone, FromRow)]
pub struct CustomerRow {
    #[sqlx(flatten)]
    pub customer: Customer,
    pub first_taxi_code: Option<String>,
    pub first_taxi_plate: Option<String>,
}

/// Customer as listed in the admin dashboard
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CustomerWithTaxi {
    #[serde(flatten)]
    pub customer: Customer,
    pub first_taxi: Option<FirstTaxi>,
}

impl From<CustomerRow> for CustomerWithTaxi {
    fn from(row: CustomerRow) -> Self {
        let first_taxi = row.first_taxi_code.map(|taxi_code| FirstTaxi {
            taxi_code,
            plate_number: row.first_taxi_plate,
        });
        Self {
            customer: row.customer,
            first_taxi,
        }
    }
}

/// Query parameters for listing customers
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct CustomerQuery {
    /// Only return customers marked as purchased
    #[serde(default)]
    pub purchased: bool,
}

/// Purchase tagging request
///
/// An absent `purchase_note` keeps the stored note, an explicit `null` clears it.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateCustomer {
    pub has_purchased: Option<bool>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub purchase_note: Option<Option<String>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CustomerResponse {
    pub customer: Customer,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CustomerListResponse {
    pub customers: Vec<CustomerWithTaxi>,
}

/// Profile fields written on every registration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisitorProfile {
    pub line_user_id: String,
    pub display_name: Option<String>,
    pub picture_url: Option<String>,
}

/// Mini-app registration request
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterVisitor {
    /// LINE user id from the LIFF profile
    #[serde(default, alias = "lineUserId")]
    pub visitor_id: Option<String>,
    pub display_name: Option<String>,
    #[serde(alias = "pictureUrl")]
    #[validate(url(message = "Invalid avatar URL"))]
    pub avatar_url: Option<String>,
    /// Code of the scanned taxi, from the `taxi` query parameter
    pub taxi_code: Option<String>,
    /// Correlation token, from the `scan` query parameter.
    /// Empty or malformed values are treated as absent.
    #[serde(default, deserialize_with = "lenient_scan_token")]
    #[schema(value_type = Option<String>)]
    pub scan_token: Option<Uuid>,
    /// LIFF ID token, required when LINE verification is configured
    pub id_token: Option<String>,
}

fn lenient_scan_token<'de, D>(deserializer: D) -> Result<Option<Uuid>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|token| Uuid::parse_str(token.trim()).ok()))
}

/// Mini-app registration response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub success: bool,
    pub is_new_customer: bool,
    pub message: String,
    /// Messaging destination the mini-app forwards the rider to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_customer_note_absent_vs_null() {
        let keep: UpdateCustomer = serde_json::from_str(r#"{"has_purchased": false}"#).unwrap();
        assert_eq!(keep.purchase_note, None);

        let clear: UpdateCustomer = serde_json::from_str(r#"{"purchase_note": null}"#).unwrap();
        assert_eq!(clear.purchase_note, Some(None));

        let set: UpdateCustomer =
            serde_json::from_str(r#"{"has_purchased": true, "purchase_note": "2 nights"}"#).unwrap();
        assert_eq!(set.has_purchased, Some(true));
        assert_eq!(set.purchase_note, Some(Some("2 nights".to_string())));
    }

    #[test]
    fn test_register_visitor_accepts_line_field_names() {
        let req: RegisterVisitor = serde_json::from_str(
            r#"{"lineUserId": "U123", "displayName": "Somchai", "pictureUrl": "https://img/p.png", "taxiCode": "taxi001"}"#,
        )
        .unwrap();
        assert_eq!(req.visitor_id.as_deref(), Some("U123"));
        assert_eq!(req.avatar_url.as_deref(), Some("https://img/p.png"));
        assert_eq!(req.taxi_code.as_deref(), Some("taxi001"));
        assert!(req.scan_token.is_none());
    }

    #[test]
    fn test_register_visitor_ignores_unusable_scan_token() {
        for body in [
            r#"{"lineUserId": "U1", "taxiCode": "TAXI001", "scanToken": ""}"#,
            r#"{"lineUserId": "U1", "taxiCode": "TAXI001", "scanToken": "not-a-token"}"#,
            r#"{"lineUserId": "U1", "taxiCode": "TAXI001", "scanToken": null}"#,
        ] {
            let req: RegisterVisitor = serde_json::from_str(body).unwrap();
            assert_eq!(req.visitor_id.as_deref(), Some("U1"));
            assert!(req.scan_token.is_none(), "{}", body);
        }

        let token = Uuid::new_v4();
        let req: RegisterVisitor = serde_json::from_str(&format!(
            r#"{{"lineUserId": "U1", "scanToken": "{}"}}"#,
            token
        ))
        .unwrap();
        assert_eq!(req.scan_token, Some(token));
    }

    #[test]
    fn test_register_response_shape() {
        let body = serde_json::to_value(RegisterResponse {
            success: true,
            is_new_customer: true,
            message: "Customer registered".to_string(),
            redirect_url: None,
        })
        .unwrap();
        assert_eq!(body["isNewCustomer"], true);
        assert!(body.get("redirectUrl").is_none());
    }

    #[test]
    fn test_first_taxi_from_join_row() {
        let now = Utc::now();
        let row = CustomerRow {
            customer: Customer {
                line_user_id: "U1".into(),
                display_name: None,
                picture_url: None,
                first_taxi_id: None,
                total_scans: 1,
                has_purchased: false,
                purchase_note: None,
                created_at: now,
                updated_at: now,
            },
            first_taxi_code: None,
            first_taxi_plate: Some("ignored".into()),
        };
        let listed = CustomerWithTaxi::from(row);
        assert!(listed.first_taxi.is_none());
        let body = serde_json::to_value(&listed).unwrap();
        assert_eq!(body["line_user_id"], "U1");
        assert!(body["first_taxi"].is_null());
    }
}
