//! Reservanto request and response bodies.
//!
//! Field names follow the upstream PascalCase convention. The error flag
//! is checked separately by the client, so none of the replies model it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ProviderError, ProviderResult};

/// An id or status that upstream sends either as a number or a string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub(crate) enum Scalar {
    Int(i64),
    Text(String),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

// Replies

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct MerchantReply {
    pub result: MerchantInfo,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct MerchantInfo {
    pub id: Option<Scalar>,
    #[serde(default)]
    pub name: String,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub web: Option<String>,
    pub mailing_address: Option<MailingAddress>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct MailingAddress {
    pub street: Option<String>,
    pub city: Option<String>,
    pub zip_code: Option<String>,
    pub country: Option<String>,
}

/// A list reply. Missing `Items` is an unknown shape.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct ItemsReply<T> {
    pub items: Option<Vec<T>>,
}

impl<T> ItemsReply<T> {
    pub fn into_items(self, endpoint: &str) -> ProviderResult<Vec<T>> {
        self.items.ok_or_else(|| {
            ProviderError::invalid_response(format!("{endpoint}: reply has no Items"))
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct LocationItem {
    pub id: Scalar,
    #[serde(default)]
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct ResourceItem {
    pub id: Scalar,
    #[serde(default)]
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub description: Option<String>,
    pub location_id: Option<Scalar>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct ServiceItem {
    pub id: Scalar,
    #[serde(default)]
    pub name: String,
    pub description: Option<String>,
    /// Minutes.
    #[serde(default)]
    pub duration: u32,
    pub price: Option<f64>,
    pub currency: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct StartsReply {
    pub starts: Vec<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct LocationStartsReply {
    pub starts: Vec<LocationStart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct LocationStart {
    pub start: i64,
    pub booking_resource_id: Option<Scalar>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct CustomerItem {
    pub id: Scalar,
}

/// Customer search results come back under `Customers` or `Items`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct CustomerSearchReply {
    pub customers: Option<Vec<CustomerItem>>,
    pub items: Option<Vec<CustomerItem>>,
}

impl CustomerSearchReply {
    pub fn first_id(self) -> Option<String> {
        self.customers
            .or(self.items)
            .and_then(|list| list.into_iter().next())
            .map(|customer| customer.id.to_string())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct WrappedCustomer {
    pub result: CustomerItem,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct CustomerList {
    pub customers: Vec<CustomerItem>,
}

/// The shapes `/Customer/Create` has been seen to answer with.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum CreatedCustomer {
    Wrapped(WrappedCustomer),
    Listed(CustomerList),
    Bare(CustomerItem),
}

impl CreatedCustomer {
    pub fn into_id(self, endpoint: &str) -> ProviderResult<String> {
        let id = match self {
            Self::Wrapped(w) => Some(w.result.id),
            Self::Listed(l) => l.customers.into_iter().next().map(|c| c.id),
            Self::Bare(b) => Some(b.id),
        };
        id.map(|id| id.to_string()).ok_or_else(|| {
            ProviderError::invalid_response(format!("{endpoint}: no customer id in reply"))
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct CreateBookingReply {
    pub appointment_id: Scalar,
    pub status: Option<Scalar>,
    pub price: Option<f64>,
}

// Requests

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct LocationListRequest {
    pub only_public: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct ResourceListRequest {
    pub location_id: Option<i64>,
    pub only_public: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct StartsRequest {
    pub booking_resource_id: i64,
    pub booking_service_id: i64,
    pub interval_start: i64,
    pub interval_end: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct LocationStartsRequest {
    pub location_id: i64,
    pub booking_service_id: i64,
    pub interval_start: i64,
    pub interval_end: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct CreateBookingRequest<'a> {
    pub booking_resource_id: i64,
    pub booking_service_id: i64,
    pub customer_id: i64,
    pub booking_start: i64,
    pub customer_note: Option<&'a str>,
    pub force_confirmed: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct CancelRequest {
    pub appointment_id: i64,
    pub send_notification: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct CustomerSearchRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct CustomerCreateRequest<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: Option<&'a str>,
    pub phone: Option<&'a str>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderErrorCode;

    fn created(json: &str) -> ProviderResult<String> {
        serde_json::from_str::<CreatedCustomer>(json)
            .unwrap()
            .into_id("/Customer/Create")
    }

    #[test]
    fn created_customer_id_shapes() {
        assert_eq!(created(r#"{"Result":{"Id":41}}"#).unwrap(), "41");
        assert_eq!(created(r#"{"Customers":[{"Id":"42"}]}"#).unwrap(), "42");
        assert_eq!(created(r#"{"Id":43,"IsError":false}"#).unwrap(), "43");

        let err = created(r#"{"Customers":[]}"#).unwrap_err();
        assert_eq!(err.code(), ProviderErrorCode::InvalidResponse);
        assert!(serde_json::from_str::<CreatedCustomer>(r#"{"IsError":false}"#).is_err());
    }

    #[test]
    fn customer_search_prefers_customers_field() {
        let reply: CustomerSearchReply =
            serde_json::from_str(r#"{"Customers":[{"Id":7}],"Items":[{"Id":8}]}"#).unwrap();
        assert_eq!(reply.first_id().as_deref(), Some("7"));

        let reply: CustomerSearchReply = serde_json::from_str(r#"{"Items":[{"Id":8}]}"#).unwrap();
        assert_eq!(reply.first_id().as_deref(), Some("8"));

        let reply: CustomerSearchReply = serde_json::from_str(r#"{"IsError":false}"#).unwrap();
        assert!(reply.first_id().is_none());
    }

    #[test]
    fn missing_items_is_invalid_response() {
        let reply: ItemsReply<ServiceItem> = serde_json::from_str(r#"{"IsError":false}"#).unwrap();
        let err = reply.into_items("/BookingService/GetList").unwrap_err();
        assert_eq!(err.code(), ProviderErrorCode::InvalidResponse);
    }

    #[test]
    fn search_request_skips_absent_fields() {
        let body = serde_json::to_value(CustomerSearchRequest {
            phone: Some("+420777123456"),
            email: None,
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"Phone": "+420777123456"}));
    }
}
