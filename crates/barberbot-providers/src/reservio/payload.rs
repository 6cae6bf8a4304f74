//! Reservio JSON:API documents.
//!
//! Responses wrap everything in `{"data": ...}` with the fields of interest
//! under `attributes`. Request bodies for clients and bookings nest related
//! resources under `relationships`.

use barberbot_core::time::to_local_iso;
use barberbot_core::{BookingRequest, CustomerDetails};
use chrono::FixedOffset;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub(crate) struct Document<T> {
    pub data: T,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Item<A> {
    pub id: String,
    pub attributes: A,
}

/// Only the id of a resource (client search results, created clients).
#[derive(Debug, Deserialize)]
pub(crate) struct Identified {
    pub id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BusinessAttributes {
    pub name: String,
    pub street: Option<String>,
    pub city: Option<String>,
    pub zip: Option<String>,
    pub country: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub web: Option<String>,
    pub settings: Option<BusinessSettings>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BusinessSettings {
    pub timezone: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ServiceAttributes {
    pub name: String,
    pub description: Option<String>,
    /// Seconds.
    pub duration: Option<u64>,
    pub cost: Option<f64>,
    pub currency: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResourceAttributes {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SlotAttributes {
    pub start: String,
    pub end: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BookingAttributes {
    pub state: Option<String>,
    pub cost: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct Relation<T> {
    pub data: T,
}

#[derive(Debug, Serialize)]
pub struct Identifier {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub id: String,
}

#[derive(Debug, Serialize)]
pub struct ClientData {
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub attributes: ClientAttributes,
}

#[derive(Debug, Serialize)]
pub struct ClientAttributes {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl ClientData {
    fn from_customer(customer: &CustomerDetails, id: Option<String>) -> Self {
        Self {
            kind: "client",
            id,
            attributes: ClientAttributes {
                name: customer.full_name(),
                email: customer.email.clone(),
                phone: customer.phone.clone(),
            },
        }
    }
}

/// Body of `POST /businesses/{id}/clients`.
pub type ClientPayload = Relation<ClientData>;

pub fn client_payload(customer: &CustomerDetails) -> ClientPayload {
    Relation {
        data: ClientData::from_customer(customer, None),
    }
}

/// Body of `POST /businesses/{id}/bookings`.
#[derive(Debug, Serialize)]
pub struct BookingPayload {
    pub data: BookingData,
}

#[derive(Debug, Serialize)]
pub struct BookingData {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub attributes: BookingDataAttributes,
    pub relationships: BookingRelationships,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingDataAttributes {
    pub booked_client_name: String,
    pub note: String,
    pub via: &'static str,
}

#[derive(Debug, Serialize)]
pub struct BookingRelationships {
    pub event: Relation<EventData>,
    pub client: Relation<ClientData>,
}

#[derive(Debug, Serialize)]
pub struct EventData {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub attributes: EventAttributes,
    pub relationships: EventRelationships,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventAttributes {
    pub start: String,
    pub end: String,
    pub name: String,
    pub event_type: &'static str,
}

#[derive(Debug, Serialize)]
pub struct EventRelationships {
    pub service: Relation<Identifier>,
}

impl BookingPayload {
    /// Builds the nested booking document; times are encoded in `offset`.
    pub fn new(request: &BookingRequest, offset: &FixedOffset) -> Self {
        let client_name = request.customer.full_name();
        Self {
            data: BookingData {
                kind: "booking",
                attributes: BookingDataAttributes {
                    booked_client_name: client_name.clone(),
                    note: request.note.clone().unwrap_or_default(),
                    via: "application",
                },
                relationships: BookingRelationships {
                    event: Relation {
                        data: EventData {
                            kind: "event",
                            attributes: EventAttributes {
                                start: to_local_iso(request.start, offset),
                                end: to_local_iso(request.end(), offset),
                                name: client_name,
                                event_type: "appointment",
                            },
                            relationships: EventRelationships {
                                service: Relation {
                                    data: Identifier {
                                        kind: "service",
                                        id: request.service.id.clone(),
                                    },
                                },
                            },
                        },
                    },
                    client: Relation {
                        data: ClientData::from_customer(
                            &request.customer,
                            request.customer_id.clone(),
                        ),
                    },
                },
            },
        }
    }
}
