use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

/// A product record as stored: column name to value, absent columns omitted
pub type Record = Map<String, JsonValue>;

/// Request body for PUT and POST
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Product {
    /// Must match the path id on PUT, ignored on POST
    pub id: Option<String>,
    #[serde(flatten)]
    pub fields: ProductFields,
}

/// The non-key columns written by an upsert
///
/// Values are kept as whatever JSON the client sent; a string price or a
/// numeric name is stored and returned unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ProductFields {
    pub name: Option<JsonValue>,
    pub price: Option<JsonValue>,
}

impl ProductFields {
    /// Build the stored record for `id`, leaving out columns that are unset
    pub fn to_record(&self, id: &str) -> Record {
        let mut record = Record::new();
        record.insert("id".to_string(), JsonValue::from(id));
        if let Some(name) = &self.name {
            record.insert("name".to_string(), name.clone());
        }
        if let Some(price) = &self.price {
            record.insert("price".to_string(), price.clone());
        }
        record
    }
}

/// Success body for PUT, POST and DELETE
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct MessageResponse {
    pub message: String,
}
