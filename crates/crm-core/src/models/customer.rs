use serde::{Deserialize, Deserializer, Serialize};

use super::{require, ValidationError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Customer {
    /// One-line summary used by list renderers
    pub fn summary(&self) -> String {
        format!("({}) {} <{}>", self.id, self.name, self.email)
    }
}

/// Response of `GET /customers`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerList {
    #[serde(default)]
    pub customers: Vec<Customer>,
}

/// Body of `POST /customers` and `PUT /customers/:id`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerInput {
    pub name: String,
    pub email: String,
}

impl CustomerInput {
    /// Build a payload, rejecting blank fields.
    pub fn new(name: &str, email: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            name: require("name", name)?,
            email: require("email", email)?,
        })
    }
}

/// Accepts ids the gateway sends either as strings or as bare integers
pub(crate) fn id_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}
