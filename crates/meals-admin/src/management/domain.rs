use serde::{Deserialize, Serialize};
use std::fmt;

/// Town or city portion of a postal address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locality {
    pub name: String,
    pub postal_code: String,
    pub state: String,
    pub country: String,
}

/// Postal address for volunteers and customers.
///
/// `raw` is the address exactly as staff typed it and is what exports and listings show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub street_number: String,
    #[serde(default)]
    pub route: String,
    #[serde(default)]
    pub locality: Option<Locality>,
    pub raw: String,
}

impl Address {
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self {
            street_number: String::new(),
            route: String::new(),
            locality: None,
            raw: raw.into(),
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
