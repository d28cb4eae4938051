//! Shipping address value object.

use serde::{Deserialize, Serialize};

/// A Brazilian shipping address.
///
/// Stored as a JSON blob on the order row (camelCase keys), never as its own
/// entity. All fields except `complement` are required; `zip_code` is a CEP
/// (`NNNNN-NNN` or `NNNNNNNN`). Validation happens at checkout time, not
/// here - this type is plain data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub street: String,
    pub number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complement: Option<String>,
    pub neighborhood: String,
    pub city: String,
    /// Two-letter state code (e.g. "SP").
    pub state: String,
    /// CEP, with or without the dash.
    pub zip_code: String,
}

impl ShippingAddress {
    /// Per-field input bounds, enforced as the user types.
    pub const MAX_STREET: usize = 100;
    pub const MAX_NUMBER: usize = 10;
    pub const MAX_COMPLEMENT: usize = 50;
    pub const MAX_NEIGHBORHOOD: usize = 50;
    pub const MAX_CITY: usize = 50;
    pub const MAX_STATE: usize = 2;
    pub const MAX_ZIP_CODE: usize = 9;
}
