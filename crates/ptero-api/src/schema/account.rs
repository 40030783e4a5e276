use serde::{Deserialize, Serialize};

use super::Schema;

/// The account that owns the client API key (`object: "user"`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AccountDetails {
    pub id: u64,
    pub admin: bool,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub language: String,
}

impl Schema for AccountDetails {
    const OBJECT: &'static str = "user";
    type Entity = Self;
}
