//! Authenticated affiliate

use serde::Serialize;

use super::tier::Tier;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: u64,
    pub username: String,
    pub display_name: String,
    pub email: String,
    pub tier: Tier,
}

impl User {
    /// The single demo affiliate every valid key resolves to.
    pub fn demo() -> Self {
        Self {
            id: 1,
            username: "john_demo".to_string(),
            display_name: "John Demo".to_string(),
            email: "john.demo@affiliateboss.com".to_string(),
            tier: Tier::Premium,
        }
    }
}
