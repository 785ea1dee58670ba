//! DTOs for group mutations.

#[derive(Debug, Clone)]
pub struct GroupCreate {
    /// Sanitized name.
    pub name: String,
    pub clan_chat: Option<String>,
    pub verification_hash: String,
}

#[derive(Debug, Clone)]
pub struct GroupEdit {
    pub id: i64,
    /// Sanitized replacement name, when given.
    pub name: Option<String>,
    pub clan_chat: Option<String>,
}
