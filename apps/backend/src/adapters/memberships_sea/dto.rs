//! DTOs for membership mutations.

#[derive(Debug, Clone)]
pub struct MembershipCreate {
    pub group_id: i64,
    pub player_id: i64,
    /// Role code, e.g. "member".
    pub role: String,
}
