//! Group membership roles.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Role {
    #[default]
    Member,
    Officer,
    Leader,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Member, Role::Officer, Role::Leader];

    pub fn code(&self) -> &'static str {
        match self {
            Role::Member => "member",
            Role::Officer => "officer",
            Role::Leader => "leader",
        }
    }

    pub fn from_code(code: &str) -> Option<Role> {
        Role::ALL.iter().copied().find(|r| r.code() == code)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
