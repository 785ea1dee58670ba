use std::env;

use crate::errors::domain::{DomainError, InfraErrorKind};

/// Database profile enum for different environments
#[derive(Debug, Clone, PartialEq)]
pub enum DbProfile {
    /// Production Postgres database
    Prod,
    /// Test Postgres database - enforces safety rules
    Test,
    /// In-memory SQLite, used by integration tests
    InMemory,
}

/// Builds a database URL from environment variables based on profile
pub fn db_url(profile: DbProfile) -> Result<String, DomainError> {
    match profile {
        DbProfile::InMemory => Ok("sqlite::memory:".to_string()),
        DbProfile::Prod => {
            let db_name = must_var("PROD_DB")?;
            postgres_url(&db_name)
        }
        DbProfile::Test => {
            let db_name = must_var("TEST_DB")?;
            // Enforce safety: test DB must end with "_test"
            if !db_name.ends_with("_test") {
                return Err(config_err(format!(
                    "Test profile requires database name to end with '_test', but got: '{db_name}'"
                )));
            }
            postgres_url(&db_name)
        }
    }
}

fn postgres_url(db_name: &str) -> Result<String, DomainError> {
    let host = env::var("POSTGRES_HOST").unwrap_or_else(|_| "localhost".to_string());
    let port = env::var("POSTGRES_PORT").unwrap_or_else(|_| "5432".to_string());
    let username = must_var("APP_DB_USER")?;
    let password = must_var("APP_DB_PASSWORD")?;

    Ok(format!(
        "postgresql://{username}:{password}@{host}:{port}/{db_name}"
    ))
}

/// Get required environment variable or return error
fn must_var(name: &str) -> Result<String, DomainError> {
    env::var(name).map_err(|_| {
        config_err(format!(
            "Required environment variable '{name}' is not set"
        ))
    })
}

fn config_err(detail: String) -> DomainError {
    DomainError::infra(InfraErrorKind::Config, detail)
}

#[cfg(test)]
mod tests {
    use super::{db_url, DbProfile};

    #[test]
    fn in_memory_profile_needs_no_env() {
        assert_eq!(db_url(DbProfile::InMemory).unwrap(), "sqlite::memory:");
    }
}
