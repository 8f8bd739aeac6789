//! User Repository
//!
//! Staff accounts with argon2 password hashing, adapted from the employee
//! management flow. Role values are validated here, before any write.

use shared::models::user::{ROLE_ADMIN, ROLE_STAFF};
use shared::{User, UserCreate, UserUpdate};
use surrealdb::engine::local::Db;
use surrealdb::Surreal;

use super::{BaseRepository, RepoError, RepoResult};

/// Hash a password using argon2
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    use argon2::{
        password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
        Argon2,
    };

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(password_hash.to_string())
}

/// Verify a password against a stored argon2 hash
pub fn verify_password(hash: &str, password: &str) -> Result<bool, argon2::password_hash::Error> {
    use argon2::{
        password_hash::{PasswordHash, PasswordVerifier},
        Argon2,
    };

    let parsed_hash = PasswordHash::new(hash)?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

fn validate_role(role: &str) -> RepoResult<()> {
    if role == ROLE_ADMIN || role == ROLE_STAFF {
        Ok(())
    } else {
        Err(RepoError::Validation(format!("Unknown role: {}", role)))
    }
}

#[derive(Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// All users ordered by username
    pub async fn find_all(&self) -> RepoResult<Vec<User>> {
        let users: Vec<User> = self
            .base
            .db()
            .query("SELECT *, <string>id AS id FROM usuario ORDER BY username")
            .await?
            .take(0)?;
        Ok(users)
    }

    /// Find user by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<User>> {
        let thing = self.base.parse_id(id)?;
        let mut result = self
            .base
            .db()
            .query("SELECT *, <string>id AS id FROM usuario WHERE id = $id")
            .bind(("id", thing))
            .await?;
        let users: Vec<User> = result.take(0)?;
        Ok(users.into_iter().next())
    }

    /// Find user by username
    pub async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        let username = username.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT *, <string>id AS id FROM usuario WHERE username = $username LIMIT 1")
            .bind(("username", username))
            .await?;
        let users: Vec<User> = result.take(0)?;
        Ok(users.into_iter().next())
    }

    /// Create a new user
    pub async fn create(&self, data: UserCreate) -> RepoResult<User> {
        validate_role(&data.role)?;
        if data.username.trim().is_empty() {
            return Err(RepoError::Validation("Username is required".to_string()));
        }
        if self.find_by_username(&data.username).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Username '{}' already exists",
                data.username
            )));
        }

        let hash_pass = hash_password(&data.password)
            .map_err(|e| RepoError::Database(format!("Failed to hash password: {}", e)))?;
        let display_name = data.display_name.unwrap_or_else(|| data.username.clone());

        let mut result = self
            .base
            .db()
            .query(
                "SELECT *, <string>id AS id FROM (CREATE usuario SET \
                    username = $username, \
                    display_name = $display_name, \
                    hash_pass = $hash_pass, \
                    role = $role, \
                    is_active = true)",
            )
            .bind(("username", data.username))
            .bind(("display_name", display_name))
            .bind(("hash_pass", hash_pass))
            .bind(("role", data.role))
            .await?;

        result
            .take::<Vec<User>>(0)?
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::Database("Failed to create user".to_string()))
    }

    /// Update a user
    pub async fn update(&self, id: &str, data: UserUpdate) -> RepoResult<User> {
        let thing = self.base.parse_id(id)?;
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("User {} not found", id)))?;

        if let Some(ref role) = data.role {
            validate_role(role)?;
        }

        if let Some(ref new_username) = data.username {
            if new_username != &existing.username
                && self.find_by_username(new_username).await?.is_some()
            {
                return Err(RepoError::Duplicate(format!(
                    "Username '{}' already exists",
                    new_username
                )));
            }
        }

        let hash_pass = match data.password {
            Some(ref password) => Some(
                hash_password(password)
                    .map_err(|e| RepoError::Database(format!("Failed to hash password: {}", e)))?,
            ),
            None => None,
        };

        let mut patch = serde_json::Map::new();
        if let Some(username) = data.username {
            patch.insert("username".into(), username.into());
        }
        if let Some(display_name) = data.display_name {
            patch.insert("display_name".into(), display_name.into());
        }
        if let Some(hash) = hash_pass {
            patch.insert("hash_pass".into(), hash.into());
        }
        if let Some(role) = data.role {
            patch.insert("role".into(), role.into());
        }
        if let Some(is_active) = data.is_active {
            patch.insert("is_active".into(), is_active.into());
        }

        let mut result = self
            .base
            .db()
            .query("SELECT *, <string>id AS id FROM (UPDATE $thing MERGE $data)")
            .bind(("thing", thing))
            .bind(("data", serde_json::Value::Object(patch)))
            .await?;

        result
            .take::<Vec<User>>(0)?
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("User {} not found", id)))
    }

    /// Hard delete a user
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let thing = self.base.parse_id(id)?;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("User {} not found", id)))?;

        self.base
            .db()
            .query("DELETE $thing")
            .bind(("thing", thing))
            .await?;
        Ok(true)
    }
}
