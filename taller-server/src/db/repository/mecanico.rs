//! Mechanic Repository

use shared::{Mechanic, MechanicCreate, MechanicUpdate};
use surrealdb::engine::local::Db;
use surrealdb::Surreal;

use super::{BaseRepository, RepoError, RepoResult};

#[derive(Clone)]
pub struct MechanicRepository {
    base: BaseRepository,
}

impl MechanicRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// All mechanics ordered by name
    pub async fn find_all(&self) -> RepoResult<Vec<Mechanic>> {
        let mechanics: Vec<Mechanic> = self
            .base
            .db()
            .query("SELECT *, <string>id AS id FROM mecanico ORDER BY name")
            .await?
            .take(0)?;
        Ok(mechanics)
    }

    /// Find mechanic by id. Callers must tolerate `None`: orders keep
    /// dangling mechanic references after a deletion.
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Mechanic>> {
        let thing = self.base.parse_id(id)?;
        let mut result = self
            .base
            .db()
            .query("SELECT *, <string>id AS id FROM mecanico WHERE id = $id")
            .bind(("id", thing))
            .await?;
        let mechanics: Vec<Mechanic> = result.take(0)?;
        Ok(mechanics.into_iter().next())
    }

    async fn find_by_code(&self, code: &str) -> RepoResult<Option<Mechanic>> {
        let code = code.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT *, <string>id AS id FROM mecanico WHERE code = $code LIMIT 1")
            .bind(("code", code))
            .await?;
        let mechanics: Vec<Mechanic> = result.take(0)?;
        Ok(mechanics.into_iter().next())
    }

    /// Create a new mechanic
    pub async fn create(&self, data: MechanicCreate) -> RepoResult<Mechanic> {
        if data.name.trim().is_empty() {
            return Err(RepoError::Validation("Mechanic name is required".to_string()));
        }
        if self.find_by_code(&data.code).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Mechanic code '{}' already exists",
                data.code
            )));
        }

        let mut result = self
            .base
            .db()
            .query(
                "SELECT *, <string>id AS id FROM \
                 (CREATE mecanico SET name = $name, code = $code)",
            )
            .bind(("name", data.name))
            .bind(("code", data.code))
            .await?;

        result
            .take::<Vec<Mechanic>>(0)?
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::Database("Failed to create mechanic".to_string()))
    }

    /// Update a mechanic
    pub async fn update(&self, id: &str, data: MechanicUpdate) -> RepoResult<Mechanic> {
        let thing = self.base.parse_id(id)?;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Mechanic {} not found", id)))?;

        if let Some(ref new_code) = data.code {
            if let Some(existing) = self.find_by_code(new_code).await? {
                if existing.id.as_deref() != Some(id) {
                    return Err(RepoError::Duplicate(format!(
                        "Mechanic code '{}' already exists",
                        new_code
                    )));
                }
            }
        }

        let content = serde_json::to_value(&data)
            .map_err(|e| RepoError::Database(format!("Serialization failed: {e}")))?;
        let mut result = self
            .base
            .db()
            .query("SELECT *, <string>id AS id FROM (UPDATE $thing MERGE $data)")
            .bind(("thing", thing))
            .bind(("data", content))
            .await?;

        result
            .take::<Vec<Mechanic>>(0)?
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Mechanic {} not found", id)))
    }

    /// Hard delete. Orders referencing this mechanic keep the dangling id.
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let thing = self.base.parse_id(id)?;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Mechanic {} not found", id)))?;

        self.base
            .db()
            .query("DELETE $thing")
            .bind(("thing", thing))
            .await?;
        Ok(true)
    }
}
