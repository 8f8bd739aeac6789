//! Database Module
//!
//! Embedded SurrealDB: RocksDB-backed on disk for deployments, in-memory for
//! tests. Table names are Spanish to match the stored status labels and the
//! API routes: `orden`, `mecanico`, `usuario`.

pub mod repository;

use std::path::Path;

use surrealdb::engine::local::{Db, Mem, RocksDb};
use surrealdb::Surreal;

use crate::utils::AppError;

pub const NAMESPACE: &str = "taller";
pub const DATABASE: &str = "taller";

/// Database service - owns the embedded SurrealDB handle
#[derive(Clone, Debug)]
pub struct DbService {
    db: Surreal<Db>,
}

impl DbService {
    /// Open the on-disk database under `dir`
    pub async fn open(dir: &Path) -> Result<Self, AppError> {
        let path = dir.join("taller.db").to_string_lossy().to_string();
        let db = Surreal::new::<RocksDb>(path.as_str())
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;
        Self::select_ns(&db).await?;
        tracing::info!(path = %path, "Database opened (RocksDB)");
        Ok(Self { db })
    }

    /// Open an in-memory database (tests)
    pub async fn open_in_memory() -> Result<Self, AppError> {
        let db = Surreal::new::<Mem>(())
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;
        Self::select_ns(&db).await?;
        Ok(Self { db })
    }

    async fn select_ns(db: &Surreal<Db>) -> Result<(), AppError> {
        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}

/// Seed the default admin account on first boot
///
/// Password comes from `ADMIN_PASSWORD`, falling back to "admin" for
/// development setups. Does nothing when any user already exists.
pub async fn seed_admin_user(db: &Surreal<Db>) -> Result<(), AppError> {
    use repository::UserRepository;
    use shared::models::user::ROLE_ADMIN;
    use shared::UserCreate;

    let repo = UserRepository::new(db.clone());
    let users = repo
        .find_all()
        .await
        .map_err(|e| AppError::database(e.to_string()))?;
    if !users.is_empty() {
        return Ok(());
    }

    let password = std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "admin".to_string());
    repo.create(UserCreate {
        username: "admin".to_string(),
        password,
        display_name: Some("Administrador".to_string()),
        role: ROLE_ADMIN.to_string(),
    })
    .await
    .map_err(|e| AppError::database(e.to_string()))?;

    tracing::info!("Seeded default admin user");
    Ok(())
}
