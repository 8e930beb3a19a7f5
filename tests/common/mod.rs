// Common test utilities for integration tests

use migration::{Migrator, MigratorTrait};
use rbac_admin_backend::config::{AdminBootstrap, Settings};
use rbac_admin_backend::AppData;
use sea_orm::{Database, DatabaseConnection};

/// Creates a test database with migrations applied
pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// Settings suitable for tests, with fixed secrets
pub fn test_settings() -> Settings {
    Settings {
        database_url: "sqlite::memory:".to_string(),
        bind_addr: "127.0.0.1:0".to_string(),
        session_secret: "test-session-secret-minimum-32-chars".to_string(),
        password_pepper: "test-pepper-for-integration-tests".to_string(),
        admin: AdminBootstrap {
            username: "admin".to_string(),
            password: "admin123".to_string(),
            name: "Administrator".to_string(),
            email: "admin@example.com".to_string(),
        },
    }
}

/// Creates a fully wired application over an in-memory database
pub async fn setup_app() -> AppData {
    let db = setup_test_db().await;
    AppData::init(db, &test_settings())
}
