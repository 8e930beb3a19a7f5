use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::config::Settings;
use crate::errors::ServiceError;
use crate::services::{AuthService, GraphService, IdentityService, SessionService};
use crate::stores::{ActivityStore, CredentialStore, IdentityStore, PermissionStore, RoleStore};

/// Centralized application data following the main-owned stores pattern
///
/// All stores and services are created once here and shared across the API
/// structs. Stores are the only layer holding the database connection;
/// services compose stores; APIs compose services.
pub struct AppData {
    pub db: DatabaseConnection,
    pub credential_store: Arc<CredentialStore>,
    pub identity_store: Arc<IdentityStore>,
    pub role_store: Arc<RoleStore>,
    pub permission_store: Arc<PermissionStore>,
    pub activity_store: Arc<ActivityStore>,
    pub session_service: Arc<SessionService>,
    pub auth_service: Arc<AuthService>,
    pub identity_service: Arc<IdentityService>,
    pub graph_service: Arc<GraphService>,
}

impl AppData {
    /// Initialize all application data
    ///
    /// The database connection must already be migrated.
    pub fn init(db: DatabaseConnection, settings: &Settings) -> Self {
        tracing::info!("Initializing AppData...");

        tracing::debug!("Creating stores...");
        let credential_store = Arc::new(CredentialStore::new(
            db.clone(),
            settings.password_pepper.clone(),
        ));
        let identity_store = Arc::new(IdentityStore::new(db.clone()));
        let role_store = Arc::new(RoleStore::new(db.clone()));
        let permission_store = Arc::new(PermissionStore::new(db.clone()));
        let activity_store = Arc::new(ActivityStore::new(db.clone()));
        tracing::debug!("Stores created");

        tracing::debug!("Creating services...");
        let session_service = Arc::new(SessionService::new(settings.session_secret.clone()));
        let auth_service = Arc::new(AuthService::new(
            credential_store.clone(),
            identity_store.clone(),
            role_store.clone(),
            activity_store.clone(),
            session_service.clone(),
        ));
        let identity_service = Arc::new(IdentityService::new(
            identity_store.clone(),
            credential_store.clone(),
            activity_store.clone(),
        ));
        let graph_service = Arc::new(GraphService::new(
            role_store.clone(),
            permission_store.clone(),
            activity_store.clone(),
        ));
        tracing::debug!("Services created");

        tracing::info!("AppData initialization complete");

        Self {
            db,
            credential_store,
            identity_store,
            role_store,
            permission_store,
            activity_store,
            session_service,
            auth_service,
            identity_service,
            graph_service,
        }
    }

    /// Seed the bootstrap administrator on first boot
    ///
    /// A no-op when any credential already exists.
    pub async fn seed_admin(&self, settings: &Settings) -> Result<(), ServiceError> {
        if self.credential_store.has_any().await? {
            tracing::debug!("Credentials exist, skipping admin seeding");
            return Ok(());
        }

        let admin = &settings.admin;
        let created = self
            .identity_service
            .register_admin(&admin.username, &admin.password, &admin.name, &admin.email)
            .await?;
        tracing::info!(username = %created.username, "Bootstrap admin created");
        Ok(())
    }
}
