use poem::{listener::TcpListener, Route, Server};
use poem_openapi::OpenApiService;
use sea_orm::{Database, DatabaseConnection};
use std::sync::Arc;

use migration::{Migrator, MigratorTrait};
use rbac_admin_backend::api::{
    ActivityApi, AuthApi, HealthApi, PermissionApi, RoleApi, UserApi,
};
use rbac_admin_backend::config::{init_logging, Settings};
use rbac_admin_backend::AppData;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    init_logging().expect("Failed to initialize logging");

    let settings = Settings::from_env().expect("Failed to load settings");

    let db: DatabaseConnection = Database::connect(&settings.database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!(database_url = %settings.database_url, "Connected to database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    tracing::info!("Database migrations completed");

    let app_data = Arc::new(AppData::init(db, &settings));

    app_data
        .seed_admin(&settings)
        .await
        .expect("Failed to seed bootstrap admin");

    // Repair any inconsistency a crashed dual-write left behind
    let repaired = app_data
        .graph_service
        .reconcile_permission_index()
        .await
        .expect("Failed to reconcile permission index");
    if repaired > 0 {
        tracing::warn!(repaired, "Permission index reconciled at startup");
    }

    let auth_api = AuthApi::new(
        app_data.auth_service.clone(),
        app_data.identity_service.clone(),
        app_data.session_service.clone(),
    );
    let user_api = UserApi::new(
        app_data.identity_service.clone(),
        app_data.session_service.clone(),
    );
    let role_api = RoleApi::new(
        app_data.graph_service.clone(),
        app_data.session_service.clone(),
    );
    let permission_api = PermissionApi::new(
        app_data.graph_service.clone(),
        app_data.session_service.clone(),
    );
    let activity_api = ActivityApi::new(
        app_data.activity_store.clone(),
        app_data.identity_store.clone(),
        app_data.session_service.clone(),
    );

    let api_service = OpenApiService::new(
        (
            HealthApi,
            auth_api,
            user_api,
            role_api,
            permission_api,
            activity_api,
        ),
        "RBAC Admin Backend",
        "1.0.0",
    )
    .server(format!("http://{}/api", settings.bind_addr));

    let ui = api_service.swagger_ui();

    let app = Route::new().nest("/api", api_service).nest("/swagger", ui);

    tracing::info!(bind_addr = %settings.bind_addr, "Starting server");
    Server::new(TcpListener::bind(settings.bind_addr.clone()))
        .run(app)
        .await
}
