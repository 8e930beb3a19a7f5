// Database entities - SeaORM models
pub mod activity;
pub mod credential;
pub mod identity;
pub mod permission;
pub mod role;
