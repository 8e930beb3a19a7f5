// DTO layer - request/response models
pub mod activity;
pub mod auth;
pub mod common;
pub mod permission;
pub mod role;
pub mod user;
