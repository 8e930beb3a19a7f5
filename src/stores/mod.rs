// Stores layer - Data access and repository pattern
pub mod activity_store;
pub mod credential_store;
pub mod identity_store;
pub mod permission_store;
pub mod role_store;

pub use activity_store::ActivityStore;
pub use credential_store::CredentialStore;
pub use identity_store::{IdentityStore, NewIdentity, ProfileUpdate};
pub use permission_store::PermissionStore;
pub use role_store::RoleStore;
