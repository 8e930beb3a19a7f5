use argon2::password_hash::SaltString;
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};
use rand_core::OsRng;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set,
};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::types::db::credential::{self, ActiveModel, Entity as Credential};

/// CredentialStore manages username/password-hash records bound to identities
///
/// Passwords are hashed with Argon2id using a server-held pepper as the
/// secret parameter. The hash is treated as opaque elsewhere: the only
/// operations are create and verify.
pub struct CredentialStore {
    db: DatabaseConnection,
    password_pepper: String,
}

impl CredentialStore {
    /// Create a new CredentialStore with the given database connection and password pepper
    pub fn new(db: DatabaseConnection, password_pepper: String) -> Self {
        Self {
            db,
            password_pepper,
        }
    }

    fn hasher(&self) -> Result<Argon2<'_>, ServiceError> {
        Argon2::new_with_secret(
            self.password_pepper.as_bytes(),
            Algorithm::Argon2id,
            Version::V0x13,
            Params::default(),
        )
        .map_err(|e| ServiceError::internal("argon2_init", e))
    }

    /// Create a credential for an identity
    ///
    /// # Arguments
    /// * `username` - Unique login name
    /// * `password` - Plaintext password to hash and store
    /// * `identity_id` - Internal id of the owning identity
    ///
    /// # Returns
    /// * `Ok(Model)` - The created credential record
    /// * `Err(ServiceError::Conflict)` - Username already registered
    pub async fn create(
        &self,
        username: &str,
        password: &str,
        identity_id: &str,
    ) -> Result<credential::Model, ServiceError> {
        let existing = Credential::find()
            .filter(credential::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(|e| ServiceError::internal("find_credential", e))?;

        if existing.is_some() {
            return Err(ServiceError::conflict("Username"));
        }

        let salt = SaltString::generate(&mut OsRng);
        let password_hash = self
            .hasher()?
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| ServiceError::internal("hash_password", e))?
            .to_string();

        let record = ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            username: Set(username.to_string()),
            password_hash: Set(password_hash),
            identity_id: Set(identity_id.to_string()),
        };

        record.insert(&self.db).await.map_err(|e| {
            if e.to_string().contains("UNIQUE") {
                ServiceError::conflict("Username")
            } else {
                ServiceError::internal("insert_credential", e)
            }
        })
    }

    /// Verify a username/password pair
    ///
    /// # Returns
    /// * `Ok(Model)` - The matching credential, including its identity reference
    /// * `Err(ServiceError::InvalidUsername)` - No credential for that username
    /// * `Err(ServiceError::InvalidPassword)` - Password does not match the stored hash
    pub async fn verify(
        &self,
        username: &str,
        password: &str,
    ) -> Result<credential::Model, ServiceError> {
        let cred = Credential::find()
            .filter(credential::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(|e| ServiceError::internal("find_credential", e))?
            .ok_or(ServiceError::InvalidUsername)?;

        let parsed_hash =
            PasswordHash::new(&cred.password_hash).map_err(|_| ServiceError::InvalidPassword)?;

        self.hasher()?
            .verify_password(password.as_bytes(), &parsed_hash)
            .map_err(|_| ServiceError::InvalidPassword)?;

        Ok(cred)
    }

    /// Delete the credential owned by an identity, if any
    ///
    /// Returns the number of deleted records (0 when the identity had no
    /// credential, which is possible for orphaned profiles).
    pub async fn delete_by_identity(&self, identity_id: &str) -> Result<u64, ServiceError> {
        let result = Credential::delete_many()
            .filter(credential::Column::IdentityId.eq(identity_id))
            .exec(&self.db)
            .await
            .map_err(|e| ServiceError::internal("delete_credential", e))?;
        Ok(result.rows_affected)
    }

    /// Whether any credential exists at all, used for first-boot admin seeding
    pub async fn has_any(&self) -> Result<bool, ServiceError> {
        let count = Credential::find()
            .count(&self.db)
            .await
            .map_err(|e| ServiceError::internal("count_credentials", e))?;
        Ok(count > 0)
    }
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore")
            .field("db", &"<connection>")
            .field("password_pepper", &"<redacted>")
            .finish()
    }
}
