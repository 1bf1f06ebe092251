//! Registration, authentication and profile maintenance.

use std::path::Path;

use model::entities::user::{self, Role};
use model::store;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, IntoActiveModel, Set,
    SqlErr, TransactionTrait,
};
use tracing::{debug, info, instrument, trace, warn};
use validator::Validate;

use crate::credentials::{hash_password, verify_password};
use crate::error::{Result, ServiceError};
use crate::identity::Identity;
use crate::images::{ImageUpload, discard_image, store_image};

/// Input of the registration form.
#[derive(Clone, Default, Validate)]
pub struct Registration {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
    pub full_name: Option<String>,
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("full_name", &self.full_name)
            .finish_non_exhaustive()
    }
}

/// Basic profile fields editable on the profile page.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub district: Option<String>,
    pub address: Option<String>,
}

/// Extended profile fields, including the login email.
#[derive(Debug, Clone, Default, Validate)]
pub struct ProfileDetails {
    pub full_name: Option<String>,
    #[validate(length(min = 1))]
    pub email: String,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub district: Option<String>,
    pub address: Option<String>,
}

/// Blank optional form values are stored as NULL.
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn map_unique_violation(err: DbErr) -> ServiceError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => ServiceError::DuplicateIdentity,
        _ => ServiceError::Database(err),
    }
}

/// Register a new customer account.
///
/// # Errors
///
/// * `MissingField` if username, email or password is blank
/// * `DuplicateIdentity` if the username or the email is already taken
#[instrument(skip(db, registration), fields(username = %registration.username))]
pub async fn register(db: &DatabaseConnection, registration: Registration) -> Result<user::Model> {
    trace!("Entering register function");
    let user = insert_unique_user(db, registration, Role::User).await?;
    info!("Registered user {} with ID {}", user.username, user.id);
    Ok(user)
}

/// Provision an administrator account. Same checks as [`register`].
#[instrument(skip(db, registration), fields(username = %registration.username))]
pub async fn create_admin(db: &DatabaseConnection, registration: Registration) -> Result<user::Model> {
    let user = insert_unique_user(db, registration, Role::Admin).await?;
    info!("Created administrator {} with ID {}", user.username, user.id);
    Ok(user)
}

async fn insert_unique_user(
    db: &DatabaseConnection,
    mut registration: Registration,
    role: Role,
) -> Result<user::Model> {
    registration.username = registration.username.trim().to_string();
    registration.email = registration.email.trim().to_string();
    registration.validate()?;
    // Blank after trimming counts as missing, as it does at login
    if let Some(err) = missing_fields(&[("password", &registration.password)]) {
        return Err(err);
    }

    // Hash outside the transaction, it is the slow part.
    let password_hash = hash_password(&registration.password)?;

    let txn = db.begin().await?;
    if let Some(existing) =
        store::find_user_by_username_or_email(&txn, &registration.username, &registration.email)
            .await?
    {
        warn!(
            "Username '{}' or email '{}' already used by user {}",
            registration.username, registration.email, existing.id
        );
        return Err(ServiceError::DuplicateIdentity);
    }

    let new_user = user::ActiveModel {
        username: Set(registration.username),
        email: Set(registration.email),
        password_hash: Set(password_hash),
        full_name: Set(non_blank(registration.full_name)),
        role: Set(role),
        ..Default::default()
    };
    let user = new_user.insert(&txn).await.map_err(map_unique_violation)?;
    txn.commit().await?;

    Ok(user)
}

fn missing_fields(fields: &[(&str, &str)]) -> Option<ServiceError> {
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
        .collect();
    (!missing.is_empty()).then(|| ServiceError::MissingField(missing.join(", ")))
}

/// Authenticate a customer by email and password.
#[instrument(skip(db, password))]
pub async fn login(db: &DatabaseConnection, email: &str, password: &str) -> Result<Identity> {
    if let Some(err) = missing_fields(&[("email", email), ("password", password)]) {
        return Err(err);
    }

    let Some(user) = store::find_user_by_email(db, email.trim()).await? else {
        warn!("Login attempt for unknown email");
        return Err(ServiceError::InvalidCredentials);
    };

    if !verify_password(password, &user.password_hash)? {
        warn!("Wrong password for user ID {}", user.id);
        return Err(ServiceError::InvalidCredentials);
    }

    info!("User {} logged in", user.username);
    Ok(Identity::from(&user))
}

/// Authenticate an administrator by username and password.
///
/// A correct password on a non-admin account is reported exactly like a wrong
/// one.
#[instrument(skip(db, password))]
pub async fn admin_login(db: &DatabaseConnection, username: &str, password: &str) -> Result<Identity> {
    if let Some(err) = missing_fields(&[("username", username), ("password", password)]) {
        return Err(err);
    }

    let Some(user) = store::find_user_by_username(db, username.trim()).await? else {
        warn!("Admin login attempt for unknown username");
        return Err(ServiceError::InvalidCredentials);
    };

    if !verify_password(password, &user.password_hash)? {
        warn!("Wrong admin password for user ID {}", user.id);
        return Err(ServiceError::InvalidCredentials);
    }

    if user.role != Role::Admin {
        warn!("User {} tried to log in as admin without the admin role", user.username);
        return Err(ServiceError::InvalidCredentials);
    }

    info!("Administrator {} logged in", user.username);
    Ok(Identity::from(&user))
}

/// Load the stored user behind a session identity.
pub async fn current_user(db: &DatabaseConnection, identity: &Identity) -> Result<user::Model> {
    find_existing_user(db, identity.user_id).await
}

async fn find_existing_user(db: &DatabaseConnection, user_id: i32) -> Result<user::Model> {
    store::find_user(db, user_id).await?.ok_or_else(|| {
        warn!("User with ID {} not found", user_id);
        ServiceError::NotFound(format!("user {}", user_id))
    })
}

/// Update the basic profile and optionally replace the profile picture.
///
/// The picture is validated before anything is written, so an unsupported
/// file leaves the profile untouched.
#[instrument(skip(db, update, image, upload_dir))]
pub async fn update_profile(
    db: &DatabaseConnection,
    user_id: i32,
    update: ProfileUpdate,
    image: Option<&ImageUpload>,
    upload_dir: &Path,
) -> Result<user::Model> {
    let user = find_existing_user(db, user_id).await?;

    let profile_image = match image.filter(|upload| upload.is_supplied()) {
        Some(upload) => Some(store_image(upload_dir, upload).await?),
        None => None,
    };

    let mut active = user.into_active_model();
    active.full_name = Set(non_blank(update.full_name));
    active.phone = Set(non_blank(update.phone));
    active.city = Set(non_blank(update.city));
    active.district = Set(non_blank(update.district));
    active.address = Set(non_blank(update.address));
    if let Some(filename) = &profile_image {
        debug!("Replacing profile image with {}", filename);
        active.profile_image = Set(Some(filename.clone()));
    }

    let updated = match active.update(db).await {
        Ok(updated) => updated,
        Err(e) => {
            if let Some(filename) = profile_image {
                discard_image(upload_dir, &filename).await;
            }
            return Err(e.into());
        }
    };
    info!("Profile of user ID {} updated", user_id);
    Ok(updated)
}

/// Update the extended profile, including the email used to log in.
///
/// # Errors
///
/// * `MissingField` if the email is blank
/// * `DuplicateIdentity` if another user already has the email
#[instrument(skip(db, details))]
pub async fn update_profile_details(
    db: &DatabaseConnection,
    user_id: i32,
    mut details: ProfileDetails,
) -> Result<user::Model> {
    details.email = details.email.trim().to_string();
    details.validate()?;

    let user = find_existing_user(db, user_id).await?;

    let txn = db.begin().await?;
    let taken = store::filter_users(
        &txn,
        Condition::all()
            .add(user::Column::Email.eq(details.email.as_str()))
            .add(user::Column::Id.ne(user_id)),
    )
    .await?;
    if !taken.is_empty() {
        warn!("Email already used by user {}", taken[0].id);
        return Err(ServiceError::DuplicateIdentity);
    }

    let mut active = user.into_active_model();
    active.full_name = Set(non_blank(details.full_name));
    active.email = Set(details.email);
    active.phone = Set(non_blank(details.phone));
    active.city = Set(non_blank(details.city));
    active.district = Set(non_blank(details.district));
    active.address = Set(non_blank(details.address));

    let updated = active.update(&txn).await.map_err(map_unique_violation)?;
    txn.commit().await?;

    info!("Profile details of user ID {} updated", user_id);
    Ok(updated)
}
