//! URL-encoded form bodies. Absent fields decode as empty strings so the
//! services can report them as missing.

use serde::{Deserialize, Serialize};
use services::account::{ProfileDetails, Registration};
use utoipa::ToSchema;

/// Customer login form (`/giris`)
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct LoginForm {
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
}

/// Administrator login form (`/admin`)
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct AdminLoginForm {
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
}

/// Registration form (`/kayit`)
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub full_name: Option<String>,
}

impl From<RegisterForm> for Registration {
    fn from(form: RegisterForm) -> Self {
        Registration {
            username: form.username,
            email: form.email,
            password: form.password,
            full_name: form.full_name,
        }
    }
}

/// Extended profile form (`/profil_detay`)
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct ProfileDetailsForm {
    pub full_name: Option<String>,
    pub email: String,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub district: Option<String>,
    pub address: Option<String>,
}

impl From<ProfileDetailsForm> for ProfileDetails {
    fn from(form: ProfileDetailsForm) -> Self {
        ProfileDetails {
            full_name: form.full_name,
            email: form.email,
            phone: form.phone,
            city: form.city,
            district: form.district,
            address: form.address,
        }
    }
}
