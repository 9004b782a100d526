//! User Data

use serde::Deserialize;

/// New user payload. The password arrives already hashed.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
    /// Role granted on creation; `guest` when absent.
    #[serde(default)]
    pub initial_role: Option<String>,
}

const fn default_active() -> bool {
    true
}

/// Self-service profile changes. Absent or blank fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl ProfileUpdate {
    pub(crate) fn full_name(&self) -> Option<&str> {
        non_blank(self.full_name.as_deref())
    }

    pub(crate) fn email(&self) -> Option<&str> {
        non_blank(self.email.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}
