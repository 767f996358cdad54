//! User Entity
//!
//! Account record owned by the user flows. The token subsystem only
//! consults `id`, `role`, `active` and the display names.

use chrono::{DateTime, Utc};

use crate::domain::value_object::{Email, UserId, UserPassword, UserRole};

/// Persisted user account
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    /// Login identifier (unique)
    pub email: Email,
    /// Mobile number (unique)
    pub mobile: String,
    pub password: UserPassword,
    pub first_name: String,
    pub last_name: String,
    pub image_url: String,
    pub address: String,
    pub role: UserRole,
    /// Inactive accounts cannot authenticate
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Account data before the store has assigned an id
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: Email,
    pub mobile: String,
    pub password: UserPassword,
    pub first_name: String,
    pub last_name: String,
    pub image_url: String,
    pub address: String,
    pub role: UserRole,
    pub active: bool,
}

/// Partial profile update; `None` leaves the field untouched
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub email: Option<Email>,
    pub mobile: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub image_url: Option<String>,
    pub address: Option<String>,
}

impl User {
    /// Apply a partial profile update
    pub fn apply_profile(&mut self, update: ProfileUpdate) {
        let ProfileUpdate {
            email,
            mobile,
            first_name,
            last_name,
            image_url,
            address,
        } = update;

        if let Some(email) = email {
            self.email = email;
        }
        if let Some(mobile) = mobile {
            self.mobile = mobile;
        }
        if let Some(first_name) = first_name {
            self.first_name = first_name;
        }
        if let Some(last_name) = last_name {
            self.last_name = last_name;
        }
        if let Some(image_url) = image_url {
            self.image_url = image_url;
        }
        if let Some(address) = address {
            self.address = address;
        }
        self.updated_at = Utc::now();
    }

    pub fn activate(&mut self) {
        self.active = true;
        self.updated_at = Utc::now();
    }

    pub fn set_password(&mut self, password: UserPassword) {
        self.password = password;
        self.updated_at = Utc::now();
    }
}

impl NewUser {
    /// Materialize the account once the store has assigned an id
    pub fn into_user(self, id: UserId, now: DateTime<Utc>) -> User {
        User {
            id,
            email: self.email,
            mobile: self.mobile,
            password: self.password,
            first_name: self.first_name,
            last_name: self.last_name,
            image_url: self.image_url,
            address: self.address,
            role: self.role,
            active: self.active,
            created_at: now,
            updated_at: now,
        }
    }
}
