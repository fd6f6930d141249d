use serde::{Deserialize, Serialize};

/// A user row as returned by `GET /admin/users`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminUser {
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub is_suspended: bool,
}

impl AdminUser {
    pub fn role_label(&self) -> &'static str {
        if self.is_admin {
            "Admin"
        } else {
            "User"
        }
    }

    pub fn status_label(&self) -> &'static str {
        if self.is_suspended {
            "Suspended"
        } else {
            "Active"
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleFilter {
    #[default]
    All,
    Admin,
    User,
}

impl RoleFilter {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Admin => "admin",
            Self::User => "user",
        }
    }

    /// Unknown values fall back to `All`.
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "admin" => Self::Admin,
            "user" => Self::User,
            _ => Self::All,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuspensionFilter {
    #[default]
    All,
    Suspended,
    Active,
}

impl SuspensionFilter {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Suspended => "suspended",
            Self::Active => "active",
        }
    }

    /// Unknown values fall back to `All`.
    pub fn parse(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "suspended" => Self::Suspended,
            "active" => Self::Active,
            _ => Self::All,
        }
    }
}

/// Filters for the admin user table. The backend applies the same rules;
/// [`UserFilter::matches`] lets a caller re-filter a cached list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilter {
    pub search: String,
    pub role: RoleFilter,
    pub suspension: SuspensionFilter,
}

impl UserFilter {
    /// Case-insensitive substring match on the username, then role and
    /// suspension state.
    pub fn matches(&self, user: &AdminUser) -> bool {
        let search = self.search.to_lowercase();
        if !search.is_empty() && !user.username.to_lowercase().contains(&search) {
            return false;
        }
        let role_ok = match self.role {
            RoleFilter::All => true,
            RoleFilter::Admin => user.is_admin,
            RoleFilter::User => !user.is_admin,
        };
        let suspension_ok = match self.suspension {
            SuspensionFilter::All => true,
            SuspensionFilter::Suspended => user.is_suspended,
            SuspensionFilter::Active => !user.is_suspended,
        };
        role_ok && suspension_ok
    }

    pub fn query(&self) -> [(&'static str, &str); 3] {
        [
            ("search", self.search.as_str()),
            ("role", self.role.as_str()),
            ("suspension", self.suspension.as_str()),
        ]
    }
}
