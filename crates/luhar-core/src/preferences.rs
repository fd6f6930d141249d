use crate::error::LuharError;
use crate::storage::{Storage, StoreKey};

/// Global night-mode preference. Shared by every user of this store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NightMode {
    Enabled,
    Disabled,
}

impl NightMode {
    pub fn as_db_str(&self) -> &'static str {
        match self {
            Self::Enabled => "enabled",
            Self::Disabled => "disabled",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "enabled" => Some(Self::Enabled),
            "disabled" => Some(Self::Disabled),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Enabled => Self::Disabled,
            Self::Disabled => Self::Enabled,
        }
    }

    /// Follow the OS theme when nothing is stored.
    fn from_system() -> Self {
        match dark_light::detect() {
            Ok(dark_light::Mode::Dark) => Self::Enabled,
            _ => Self::Disabled,
        }
    }

    /// The stored preference, if any. Unknown stored values read as unset.
    pub fn stored(storage: &Storage) -> Result<Option<Self>, LuharError> {
        Ok(storage
            .get_value(&StoreKey::night_mode())?
            .as_deref()
            .and_then(Self::from_db_str))
    }

    /// The effective preference: stored value, else the OS theme.
    pub fn load(storage: &Storage) -> Result<Self, LuharError> {
        Ok(Self::stored(storage)?.unwrap_or_else(Self::from_system))
    }

    pub fn save(self, storage: &Storage) -> Result<(), LuharError> {
        storage.set_value(&StoreKey::night_mode(), self.as_db_str())
    }

    /// Flip the effective preference and persist it.
    pub fn toggle(storage: &Storage) -> Result<Self, LuharError> {
        let next = Self::load(storage)?.toggled();
        next.save(storage)?;
        Ok(next)
    }
}

impl std::fmt::Display for NightMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_db_str())
    }
}
