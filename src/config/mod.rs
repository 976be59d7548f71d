use chrono::NaiveDate;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::{
    currency::CurrencyCode,
    errors::{LedgerError, ValidationError},
    storage::{KeyValueStore, PROFILE_KEY, SETTINGS_KEY},
};

/// Valid range for the day of month on which budgets reset.
pub const RESET_DAY_RANGE: std::ops::RangeInclusive<u8> = 1..=28;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TaxRegime {
    #[default]
    New,
    Old,
}

/// User preferences persisted under the settings key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub theme: Theme,
    pub language: String,
    pub timezone: String,
    pub default_page: String,
    pub budget_reset_day: u8,
    pub email_notifications: bool,
    pub overspend_alerts: bool,
    pub tax_regime: TaxRegime,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::System,
            language: "en".into(),
            timezone: "Asia/Kolkata".into(),
            default_page: "dashboard".into(),
            budget_reset_day: 1,
            email_notifications: true,
            overspend_alerts: true,
            tax_regime: TaxRegime::New,
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !RESET_DAY_RANGE.contains(&self.budget_reset_day) {
            return Err(ValidationError::InvalidSetting(format!(
                "budget reset day must be between {} and {}, got {}",
                RESET_DAY_RANGE.start(),
                RESET_DAY_RANGE.end(),
                self.budget_reset_day
            )));
        }
        if self.language.trim().is_empty() {
            return Err(ValidationError::InvalidSetting("language is required".into()));
        }
        Ok(())
    }
}

/// Account holder details persisted under the profile key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Profile {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub country: String,
    pub currency: CurrencyCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<NaiveDate>,
    pub occupation: String,
}

/// Loads and saves the settings and profile documents through a store.
pub struct ConfigManager<'a> {
    store: &'a dyn KeyValueStore,
}

impl<'a> ConfigManager<'a> {
    pub fn new(store: &'a dyn KeyValueStore) -> Self {
        Self { store }
    }

    pub fn load_settings(&self) -> Result<Settings, LedgerError> {
        self.load(SETTINGS_KEY)
    }

    pub fn save_settings(&self, settings: &Settings) -> Result<(), LedgerError> {
        settings.validate()?;
        self.save(SETTINGS_KEY, settings)
    }

    pub fn load_profile(&self) -> Result<Profile, LedgerError> {
        self.load(PROFILE_KEY)
    }

    pub fn save_profile(&self, profile: &Profile) -> Result<(), LedgerError> {
        if !profile.email.is_empty() && !profile.email.contains('@') {
            return Err(ValidationError::InvalidSetting(format!(
                "`{}` is not an email address",
                profile.email
            ))
            .into());
        }
        self.save(PROFILE_KEY, profile)
    }

    fn load<T: DeserializeOwned + Default>(&self, key: &str) -> Result<T, LedgerError> {
        match self.store.get(key)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(T::default()),
        }
    }

    fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<(), LedgerError> {
        let json = serde_json::to_string_pretty(value)?;
        self.store.set(key, &json)?;
        tracing::debug!(key, "configuration saved");
        Ok(())
    }
}
