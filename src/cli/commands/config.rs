use chrono::NaiveDate;

use crate::cli::context::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::config::{Profile, Settings, TaxRegime, Theme};
use crate::currency::CurrencyCode;

use super::{parse_date, usage_error, CommandDefinition};

const SETTINGS_USAGE: &str = "settings [show | set <field> <value>]";
const PROFILE_USAGE: &str = "profile [show | set <field> <value>]";

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new("settings", "Show or change preferences", SETTINGS_USAGE, cmd_settings),
        CommandDefinition::new("profile", "Show or change your profile", PROFILE_USAGE, cmd_profile),
    ]
}

fn cmd_settings(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let mut settings = context.config().load_settings()?;
    match args {
        [] | ["show"] => {
            show_settings(&settings);
            Ok(())
        }
        ["set", field, value] => {
            apply_setting(&mut settings, field, value)?;
            context.config().save_settings(&settings)?;
            output::success(format!("Setting `{field}` saved."));
            Ok(())
        }
        _ => Err(usage_error(SETTINGS_USAGE)),
    }
}

fn show_settings(settings: &Settings) {
    output::section("Settings");
    output::info(format!("theme               : {:?}", settings.theme));
    output::info(format!("language            : {}", settings.language));
    output::info(format!("timezone            : {}", settings.timezone));
    output::info(format!("default_page        : {}", settings.default_page));
    output::info(format!("budget_reset_day    : {}", settings.budget_reset_day));
    output::info(format!("email_notifications : {}", settings.email_notifications));
    output::info(format!("overspend_alerts    : {}", settings.overspend_alerts));
    output::info(format!("tax_regime          : {:?}", settings.tax_regime));
}

fn apply_setting(settings: &mut Settings, field: &str, value: &str) -> Result<(), CommandError> {
    match field.to_ascii_lowercase().as_str() {
        "theme" => {
            settings.theme = match value.to_ascii_lowercase().as_str() {
                "light" => Theme::Light,
                "dark" => Theme::Dark,
                "system" => Theme::System,
                _ => return Err(invalid_value(field, value)),
            }
        }
        "language" => settings.language = value.to_string(),
        "timezone" => settings.timezone = value.to_string(),
        "default_page" => settings.default_page = value.to_string(),
        "budget_reset_day" => {
            settings.budget_reset_day = value.parse().map_err(|_| invalid_value(field, value))?
        }
        "email_notifications" => settings.email_notifications = parse_flag(field, value)?,
        "overspend_alerts" => settings.overspend_alerts = parse_flag(field, value)?,
        "tax_regime" => {
            settings.tax_regime = match value.to_ascii_lowercase().as_str() {
                "new" => TaxRegime::New,
                "old" => TaxRegime::Old,
                _ => return Err(invalid_value(field, value)),
            }
        }
        other => {
            return Err(CommandError::InvalidArguments(format!(
                "unknown setting `{other}`"
            )))
        }
    }
    Ok(())
}

fn cmd_profile(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let mut profile = context.config().load_profile()?;
    match args {
        [] | ["show"] => {
            show_profile(&profile);
            Ok(())
        }
        ["set", field, value] => {
            apply_profile_field(&mut profile, field, value)?;
            context.config().save_profile(&profile)?;
            context.currency = profile.currency;
            output::success(format!("Profile `{field}` saved."));
            Ok(())
        }
        _ => Err(usage_error(PROFILE_USAGE)),
    }
}

fn show_profile(profile: &Profile) {
    output::section("Profile");
    output::info(format!("name          : {}", profile.name));
    output::info(format!("email         : {}", profile.email));
    output::info(format!("phone         : {}", profile.phone));
    output::info(format!("country       : {}", profile.country));
    output::info(format!("currency      : {}", profile.currency.as_str()));
    let dob = profile
        .date_of_birth
        .map(|date: NaiveDate| date.to_string())
        .unwrap_or_default();
    output::info(format!("date_of_birth : {dob}"));
    output::info(format!("occupation    : {}", profile.occupation));
}

fn apply_profile_field(profile: &mut Profile, field: &str, value: &str) -> Result<(), CommandError> {
    match field.to_ascii_lowercase().as_str() {
        "name" => profile.name = value.trim().to_string(),
        "email" => profile.email = value.trim().to_string(),
        "phone" => profile.phone = value.trim().to_string(),
        "country" => profile.country = value.trim().to_string(),
        "currency" => {
            if value.trim().len() != 3 {
                return Err(invalid_value(field, value));
            }
            profile.currency = CurrencyCode::new(value);
        }
        "date_of_birth" | "dob" => profile.date_of_birth = Some(parse_date(value)?),
        "occupation" => profile.occupation = value.trim().to_string(),
        other => {
            return Err(CommandError::InvalidArguments(format!(
                "unknown profile field `{other}`"
            )))
        }
    }
    Ok(())
}

fn parse_flag(field: &str, value: &str) -> Result<bool, CommandError> {
    match value.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" => Ok(true),
        "off" | "false" | "no" => Ok(false),
        _ => Err(invalid_value(field, value)),
    }
}

fn invalid_value(field: &str, value: &str) -> CommandError {
    CommandError::InvalidArguments(format!("invalid value `{value}` for `{field}`"))
}
