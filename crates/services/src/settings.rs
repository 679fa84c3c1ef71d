//! Loading `DashboardSettings` from a JSON document and `COACH_*` variables.

use coach_core::model::{DashboardSettings, DashboardSettingsDraft};

use crate::error::SettingsLoadError;

pub const ENV_MIN_REPLY_DELAY_MS: &str = "COACH_MIN_REPLY_DELAY_MS";
pub const ENV_PER_CHAR_DELAY_MS: &str = "COACH_PER_CHAR_DELAY_MS";
pub const ENV_MAX_JITTER_MS: &str = "COACH_MAX_JITTER_MS";
pub const ENV_TYPING_FRAME_MS: &str = "COACH_TYPING_FRAME_MS";
pub const ENV_TODAY_TASK_LIMIT: &str = "COACH_TODAY_TASK_LIMIT";

/// # Errors
///
/// Returns `SettingsLoadError::Json` for malformed JSON or unknown keys.
pub fn draft_from_json(json: &str) -> Result<DashboardSettingsDraft, SettingsLoadError> {
    Ok(serde_json::from_str(json)?)
}

fn parse_var<T: std::str::FromStr>(name: &str, value: &str) -> Result<T, SettingsLoadError> {
    value
        .trim()
        .parse()
        .map_err(|_| SettingsLoadError::InvalidVar {
            name: name.to_owned(),
            value: value.to_owned(),
        })
}

/// Build a draft from `(name, value)` pairs; unrelated names are ignored.
///
/// # Errors
///
/// Returns `SettingsLoadError::InvalidVar` if a known variable is not a number.
pub fn draft_from_vars<I, K, V>(vars: I) -> Result<DashboardSettingsDraft, SettingsLoadError>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut draft = DashboardSettingsDraft::new();
    for (name, value) in vars {
        let (name, value) = (name.as_ref(), value.as_ref());
        match name {
            ENV_MIN_REPLY_DELAY_MS => draft.min_reply_delay_ms = Some(parse_var(name, value)?),
            ENV_PER_CHAR_DELAY_MS => draft.per_char_delay_ms = Some(parse_var(name, value)?),
            ENV_MAX_JITTER_MS => draft.max_jitter_ms = Some(parse_var(name, value)?),
            ENV_TYPING_FRAME_MS => draft.typing_frame_ms = Some(parse_var(name, value)?),
            ENV_TODAY_TASK_LIMIT => draft.today_task_limit = Some(parse_var(name, value)?),
            _ => {}
        }
    }
    Ok(draft)
}

/// Defaults, then the optional JSON document, then the process environment.
///
/// # Errors
///
/// Returns `SettingsLoadError` if any layer is malformed or the merged
/// result fails validation.
pub fn load(json: Option<&str>) -> Result<DashboardSettings, SettingsLoadError> {
    let file = match json {
        Some(json) => draft_from_json(json)?,
        None => DashboardSettingsDraft::new(),
    };
    let env = draft_from_vars(std::env::vars())?;
    let settings = file.merge(env).validate()?;
    tracing::debug!(?settings, "dashboard settings loaded");
    Ok(settings)
}
