use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};

use url::Url;

use crate::error::ConfigError;
use crate::medicover::constants::DEFAULT_API_URL as MEDICOVER_API_URL;
use crate::models::selector::DoctorSelector;
use crate::models::template::MessageTemplate;
use crate::notify::pushover::DEFAULT_API_URL as PUSHOVER_API_URL;

pub const DEFAULT_CONFIG_PATH: &str = "~/.medisnip.env";
const DEFAULT_NOTIFY_DB: &str = "~/.medisnip-notified.json";
const DEFAULT_LOOKUP_DAYS: u32 = 14;
pub const MAX_LOOKUP_DAYS: u32 = 3650;
const DEFAULT_TITLE: &str = "MediSnip";

pub const CARD_ID: &str = "MEDICOVER_CARD_ID";
pub const PASSWORD: &str = "MEDICOVER_PASSWORD";
pub const API_URL: &str = "MEDICOVER_API_URL";
pub const DOCTOR_LOCATOR_ID: &str = "MEDISNIP_DOCTOR_LOCATOR_ID";
pub const LOOKUP_TIME_DAYS: &str = "MEDISNIP_LOOKUP_TIME_DAYS";
pub const NOTIFY_DB: &str = "MEDISNIP_NOTIFY_DB";
pub const PUSHOVER_API_TOKEN: &str = "PUSHOVER_API_TOKEN";
pub const PUSHOVER_USER_KEY: &str = "PUSHOVER_USER_KEY";
pub const PUSHOVER_MESSAGE_TEMPLATE: &str = "PUSHOVER_MESSAGE_TEMPLATE";
pub const PUSHOVER_TITLE: &str = "PUSHOVER_TITLE";
pub const PUSHOVER_URL: &str = "PUSHOVER_API_URL";

const KNOWN_KEYS: [&str; 11] = [
    CARD_ID,
    PASSWORD,
    API_URL,
    DOCTOR_LOCATOR_ID,
    LOOKUP_TIME_DAYS,
    NOTIFY_DB,
    PUSHOVER_API_TOKEN,
    PUSHOVER_USER_KEY,
    PUSHOVER_MESSAGE_TEMPLATE,
    PUSHOVER_TITLE,
    PUSHOVER_URL,
];

/// Flat `KEY=value` settings: the config file, overridden by the process
/// environment for the keys we know about.
#[derive(Debug, Clone, Default)]
pub struct ConfigMap {
    values: HashMap<String, String>,
}

impl ConfigMap {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let unreadable = |source| ConfigError::Unreadable {
            path: path.to_path_buf(),
            source,
        };

        let mut values = HashMap::new();
        for item in dotenv::from_path_iter(path).map_err(unreadable)? {
            let (key, value) = item.map_err(unreadable)?;
            values.insert(key, value);
        }

        for key in KNOWN_KEYS {
            if let Ok(value) = env::var(key) {
                values.insert(key.to_string(), value);
            }
        }

        Ok(ConfigMap { values })
    }

    #[cfg(test)]
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        ConfigMap {
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    fn require(&self, key: &'static str) -> Result<&str, ConfigError> {
        self.get(key).ok_or(ConfigError::MissingKey(key))
    }

    fn url_or(&self, key: &'static str, default: &str) -> Result<Url, ConfigError> {
        let raw = self.get(key).unwrap_or(default);
        Url::parse(raw).map_err(|e| ConfigError::InvalidValue {
            key,
            reason: e.to_string(),
        })
    }
}

/// Expands a leading `~` to the home directory.
pub fn expand_home(path: &str) -> PathBuf {
    let rest = match path.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest.trim_start_matches('/'),
        _ => return PathBuf::from(path),
    };
    match dirs::home_dir() {
        Some(home) if rest.is_empty() => home,
        Some(home) => home.join(rest),
        None => PathBuf::from(path),
    }
}

#[derive(Debug, Clone)]
pub struct MedicoverSettings {
    pub card_id: String,
    pub password: String,
    pub api_url: Url,
}

impl MedicoverSettings {
    pub fn from_config(config: &ConfigMap) -> Result<Self, ConfigError> {
        let mut api_url = config.url_or(API_URL, MEDICOVER_API_URL)?;
        // operation names are joined onto the base
        if !api_url.path().ends_with('/') {
            let path = format!("{}/", api_url.path());
            api_url.set_path(&path);
        }

        Ok(MedicoverSettings {
            card_id: config.require(CARD_ID)?.to_string(),
            password: config.require(PASSWORD)?.to_string(),
            api_url,
        })
    }
}

#[derive(Debug, Clone)]
pub struct PushoverSettings {
    pub api_url: Url,
    pub api_token: String,
    pub user_key: String,
}

/// Everything check mode needs besides the session.
#[derive(Debug, Clone)]
pub struct CheckSettings {
    pub selector: DoctorSelector,
    pub lookup_days: u32,
    pub ledger_path: PathBuf,
    pub template: MessageTemplate,
    pub title: String,
    pub pushover: PushoverSettings,
}

impl CheckSettings {
    pub fn from_config(config: &ConfigMap) -> Result<Self, ConfigError> {
        let selector: DoctorSelector = config.require(DOCTOR_LOCATOR_ID)?.parse()?;

        let lookup_days = match config.get(LOOKUP_TIME_DAYS) {
            None => DEFAULT_LOOKUP_DAYS,
            Some(raw) => match raw.parse::<u32>() {
                Ok(days) if (1..=MAX_LOOKUP_DAYS).contains(&days) => days,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: LOOKUP_TIME_DAYS,
                        reason: format!(
                            "expected between 1 and {MAX_LOOKUP_DAYS} days, got {raw:?}"
                        ),
                    });
                }
            },
        };

        let template: MessageTemplate = config.require(PUSHOVER_MESSAGE_TEMPLATE)?.parse()?;

        Ok(CheckSettings {
            selector,
            lookup_days,
            ledger_path: expand_home(config.get(NOTIFY_DB).unwrap_or(DEFAULT_NOTIFY_DB)),
            template,
            title: config.get(PUSHOVER_TITLE).unwrap_or(DEFAULT_TITLE).to_string(),
            pushover: PushoverSettings {
                api_url: config.url_or(PUSHOVER_URL, PUSHOVER_API_URL)?,
                api_token: config.require(PUSHOVER_API_TOKEN)?.to_string(),
                user_key: config.require(PUSHOVER_USER_KEY)?.to_string(),
            },
        })
    }
}
