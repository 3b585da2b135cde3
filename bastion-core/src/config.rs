use std::path::PathBuf;

use anyhow::anyhow;

use bastion_sanctions::mute::DEFAULT_MUTED_ROLE_NAME;

pub const DEFAULT_WARN_FILE: &str = "warns.json";
pub const DEFAULT_TICKET_CATEGORY_NAME: &str = "tickets";

/// Runtime settings read from the environment (and `.env`).
#[derive(Clone, Debug)]
pub struct BotConfig {
    pub token: String,
    /// Guild for fast command registration. Commands go global when unset.
    pub guild_id: Option<u64>,
    pub log_channel_id: Option<u64>,
    pub staff_role_id: Option<u64>,
    pub warn_file: PathBuf,
    pub muted_role_name: String,
    pub ticket_category_name: String,
}

impl BotConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key lookup. Zero or unparsable ids count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let token = first_non_empty(&lookup, &["DISCORD_TOKEN", "BOT_TOKEN"])
            .ok_or_else(|| anyhow!("DISCORD_TOKEN is not set"))?;

        Ok(Self {
            token,
            guild_id: env_id(&lookup, &["DISCORD_GUILD_ID", "GUILD_ID"]),
            log_channel_id: env_id(&lookup, &["LOG_CHANNEL_ID"]),
            staff_role_id: env_id(&lookup, &["STAFF_ROLE_ID"]),
            warn_file: first_non_empty(&lookup, &["WARN_FILE"])
                .map_or_else(|| PathBuf::from(DEFAULT_WARN_FILE), PathBuf::from),
            muted_role_name: first_non_empty(&lookup, &["MUTED_ROLE_NAME"])
                .unwrap_or_else(|| DEFAULT_MUTED_ROLE_NAME.to_owned()),
            ticket_category_name: first_non_empty(&lookup, &["TICKET_CATEGORY_NAME"])
                .unwrap_or_else(|| DEFAULT_TICKET_CATEGORY_NAME.to_owned()),
        })
    }
}

fn first_non_empty(lookup: &impl Fn(&str) -> Option<String>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| lookup(*key))
        .map(|value| value.trim().to_owned())
        .find(|value| !value.is_empty())
}

fn env_id(lookup: &impl Fn(&str) -> Option<String>, keys: &[&str]) -> Option<u64> {
    first_non_empty(lookup, keys)
        .and_then(|value| value.parse::<u64>().ok())
        .filter(|id| *id != 0)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::path::PathBuf;

    use super::BotConfig;

    fn config_from(pairs: &[(&str, &str)]) -> anyhow::Result<BotConfig> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
            .collect();
        BotConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn token_is_required() {
        assert!(config_from(&[]).is_err());
        assert!(config_from(&[("DISCORD_TOKEN", "   ")]).is_err());
    }

    #[test]
    fn defaults_apply_when_optional_values_are_missing() {
        let config = config_from(&[("DISCORD_TOKEN", "abc")]).unwrap();

        assert_eq!(config.token, "abc");
        assert_eq!(config.guild_id, None);
        assert_eq!(config.log_channel_id, None);
        assert_eq!(config.staff_role_id, None);
        assert_eq!(config.warn_file, PathBuf::from("warns.json"));
        assert_eq!(config.muted_role_name, "Muted");
        assert_eq!(config.ticket_category_name, "tickets");
    }

    #[test]
    fn accepts_legacy_variable_names() {
        let config = config_from(&[
            ("BOT_TOKEN", "legacy"),
            ("GUILD_ID", "123"),
            ("LOG_CHANNEL_ID", "456"),
        ])
        .unwrap();

        assert_eq!(config.token, "legacy");
        assert_eq!(config.guild_id, Some(123));
        assert_eq!(config.log_channel_id, Some(456));
    }

    #[test]
    fn zero_or_garbage_ids_are_unset() {
        let config = config_from(&[
            ("DISCORD_TOKEN", "abc"),
            ("DISCORD_GUILD_ID", "0"),
            ("LOG_CHANNEL_ID", "general"),
            ("STAFF_ROLE_ID", "789"),
        ])
        .unwrap();

        assert_eq!(config.guild_id, None);
        assert_eq!(config.log_channel_id, None);
        assert_eq!(config.staff_role_id, Some(789));
    }
}
