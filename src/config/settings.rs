//! Application settings and configuration structures.

use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Root configuration structure containing all coordinator settings.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Chat message rules (length limit, protocol version)
    pub chat: ChatSettings,

    /// Presence state machine timing
    pub presence: PresenceSettings,

    /// Content resolution pipeline settings
    pub content: ContentSettings,

    /// Cache sizing and TTLs
    pub cache: CacheSettings,

    /// Snowflake ID generator settings
    pub snowflake: SnowflakeSettings,

    /// Current environment (development, staging, production)
    pub environment: String,
}

/// Message handling configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatSettings {
    /// Maximum message content length in characters
    pub max_message_length: usize,

    /// Protocol version the server speaks; clients declaring a different
    /// version get an out-of-sync notice on connect
    pub protocol_version: String,
}

/// Presence state machine configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PresenceSettings {
    /// Grace period before a disconnect is announced to rooms, in seconds
    pub disconnect_grace_secs: u64,

    /// Window within which activity keeps a connected user Active, in minutes
    pub activity_window_mins: i64,

    /// Window within which a mentioned user is assumed to have seen the
    /// message live, in minutes
    pub mention_read_window_mins: i64,

    /// Interval between idle-demotion sweep passes, in seconds
    pub sweep_interval_secs: u64,
}

impl PresenceSettings {
    pub fn disconnect_grace(&self) -> Duration {
        Duration::from_secs(self.disconnect_grace_secs)
    }

    pub fn activity_window(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.activity_window_mins)
    }

    pub fn mention_read_window(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.mention_read_window_mins)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

/// Content resolution configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentSettings {
    /// Per-provider fetch timeout in seconds
    pub provider_timeout_secs: u64,

    /// Provider names excluded from the candidate set entirely
    pub disabled_providers: Vec<String>,
}

impl ContentSettings {
    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.provider_timeout_secs)
    }
}

/// Cache configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    /// Membership verdict TTL in seconds; long, since joins/leaves are
    /// rare and entries are invalidated explicitly on membership changes
    pub membership_ttl_secs: u64,

    /// Most-recent-N messages kept per room
    pub recent_messages_per_room: usize,
}

impl CacheSettings {
    pub fn membership_ttl(&self) -> Duration {
        Duration::from_secs(self.membership_ttl_secs)
    }
}

/// Snowflake ID generator configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SnowflakeSettings {
    /// Worker ID (0-1023)
    pub worker_id: u64,
}

impl Settings {
    /// Load settings from environment variables and configuration files.
    ///
    /// The loading order is:
    /// 1. Built-in defaults
    /// 2. config/default.toml (base configuration)
    /// 3. config/{RUN_ENV}.toml (environment-specific overrides)
    /// 4. Environment variables (highest priority)
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        // Determine the running environment
        let environment = std::env::var("RUN_ENV").unwrap_or_else(|_| "development".into());

        Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("chat.max_message_length", 2000_i64)?
            .set_default("chat.protocol_version", "1.0")?
            .set_default("presence.disconnect_grace_secs", 10_i64)?
            .set_default("presence.activity_window_mins", 5_i64)?
            .set_default("presence.mention_read_window_mins", 10_i64)?
            .set_default("presence.sweep_interval_secs", 300_i64)?
            .set_default("content.provider_timeout_secs", 5_i64)?
            .set_default("content.disabled_providers", Vec::<String>::new())?
            .set_default("cache.membership_ttl_secs", 1800_i64)?
            .set_default("cache.recent_messages_per_room", 100_i64)?
            .set_default("snowflake.worker_id", 1_i64)?
            // Load from config files
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Load from environment variables
            // APP__CHAT__MAX_MESSAGE_LENGTH=4000 -> chat.max_message_length = 4000
            .add_source(
                Environment::default()
                    .prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            chat: ChatSettings {
                max_message_length: 2000,
                protocol_version: "1.0".into(),
            },
            presence: PresenceSettings {
                disconnect_grace_secs: 10,
                activity_window_mins: 5,
                mention_read_window_mins: 10,
                sweep_interval_secs: 300,
            },
            content: ContentSettings {
                provider_timeout_secs: 5,
                disabled_providers: Vec::new(),
            },
            cache: CacheSettings {
                membership_ttl_secs: 1800,
                recent_messages_per_room: 100,
            },
            snowflake: SnowflakeSettings { worker_id: 1 },
            environment: "development".into(),
        }
    }
}
