use serde::Deserialize;
use serde_with::serde_as;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(default, deny_unknown_fields)]
pub struct IndexerSettings {
    pub sync: SyncSettings,
    pub backfill: BackfillSettings,
    pub writer: WriterSettings,
    pub explorer: ExplorerSettings,
}

#[serde_as]
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct SyncSettings {
    pub enabled: bool,

    #[serde_as(as = "serde_with::DurationSeconds<u64>")]
    pub interval: Duration,

    /// Number of blocks re-scanned on every cycle below the persisted maximum.
    pub rewind_blocks: u64,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            interval: Duration::from_secs(8),
            rewind_blocks: 10,
        }
    }
}

#[serde_as]
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct BackfillSettings {
    pub enabled: bool,

    #[serde_as(as = "serde_with::DurationMilliSeconds<u64>")]
    pub interval: Duration,
}

impl Default for BackfillSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            interval: Duration::from_millis(2000),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct WriterSettings {
    pub chunk_size: usize,
}

impl Default for WriterSettings {
    fn default() -> Self {
        Self { chunk_size: 200 }
    }
}

#[serde_as]
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ExplorerSettings {
    #[serde(default = "default_timeout")]
    #[serde_as(as = "serde_with::DurationSeconds<u64>")]
    pub timeout: Duration,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Linux; Android 10; Android SDK built for x86 Build/OSM1.180201.023) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/77.0.3865.92 Mobile Safari/537.36"
        .to_string()
}

impl Default for ExplorerSettings {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}
