/// Shared types used across the codebase

use serde::{Deserialize, Deserializer, Serialize};

/// Storage collection holding per-user configuration documents
pub const STORAGE_CONFIGURATION: &str = "configuration";

/// Storage key of the per-user game configuration
pub const STORAGE_GAME_CONFIG_KEY: &str = "game_configuration";

/// Account metadata payloads are limited to 16KB per user
pub const METADATA_SIZE_LIMIT: usize = 16384;

/// Game configuration document, shared baseline and per-user copies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub welcome_message: String,
    pub xp_rate: f64,
    pub rarity: Rarity,
}

/// Loot tiers, fixed at four
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rarity {
    pub common: RarityItems,
    pub uncommon: RarityItems,
    pub rare: RarityItems,
    pub legendary: RarityItems,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RarityItems {
    /// Drop chance in `[0, 1]`
    pub chance: f64,
    pub items: Vec<Item>,
}

/// A single item. Zero or empty stats mean the same as absent ones: they
/// decode to `None` and are left out of the encoded form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    #[serde(default, skip_serializing_if = "is_unset", deserialize_with = "nonzero_stat")]
    pub damage: Option<i64>,
    #[serde(default, skip_serializing_if = "is_unset", deserialize_with = "nonzero_stat")]
    pub defense: Option<i64>,
    pub durability: i64,
    #[serde(default, skip_serializing_if = "is_blank", deserialize_with = "nonblank_ability")]
    pub special_ability: Option<String>,
}

fn nonzero_stat<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<i64>::deserialize(deserializer)?.filter(|v| *v != 0))
}

fn nonblank_ability<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.filter(|v| !v.is_empty()))
}

fn is_unset(value: &Option<i64>) -> bool {
    matches!(value, None | Some(0))
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, str::is_empty)
}

/// Response status reported by mutating RPCs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
}

/// Outcome of an authentication as reported by the host
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    /// True only on the login that created the account
    pub created: bool,
}

impl Session {
    pub fn created() -> Self {
        Self { created: true }
    }

    pub fn existing() -> Self {
        Self { created: false }
    }
}
