//! Fighter generation
//!
//! Fighters are described by an external generator (an LLM behind HTTP).
//! Whatever goes wrong out there stops at [`generate_fighter`]: the caller
//! always gets a complete fighter, falling back to a fixed default profile.

mod llm;

pub use llm::{extract_json, ApiFormat, LlmFighterGenerator};

use crate::fighter::{Fighter, FighterStats, UltimateMove};
use crate::types::Side;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Allowed stat ranges for generated fighters
pub const HP_RANGE: (u32, u32) = (50, 200);
pub const ATTACK_RANGE: (u32, u32) = (10, 50);
pub const DEFENSE_RANGE: (u32, u32) = (5, 30);
pub const SPEED_RANGE: (u32, u32) = (1, 20);

/// Ultimate multiplier of generated fighters
pub const GENERATED_ULTIMATE_MULTIPLIER: f64 = 2.0;
/// Ultimate multiplier of the fallback fighter
pub const FALLBACK_ULTIMATE_MULTIPLIER: f64 = 1.5;

/// Suggested name when the generator fails
pub const FALLBACK_NAME: &str = "Angry Potato";
/// Suggested name when the generator answers with nothing
pub const EMPTY_SUGGESTION_NAME: &str = "Wild Cabbage";

const DEFAULT_EMOJI: &str = "🥬";
const DEFAULT_IMAGE_KEYWORD: &str = "vegetable";

/// Errors from fighter generation
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },
    #[error("Could not parse fighter profile: {0}")]
    Parse(String),
    #[error("Invalid fighter profile: {0}")]
    Validation(String),
    #[error("{0} not set")]
    MissingKey(&'static str),
}

/// Fighter description as produced by a generator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FighterProfile {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub emoji: String,
    pub hp: i64,
    pub attack: i64,
    pub defense: i64,
    pub speed: i64,
    #[serde(default)]
    pub ultimate_name: String,
    #[serde(default)]
    pub ultimate_desc: String,
    #[serde(default)]
    pub highlight: String,
    #[serde(default)]
    pub image_keyword: String,
}

fn clamp_stat(value: i64, (min, max): (u32, u32)) -> u32 {
    value.clamp(min as i64, max as i64) as u32
}

fn or_default(value: String, default: &str) -> String {
    if value.trim().is_empty() {
        default.to_string()
    } else {
        value
    }
}

impl FighterProfile {
    /// Reject profiles that cannot become a fighter
    pub fn validate(&self) -> Result<(), GenerationError> {
        if self.name.trim().is_empty() {
            return Err(GenerationError::Validation("name is empty".to_string()));
        }
        if self.hp <= 0 {
            return Err(GenerationError::Validation(format!("hp must be positive, got {}", self.hp)));
        }
        Ok(())
    }

    /// Build a full-health fighter, clamping stats into the allowed ranges
    pub fn into_fighter(self, side: Side) -> Result<Fighter, GenerationError> {
        self.validate()?;

        let stats = FighterStats::new(
            clamp_stat(self.hp, HP_RANGE),
            clamp_stat(self.attack, ATTACK_RANGE),
            clamp_stat(self.defense, DEFENSE_RANGE),
            clamp_stat(self.speed, SPEED_RANGE),
        );
        let ultimate_name = or_default(self.ultimate_name, &format!("{} Strike", self.name.trim()));
        let ultimate = UltimateMove::new(ultimate_name, GENERATED_ULTIMATE_MULTIPLIER)
            .with_description(self.ultimate_desc);

        Ok(Fighter::new(side, self.name.trim(), stats, ultimate)
            .with_description(self.description)
            .with_emoji(or_default(self.emoji, DEFAULT_EMOJI))
            .with_image_keyword(or_default(self.image_keyword, DEFAULT_IMAGE_KEYWORD))
            .with_highlight(self.highlight))
    }
}

/// Source of fighter profiles and name suggestions
#[async_trait]
pub trait FighterGenerator: Send + Sync {
    /// Describe a fighter based on free text (usually a vegetable name)
    async fn generate(&self, seed: &str, side: Side) -> Result<FighterProfile, GenerationError>;

    /// Suggest a random vegetable name
    async fn suggest_name(&self) -> Result<String, GenerationError>;
}

/// Generator used without network access: every fighter is the fallback
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineGenerator;

#[async_trait]
impl FighterGenerator for OfflineGenerator {
    async fn generate(&self, _seed: &str, _side: Side) -> Result<FighterProfile, GenerationError> {
        Err(GenerationError::MissingKey("LLM_API_KEY"))
    }

    async fn suggest_name(&self) -> Result<String, GenerationError> {
        Err(GenerationError::MissingKey("LLM_API_KEY"))
    }
}

/// The fixed fighter used whenever generation fails
///
/// Named after the seed text so the player still recognizes their pick.
pub fn fallback_fighter(seed: &str, side: Side) -> Fighter {
    let name = if seed.trim().is_empty() {
        "Mystery Vegetable"
    } else {
        seed.trim()
    };

    Fighter::new(
        side,
        name,
        FighterStats::new(100, 20, 10, 10),
        UltimateMove::new("Mystery Strike", FALLBACK_ULTIMATE_MULTIPLIER)
            .with_description("Deals ordinary damage."),
    )
    .with_description("A vegetable brimming with mysterious power.")
    .with_emoji("🥗")
    .with_image_keyword(DEFAULT_IMAGE_KEYWORD)
    .with_highlight("Contains unknown nutrients")
}

/// Generate a fighter, never failing
pub async fn generate_fighter(generator: &dyn FighterGenerator, seed: &str, side: Side) -> Fighter {
    match generator.generate(seed, side).await.and_then(|p| p.into_fighter(side)) {
        Ok(fighter) => {
            tracing::info!(seed, name = %fighter.name, ?side, "fighter generated");
            fighter
        }
        Err(err) => {
            tracing::warn!(seed, error = %err, "fighter generation failed, using fallback");
            fallback_fighter(seed, side)
        }
    }
}

/// Suggest a vegetable name, never failing
pub async fn random_vegetable_name(generator: &dyn FighterGenerator) -> String {
    match generator.suggest_name().await {
        Ok(name) => {
            let name = name.trim().trim_matches(|c| c == '"' || c == '\'').trim();
            or_default(name.to_string(), EMPTY_SUGGESTION_NAME)
        }
        Err(err) => {
            tracing::warn!(error = %err, "name suggestion failed");
            FALLBACK_NAME.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StubGenerator {
        profile: Option<FighterProfile>,
        name: Option<String>,
    }

    #[async_trait]
    impl FighterGenerator for StubGenerator {
        async fn generate(&self, _seed: &str, _side: Side) -> Result<FighterProfile, GenerationError> {
            self.profile
                .clone()
                .ok_or_else(|| GenerationError::Parse("no profile".to_string()))
        }

        async fn suggest_name(&self) -> Result<String, GenerationError> {
            self.name
                .clone()
                .ok_or_else(|| GenerationError::Api { status: 500, body: String::new() })
        }
    }

    fn carrot_profile() -> FighterProfile {
        FighterProfile {
            name: "Carrot Knight".to_string(),
            description: "Crunchy and orange.".to_string(),
            emoji: "🥕".to_string(),
            hp: 120,
            attack: 25,
            defense: 12,
            speed: 9,
            ultimate_name: "Carotene Cannon".to_string(),
            ultimate_desc: "A blast of vitamin A.".to_string(),
            highlight: "Rich in beta-carotene".to_string(),
            image_keyword: "carrot".to_string(),
        }
    }

    #[test]
    fn test_profile_into_fighter() {
        let fighter = carrot_profile().into_fighter(Side::Player).unwrap();
        assert_eq!(fighter.name, "Carrot Knight");
        assert_eq!(fighter.stats.hp(), 120);
        assert_eq!(fighter.stats.max_hp(), 120);
        assert_eq!(fighter.emoji, "🥕");
        assert!((fighter.ultimate.multiplier - 2.0).abs() < f64::EPSILON);
        assert!(fighter.status_effects().is_empty());
    }

    #[test]
    fn test_stats_are_clamped() {
        let mut profile = carrot_profile();
        profile.hp = 999;
        profile.attack = -4;
        profile.defense = 100;
        profile.speed = 0;

        let fighter = profile.into_fighter(Side::Enemy).unwrap();
        assert_eq!(fighter.stats.max_hp(), 200);
        assert_eq!(fighter.stats.attack, 10);
        assert_eq!(fighter.stats.defense, 30);
        assert_eq!(fighter.stats.speed, 1);
    }

    #[test]
    fn test_invalid_profiles_rejected() {
        let mut profile = carrot_profile();
        profile.name = "  ".to_string();
        assert!(matches!(profile.validate(), Err(GenerationError::Validation(_))));

        let mut profile = carrot_profile();
        profile.hp = 0;
        assert!(profile.into_fighter(Side::Player).is_err());
    }

    #[test]
    fn test_missing_flavor_gets_defaults() {
        let mut profile = carrot_profile();
        profile.emoji = String::new();
        profile.image_keyword = String::new();
        profile.ultimate_name = String::new();

        let fighter = profile.into_fighter(Side::Player).unwrap();
        assert_eq!(fighter.emoji, "🥬");
        assert_eq!(fighter.image_keyword, "vegetable");
        assert_eq!(fighter.ultimate.name, "Carrot Knight Strike");
    }

    #[test]
    fn test_profile_json_field_names() {
        let json = r#"{"name":"Leek","hp":80,"attack":15,"defense":8,"speed":12,
            "ultimateName":"Onion Ring","imageKeyword":"leek"}"#;
        let profile: FighterProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.ultimate_name, "Onion Ring");
        assert_eq!(profile.image_keyword, "leek");
        assert!(profile.highlight.is_empty());
    }

    #[test]
    fn test_fallback_fighter() {
        let fighter = fallback_fighter("Spicy Pepper", Side::Enemy);
        assert_eq!(fighter.name, "Spicy Pepper");
        assert_eq!(fighter.side, Side::Enemy);
        assert_eq!(fighter.stats.hp(), 100);
        assert_eq!(fighter.stats.attack, 20);
        assert_eq!(fighter.stats.defense, 10);
        assert_eq!(fighter.stats.speed, 10);
        assert!((fighter.ultimate.multiplier - 1.5).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_generate_fighter_success() {
        let generator = StubGenerator {
            profile: Some(carrot_profile()),
            name: None,
        };
        let fighter = generate_fighter(&generator, "carrot", Side::Player).await;
        assert_eq!(fighter.name, "Carrot Knight");
    }

    #[tokio::test]
    async fn test_generate_fighter_falls_back() {
        let fighter = generate_fighter(&OfflineGenerator, "Kale", Side::Player).await;
        assert_eq!(fighter, fallback_fighter("Kale", Side::Player));
    }

    #[tokio::test]
    async fn test_invalid_profile_falls_back() {
        let mut profile = carrot_profile();
        profile.hp = -5;
        let generator = StubGenerator {
            profile: Some(profile),
            name: None,
        };
        let fighter = generate_fighter(&generator, "carrot", Side::Enemy).await;
        assert_eq!(fighter.stats.max_hp(), 100);
        assert_eq!(fighter.name, "carrot");
    }

    #[tokio::test]
    async fn test_random_vegetable_name() {
        let generator = StubGenerator {
            profile: None,
            name: Some(" \"Iron Spinach\"\n".to_string()),
        };
        assert_eq!(random_vegetable_name(&generator).await, "Iron Spinach");

        let generator = StubGenerator {
            profile: None,
            name: Some("   ".to_string()),
        };
        assert_eq!(random_vegetable_name(&generator).await, EMPTY_SUGGESTION_NAME);

        assert_eq!(random_vegetable_name(&OfflineGenerator).await, FALLBACK_NAME);
    }
}
