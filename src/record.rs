use serde::{Deserialize, Serialize};

/// Columns every table must carry, in file order.
pub const BASE_COLUMNS: [&str; 11] = [
    "name",
    "url",
    "cr",
    "type",
    "size",
    "ac",
    "hp",
    "speed",
    "align",
    "legendary",
    "source",
];

/// Ability-score columns, filled in by the enricher.
pub const ABILITY_COLUMNS: [&str; 6] = ["str", "dex", "con", "int", "wis", "cha"];

/// One row of the monster table.
///
/// Field order matches the column order of the persisted file. Everything is
/// kept as the site renders it; nothing is normalized to numbers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonsterRecord {
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
    pub cr: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub size: String,
    pub ac: String,
    pub hp: String,
    pub speed: String,
    pub align: String,
    pub legendary: String,
    pub source: String,
    #[serde(default, rename = "str")]
    pub strength: Option<String>,
    #[serde(default, rename = "dex")]
    pub dexterity: Option<String>,
    #[serde(default, rename = "con")]
    pub constitution: Option<String>,
    #[serde(default, rename = "int")]
    pub intelligence: Option<String>,
    #[serde(default, rename = "wis")]
    pub wisdom: Option<String>,
    #[serde(default, rename = "cha")]
    pub charisma: Option<String>,
}

/// The six scores read from a detail page, in page order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbilityScores {
    pub strength: String,
    pub dexterity: String,
    pub constitution: String,
    pub intelligence: String,
    pub wisdom: String,
    pub charisma: String,
}

impl AbilityScores {
    /// Scores in page order: STR, DEX, CON, INT, WIS, CHA.
    pub fn from_array(scores: [String; 6]) -> Self {
        let [strength, dexterity, constitution, intelligence, wisdom, charisma] = scores;
        Self {
            strength,
            dexterity,
            constitution,
            intelligence,
            wisdom,
            charisma,
        }
    }
}

impl MonsterRecord {
    /// Detail link, if the listing provided a non-empty one.
    pub fn detail_url(&self) -> Option<&str> {
        self.url.as_deref().map(str::trim).filter(|u| !u.is_empty())
    }

    /// `str` is the marker for "already enriched".
    pub fn is_enriched(&self) -> bool {
        self.strength.as_deref().is_some_and(|s| !s.trim().is_empty())
    }

    pub fn is_enrichment_eligible(&self) -> bool {
        self.detail_url().is_some() && !self.is_enriched()
    }

    pub fn ability_scores(&self) -> Option<AbilityScores> {
        Some(AbilityScores {
            strength: self.strength.clone()?,
            dexterity: self.dexterity.clone()?,
            constitution: self.constitution.clone()?,
            intelligence: self.intelligence.clone()?,
            wisdom: self.wisdom.clone()?,
            charisma: self.charisma.clone()?,
        })
    }

    pub fn set_ability_scores(&mut self, scores: AbilityScores) {
        self.strength = Some(scores.strength);
        self.dexterity = Some(scores.dexterity);
        self.constitution = Some(scores.constitution);
        self.intelligence = Some(scores.intelligence);
        self.wisdom = Some(scores.wisdom);
        self.charisma = Some(scores.charisma);
    }
}
