use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::YgoError;

/// Text shown when a card has no ruling, tips or trivia page.
pub const NOT_AVAILABLE: &str = "Not available.";

/// An ordered (label, value) datum extracted from either source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldPair {
    pub label: String,
    pub value: String,
}

impl FieldPair {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Supplementary long-form content for a card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AdditionalInfoKind {
    Ruling,
    Tips,
    Trivia,
}

/// Where each kind of additional info lives in both sources
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindConfig {
    /// Wiki page prefix, joined with the card's page name
    pub page_prefix: &'static str,
    /// Column in the local `card` table
    pub column: &'static str,
}

impl AdditionalInfoKind {
    pub const ALL: [AdditionalInfoKind; 3] = [Self::Ruling, Self::Tips, Self::Trivia];

    pub fn config(&self) -> KindConfig {
        match self {
            Self::Ruling => KindConfig {
                page_prefix: "/wiki/Card_Rulings:",
                column: "ruling",
            },
            Self::Tips => KindConfig {
                page_prefix: "/wiki/Card_Tips:",
                column: "tips",
            },
            Self::Trivia => KindConfig {
                page_prefix: "/wiki/Card_Trivia:",
                column: "trivia",
            },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ruling => "ruling",
            Self::Tips => "tips",
            Self::Trivia => "trivia",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Ruling => "Rulings",
            Self::Tips => "Tips",
            Self::Trivia => "Trivia",
        }
    }
}

impl FromStr for AdditionalInfoKind {
    type Err = YgoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ruling" | "rulings" => Ok(Self::Ruling),
            "tips" | "tip" => Ok(Self::Tips),
            "trivia" => Ok(Self::Trivia),
            _ => Err(YgoError::UnknownKind(s.to_string())),
        }
    }
}

impl fmt::Display for AdditionalInfoKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Card info columns in canonical order, with the label the wiki uses for each.
///
/// Online extraction follows document order, which matches this order on the
/// wiki's card tables; offline results are emitted in exactly this order so
/// both sources line up row for row.
pub const INFO_COLUMNS: [(&str, &str); 18] = [
    ("attribute", "Attribute"),
    ("types", "Types"),
    ("type", "Type"),
    ("property", "Property"),
    ("level", "Level"),
    ("rank", "Rank"),
    ("pendulumScale", "Pendulum Scale"),
    ("atkdef", "ATK/DEF"),
    ("cardnum", "Card Number"),
    ("passcode", "Passcode"),
    ("limitText", "Limitation Text"),
    ("ritualSpell", "Ritual Spell Card required"),
    ("ritualMonster", "Ritual Monster required"),
    ("fusionMaterials", "Fusion Material"),
    ("synchroMaterial", "Synchro Material"),
    ("materials", "Materials"),
    ("summonedBy", "Summoned by the effect of"),
    ("effectTypes", "Card effect types"),
];

/// Banlist status columns in display order.
pub const STATUS_COLUMNS: [(&str, &str); 3] = [
    ("ocgStatus", "OCG"),
    ("tcgAdvStatus", "TCG Advanced"),
    ("tcgTrnStatus", "TCG Traditional"),
];

/// Map a raw status code from the local database to its display label.
pub fn status_label(raw: &str) -> &str {
    match raw {
        "U" => "Unlimited",
        other => other,
    }
}

/// Position of a display label in [`INFO_COLUMNS`].
pub fn canonical_position(label: &str) -> Option<usize> {
    INFO_COLUMNS.iter().position(|(_, l)| *l == label)
}
