use serde::{Deserialize, Serialize};

use super::deserializers::{number_or_string, optional_token};

/// Card category on the wiki's article list endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardCategory {
    Tcg,
    Ocg,
}

impl CardCategory {
    /// Both categories, in the order they are indexed
    pub const ALL: [CardCategory; 2] = [Self::Tcg, Self::Ocg];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tcg => "TCG_cards",
            Self::Ocg => "OCG_cards",
        }
    }
}

/// One page of the article list endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleListPage {
    #[serde(default)]
    pub items: Vec<ArticleItem>,
    /// Continuation token; absent on the last page
    #[serde(default, deserialize_with = "optional_token", skip_serializing_if = "Option::is_none")]
    pub offset: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleItem {
    #[serde(deserialize_with = "number_or_string")]
    pub id: u64,
    /// Card name
    pub title: String,
    /// Page path relative to the wiki root, e.g. `/wiki/Dark_Magician`
    pub url: String,
}
