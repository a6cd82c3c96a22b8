//! Widget kinds.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ValueError;

/// The kinds of widget the service can generate content for.
///
/// The wire representation is the lowercase name (`"flashcard"`, `"quiz"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum WidgetKind {
    /// Key/value study cards.
    Flashcard,
    /// Multiple-choice questions with a correct answer index.
    Quiz,
    /// A single block of text.
    Text,
    /// A single open question.
    Question,
    /// Commentary on a user's answer to a question widget.
    Answer,
}

impl WidgetKind {
    /// Every kind, in wire order.
    pub const ALL: [WidgetKind; 5] = [
        WidgetKind::Flashcard,
        WidgetKind::Quiz,
        WidgetKind::Text,
        WidgetKind::Question,
        WidgetKind::Answer,
    ];

    /// Lowercase wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            WidgetKind::Flashcard => "flashcard",
            WidgetKind::Quiz => "quiz",
            WidgetKind::Text => "text",
            WidgetKind::Question => "question",
            WidgetKind::Answer => "answer",
        }
    }
}

impl fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WidgetKind {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WidgetKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ValueError::UnknownWidgetKind(s.to_string()))
    }
}
