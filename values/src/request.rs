//! Inbound widget generation request.
//!
//! The wire format is the camelCase JSON object sent by the widget editor,
//! wrapped in a `{ "data": ... }` envelope. Every field is optional on the
//! wire: presence rules live in [`crate::validation`], not in the types.

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

use crate::error::ValueResult;
use crate::types::WidgetKind;

/// Request body envelope: `{ "data": WidgetRequest }`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WidgetEnvelope {
    /// The widget request itself.
    pub data: WidgetRequest,
}

/// A widget generation request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WidgetRequest {
    /// Widget title (3-50 characters).
    pub title: Option<String>,
    /// Caller-supplied system instructions for the provider (3-500 characters).
    pub system_instructions: Option<String>,
    /// Base user prompt (3-500 characters).
    pub prompt: Option<String>,
    /// Widget kind as sent by the caller; see [`WidgetKind`].
    #[serde(rename = "type")]
    pub widget_type: Option<String>,
    /// Sampling temperature in `[0, 1]`.
    pub creativity_level: Option<f64>,

    /// Description of the flashcard front.
    pub flashcard_key: Option<String>,
    /// Description of the flashcard back.
    pub flashcard_value: Option<String>,
    /// Description of a quiz question.
    pub quiz_key: Option<String>,
    /// Description of the quiz answers.
    pub quiz_value: Option<String>,
    /// Description of the text block.
    pub text_widget_value: Option<String>,
    /// Description of the question to ask.
    pub question_key: Option<String>,
    /// Instruction for commenting on an answer.
    pub question_value: Option<String>,
    /// The user's answer, for `answer` widgets.
    pub answer: Option<String>,

    /// Extra text appended to the prompt on refresh.
    pub custom_refresh_prompt: Option<String>,
    /// Ask the provider to avoid repeating `content`.
    pub is_quick_refresh: Option<bool>,
    /// Previously generated content.
    pub content: Option<WidgetContent>,
}

/// Previously generated widget content.
///
/// Structured widgets send back their items; text-like widgets may send a
/// plain string instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum WidgetContent {
    /// Ordered key/value items.
    Structured(Vec<ContentItem>),
    /// Raw text.
    Raw(String),
}

/// One previously generated item. Properties other than `key` and `value`
/// are ignored, and an item that is not an object has neither.
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct ContentItem {
    /// Item key, as produced by the provider.
    pub key: Option<serde_json::Value>,
    /// Item value, as produced by the provider.
    pub value: Option<serde_json::Value>,
}

impl From<serde_json::Value> for ContentItem {
    fn from(item: serde_json::Value) -> Self {
        match item {
            serde_json::Value::Object(mut fields) => Self {
                key: fields.remove("key"),
                value: fields.remove("value"),
            },
            _ => Self::default(),
        }
    }
}

impl<'de> Deserialize<'de> for ContentItem {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Self::from)
    }
}

/// Returns the string if it is present and non-empty.
pub fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

impl WidgetRequest {
    /// Parse the `type` field.
    ///
    /// Returns `Ok(None)` when no type was sent.
    pub fn kind(&self) -> ValueResult<Option<WidgetKind>> {
        present(&self.widget_type)
            .map(str::parse::<WidgetKind>)
            .transpose()
    }

    /// True when the caller asked for a quick refresh.
    pub fn quick_refresh(&self) -> bool {
        self.is_quick_refresh.unwrap_or(false)
    }

    /// Previously generated content, if any was sent. An empty raw string
    /// counts as absent; an empty item list does not.
    pub fn previous_content(&self) -> Option<&WidgetContent> {
        match &self.content {
            Some(WidgetContent::Raw(raw)) if raw.is_empty() => None,
            other => other.as_ref(),
        }
    }
}

impl ContentItem {
    /// Key rendered as text. Missing or `null` keys render as an empty string.
    pub fn key_text(&self) -> String {
        render(self.key.as_ref())
    }

    /// Value rendered as text, or `None` when missing or `null`.
    pub fn value_text(&self) -> Option<String> {
        match &self.value {
            None | Some(serde_json::Value::Null) => None,
            Some(v) => Some(render(Some(v))),
        }
    }
}

fn render(value: Option<&serde_json::Value>) -> String {
    match value {
        None | Some(serde_json::Value::Null) => String::new(),
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
