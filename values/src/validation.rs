//! Rules-based field validation.
//!
//! Validators never fail: they return the error message for a field, or an
//! empty string when the field is fine. [`validate_all_fields`] aggregates the
//! messages into an [`ErrorMap`] in groups, so a failing field drags its
//! whole group into the map (with empty messages for the passing members).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::request::{present, WidgetRequest};
use crate::types::WidgetKind;
use crate::widget::profile_for;

/// Length rule for a string field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StringRule {
    /// Reject missing or empty values.
    pub required: bool,
    /// Minimum length in characters (0 disables the check).
    pub min_length: usize,
    /// Maximum length in characters (0 disables the check).
    pub max_length: usize,
    /// Human readable name used in messages.
    pub field_name: &'static str,
}

/// Range rule for a numeric field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumberRule {
    /// Reject missing values. Zero counts as provided.
    pub required: bool,
    /// Inclusive lower bound.
    pub min_value: Option<f64>,
    /// Inclusive upper bound.
    pub max_value: Option<f64>,
    /// Human readable name used in messages.
    pub field_name: &'static str,
}

impl StringRule {
    /// Required field with a 3..=`max` character length.
    pub const fn required(field_name: &'static str, max_length: usize) -> Self {
        Self {
            required: true,
            min_length: 3,
            max_length,
            field_name,
        }
    }
}

pub const TITLE_RULE: StringRule = StringRule::required("Widget title", 50);
pub const SYSTEM_INSTRUCTIONS_RULE: StringRule = StringRule::required("System instructions", 500);
pub const PROMPT_RULE: StringRule = StringRule::required("Prompt", 500);
pub const TYPE_RULE: StringRule = StringRule::required("Type", 200);
pub const CREATIVITY_LEVEL_RULE: NumberRule = NumberRule {
    required: false,
    min_value: Some(0.0),
    max_value: Some(1.0),
    field_name: "Creativity level",
};

/// Validate a string field against `rule`.
pub fn validate_field(value: Option<&str>, rule: &StringRule) -> String {
    let value = value.filter(|v| !v.is_empty());

    let Some(value) = value else {
        if rule.required {
            return format!("{} is required", rule.field_name);
        }
        return String::new();
    };

    let length = value.chars().count();
    if rule.min_length > 0 && length < rule.min_length {
        return format!(
            "{} must be at least {} characters long",
            rule.field_name, rule.min_length
        );
    }
    if rule.max_length > 0 && length > rule.max_length {
        return format!(
            "{} must be less than {} characters long",
            rule.field_name, rule.max_length
        );
    }
    String::new()
}

/// Validate a numeric field against `rule`.
pub fn validate_number_field(value: Option<f64>, rule: &NumberRule) -> String {
    let Some(value) = value else {
        if rule.required {
            return format!("{} is required", rule.field_name);
        }
        return String::new();
    };

    if let Some(min) = rule.min_value {
        if value < min {
            return format!("{} must be at least {}", rule.field_name, min);
        }
    }
    if let Some(max) = rule.max_value {
        if value > max {
            return format!("{} must be less than {}", rule.field_name, max);
        }
    }
    String::new()
}

/// Field name to error message. An empty message means the field passed but
/// was reported alongside a failing member of its group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct ErrorMap(BTreeMap<String, String>);

impl ErrorMap {
    /// Empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert every entry of `group` if at least one of them carries a message.
    pub fn insert_group<'a>(&mut self, group: impl IntoIterator<Item = (&'a str, String)>) {
        let group: Vec<(&str, String)> = group.into_iter().collect();
        if group.iter().any(|(_, message)| !message.is_empty()) {
            for (field, message) in group {
                self.0.insert(field.to_string(), message);
            }
        }
    }

    /// True when no group failed.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of reported fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Message for `field`, if it was reported.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// True when `field` was reported (possibly with an empty message).
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Reported fields with a non-empty message.
    pub fn failing_fields(&self) -> impl Iterator<Item = &str> {
        self.0
            .iter()
            .filter(|(_, message)| !message.is_empty())
            .map(|(field, _)| field.as_str())
    }
}

fn validate_type(request: &WidgetRequest) -> String {
    let message = validate_field(present(&request.widget_type), &TYPE_RULE);
    if !message.is_empty() {
        return message;
    }
    match request.kind() {
        Ok(_) => String::new(),
        Err(_) => {
            let known: Vec<&str> = WidgetKind::ALL.iter().map(|k| k.as_str()).collect();
            format!("{} must be one of {}", TYPE_RULE.field_name, known.join(", "))
        }
    }
}

/// Validate a whole request.
///
/// The universal fields form one group. The type-specific fields of the
/// requested kind form a second group; `answer` widgets have none.
pub fn validate_all_fields(request: &WidgetRequest) -> ErrorMap {
    let mut errors = ErrorMap::new();

    errors.insert_group([
        ("title", validate_field(present(&request.title), &TITLE_RULE)),
        (
            "systemInstructions",
            validate_field(
                present(&request.system_instructions),
                &SYSTEM_INSTRUCTIONS_RULE,
            ),
        ),
        ("prompt", validate_field(present(&request.prompt), &PROMPT_RULE)),
        ("type", validate_type(request)),
        (
            "creativityLevel",
            validate_number_field(request.creativity_level, &CREATIVITY_LEVEL_RULE),
        ),
    ]);

    if let Ok(Some(kind)) = request.kind() {
        let profile = profile_for(kind);
        errors.insert_group(
            profile.validated_fields
                .iter()
                .map(|check| (check.key, validate_field((check.get)(request), &check.rule))),
        );
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::WidgetRequest;

    fn valid_base(kind: &str) -> WidgetRequest {
        WidgetRequest {
            title: Some("World capitals".to_string()),
            system_instructions: Some("You are a geography teacher".to_string()),
            prompt: Some("Generate cards about capitals".to_string()),
            widget_type: Some(kind.to_string()),
            creativity_level: Some(0.5),
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_field_messages() {
        assert_eq!(validate_field(None, &TITLE_RULE), "Widget title is required");
        assert_eq!(validate_field(Some(""), &TITLE_RULE), "Widget title is required");
        assert_eq!(
            validate_field(Some("ab"), &TITLE_RULE),
            "Widget title must be at least 3 characters long"
        );
        assert_eq!(
            validate_field(Some(&"x".repeat(51)), &TITLE_RULE),
            "Widget title must be less than 50 characters long"
        );
        assert_eq!(validate_field(Some("abc"), &TITLE_RULE), "");
        assert_eq!(validate_field(Some(&"x".repeat(50)), &TITLE_RULE), "");
    }

    #[test]
    fn test_validate_field_counts_characters() {
        // three characters, nine bytes
        assert_eq!(validate_field(Some("日本語"), &TITLE_RULE), "");
    }

    #[test]
    fn test_optional_field_may_be_missing() {
        let rule = StringRule {
            required: false,
            ..TITLE_RULE
        };
        assert_eq!(validate_field(None, &rule), "");
        assert_eq!(
            validate_field(Some("a"), &rule),
            "Widget title must be at least 3 characters long"
        );
    }

    #[test]
    fn test_validate_number_field() {
        assert_eq!(validate_number_field(None, &CREATIVITY_LEVEL_RULE), "");
        assert_eq!(validate_number_field(Some(0.0), &CREATIVITY_LEVEL_RULE), "");
        assert_eq!(validate_number_field(Some(1.0), &CREATIVITY_LEVEL_RULE), "");
        assert_eq!(
            validate_number_field(Some(-0.1), &CREATIVITY_LEVEL_RULE),
            "Creativity level must be at least 0"
        );
        assert_eq!(
            validate_number_field(Some(1.5), &CREATIVITY_LEVEL_RULE),
            "Creativity level must be less than 1"
        );

        let required = NumberRule {
            required: true,
            ..CREATIVITY_LEVEL_RULE
        };
        assert_eq!(
            validate_number_field(None, &required),
            "Creativity level is required"
        );
        assert_eq!(validate_number_field(Some(0.0), &required), "");
    }

    #[test]
    fn test_valid_flashcard_request_has_no_errors() {
        let mut req = valid_base("flashcard");
        req.flashcard_key = Some("Country name".to_string());
        req.flashcard_value = Some("Capital city".to_string());
        assert!(validate_all_fields(&req).is_empty());
    }

    #[test]
    fn test_missing_title_reports_whole_universal_group() {
        let mut req = valid_base("answer");
        req.title = None;
        let errors = validate_all_fields(&req);

        assert_eq!(errors.get("title"), Some("Widget title is required"));
        for field in ["systemInstructions", "prompt", "type", "creativityLevel"] {
            assert_eq!(errors.get(field), Some(""), "field {field}");
        }
        assert_eq!(errors.len(), 5);
    }

    #[test]
    fn test_flashcard_pair_is_reported_together() {
        let mut req = valid_base("flashcard");
        req.flashcard_key = Some("Country name".to_string());
        let errors = validate_all_fields(&req);

        assert_eq!(errors.get("flashcardKey"), Some(""));
        assert_eq!(errors.get("flashcardValue"), Some("Flashcard value is required"));
        assert!(!errors.contains("title"));
    }

    #[test]
    fn test_quiz_pair_is_symmetric() {
        let mut req = valid_base("quiz");
        req.quiz_key = Some("A question about capitals".to_string());
        let errors = validate_all_fields(&req);
        assert_eq!(errors.get("quizKey"), Some(""));
        assert_eq!(errors.get("quizValue"), Some("Quiz value is required"));
    }

    #[test]
    fn test_text_reports_single_field() {
        let errors = validate_all_fields(&valid_base("text"));
        assert_eq!(errors.get("textWidgetValue"), Some("Text value is required"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_question_pair() {
        let mut req = valid_base("question");
        req.question_key = Some("Ask about rivers".to_string());
        req.question_value = Some("x".to_string());
        let errors = validate_all_fields(&req);
        assert_eq!(errors.get("questionKey"), Some(""));
        assert_eq!(
            errors.get("questionValue"),
            Some("Question value must be at least 3 characters long")
        );
    }

    #[test]
    fn test_answer_has_no_type_specific_fields() {
        assert!(validate_all_fields(&valid_base("answer")).is_empty());
    }

    #[test]
    fn test_unrelated_type_fields_are_ignored() {
        let mut req = valid_base("answer");
        req.flashcard_key = Some("x".to_string());
        req.quiz_value = Some("".to_string());
        assert!(validate_all_fields(&req).is_empty());
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let errors = validate_all_fields(&valid_base("poll"));
        assert_eq!(
            errors.get("type"),
            Some("Type must be one of flashcard, quiz, text, question, answer")
        );
        assert_eq!(errors.get("title"), Some(""));
        assert_eq!(errors.failing_fields().collect::<Vec<_>>(), vec!["type"]);
    }

    #[test]
    fn test_short_type_uses_length_message() {
        let errors = validate_all_fields(&valid_base("qz"));
        assert_eq!(
            errors.get("type"),
            Some("Type must be at least 3 characters long")
        );
    }

    #[test]
    fn test_both_groups_can_fail() {
        let mut req = valid_base("flashcard");
        req.prompt = Some("no".to_string());
        let errors = validate_all_fields(&req);
        assert_eq!(errors.len(), 7);
        assert_eq!(
            errors.failing_fields().collect::<Vec<_>>(),
            vec!["flashcardKey", "flashcardValue", "prompt"]
        );
    }

    #[test]
    fn test_error_map_serializes_flat() {
        let mut errors = ErrorMap::new();
        errors.insert_group([("title", "Widget title is required".to_string())]);
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json, serde_json::json!({ "title": "Widget title is required" }));
    }
}
