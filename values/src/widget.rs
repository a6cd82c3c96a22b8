//! Per-kind widget behavior, in one dispatch table.
//!
//! Each [`WidgetProfile`] bundles what varies by widget kind: which
//! type-specific fields are validated, the shape of a generated item, the
//! schema description, whether the provider must produce a single item, and
//! an optional prompt override.

use crate::request::{present, WidgetContent, WidgetRequest};
use crate::types::WidgetKind;
use crate::validation::StringRule;

/// Accessor for a request field.
pub type FieldGetter = fn(&WidgetRequest) -> Option<&str>;

/// Validation of one type-specific field.
#[derive(Clone, Copy)]
pub struct FieldCheck {
    /// Wire name, used as the error map key.
    pub key: &'static str,
    /// Rule applied to the field.
    pub rule: StringRule,
    /// Reads the field from a request.
    pub get: FieldGetter,
}

/// Shape of one generated content item.
#[derive(Clone, Copy)]
pub enum ItemShape {
    /// `{key, value}`, each described by a caller field.
    KeyValue {
        key: FieldGetter,
        value: FieldGetter,
    },
    /// `{question, answers[], correctAnswer}`.
    Quiz {
        question: FieldGetter,
        answers: FieldGetter,
    },
    /// `{value}` described by a caller field.
    SingleValue { value: FieldGetter },
}

/// Everything that depends on the widget kind.
#[derive(Clone, Copy)]
pub struct WidgetProfile {
    pub kind: WidgetKind,
    /// Type-specific fields, validated and reported as one group.
    pub validated_fields: &'static [FieldCheck],
    /// Top-level schema description.
    pub schema_description: &'static str,
    pub item_shape: ItemShape,
    /// Ask the provider for exactly one item.
    pub single_item: bool,
    /// Replaces the composed prompt when it returns `Some`.
    pub prompt_override: Option<fn(&WidgetRequest) -> Option<String>>,
}

fn flashcard_key(r: &WidgetRequest) -> Option<&str> {
    present(&r.flashcard_key)
}
fn flashcard_value(r: &WidgetRequest) -> Option<&str> {
    present(&r.flashcard_value)
}
fn quiz_key(r: &WidgetRequest) -> Option<&str> {
    present(&r.quiz_key)
}
fn quiz_value(r: &WidgetRequest) -> Option<&str> {
    present(&r.quiz_value)
}
fn text_widget_value(r: &WidgetRequest) -> Option<&str> {
    present(&r.text_widget_value)
}
fn question_key(r: &WidgetRequest) -> Option<&str> {
    present(&r.question_key)
}
fn question_value(r: &WidgetRequest) -> Option<&str> {
    present(&r.question_value)
}

const fn check(key: &'static str, field_name: &'static str, get: FieldGetter) -> FieldCheck {
    FieldCheck {
        key,
        rule: StringRule::required(field_name, 500),
        get,
    }
}

/// "Based on the question: <q> and answer: <a> given. <instruction>"
///
/// Fires only when previous content, the answer and the instruction are all
/// present. Raw content is used whole as the question text; structured
/// content contributes its first item's value.
fn answer_prompt(r: &WidgetRequest) -> Option<String> {
    let answer = present(&r.answer)?;
    let instruction = present(&r.question_value)?;
    let question = match r.previous_content()? {
        WidgetContent::Structured(items) => items.first()?.value_text()?,
        WidgetContent::Raw(raw) => raw.clone(),
    };
    Some(format!(
        "Based on the question: {} and answer: {} given. {}",
        question, answer, instruction
    ))
}

static FLASHCARD: WidgetProfile = WidgetProfile {
    kind: WidgetKind::Flashcard,
    validated_fields: &[
        check("flashcardKey", "Flashcard key", flashcard_key),
        check("flashcardValue", "Flashcard value", flashcard_value),
    ],
    schema_description: "Flash card generation",
    item_shape: ItemShape::KeyValue {
        key: flashcard_key,
        value: flashcard_value,
    },
    single_item: false,
    prompt_override: None,
};

static QUIZ: WidgetProfile = WidgetProfile {
    kind: WidgetKind::Quiz,
    validated_fields: &[
        check("quizKey", "Quiz key", quiz_key),
        check("quizValue", "Quiz value", quiz_value),
    ],
    schema_description: "Quiz generation",
    item_shape: ItemShape::Quiz {
        question: quiz_key,
        answers: quiz_value,
    },
    single_item: false,
    prompt_override: None,
};

static TEXT: WidgetProfile = WidgetProfile {
    kind: WidgetKind::Text,
    validated_fields: &[check("textWidgetValue", "Text value", text_widget_value)],
    schema_description: "Text generation",
    item_shape: ItemShape::SingleValue {
        value: text_widget_value,
    },
    single_item: true,
    prompt_override: None,
};

static QUESTION: WidgetProfile = WidgetProfile {
    kind: WidgetKind::Question,
    validated_fields: &[
        check("questionKey", "Question key", question_key),
        check("questionValue", "Question value", question_value),
    ],
    schema_description: "Question generation",
    item_shape: ItemShape::SingleValue {
        value: question_key,
    },
    single_item: true,
    prompt_override: None,
};

static ANSWER: WidgetProfile = WidgetProfile {
    kind: WidgetKind::Answer,
    validated_fields: &[],
    schema_description: "Comment the answer",
    item_shape: ItemShape::SingleValue {
        value: question_value,
    },
    single_item: true,
    prompt_override: Some(answer_prompt),
};

/// Look up the profile for `kind`.
pub fn profile_for(kind: WidgetKind) -> &'static WidgetProfile {
    match kind {
        WidgetKind::Flashcard => &FLASHCARD,
        WidgetKind::Quiz => &QUIZ,
        WidgetKind::Text => &TEXT,
        WidgetKind::Question => &QUESTION,
        WidgetKind::Answer => &ANSWER,
    }
}
