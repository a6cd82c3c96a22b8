//! Structured-output schema construction.
//!
//! The provider is given a schema describing `{ content: [item, ...] }`,
//! where the item shape depends on the widget kind. The natural-language
//! `description` of each leaf is what steers generation, so it carries the
//! caller's own field text followed by [`JSON_FORMAT_NOTE`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::request::{present, WidgetRequest};
use crate::types::WidgetKind;
use crate::widget::{profile_for, FieldGetter, ItemShape};

/// Appended to every caller-described leaf and to the system instruction.
pub const JSON_FORMAT_NOTE: &str = ". Generate JSON output in a compact format with minimal line breaks, strictly adhering to JSON syntax. Avoid unnecessary characters like whitespace, quotation marks in string control characters, and invalid escape sequences. Enforce strict adherence to the provided schema, including limiting the number of items in array fields to prevent excessive data generation. Make sure the length of the response is not too long.";

/// Instruction suffix for kinds that must produce exactly one item.
pub const SINGLE_ITEM_NOTE: &str = ". Only generate 1 item inside the JSON response.";

/// Fixed description of the quiz `correctAnswer` leaf.
pub const CORRECT_ANSWER_DESCRIPTION: &str =
    "The index of the correct answer. The first answer will have an index of 0 and so on.";

/// Node types understood by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SchemaType {
    Object,
    Array,
    String,
}

/// A structured-output schema node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseSchema {
    #[serde(rename = "type")]
    pub schema_type: SchemaType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nullable: Option<bool>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, ResponseSchema>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<ResponseSchema>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
}

impl ResponseSchema {
    fn node(schema_type: SchemaType) -> Self {
        Self {
            schema_type,
            description: None,
            nullable: None,
            properties: BTreeMap::new(),
            items: None,
            required: Vec::new(),
        }
    }

    /// String leaf.
    pub fn string() -> Self {
        Self::node(SchemaType::String)
    }

    /// Array of `items`.
    pub fn array(items: ResponseSchema) -> Self {
        Self {
            items: Some(Box::new(items)),
            ..Self::node(SchemaType::Array)
        }
    }

    /// Object whose properties are all required, in the given order.
    pub fn object<I, K>(properties: I) -> Self
    where
        I: IntoIterator<Item = (K, ResponseSchema)>,
        K: Into<String>,
    {
        let mut schema = Self::node(SchemaType::Object);
        for (name, property) in properties {
            let name = name.into();
            schema.required.push(name.clone());
            schema.properties.insert(name, property);
        }
        schema
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn non_nullable(mut self) -> Self {
        self.nullable = Some(false);
        self
    }

    /// Property `name` of an object node.
    pub fn property(&self, name: &str) -> Option<&ResponseSchema> {
        self.properties.get(name)
    }
}

/// Output of [`build_schema`].
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaBuild {
    pub schema: ResponseSchema,
    /// Kind-specific instruction text, placed before [`JSON_FORMAT_NOTE`].
    pub instruction_suffix: &'static str,
}

/// Everything the provider session needs besides the prompt.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationPlan {
    pub system_instruction: String,
    pub response_schema: ResponseSchema,
}

fn described(getter: FieldGetter, request: &WidgetRequest) -> String {
    format!("{}{}", getter(request).unwrap_or_default(), JSON_FORMAT_NOTE)
}

/// Build the response schema and instruction suffix for `kind`.
pub fn build_schema(kind: WidgetKind, request: &WidgetRequest) -> SchemaBuild {
    let profile = profile_for(kind);

    let item = match profile.item_shape {
        ItemShape::KeyValue { key, value } => ResponseSchema::object([
            (
                "key",
                ResponseSchema::string()
                    .with_description(described(key, request))
                    .non_nullable(),
            ),
            (
                "value",
                ResponseSchema::string()
                    .with_description(described(value, request))
                    .non_nullable(),
            ),
        ]),
        ItemShape::Quiz { question, answers } => ResponseSchema::object([
            (
                "question",
                ResponseSchema::string()
                    .with_description(described(question, request))
                    .non_nullable(),
            ),
            (
                "answers",
                ResponseSchema::array(
                    ResponseSchema::string().with_description(described(answers, request)),
                ),
            ),
            (
                "correctAnswer",
                ResponseSchema::string()
                    .with_description(CORRECT_ANSWER_DESCRIPTION)
                    .non_nullable(),
            ),
        ]),
        ItemShape::SingleValue { value } => ResponseSchema::object([(
            "value",
            ResponseSchema::string()
                .with_description(described(value, request))
                .non_nullable(),
        )]),
    };

    let schema = ResponseSchema::object([("content", ResponseSchema::array(item))])
        .with_description(profile.schema_description);

    SchemaBuild {
        schema,
        instruction_suffix: if profile.single_item { SINGLE_ITEM_NOTE } else { "" },
    }
}

/// Build the provider configuration for a validated request.
pub fn plan_generation(kind: WidgetKind, request: &WidgetRequest) -> GenerationPlan {
    let SchemaBuild {
        schema,
        instruction_suffix,
    } = build_schema(kind, request);

    let system_instruction = format!(
        "{}{}{}",
        present(&request.system_instructions).unwrap_or_default(),
        instruction_suffix,
        JSON_FORMAT_NOTE
    );

    GenerationPlan {
        system_instruction,
        response_schema: schema,
    }
}
