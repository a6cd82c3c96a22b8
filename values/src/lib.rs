//! # WidgetGen Values
//!
//! The request-shaping core of WidgetGen: everything between "a JSON body
//! arrived" and "call the provider", with no I/O.
//!
//! ```text
//! WidgetRequest ──► validate_all_fields ──► ErrorMap (empty = proceed)
//!       │
//!       ├────────► plan_generation ──► GenerationPlan { system_instruction, response_schema }
//!       │
//!       └────────► compose_prompt ───► user prompt
//! ```
//!
//! Per-kind behavior lives in a single dispatch table ([`widget::profile_for`]).
//!
//! ## Usage Example
//!
//! ```rust
//! use widgetgen_values::{compose_prompt, plan_generation, validate_all_fields, WidgetRequest};
//!
//! let request: WidgetRequest = serde_json::from_str(r#"{
//!     "title": "Capitals",
//!     "systemInstructions": "You are a teacher",
//!     "prompt": "European capitals",
//!     "type": "flashcard",
//!     "flashcardKey": "Country",
//!     "flashcardValue": "Capital city"
//! }"#).unwrap();
//!
//! assert!(validate_all_fields(&request).is_empty());
//!
//! let kind = request.kind().unwrap().unwrap();
//! let plan = plan_generation(kind, &request);
//! assert!(plan.system_instruction.starts_with("You are a teacher"));
//! assert_eq!(compose_prompt(&request), "European capitals");
//! ```

pub mod error;
pub mod prompt;
pub mod request;
pub mod schema;
pub mod types;
pub mod validation;
pub mod widget;

// Re-exports for convenience
pub use error::{ValueError, ValueResult};
pub use prompt::compose_prompt;
pub use request::{ContentItem, WidgetContent, WidgetEnvelope, WidgetRequest};
pub use schema::{
    build_schema, plan_generation, GenerationPlan, ResponseSchema, SchemaBuild, SchemaType,
    JSON_FORMAT_NOTE, SINGLE_ITEM_NOTE,
};
pub use types::WidgetKind;
pub use validation::{
    validate_all_fields, validate_field, validate_number_field, ErrorMap, NumberRule, StringRule,
};
pub use widget::{profile_for, WidgetProfile};
