//! User prompt composition.

use crate::request::{present, WidgetContent, WidgetRequest};
use crate::types::WidgetKind;
use crate::widget::profile_for;

/// Clause introducing content the provider should not repeat.
pub const AVOID_REPEAT_CLAUSE: &str = ". Try not to repeat these: ";

/// Raw content is cut to this many characters in the avoid-repeat clause.
pub const RAW_CONTENT_LIMIT: usize = 300;

/// Compose the user prompt sent to the provider.
///
/// Starts from `prompt`, appends the custom refresh prompt and, on quick
/// refresh, the content to avoid. The kind's prompt override, when it fires,
/// replaces all of that.
pub fn compose_prompt(request: &WidgetRequest) -> String {
    let mut prompt = request.prompt.clone().unwrap_or_default();

    if let Some(refresh) = present(&request.custom_refresh_prompt) {
        prompt.push_str(". ");
        prompt.push_str(refresh);
    }

    if request.quick_refresh() {
        if let Some(content) = request.previous_content() {
            prompt.push_str(AVOID_REPEAT_CLAUSE);
            prompt.push_str(&avoid_list(content));
        }
    }

    if let Ok(Some(kind)) = request.kind() {
        if let Some(replacement) = prompt_override(kind, request) {
            return replacement;
        }
    }

    prompt
}

fn prompt_override(kind: WidgetKind, request: &WidgetRequest) -> Option<String> {
    profile_for(kind).prompt_override.and_then(|hook| hook(request))
}

fn avoid_list(content: &WidgetContent) -> String {
    match content {
        WidgetContent::Structured(items) => items
            .iter()
            .map(|item| item.key_text())
            .collect::<Vec<_>>()
            .join(";"),
        WidgetContent::Raw(raw) => raw.chars().take(RAW_CONTENT_LIMIT).collect(),
    }
}
