pub mod templates;

use log::debug;
use serde_json::Value;

use crate::models::chat::{ ChatMessage, PromptSegment };
use self::templates::*;

/// Turns the conversation into the prompt for one completion call.
///
/// A non-empty `visualization_request` switches to chart-editing mode: the
/// history is ignored and the model is asked for a bare ECharts option,
/// either modifying `chart_option` or creating a new chart. Otherwise the
/// whole history is replayed as a plain chat.
pub fn build_prompt(
    history: &[ChatMessage],
    chart_option: Option<&Value>,
    visualization_request: Option<&str>
) -> Vec<PromptSegment> {
    debug!("Visualization request: {:?}", visualization_request);

    match visualization_request.filter(|r| !r.is_empty()) {
        Some(request) =>
            vec![
                PromptSegment::system(visualization_system_prompt()),
                PromptSegment::user(visualization_user_prompt(chart_option, request))
            ],
        None => chat_prompt(history),
    }
}

fn chat_prompt(history: &[ChatMessage]) -> Vec<PromptSegment> {
    let mut segments = Vec::with_capacity(history.len() + 1);
    segments.push(PromptSegment::system(CHAT_SYSTEM_PROMPT));
    segments.extend(
        history.iter().map(|message| PromptSegment {
            role: message.role.into(),
            content: message.text.clone(),
        })
    );
    segments
}

pub fn visualization_system_prompt() -> String {
    format!("{}\n\n{}\n\n{}", VISUALIZATION_IDENTITY, COMPANIES_DATA_DESCRIPTION, VISUALIZATION_RULES)
}

fn visualization_user_prompt(chart_option: Option<&Value>, request: &str) -> String {
    match chart_option.and_then(|chart| serde_json::to_string_pretty(chart).ok()) {
        Some(chart_json) =>
            format!(
                "{}{}{}{}{}",
                UPDATE_CHART_PREAMBLE,
                chart_json,
                UPDATE_CHART_REQUEST,
                request,
                UPDATE_CHART_INSTRUCTION
            ),
        None => format!("{}{}{}", NEW_CHART_REQUEST, request, NEW_CHART_INSTRUCTION),
    }
}
