//! `[BUTTONS: a | b]` directive extraction

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::resource::ResourceType;

/// Buttons offered after the welcome message
pub const WELCOME_BUTTONS: &[&str] = &[
    "Intervention Menu",
    "Intervention Plan for a Student",
    "Progress Monitoring Framework",
];

/// Buttons offered after a resource has been generated
pub const POST_GENERATION_BUTTONS: &[&str] = &[
    "Make changes",
    "Create another resource",
    "Schedule Nsightz demo",
    "Thank you",
];

/// Greeting shown at the start of a session
pub const WELCOME_MESSAGE: &str = "Hi! I'm your Nsightz MTSS assistant. I can help you create \
evidence-based resources for your school. What would you like to build today?";

fn directive_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[BUTTONS:(.*?)\]").unwrap())
}

/// Assistant text with the directive removed, plus the suggested buttons
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonReply {
    pub text: String,
    pub suggested_buttons: Vec<String>,
}

/// Split an assistant reply into display text and button labels
///
/// The first directive wins; every directive is stripped from the text.
/// Without a directive (or with one that lists no options) the fixed
/// defaults for `resource_type` are returned.
pub fn extract_buttons(text: &str, resource_type: ResourceType) -> ButtonReply {
    let re = directive_re();

    let buttons: Vec<String> = re
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| {
            m.as_str()
                .split('|')
                .map(str::trim)
                .filter(|b| !b.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default();

    let suggested_buttons = if buttons.is_empty() {
        resource_type
            .default_buttons()
            .iter()
            .map(|b| b.to_string())
            .collect()
    } else {
        buttons
    };

    ButtonReply {
        text: re.replace_all(text, "").trim().to_string(),
        suggested_buttons,
    }
}
