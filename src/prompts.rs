pub const VOCABULARY: &str = include_str!("../data/prompts/vocabulary.txt");
pub const CONVERSATION: &str = include_str!("../data/prompts/conversation.txt");
pub const CORRECTION: &str = include_str!("../data/prompts/correction.txt");

/// Replace `{{key}}` placeholders in a template string.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        result = result.replace(&format!("{{{{{}}}}}", key), value);
    }
    result
}

/// Quote user text as a JSON string literal so it can sit inside a prompt's
/// example JSON without breaking it.
pub fn quoted(text: &str) -> String {
    serde_json::Value::String(text.to_string()).to_string()
}

pub fn conversation(starter: &str) -> String {
    render(CONVERSATION, &[("starter", &quoted(starter))])
}

pub fn correction(text: &str) -> String {
    render(CORRECTION, &[("text", &quoted(text))])
}
