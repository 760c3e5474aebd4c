use crate::translation::Translation;

const MAX_SEPARATOR_WIDTH: usize = 35;

/// Terminal output for a result, one entry per printed block.
///
/// Every section is optional. `explain` takes precedence over the
/// pre-rendered `translation`, of which only the part after the first `*`
/// is shown.
pub fn render(translation: &Translation, show_phonetic: bool) -> Vec<String> {
    let mut lines = Vec::new();

    if !translation.text.is_empty() {
        lines.push(translation.text.clone());
    }

    if show_phonetic {
        if let Some(phonetic) = translation.phonetic.as_deref().filter(|p| !p.is_empty()) {
            lines.push(format!("[{}]", phonetic));
        }
    }

    if let Some(definition) = translation.definition.as_deref().filter(|d| !d.is_empty()) {
        lines.push(definition.to_string());
    }

    if !translation.explain.is_empty() {
        lines.push(translation.explain.join("\n"));
    } else if let Some(rendered) = translation.translation.as_deref().filter(|t| !t.is_empty()) {
        match rendered.split_once('*') {
            Some((_, rest)) => lines.push(rest.trim().to_string()),
            None => lines.push(rendered.to_string()),
        }
    }

    if let Some(alternative) = translation.alternative.as_ref().filter(|a| !a.is_empty()) {
        let width = (alternative[0].chars().count() + 5).min(MAX_SEPARATOR_WIDTH);
        lines.push("-".repeat(width));
        lines.push(alternative.join("\n"));
    }

    lines
}
