//! Display labels for line items.

use estimator_types::item::{ItemKind, LineItem};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayLabel {
    pub title: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Title and description as shown to a reader.
///
/// Instance items read singular when `count == 1` and plural otherwise,
/// using their explicit labels when present and inflecting the last word
/// of the title when not. Every other item passes through.
pub fn resolve_rename(item: &LineItem) -> DisplayLabel {
    let title = match &item.kind {
        ItemKind::Instance { count, labels, .. } => match labels {
            Some(labels) if *count == 1 => labels.singular.clone(),
            Some(labels) => labels.plural.clone(),
            None if *count == 1 => inflect_last_word(&item.title, singularize),
            None => inflect_last_word(&item.title, pluralize),
        },
        _ => item.title.clone(),
    };

    DisplayLabel {
        title,
        description: item.description.clone(),
    }
}

fn inflect_last_word(title: &str, inflect: fn(&str) -> String) -> String {
    match title.rfind(' ') {
        Some(idx) => format!("{}{}", &title[..=idx], inflect(&title[idx + 1..])),
        None => inflect(title),
    }
}

pub(crate) fn singularize(word: &str) -> String {
    let lower = word.to_ascii_lowercase();
    if lower.len() > 3 && lower.ends_with("ies") {
        return format!("{}y", &word[..word.len() - 3]);
    }
    if ["sses", "shes", "ches", "xes"]
        .iter()
        .any(|suffix| lower.ends_with(suffix))
    {
        return word[..word.len() - 2].to_string();
    }
    if lower.len() > 1 && lower.ends_with('s') && !lower.ends_with("ss") {
        return word[..word.len() - 1].to_string();
    }
    word.to_string()
}

pub(crate) fn pluralize(word: &str) -> String {
    if word.is_empty() || singularize(word) != word {
        return word.to_string();
    }

    let lower = word.to_ascii_lowercase();
    let mut chars = lower.chars().rev();
    let last = chars.next();
    let before = chars.next();

    match (before, last) {
        (Some(b), Some('y')) if !"aeiou".contains(b) => {
            format!("{}ies", &word[..word.len() - 1])
        }
        (_, Some('s' | 'x')) => format!("{word}es"),
        (Some('c' | 's'), Some('h')) => format!("{word}es"),
        _ => format!("{word}s"),
    }
}
