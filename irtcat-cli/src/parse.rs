/// Item bank file parsing and answer scoring.
use irtcat_core::Item;
use serde::Deserialize;

/// A bank file is either a bare JSON array of items or `{ "items": [...] }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum BankFile {
    List(Vec<Item>),
    Wrapped { items: Vec<Item> },
}

/// Parse item bank JSON. Structural validation (discrimination > 0, unique
/// ids) happens when the session is built.
pub fn parse_bank(content: &str) -> Result<Vec<Item>, serde_json::Error> {
    let file: BankFile = serde_json::from_str(content.trim())?;
    Ok(match file {
        BankFile::List(items) => items,
        BankFile::Wrapped { items } => items,
    })
}

/// Parse a y/n style answer. None if the input is neither.
pub fn parse_yes_no(input: &str) -> Option<bool> {
    match input.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" | "1" | "c" | "correct" | "true" => Some(true),
        "n" | "no" | "0" | "i" | "incorrect" | "false" => Some(false),
        _ => None,
    }
}

/// Score a typed answer against the item's key.
///
/// A number between 1 and the choice count selects that choice; anything else
/// is compared to the key as text, ignoring case and surrounding whitespace.
/// Returns None when the item has no key or the input is empty.
pub fn score_answer(item: &Item, input: &str) -> Option<bool> {
    let key = item.correct_response.as_deref()?;
    let answer = input.trim();
    if answer.is_empty() {
        return None;
    }

    let chosen = match answer.parse::<usize>() {
        Ok(n) if n >= 1 && n <= item.choices.len() => item.choices[n - 1].as_str(),
        _ => answer,
    };

    Some(chosen.trim().eq_ignore_ascii_case(key.trim()))
}
