/// Terminal rendering of a test item.
use irtcat_core::Item;

/// Build the text shown for an item.
///
/// Items with a `correct_response` ask for an answer; items without one ask
/// the examiner to record whether the answer was correct.
pub fn build_prompt(item: &Item, position: usize) -> String {
    let mut out = format!("Item {position} [{}]", item.id);
    if !item.item_type.is_empty() {
        out.push_str(&format!(" ({})", item.item_type));
    }
    out.push('\n');

    if let Some(ref stimulus) = item.stimulus {
        out.push_str(stimulus);
        out.push('\n');
    }

    for (i, choice) in item.choices.iter().enumerate() {
        out.push_str(&format!("  {}) {}\n", i + 1, choice));
    }

    if item.correct_response.is_some() {
        out.push_str("Answer: ");
    } else {
        out.push_str("Correct? [y/n]: ");
    }
    out
}
