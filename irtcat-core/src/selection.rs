/// Maximum-information item selection.
///
/// The public function takes the bank as a slice plus a set of used ids; the
/// session uses the indexed variant, which tracks usage as a `Vec<bool>`.
use std::collections::HashSet;

use crate::information::item_information;
use crate::types::Item;

/// Pick the unused item with the highest information at `theta`.
///
/// Ties keep the item that appears first in `bank`. Returns `None` when every
/// item is in `used_ids`. Does not mark anything as used.
pub fn select_next_item<'a>(
    theta: f64,
    bank: &'a [Item],
    used_ids: &HashSet<String>,
) -> Option<&'a Item> {
    let candidates = bank.iter().filter(|item| !used_ids.contains(&item.id));
    best_by_information(theta, candidates.map(|item| (item, item)))
}

pub(crate) fn select_next_item_indexed(theta: f64, items: &[Item], used: &[bool]) -> Option<usize> {
    let candidates = items.iter().enumerate().filter(|&(idx, _)| !used[idx]);
    best_by_information(theta, candidates)
}

/// Strict `>` scan: the first candidate wins ties.
fn best_by_information<'a, K, I>(theta: f64, candidates: I) -> Option<K>
where
    I: Iterator<Item = (K, &'a Item)>,
{
    let mut best: Option<(K, f64)> = None;
    for (key, item) in candidates {
        let info = item_information(item, theta);
        match best {
            Some((_, best_info)) if info <= best_info => {}
            _ => best = Some((key, info)),
        }
    }
    best.map(|(key, _)| key)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn five_item_bank() -> Vec<Item> {
        [-2.0, -1.0, 0.0, 1.0, 2.0]
            .iter()
            .enumerate()
            .map(|(i, &b)| Item::new(format!("item{}", i), b, 1.0))
            .collect()
    }

    fn used(ids: &[&str]) -> HashSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_selects_item_matching_theta() {
        let bank = five_item_bank();
        let picked = select_next_item(0.0, &bank, &HashSet::new()).unwrap();
        assert_eq!(picked.difficulty, 0.0);

        let picked = select_next_item(1.2, &bank, &HashSet::new()).unwrap();
        assert_eq!(picked.difficulty, 1.0);
    }

    #[test]
    fn test_skips_used_items() {
        let bank = five_item_bank();
        let picked = select_next_item(0.0, &bank, &used(&["item2"])).unwrap();
        // -1 and +1 are equally informative at theta = 0; bank order decides.
        assert_eq!(picked.id, "item1");
    }

    #[test]
    fn test_returns_none_when_exhausted() {
        let bank = five_item_bank();
        let all = used(&["item0", "item1", "item2", "item3", "item4"]);
        assert!(select_next_item(0.0, &bank, &all).is_none());
        assert!(select_next_item(0.0, &[], &HashSet::new()).is_none());
    }

    #[test]
    fn test_discrimination_can_outweigh_distance() {
        let bank = vec![Item::new("near_flat", 0.1, 0.3), Item::new("far_steep", 0.8, 2.5)];
        let picked = select_next_item(0.0, &bank, &HashSet::new()).unwrap();
        assert_eq!(picked.id, "far_steep");
    }

    #[test]
    fn test_selected_item_has_maximum_information() {
        let bank: Vec<Item> = (0..40)
            .map(|i| {
                let b = -3.0 + 0.15 * i as f64;
                let a = 0.5 + 0.05 * ((i * 7) % 23) as f64;
                Item::new(format!("q{}", i), b, a)
            })
            .collect();
        let used_ids = used(&["q3", "q17", "q20", "q21"]);

        for theta in [-2.5, -0.3, 0.0, 0.9, 2.8] {
            let picked = select_next_item(theta, &bank, &used_ids).unwrap();
            assert!(!used_ids.contains(&picked.id));
            let picked_info = item_information(picked, theta);
            for other in bank.iter().filter(|it| !used_ids.contains(&it.id)) {
                assert!(item_information(other, theta) <= picked_info);
            }
        }
    }

    #[test]
    fn test_indexed_matches_public() {
        let bank = five_item_bank();
        let mut flags = vec![false; bank.len()];
        flags[2] = true;
        flags[1] = true;
        let idx = select_next_item_indexed(0.2, &bank, &flags).unwrap();
        let by_id = select_next_item(0.2, &bank, &used(&["item1", "item2"])).unwrap();
        assert_eq!(bank[idx].id, by_id.id);
        assert_eq!(select_next_item_indexed(0.0, &bank, &[true; 5]), None);
    }

    #[test]
    fn test_indexed_ties_go_to_bank_order() {
        let bank = vec![Item::new("x", 0.5, 1.0), Item::new("y", -0.5, 1.0), Item::new("z", 0.5, 1.0)];
        assert_eq!(select_next_item_indexed(0.0, &bank, &[false; 3]), Some(0));
        assert_eq!(select_next_item_indexed(0.0, &bank, &[true, false, false]), Some(1));
    }
}
