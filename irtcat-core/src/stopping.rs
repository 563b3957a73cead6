/// Stopping rule.
///
/// Checked in order, first match wins:
///   1. `items_administered >= max_items`                          -> MaxItems
///   2. `items_administered >= min_items` and `se <= stopping_se`  -> PrecisionReached
///   3. no unused item left                                        -> BankExhausted
///   4. otherwise continue
use crate::types::{StopDecision, StopReason};

/// Evaluate the stopping rule and report which condition fired.
pub fn stop_decision(
    items_administered: usize,
    standard_error: f64,
    min_items: usize,
    max_items: usize,
    stopping_se: f64,
    item_available: bool,
) -> StopDecision {
    if items_administered >= max_items {
        StopDecision::Stop(StopReason::MaxItems)
    } else if items_administered >= min_items && standard_error <= stopping_se {
        StopDecision::Stop(StopReason::PrecisionReached)
    } else if !item_available {
        StopDecision::Stop(StopReason::BankExhausted)
    } else {
        StopDecision::Continue
    }
}

/// Boolean form of `stop_decision()`.
pub fn should_stop(
    items_administered: usize,
    standard_error: f64,
    min_items: usize,
    max_items: usize,
    stopping_se: f64,
    item_available: bool,
) -> bool {
    stop_decision(
        items_administered,
        standard_error,
        min_items,
        max_items,
        stopping_se,
        item_available,
    )
    .is_stop()
}
