/// Two-parameter logistic (2PL) response model and its Fisher information.
///
/// Pure functions of item parameters and theta. Callers guarantee
/// `discrimination > 0` (enforced when an `ItemBank` is built).
use crate::types::Item;

/// P(correct | theta) under the 2PL model.
///
/// Evaluated on whichever side keeps `exp()` from overflowing, so extreme
/// `a * (theta - b)` values saturate to 0.0 / 1.0 instead of producing NaN.
pub fn probability_correct(theta: f64, difficulty: f64, discrimination: f64) -> f64 {
    logistic(discrimination * (theta - difficulty))
}

/// `1 / (1 + exp(-z))`, evaluated without overflow.
pub(crate) fn logistic(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// `p * (1 - p)` of the logistic at `z`.
///
/// Computed as `e / (1 + e)^2` with `e = exp(-|z|)`, so it stays positive
/// long after `1 - p` has rounded to zero.
pub(crate) fn logistic_variance(z: f64) -> f64 {
    let e = (-z.abs()).exp();
    e / ((1.0 + e) * (1.0 + e))
}

/// Fisher information `a^2 * p * q` of an item at `theta`.
pub fn item_information(item: &Item, theta: f64) -> f64 {
    information(theta, item.difficulty, item.discrimination)
}

/// Same as `item_information`, on raw parameters.
pub fn information(theta: f64, difficulty: f64, discrimination: f64) -> f64 {
    discrimination * discrimination * logistic_variance(discrimination * (theta - difficulty))
}

/// Total information of a set of items at `theta` (the test information function).
pub fn test_information<'a, I>(items: I, theta: f64) -> f64
where
    I: IntoIterator<Item = &'a Item>,
{
    items.into_iter().map(|item| item_information(item, theta)).sum()
}
