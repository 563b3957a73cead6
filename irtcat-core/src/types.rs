use std::collections::HashMap;
use std::fmt;

use crate::error::{Error, Result};

/// A calibrated test item.
///
/// Only `difficulty` and `discrimination` matter to the engine. The type and
/// content fields are carried through untouched for whoever presents the item.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Item {
    /// Unique within a bank.
    pub id: String,
    /// IRT b parameter: the theta at which P(correct) = 0.5.
    pub difficulty: f64,
    /// IRT a parameter. Must be finite and > 0.
    pub discrimination: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub item_type: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub stimulus: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub choices: Vec<String>,
    /// Expected answer, if the presentation layer scores responses itself.
    #[cfg_attr(feature = "serde", serde(default))]
    pub correct_response: Option<String>,
}

impl Item {
    /// Item with IRT parameters and empty content.
    pub fn new(id: impl Into<String>, difficulty: f64, discrimination: f64) -> Self {
        Item {
            id: id.into(),
            difficulty,
            discrimination,
            item_type: String::new(),
            stimulus: None,
            choices: Vec::new(),
            correct_response: None,
        }
    }
}

/// Current point estimate of ability and its uncertainty.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilityEstimate {
    pub theta: f64,
    pub standard_error: f64,
}

/// One scored response, with the estimate produced right after scoring it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AdministrationRecord {
    pub item_id: String,
    pub correct: bool,
    pub theta: f64,
    pub standard_error: f64,
}

/// Returned by `CatSession::score_response()`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScoreUpdate {
    pub theta: f64,
    pub standard_error: f64,
    pub items_administered: usize,
    /// Newton-Raphson iterations spent on this update.
    pub iterations: usize,
    /// False if the iteration cap was hit before the step fell under threshold.
    pub converged: bool,
}

/// Why a session stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum StopReason {
    /// `max_items` reached.
    MaxItems,
    /// `min_items` reached and SE at or below `stopping_se`.
    PrecisionReached,
    /// No unused item left in the bank.
    BankExhausted,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StopReason::MaxItems => "maximum number of items reached",
            StopReason::PrecisionReached => "target standard error reached",
            StopReason::BankExhausted => "ended early: item bank exhausted",
        };
        f.write_str(s)
    }
}

/// Outcome of the stopping rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopDecision {
    Continue,
    Stop(StopReason),
}

impl StopDecision {
    pub fn is_stop(&self) -> bool {
        matches!(self, StopDecision::Stop(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SessionStatus {
    InProgress,
    Stopped(StopReason),
}

/// Snapshot of a session, suitable for reporting.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SessionSummary {
    pub starting_theta: f64,
    pub theta: f64,
    pub standard_error: f64,
    pub items_administered: usize,
    pub status: SessionStatus,
    /// Scored responses in administration order.
    pub history: Vec<AdministrationRecord>,
}

/// Validated, immutable item collection with an id -> index lookup.
#[derive(Debug, Clone)]
pub struct ItemBank {
    items: Vec<Item>,
    id_to_idx: HashMap<String, usize>,
}

impl ItemBank {
    /// Build a bank, rejecting duplicate ids and items that would make the
    /// information function degenerate.
    pub fn from_items(items: Vec<Item>) -> Result<Self> {
        let mut id_to_idx = HashMap::with_capacity(items.len());
        for (idx, item) in items.iter().enumerate() {
            if !(item.discrimination.is_finite() && item.discrimination > 0.0) {
                return Err(Error::Discrimination {
                    item_id: item.id.clone(),
                    value: item.discrimination,
                });
            }
            if !item.difficulty.is_finite() {
                return Err(Error::Difficulty {
                    item_id: item.id.clone(),
                    value: item.difficulty,
                });
            }
            if id_to_idx.insert(item.id.clone(), idx).is_some() {
                return Err(Error::DuplicateItem(item.id.clone()));
            }
        }
        Ok(ItemBank { items, id_to_idx })
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Item> {
        self.index_of(id).map(|idx| &self.items[idx])
    }

    pub(crate) fn index_of(&self, id: &str) -> Option<usize> {
        self.id_to_idx.get(id).copied()
    }
}
