/// Adaptive testing session.
///
/// Pure computation, no IO. The caller presents each selected item, scores the
/// answer externally, then feeds the outcome back with `score_response()`.
///
/// Items are identified by caller-provided string IDs.
use std::collections::HashSet;

use tracing::debug;

use crate::constants::{
    DEFAULT_MAX_ITEMS, DEFAULT_MIN_ITEMS, DEFAULT_STOPPING_SE, INITIAL_STANDARD_ERROR,
    MAX_NEWTON_ITERATIONS, THETA_MAX, THETA_MIN,
};
use crate::error::{Error, Result};
use crate::estimation::AbilityEstimator;
use crate::selection::select_next_item_indexed;
use crate::starting_point::StartingPoint;
use crate::stopping::stop_decision;
use crate::types::{
    AbilityEstimate, AdministrationRecord, Item, ItemBank, ScoreUpdate, SessionStatus,
    SessionSummary, StopDecision,
};

/// Configuration for one session.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SessionConfig {
    /// No precision-based stop before this many items. Default 20.
    pub min_items: usize,
    /// Hard ceiling on test length. Default 30.
    pub max_items: usize,
    /// Stop once SE is at or below this (after `min_items`). Default 0.3.
    pub stopping_se: f64,
    /// Starting theta to use instead of the age/education heuristic.
    pub start_point_override: Option<f64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            min_items: DEFAULT_MIN_ITEMS,
            max_items: DEFAULT_MAX_ITEMS,
            stopping_se: DEFAULT_STOPPING_SE,
            start_point_override: None,
        }
    }
}

impl SessionConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_items == 0 {
            return Err(Error::ZeroMaxItems);
        }
        if self.min_items > self.max_items {
            return Err(Error::ItemLimits {
                min_items: self.min_items,
                max_items: self.max_items,
            });
        }
        if !(self.stopping_se.is_finite() && self.stopping_se > 0.0) {
            return Err(Error::StoppingSe(self.stopping_se));
        }
        if let Some(start) = self.start_point_override {
            if !start.is_finite() {
                return Err(Error::StartPoint(start));
            }
        }
        Ok(())
    }
}

pub struct CatSession {
    bank: ItemBank,
    config: SessionConfig,

    starting_theta: f64,
    estimate: AbilityEstimate,

    /// Used flags, indexed like `bank.items()`.
    used: Vec<bool>,
    /// Same set keyed by id, for callers.
    used_ids: HashSet<String>,
    /// Bank indices in administration order, paired with correctness.
    administered: Vec<(usize, bool)>,
    history: Vec<AdministrationRecord>,
}

impl CatSession {
    /// Validate configuration and bank, then open a session at the resolved
    /// starting theta. `config.start_point_override` beats `start`.
    pub fn new(items: Vec<Item>, config: SessionConfig, start: StartingPoint) -> Result<Self> {
        config.validate()?;
        let bank = ItemBank::from_items(items)?;

        let starting_theta = match config.start_point_override {
            Some(theta) => theta.clamp(THETA_MIN, THETA_MAX),
            None => start.theta(),
        };
        let num_items = bank.len();

        debug!(
            items = num_items,
            starting_theta,
            min_items = config.min_items,
            max_items = config.max_items,
            stopping_se = config.stopping_se,
            "session started"
        );

        Ok(CatSession {
            bank,
            config,
            starting_theta,
            estimate: AbilityEstimate {
                theta: starting_theta,
                standard_error: INITIAL_STANDARD_ERROR,
            },
            used: vec![false; num_items],
            used_ids: HashSet::new(),
            administered: Vec::new(),
            history: Vec::new(),
        })
    }

    /// Most informative unused item at the current theta.
    pub fn select_next_item(&self) -> Option<&Item> {
        select_next_item_indexed(self.estimate.theta, self.bank.items(), &self.used)
            .map(|idx| &self.bank.items()[idx])
    }

    /// Record a scored response and re-estimate ability from the full history.
    pub fn score_response(&mut self, item_id: &str, correct: bool) -> Result<ScoreUpdate> {
        if let StopDecision::Stop(reason) = self.stop_decision() {
            return Err(Error::SessionStopped(reason));
        }
        let idx = self
            .bank
            .index_of(item_id)
            .ok_or_else(|| Error::UnknownItem(item_id.to_string()))?;
        if self.used[idx] {
            return Err(Error::AlreadyAdministered(item_id.to_string()));
        }

        self.used[idx] = true;
        self.used_ids.insert(item_id.to_string());
        self.administered.push((idx, correct));

        let items = self.bank.items();
        let estimator =
            AbilityEstimator::new(self.administered.iter().map(|&(i, c)| (&items[i], c)));
        let outcome = estimator.estimate(self.estimate, MAX_NEWTON_ITERATIONS);
        self.estimate = outcome.estimate;

        self.history.push(AdministrationRecord {
            item_id: item_id.to_string(),
            correct,
            theta: self.estimate.theta,
            standard_error: self.estimate.standard_error,
        });

        debug!(
            item_id,
            correct,
            theta = self.estimate.theta,
            standard_error = self.estimate.standard_error,
            items_administered = self.administered.len(),
            "response scored"
        );

        Ok(ScoreUpdate {
            theta: self.estimate.theta,
            standard_error: self.estimate.standard_error,
            items_administered: self.administered.len(),
            iterations: outcome.iterations,
            converged: outcome.converged,
        })
    }

    pub fn stop_decision(&self) -> StopDecision {
        stop_decision(
            self.administered.len(),
            self.estimate.standard_error,
            self.config.min_items,
            self.config.max_items,
            self.config.stopping_se,
            self.used.iter().any(|&u| !u),
        )
    }

    pub fn should_stop(&self) -> bool {
        self.stop_decision().is_stop()
    }

    pub fn estimate(&self) -> AbilityEstimate {
        self.estimate
    }

    pub fn items_administered(&self) -> usize {
        self.administered.len()
    }

    pub fn used_item_ids(&self) -> &HashSet<String> {
        &self.used_ids
    }

    pub fn history(&self) -> &[AdministrationRecord] {
        &self.history
    }

    pub fn starting_theta(&self) -> f64 {
        self.starting_theta
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn bank(&self) -> &ItemBank {
        &self.bank
    }

    pub fn summary(&self) -> SessionSummary {
        let status = match self.stop_decision() {
            StopDecision::Continue => SessionStatus::InProgress,
            StopDecision::Stop(reason) => SessionStatus::Stopped(reason),
        };
        SessionSummary {
            starting_theta: self.starting_theta,
            theta: self.estimate.theta,
            standard_error: self.estimate.standard_error,
            items_administered: self.administered.len(),
            status,
            history: self.history.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::information::item_information;
    use crate::starting_point::EducationLevel;
    use crate::types::StopReason;

    fn five_item_bank() -> Vec<Item> {
        [-2.0, -1.0, 0.0, 1.0, 2.0]
            .iter()
            .enumerate()
            .map(|(i, &b)| Item::new(format!("item{}", i), b, 1.0))
            .collect()
    }

    fn config(min_items: usize, max_items: usize, stopping_se: f64) -> SessionConfig {
        SessionConfig { min_items, max_items, stopping_se, start_point_override: None }
    }

    #[test]
    fn test_default_config() {
        let cfg = SessionConfig::default();
        assert_eq!(cfg.min_items, 20);
        assert_eq!(cfg.max_items, 30);
        assert_eq!(cfg.stopping_se, 0.3);
        assert_eq!(cfg.start_point_override, None);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_rejects_min_above_max() {
        let err = CatSession::new(five_item_bank(), config(6, 5, 0.3), StartingPoint::default())
            .err()
            .unwrap();
        assert_eq!(err, Error::ItemLimits { min_items: 6, max_items: 5 });
    }

    #[test]
    fn test_rejects_bad_stopping_se() {
        for se in [0.0, -0.1, f64::NAN] {
            let result = CatSession::new(five_item_bank(), config(1, 5, se), StartingPoint::default());
            assert!(matches!(result, Err(Error::StoppingSe(_))));
        }
    }

    #[test]
    fn test_rejects_zero_max_items() {
        let result = CatSession::new(five_item_bank(), config(0, 0, 0.3), StartingPoint::default());
        assert!(matches!(result, Err(Error::ZeroMaxItems)));
    }

    #[test]
    fn test_rejects_bad_bank_at_construction() {
        let mut bank = five_item_bank();
        bank[3].discrimination = 0.0;
        let result = CatSession::new(bank, config(1, 5, 0.3), StartingPoint::default());
        assert!(matches!(result, Err(Error::Discrimination { .. })));
    }

    #[test]
    fn test_start_point_override_wins() {
        let mut cfg = config(1, 5, 0.3);
        cfg.start_point_override = Some(0.75);
        let start = StartingPoint { age: Some(4), education: None };
        let session = CatSession::new(five_item_bank(), cfg, start).unwrap();
        assert_eq!(session.starting_theta(), 0.75);
        assert_eq!(session.estimate().theta, 0.75);
        assert_eq!(session.estimate().standard_error, INITIAL_STANDARD_ERROR);
    }

    #[test]
    fn test_heuristic_start_used_without_override() {
        let start = StartingPoint { age: None, education: Some(EducationLevel::Graduate) };
        let session = CatSession::new(five_item_bank(), config(1, 5, 0.3), start).unwrap();
        assert_eq!(session.starting_theta(), 1.0);
        assert_eq!(session.select_next_item().unwrap().difficulty, 1.0);
    }

    #[test]
    fn test_five_item_walkthrough() {
        let mut session =
            CatSession::new(five_item_bank(), config(3, 5, 0.3), StartingPoint::default()).unwrap();

        let first = session.select_next_item().unwrap();
        assert_eq!(first.difficulty, 0.0);

        for step in 1..=3 {
            assert!(!session.should_stop(), "stopped before min_items at step {}", step);
            let id = session.select_next_item().unwrap().id.clone();
            let update = session.score_response(&id, true).unwrap();
            assert_eq!(update.items_administered, step);
        }

        assert!(session.estimate().theta > 0.0);
        assert_eq!(session.items_administered(), 3);
        // Five unit-discrimination items cannot reach SE 0.3; the session keeps going.
        assert_eq!(session.stop_decision(), StopDecision::Continue);

        while let Some(item) = session.select_next_item() {
            let id = item.id.clone();
            session.score_response(&id, false).unwrap();
        }
        assert_eq!(session.stop_decision(), StopDecision::Stop(StopReason::MaxItems));
    }

    #[test]
    fn test_precision_stop_waits_for_min_items() {
        // Very sharp items near theta give SE < 0.3 after two responses.
        let bank: Vec<Item> = (0..10)
            .map(|i| Item::new(format!("s{}", i), -0.1 + 0.02 * i as f64, 8.0))
            .collect();
        let mut session = CatSession::new(bank, config(4, 10, 0.3), StartingPoint::default()).unwrap();

        let mut answers = [true, false].into_iter().cycle();
        for _ in 0..3 {
            let id = session.select_next_item().unwrap().id.clone();
            session.score_response(&id, answers.next().unwrap()).unwrap();
            assert!(!session.should_stop(), "precision stop fired before min_items");
        }
        assert!(session.estimate().standard_error <= 0.3);

        let id = session.select_next_item().unwrap().id.clone();
        session.score_response(&id, answers.next().unwrap()).unwrap();
        assert_eq!(
            session.stop_decision(),
            StopDecision::Stop(StopReason::PrecisionReached)
        );
    }

    #[test]
    fn test_exhaustion_scenario() {
        let bank = vec![Item::new("a", -0.5, 1.0), Item::new("b", 0.5, 1.0)];
        let mut session = CatSession::new(bank, config(5, 30, 0.3), StartingPoint::default()).unwrap();

        for correct in [true, false] {
            let id = session.select_next_item().unwrap().id.clone();
            session.score_response(&id, correct).unwrap();
        }

        assert!(session.select_next_item().is_none());
        assert!(session.should_stop());
        let summary = session.summary();
        assert_eq!(summary.status, SessionStatus::Stopped(StopReason::BankExhausted));
        assert_ne!(summary.status, SessionStatus::Stopped(StopReason::PrecisionReached));
    }

    #[test]
    fn test_empty_bank_stops_immediately() {
        let session = CatSession::new(Vec::new(), config(1, 5, 0.3), StartingPoint::default()).unwrap();
        assert_eq!(session.stop_decision(), StopDecision::Stop(StopReason::BankExhausted));
        assert!(session.select_next_item().is_none());
    }

    #[test]
    fn test_rejects_repeated_and_unknown_items() {
        let mut session =
            CatSession::new(five_item_bank(), config(1, 5, 0.3), StartingPoint::default()).unwrap();
        session.score_response("item2", true).unwrap();

        assert_eq!(
            session.score_response("item2", false),
            Err(Error::AlreadyAdministered("item2".to_string()))
        );
        assert_eq!(
            session.score_response("nope", false),
            Err(Error::UnknownItem("nope".to_string()))
        );
        assert_eq!(session.items_administered(), 1);
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn test_rejects_scoring_after_stop() {
        let mut session =
            CatSession::new(five_item_bank(), config(1, 1, 0.3), StartingPoint::default()).unwrap();
        session.score_response("item2", true).unwrap();
        assert_eq!(
            session.score_response("item3", true),
            Err(Error::SessionStopped(StopReason::MaxItems))
        );
    }

    #[test]
    fn test_used_ids_grow_monotonically_without_repeats() {
        let bank: Vec<Item> = (0..25)
            .map(|i| Item::new(format!("v{}", i), -2.4 + 0.2 * i as f64, 0.8 + 0.05 * i as f64))
            .collect();
        let mut session = CatSession::new(bank, config(5, 25, 0.3), StartingPoint::default()).unwrap();

        let mut step = 0;
        while !session.should_stop() {
            let item = session.select_next_item().unwrap();
            assert!(!session.used_item_ids().contains(&item.id));
            let id = item.id.clone();
            let before = session.used_item_ids().clone();
            session.score_response(&id, step % 3 != 0).unwrap();
            assert!(before.is_subset(session.used_item_ids()));
            assert_eq!(session.used_item_ids().len(), before.len() + 1);
            step += 1;
        }

        let ids: HashSet<&str> = session.history().iter().map(|r| r.item_id.as_str()).collect();
        assert_eq!(ids.len(), session.history().len());
    }

    #[test]
    fn test_selected_item_is_most_informative_at_current_theta() {
        let bank: Vec<Item> = (0..12)
            .map(|i| Item::new(format!("m{}", i), -2.0 + 0.35 * i as f64, 0.6 + 0.1 * (i % 5) as f64))
            .collect();
        let mut session = CatSession::new(bank, config(3, 8, 0.3), StartingPoint::default()).unwrap();

        for correct in [true, true, false, true, false] {
            let theta = session.estimate().theta;
            let picked = session.select_next_item().unwrap().clone();
            let picked_info = item_information(&picked, theta);
            for item in session.bank().items() {
                if !session.used_item_ids().contains(&item.id) {
                    assert!(item_information(item, theta) <= picked_info);
                }
            }
            let update = session.score_response(&picked.id, correct).unwrap();
            assert!((THETA_MIN..=THETA_MAX).contains(&update.theta));
        }
    }

    #[test]
    fn test_summary_tracks_trajectory() {
        let mut session =
            CatSession::new(five_item_bank(), config(1, 5, 0.3), StartingPoint::default()).unwrap();
        assert_eq!(session.summary().status, SessionStatus::InProgress);

        let update = session.score_response("item2", true).unwrap();
        let summary = session.summary();
        assert_eq!(summary.items_administered, 1);
        assert_eq!(summary.history[0].item_id, "item2");
        assert!(summary.history[0].correct);
        assert_eq!(summary.history[0].theta, update.theta);
        assert_eq!(summary.theta, update.theta);
        assert_eq!(summary.starting_theta, 0.0);
    }
}
