/// irtcat-core: Pure-computation computerized adaptive testing engine.
///
/// Item bank → maximum-information item selection → Newton-Raphson ability
/// estimate with standard error → stop/continue decision.
/// No IO, no rendering — the caller presents items and scores answers.
///
/// Items are identified by caller-provided string IDs.
///
/// # Quick start
///
/// ```rust
/// use irtcat_core::{CatSession, Item, SessionConfig, StartingPoint};
///
/// let bank: Vec<Item> = [-2.0, -1.0, 0.0, 1.0, 2.0]
///     .iter()
///     .enumerate()
///     .map(|(i, &b)| Item::new(format!("item{}", i), b, 1.0))
///     .collect();
///
/// let config = SessionConfig { min_items: 3, max_items: 5, ..SessionConfig::default() };
/// let mut session = CatSession::new(bank, config, StartingPoint::default()).unwrap();
///
/// while !session.should_stop() {
///     let id = session.select_next_item().unwrap().id.clone();
///     let correct = true; // present the item, collect the answer
///     let update = session.score_response(&id, correct).unwrap();
///     println!("theta {:.3} (SE {:.3})", update.theta, update.standard_error);
/// }
///
/// println!("{:?}", session.summary().status);
/// ```

pub mod constants;
pub mod engine;
pub mod error;
pub mod estimation;
pub mod information;
pub mod selection;
pub mod simulation;
pub mod starting_point;
pub mod stopping;
pub mod types;

// Re-export primary public API at crate root.
pub use engine::{CatSession, SessionConfig};
pub use error::{Error, Result};
pub use estimation::{AbilityEstimator, EstimationOutcome};
pub use information::{item_information, probability_correct, test_information};
pub use selection::select_next_item;
pub use simulation::{conditional_accuracy, simulate_session, ConditionalAccuracy};
pub use starting_point::{starting_theta, EducationLevel, StartingPoint};
pub use stopping::{should_stop, stop_decision};
pub use types::{
    AbilityEstimate, AdministrationRecord, Item, ItemBank, ScoreUpdate, SessionStatus,
    SessionSummary, StopDecision, StopReason,
};
