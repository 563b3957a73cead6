/// Monte-Carlo simulation of adaptive sessions.
///
/// Responses are drawn from the 2PL model at a known true theta, so the
/// engine's estimates can be compared against the truth.
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::engine::{CatSession, SessionConfig};
use crate::error::Result;
use crate::information::probability_correct;
use crate::starting_point::StartingPoint;
use crate::types::{Item, SessionSummary};

/// Accuracy of the engine at one true theta, averaged over replications.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConditionalAccuracy {
    pub true_theta: f64,
    /// Mean of (estimate - true theta).
    pub bias: f64,
    /// Mean of (estimate - true theta)^2.
    pub mse: f64,
    pub mean_standard_error: f64,
    /// Mean test length.
    pub mean_items: f64,
}

/// Run one full session, answering each item with probability P(correct | true_theta).
pub fn simulate_session<R: Rng>(
    items: &[Item],
    config: &SessionConfig,
    true_theta: f64,
    start: StartingPoint,
    rng: &mut R,
) -> Result<SessionSummary> {
    let mut session = CatSession::new(items.to_vec(), config.clone(), start)?;

    while !session.should_stop() {
        let Some(item) = session.select_next_item() else {
            break;
        };
        let p = probability_correct(true_theta, item.difficulty, item.discrimination);
        let correct = rng.random::<f64>() < p;
        let id = item.id.clone();
        session.score_response(&id, correct)?;
    }

    Ok(session.summary())
}

/// Bias, MSE, mean SE and mean test length at each of `true_thetas`.
///
/// Each (theta, replication) pair gets its own seed derived from `seed`, so
/// results are reproducible. At least one replication is always run.
pub fn conditional_accuracy(
    items: &[Item],
    config: &SessionConfig,
    true_thetas: &[f64],
    replications: usize,
    start: StartingPoint,
    seed: u64,
) -> Result<Vec<ConditionalAccuracy>> {
    let n_reps = replications.max(1);
    let mut results = Vec::with_capacity(true_thetas.len());

    for (t_idx, &true_theta) in true_thetas.iter().enumerate() {
        let mut error_sum = 0.0;
        let mut squared_error_sum = 0.0;
        let mut se_sum = 0.0;
        let mut items_sum = 0.0;

        for rep in 0..n_reps {
            let mut rng = StdRng::seed_from_u64(replication_seed(seed, t_idx, rep));

            let summary = simulate_session(items, config, true_theta, start, &mut rng)?;
            let error = summary.theta - true_theta;
            error_sum += error;
            squared_error_sum += error * error;
            se_sum += summary.standard_error;
            items_sum += summary.items_administered as f64;
        }

        let n = n_reps as f64;
        let accuracy = ConditionalAccuracy {
            true_theta,
            bias: error_sum / n,
            mse: squared_error_sum / n,
            mean_standard_error: se_sum / n,
            mean_items: items_sum / n,
        };
        debug!(
            true_theta,
            bias = accuracy.bias,
            mse = accuracy.mse,
            mean_items = accuracy.mean_items,
            "simulated theta point"
        );
        results.push(accuracy);
    }

    Ok(results)
}

/// Seed for one (theta point, replication) pair.
///
/// Theta index in the high 32 bits, replication in the low 32, so pairs stay
/// distinct for any replication count below 2^32.
fn replication_seed(seed: u64, t_idx: usize, rep: usize) -> u64 {
    seed ^ (((t_idx as u64) << 32) | (rep as u64 & 0xFFFF_FFFF))
}
