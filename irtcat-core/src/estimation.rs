/// Newton-Raphson maximum-likelihood estimation of theta under the 2PL model.
///
/// Re-estimates from the whole response history on every call, warm-started
/// from the previous theta. Theta is clamped to [THETA_MIN, THETA_MAX] after
/// every step, which is what absorbs all-correct / all-incorrect histories.
///
/// A Newton step that lowers the log-likelihood is halved until it doesn't
/// (at most MAX_STEP_HALVINGS times).
use tracing::{debug, warn};

use crate::constants::{CONVERGENCE_THRESHOLD, MAX_STEP_HALVINGS, THETA_MAX, THETA_MIN};
use crate::information::{information, logistic, logistic_variance};
use crate::types::{AbilityEstimate, Item};

/// Result of one re-estimation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EstimationOutcome {
    pub estimate: AbilityEstimate,
    pub iterations: usize,
    pub converged: bool,
}

/// A scored response reduced to what the likelihood needs.
#[derive(Debug, Clone, Copy)]
struct ScoredResponse {
    difficulty: f64,
    discrimination: f64,
    observed: f64,
}

pub struct AbilityEstimator {
    responses: Vec<ScoredResponse>,
}

impl AbilityEstimator {
    /// Build from `(item, correct)` pairs in administration order.
    pub fn new<'a, I>(history: I) -> Self
    where
        I: IntoIterator<Item = (&'a Item, bool)>,
    {
        let responses = history
            .into_iter()
            .map(|(item, correct)| ScoredResponse {
                difficulty: item.difficulty,
                discrimination: item.discrimination,
                observed: if correct { 1.0 } else { 0.0 },
            })
            .collect();
        AbilityEstimator { responses }
    }

    pub fn num_responses(&self) -> usize {
        self.responses.len()
    }

    /// First and second derivative of the log-likelihood at `theta`.
    fn derivatives(&self, theta: f64) -> (f64, f64) {
        let mut first = 0.0;
        let mut second = 0.0;
        for r in &self.responses {
            let z = r.discrimination * (theta - r.difficulty);
            // u - p, with 1 - p taken as p(-z) so it doesn't round to zero.
            let residual = if r.observed > 0.5 { logistic(-z) } else { -logistic(z) };
            first += r.discrimination * residual;
            second -= r.discrimination * r.discrimination * logistic_variance(z);
        }
        (first, second)
    }

    /// Log-likelihood of the observed responses at `theta`.
    pub fn log_likelihood(&self, theta: f64) -> f64 {
        self.responses
            .iter()
            .map(|r| {
                let z = r.discrimination * (theta - r.difficulty);
                if r.observed > 0.5 {
                    log_sigmoid(z)
                } else {
                    log_sigmoid(-z)
                }
            })
            .sum()
    }

    /// Sum of item information at `theta`.
    pub fn total_information(&self, theta: f64) -> f64 {
        self.responses
            .iter()
            .map(|r| information(theta, r.difficulty, r.discrimination))
            .sum()
    }

    /// `1 / sqrt(total information)`; infinite when the information underflows to zero.
    pub fn standard_error(&self, theta: f64) -> f64 {
        let info = self.total_information(theta);
        if info > 0.0 {
            1.0 / info.sqrt()
        } else {
            f64::INFINITY
        }
    }

    /// Run Newton-Raphson from `current.theta`.
    ///
    /// With no responses the current estimate comes back unchanged (zero
    /// iterations, converged). A non-finite second derivative, or a zero one
    /// with a zero gradient, ends the loop without taking that step. When the
    /// curvature underflows but the gradient doesn't, the step goes to the
    /// bound the gradient points at and step-halving pulls it back.
    pub fn estimate(&self, current: AbilityEstimate, max_iterations: usize) -> EstimationOutcome {
        if self.responses.is_empty() {
            return EstimationOutcome {
                estimate: current,
                iterations: 0,
                converged: true,
            };
        }

        let mut theta = current.theta.clamp(THETA_MIN, THETA_MAX);
        let mut iterations = 0;
        let mut converged = false;

        while iterations < max_iterations {
            let (first, second) = self.derivatives(theta);
            if !second.is_finite() || (second == 0.0 && first == 0.0) {
                debug!(theta, first, second, "degenerate second derivative, keeping current theta");
                break;
            }

            iterations += 1;
            let mut next = if second == 0.0 {
                debug!(theta, first, "curvature underflowed, stepping toward the bound");
                if first > 0.0 { THETA_MAX } else { THETA_MIN }
            } else {
                (theta - first / second).clamp(THETA_MIN, THETA_MAX)
            };
            let current_ll = self.log_likelihood(theta);
            let mut halvings = 0;
            while halvings < MAX_STEP_HALVINGS && self.log_likelihood(next) < current_ll {
                next = 0.5 * (theta + next);
                halvings += 1;
            }
            let step = (next - theta).abs();
            theta = next;

            if step < CONVERGENCE_THRESHOLD {
                converged = true;
                break;
            }
        }

        if !converged && iterations == max_iterations {
            warn!(
                theta,
                iterations,
                responses = self.responses.len(),
                "Newton-Raphson hit the iteration limit before converging"
            );
        }

        let standard_error = self.standard_error(theta);
        debug!(theta, standard_error, iterations, converged, "ability re-estimated");

        EstimationOutcome {
            estimate: AbilityEstimate { theta, standard_error },
            iterations,
            converged,
        }
    }
}

/// `ln(1 / (1 + exp(-z)))` without overflow.
fn log_sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        -(-z).exp().ln_1p()
    } else {
        z - z.exp().ln_1p()
    }
}
