/// Output formatting: terminal table and JSON.
use irtcat_core::{ConditionalAccuracy, SessionStatus, SessionSummary};
use serde::Serialize;

use crate::bail;

#[derive(Serialize)]
struct JsonSimulation<'a> {
    replications: usize,
    seed: u64,
    points: &'a [ConditionalAccuracy],
}

fn status_text(status: SessionStatus) -> String {
    match status {
        SessionStatus::InProgress => "in progress".to_string(),
        SessionStatus::Stopped(reason) => reason.to_string(),
    }
}

/// Print a session summary as a formatted terminal table.
pub fn print_summary_table(summary: &SessionSummary) {
    let id_width = summary
        .history
        .iter()
        .map(|r| r.item_id.len())
        .max()
        .unwrap_or(4)
        .max(4); // at least "Item"

    println!(" # | {:<id_width$} | Correct |   Theta |     SE", "Item");
    println!("---|-{}-|---------|---------|-------", "-".repeat(id_width));

    for (i, r) in summary.history.iter().enumerate() {
        println!(
            "{:>2} | {:<id_width$} | {:>7} | {:>7.3} | {:>6.3}",
            i + 1,
            r.item_id,
            if r.correct { "yes" } else { "no" },
            r.theta,
            r.standard_error,
        );
    }

    println!(
        "\nFinal theta {:.3} (SE {:.3}) after {} items, starting from {:.2}",
        summary.theta, summary.standard_error, summary.items_administered, summary.starting_theta,
    );
    println!("Status: {}", status_text(summary.status));
}

/// Print a session summary as JSON.
pub fn print_summary_json(summary: &SessionSummary) {
    let json = serde_json::to_string_pretty(summary)
        .unwrap_or_else(|e| bail(format!("Failed to serialize summary: {e}")));
    println!("{json}");
}

/// Print simulation results as a formatted terminal table.
pub fn print_simulation_table(points: &[ConditionalAccuracy], replications: usize) {
    println!(" True theta |    Bias |     MSE | Mean SE | Mean items");
    println!("------------|---------|---------|---------|-----------");
    for p in points {
        println!(
            "{:>11.2} | {:>7.3} | {:>7.3} | {:>7.3} | {:>10.1}",
            p.true_theta, p.bias, p.mse, p.mean_standard_error, p.mean_items,
        );
    }
    println!("\n{} theta points x {} replications", points.len(), replications);
}

/// Print simulation results as JSON.
pub fn print_simulation_json(points: &[ConditionalAccuracy], replications: usize, seed: u64) {
    let output = JsonSimulation { replications, seed, points };
    let json = serde_json::to_string_pretty(&output)
        .unwrap_or_else(|e| bail(format!("Failed to serialize simulation results: {e}")));
    println!("{json}");
}
