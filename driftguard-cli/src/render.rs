//! Plain-text rendering of reports for the terminal.

use driftguard_core::dashboard::{DashboardSummary, FeatureDetail, RetrainAction};
use driftguard_core::DriftReport;
use std::fmt::Write;

pub fn report_table(report: &DriftReport) -> String {
    let mut out = String::new();
    if report.is_empty() {
        out.push_str("No numeric features shared by both datasets.\n");
        return out;
    }
    let _ = writeln!(
        out,
        "{:<24} {:>10} {:>10} {:>10}  Status",
        "Feature", "PSI", "KS", "KL"
    );
    let _ = writeln!(out, "{}", "-".repeat(66));
    for r in report {
        let _ = writeln!(
            out,
            "{:<24} {:>10.4} {:>10.4} {:>10.4}  {}",
            r.feature_name, r.metrics.psi, r.metrics.ks, r.metrics.kl, r.severity
        );
    }
    let _ = writeln!(
        out,
        "\n{} of {} features drifting (baseline rows: {}, current rows: {})",
        report.drifting_features(),
        report.total_features(),
        report.baseline_rows,
        report.current_rows
    );
    out
}

pub fn dashboard_text(summary: &DashboardSummary) -> String {
    let mut out = String::new();
    let drift = &summary.drift_summary;
    let action = match drift.recommendation.action {
        RetrainAction::RetrainUrgent => "RETRAIN_URGENT",
        RetrainAction::Monitor => "MONITOR",
    };
    let _ = writeln!(out, "Health score:   {}", summary.health_score);
    let _ = writeln!(
        out,
        "Drift score:    {:.2} ({} of {} features drifting)",
        drift.score, drift.drifting_count, drift.total_count
    );
    let _ = writeln!(
        out,
        "Recommendation: {action} (est. {})",
        drift.recommendation.estimated_time
    );

    out.push('\n');
    for card in &summary.metrics {
        let _ = writeln!(out, "{:<18} {:>12}  {:+.2}", card.label, card.value, card.change);
    }

    if !summary.top_features.is_empty() {
        let _ = writeln!(out, "\nTop features by PSI:");
        for f in &summary.top_features {
            let _ = writeln!(out, "  {:<24} {:>8.4}  {}", f.name, f.psi, f.status);
        }
    }

    if summary.alerts.is_empty() {
        let _ = writeln!(out, "\nNo alerts.");
    } else {
        let _ = writeln!(out, "\nAlerts:");
        for alert in &summary.alerts {
            let _ = writeln!(out, "  [{}] {}", alert.kind, alert.message);
        }
    }
    out
}

pub fn feature_text(detail: &FeatureDetail) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}  (PSI {:.4}, {})\n",
        detail.feature_name, detail.psi, detail.status
    );
    let _ = writeln!(out, "{:<8} {:>14} {:>14}", "", "Baseline", "Production");
    let (b, p) = (&detail.baseline_stats, &detail.production_stats);
    for (label, bv, pv) in [
        ("mean", b.mean, p.mean),
        ("median", b.median, p.median),
        ("std", b.std, p.std),
        ("min", b.min, p.min),
        ("max", b.max, p.max),
    ] {
        let _ = writeln!(out, "{label:<8} {bv:>14.4} {pv:>14.4}");
    }

    let _ = writeln!(out, "\n{:<24} {:>10} {:>10}", "Bin", "Baseline%", "Current%");
    for bin in &detail.chart_data {
        let _ = writeln!(
            out,
            "{:<24} {:>10.2} {:>10.2}",
            bin.range, bin.baseline_density, bin.production_density
        );
    }
    out
}
