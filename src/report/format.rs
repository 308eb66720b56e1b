//! Text rendering of KPIs and alert tables.

use crate::data::LoadOrigin;
use crate::domain::{DerivedRow, DerivedTable, Language, LatestSnapshot, Session};
use crate::i18n::labels;

/// Title, source, thresholds and KPI values.
pub fn format_run_summary(
    table: &DerivedTable,
    latest: &LatestSnapshot,
    origin: &LoadOrigin,
    session: &Session,
) -> String {
    let l = labels(session.language);
    let mut out = String::new();

    out.push_str(&format!("=== {} ===\n", l.title));
    out.push_str(&format!("{}\n", l.subtitle));
    out.push_str(&format!("{}: {origin}\n", l.source));
    out.push_str(&format!(
        "{}: {} | rows={} | indicators={}\n",
        l.latest_as_of,
        latest.date,
        table.len(),
        table.indicators.join(", "),
    ));
    out.push_str(&format!(
        "{}: {:.1} | {}: {:.1}\n",
        l.yoy_threshold, session.thresholds.yoy, l.mom_threshold, session.thresholds.mom
    ));
    out.push_str(&format!("{}\n\n", l.alert_rule));

    out.push_str(&format!("{:<28} {:>10}\n", l.kpi_food_latest, fmt_level(latest.food_cpi)));
    out.push_str(&format!("{:<28} {:>10}\n", l.kpi_food_yoy, fmt_pct(latest.food_cpi_yoy_pct)));
    out.push_str(&format!("{:<28} {:>10}\n", l.kpi_food_mom, fmt_pct(latest.food_cpi_mom_pct)));

    out
}

/// Table of alert rows (Date, Food CPI, YoY %, MoM %, Heat), 2 decimals.
pub fn format_alerts(table: &DerivedTable, language: Language) -> String {
    let l = labels(language);
    let mut out = String::new();
    out.push_str(l.alerts_intro);
    out.push('\n');

    let alerts: Vec<&DerivedRow> = table.alerts().collect();
    if alerts.is_empty() {
        out.push_str(l.no_alerts);
        out.push('\n');
        return out;
    }

    out.push_str(
        format!(
            "{:<10} {:>12} {:>16} {:>16} {:>8}",
            l.col_date, l.col_food_cpi, l.col_food_yoy, l.col_food_mom, l.col_heat
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(&format!(
        "{:-<10} {:-<12} {:-<16} {:-<16} {:-<8}\n",
        "", "", "", "", ""
    ));

    for r in alerts {
        out.push_str(
            format!(
                "{:<10} {:>12} {:>16} {:>16} {:>8}",
                r.date,
                fmt_opt(r.food_cpi, 2),
                fmt_opt(r.food_cpi_yoy_pct, 2),
                fmt_opt(r.food_cpi_mom_pct, 2),
                fmt_opt(r.heat, 2),
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

/// KPI level format (one decimal).
pub fn fmt_level(v: Option<f64>) -> String {
    fmt_opt(v, 1)
}

/// KPI percentage format (two decimals).
pub fn fmt_pct(v: Option<f64>) -> String {
    fmt_opt(v, 2)
}

pub fn fmt_opt(v: Option<f64>, decimals: usize) -> String {
    match v {
        Some(v) if v.is_finite() => format!("{v:.decimals$}"),
        _ => "-".to_string(),
    }
}
