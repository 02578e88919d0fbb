//! Plain-text rendering of budget and ROI results.

use planner_econ::{BudgetResults, LineItem, RoiResults};
use rust_decimal::Decimal;
use std::fmt::Write;

/// `1234567` -> `$1,234,567`; cents are dropped.
pub fn money(value: Decimal) -> String {
    let whole = value.round().abs().to_string();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if value.is_sign_negative() && !value.round().is_zero() {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

fn items(out: &mut String, items: &[LineItem]) {
    for li in items {
        let _ = writeln!(
            out,
            "  {:<34} {:>8} x {:>12} = {:>14}",
            li.label,
            li.quantity.normalize(),
            money(li.unit_cost),
            money(li.amount)
        );
    }
}

pub fn budget_text(r: &BudgetResults) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "CAPEX");
    items(&mut out, &r.capex.items);
    let _ = writeln!(out, "  {:<34} {:>39}", "Base total", money(r.capex.base_total));
    let _ = writeln!(out, "  {:<34} {:>39}", "Contingency", money(r.capex.contingency));
    let _ = writeln!(out, "  {:<34} {:>39}", "Credits", money(-r.capex.credits));
    let _ = writeln!(out, "  {:<34} {:>39}", "Net capital", money(r.capex.net));

    let _ = writeln!(out, "\nOPEX ({:?})", r.opex.model);
    items(&mut out, &r.opex.items);
    let _ = writeln!(out, "  {:<34} {:>39}", "Annual total", money(r.opex.total));

    let _ = writeln!(out, "\nFIVE-YEAR PROJECTION");
    for y in &r.five_year.years {
        let _ = writeln!(
            out,
            "  Year {}  capex {:>14}  opex {:>12}  sessions {:>6}  cumulative {:>14}",
            y.year,
            money(y.capex),
            money(y.opex),
            y.sessions,
            money(y.cumulative_total)
        );
    }
    let _ = writeln!(out, "  Grand total {}", money(r.five_year.grand_total));

    let m = &r.metrics;
    let _ = writeln!(out, "\nMETRICS");
    let _ = writeln!(out, "  Sessions per year     {}", m.annual_sessions);
    let _ = writeln!(out, "  Cost per session      {}", money(m.cost_per_session));
    let _ = writeln!(out, "  Cost per learner hour {}", money(m.cost_per_learner_hour));
    let _ = writeln!(out, "  Utilization           {}%", m.utilization_pct.normalize());
    out
}

pub fn roi_text(r: &RoiResults) -> String {
    let mut out = String::new();
    let s = &r.summary;
    let _ = writeln!(out, "ROI ({:?} assumptions)", r.source);
    for c in &r.by_category {
        let _ = writeln!(
            out,
            "  {:<28} annual {:>12}  5-yr {:>14}  {:?}",
            c.label,
            money(c.annual_savings),
            money(c.five_year_savings),
            c.confidence
        );
    }
    let _ = writeln!(out, "  Net benefit {}  ROI {}%", money(s.net_benefit), s.roi_pct.normalize());
    let _ = writeln!(out, "  NPV {}", money(s.npv));
    match s.payback_years {
        Some(years) => {
            let _ = writeln!(out, "  Payback {} years", years.round_dp(1).normalize());
        }
        None => {
            let _ = writeln!(out, "  Payback beyond projection");
        }
    }
    let range = &r.confidence_range;
    let _ = writeln!(
        out,
        "  Range {} / {} / {}",
        money(range.low),
        money(range.expected),
        money(range.high)
    );
    out
}
