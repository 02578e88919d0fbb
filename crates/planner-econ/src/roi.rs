//! ROI engine: values clinical and operational improvements attributable to
//! simulation training against the five-year budget.
//!
//! Each category is valued as `baseline events x improvement x unit value`,
//! scaled by how much of the required training volume the center can
//! deliver, and realised on a ramp while the program matures.

use crate::budget::{cents, ratio, usd, BudgetResults, CostCategory, CostItem, PROJECTION_YEARS};
use planner_core::{
    citations_for, pct, weakest_confidence, AssumptionSource, Confidence, EvidenceCitation,
    RoiCategory, RoiParameters, SimulatorParameters,
};
use rust_decimal::Decimal;
use serde::Serialize;

/// Share of each category's steady-state benefit realised per year, percent.
pub const BENEFIT_RAMP_PCT: [i64; PROJECTION_YEARS] = [50, 75, 100, 100, 100];

/// Annual simulation hours each nurse needs for full benefit.
pub const REQUIRED_TRAINING_HOURS_PER_NURSE: i64 = 8;

/// Relative improvement attributed to simulation, percent.
pub struct ImprovementDeltas {
    pub turnover_reduction_pct: i64,
    pub code_outcome_improvement_pct: i64,
    pub med_error_reduction_pct: i64,
    pub hai_reduction_pct: i64,
    pub malpractice_premium_reduction_pct: i64,
    pub accreditation_attribution_pct: i64,
    /// Orientation weeks saved per new hire.
    pub onboarding_weeks_saved: u32,
}

pub const IMPROVEMENT: ImprovementDeltas = ImprovementDeltas {
    turnover_reduction_pct: 15,
    code_outcome_improvement_pct: 10,
    med_error_reduction_pct: 20,
    hai_reduction_pct: 25,
    malpractice_premium_reduction_pct: 5,
    accreditation_attribution_pct: 10,
    onboarding_weeks_saved: 2,
};

/// Half-width of the confidence band around a category's value.
pub fn band_pct(confidence: Confidence) -> Decimal {
    match confidence {
        Confidence::High => Decimal::new(10, 0),
        Confidence::Moderate => Decimal::new(25, 0),
        Confidence::Low => Decimal::new(40, 0),
    }
}

/// Assets savings are attributed to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AssetKind {
    SimulationRooms,
    HighFidelityManikins,
    TaskTrainers,
    AudioVisual,
}

const ASSETS: [AssetKind; 4] = [
    AssetKind::SimulationRooms,
    AssetKind::HighFidelityManikins,
    AssetKind::TaskTrainers,
    AssetKind::AudioVisual,
];

/// Attribution weights per category, in `ASSETS` order, percent. Rows sum to 100.
fn asset_weights(category: RoiCategory) -> [i64; 4] {
    match category {
        RoiCategory::NurseRetention => [40, 25, 20, 15],
        RoiCategory::CodeBlueOutcomes => [20, 60, 5, 15],
        RoiCategory::MedicationErrors => [40, 20, 25, 15],
        RoiCategory::InfectionPrevention => [10, 10, 70, 10],
        RoiCategory::Malpractice => [30, 40, 10, 20],
        RoiCategory::Accreditation => [40, 20, 10, 30],
        RoiCategory::OnboardingEfficiency => [30, 20, 35, 15],
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CategoryRoi {
    pub category: RoiCategory,
    pub label: &'static str,
    /// Events (or cost units) per year before simulation training.
    pub baseline_events: Decimal,
    pub improvement_pct: Decimal,
    pub events_avoided: Decimal,
    pub unit_value: Decimal,
    pub annual_savings: Decimal,
    pub five_year_savings: Decimal,
    pub present_value: Decimal,
    /// Weakest confidence across `citations`.
    pub confidence: Confidence,
    pub citations: &'static [EvidenceCitation],
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AssetRoi {
    pub asset: AssetKind,
    pub capex: Decimal,
    pub attributed_annual_savings: Decimal,
    pub attributed_five_year_savings: Decimal,
    /// `None` when the asset carries no capital cost.
    pub roi_pct: Option<Decimal>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct YearValue {
    pub year: u8,
    pub savings: Decimal,
    pub costs: Decimal,
    pub net: Decimal,
    pub cumulative_net: Decimal,
    pub discounted_net: Decimal,
    pub cumulative_discounted_net: Decimal,
}

/// Discounted five-year net value under pessimistic, expected and optimistic
/// evidence assumptions.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ConfidenceRange {
    pub low: Decimal,
    pub expected: Decimal,
    pub high: Decimal,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RoiSummary {
    pub annual_savings: Decimal,
    pub five_year_savings: Decimal,
    pub five_year_cost: Decimal,
    pub net_benefit: Decimal,
    pub roi_pct: Decimal,
    pub benefit_cost_ratio: Decimal,
    pub npv: Decimal,
    /// Fractional years until cumulative savings cover cumulative cost.
    pub payback_years: Option<Decimal>,
    pub training_coverage_pct: Decimal,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RoiResults {
    pub summary: RoiSummary,
    pub by_category: Vec<CategoryRoi>,
    pub by_asset: Vec<AssetRoi>,
    pub value_timeline: Vec<YearValue>,
    pub confidence_range: ConfidenceRange,
    pub source: AssumptionSource,
}

/// `(1 + rate)^year` for year = 1..=5.
fn discount_factors(rate_pct: Decimal) -> [Decimal; PROJECTION_YEARS] {
    let step = Decimal::ONE + pct(rate_pct);
    let mut out = [Decimal::ONE; PROJECTION_YEARS];
    let mut acc = Decimal::ONE;
    for slot in out.iter_mut() {
        acc *= step;
        *slot = acc;
    }
    out
}

/// Fraction of required training hours the center can deliver, capped at 1.
pub fn training_coverage(results: &BudgetResults, roi: &RoiParameters) -> Decimal {
    let required =
        Decimal::from(roi.total_nurses) * Decimal::from(REQUIRED_TRAINING_HOURS_PER_NURSE);
    if required.is_zero() {
        return Decimal::ONE;
    }
    (results.metrics.annual_learner_hours / required).min(Decimal::ONE)
}

/// `(baseline events, improvement %, unit value)` for one category.
fn category_inputs(category: RoiCategory, r: &RoiParameters) -> (Decimal, Decimal, Decimal) {
    let d = |v: i64| Decimal::from(v);
    let n = |v: u32| Decimal::from(v);
    match category {
        RoiCategory::NurseRetention => (
            n(r.total_nurses) * pct(r.annual_turnover_pct),
            d(IMPROVEMENT.turnover_reduction_pct),
            r.turnover_cost_per_nurse,
        ),
        RoiCategory::CodeBlueOutcomes => (
            n(r.code_blue_events_per_year) * (Decimal::ONE - pct(r.baseline_code_survival_pct)),
            d(IMPROVEMENT.code_outcome_improvement_pct),
            r.cost_per_adverse_code_outcome,
        ),
        RoiCategory::MedicationErrors => (
            n(r.medication_errors_per_year) * pct(r.harmful_med_error_pct),
            d(IMPROVEMENT.med_error_reduction_pct),
            r.cost_per_med_error,
        ),
        RoiCategory::InfectionPrevention => (
            n(r.hai_cases_per_year),
            d(IMPROVEMENT.hai_reduction_pct),
            r.cost_per_hai,
        ),
        RoiCategory::Malpractice => (
            Decimal::ONE,
            d(IMPROVEMENT.malpractice_premium_reduction_pct),
            r.annual_malpractice_premium,
        ),
        RoiCategory::Accreditation => {
            let baseline = if r.pursuing_accreditation {
                Decimal::ONE
            } else {
                Decimal::ZERO
            };
            (
                baseline,
                d(IMPROVEMENT.accreditation_attribution_pct),
                r.accreditation_annual_value,
            )
        }
        RoiCategory::OnboardingEfficiency => {
            let weeks_saved = IMPROVEMENT.onboarding_weeks_saved.min(r.onboarding_weeks);
            let improvement = if r.onboarding_weeks == 0 {
                Decimal::ZERO
            } else {
                n(weeks_saved) * Decimal::ONE_HUNDRED / n(r.onboarding_weeks)
            };
            (
                n(r.new_hires_per_year) * n(r.onboarding_weeks),
                improvement,
                r.onboarding_weekly_cost,
            )
        }
    }
}

fn value_category(
    category: RoiCategory,
    r: &RoiParameters,
    coverage: Decimal,
    factors: &[Decimal; PROJECTION_YEARS],
) -> CategoryRoi {
    let (baseline_events, improvement_pct, unit_value) = category_inputs(category, r);
    let events_avoided = baseline_events * pct(improvement_pct) * coverage;
    let annual_savings = usd(events_avoided * unit_value);

    let mut five_year = Decimal::ZERO;
    let mut present = Decimal::ZERO;
    for (ramp, factor) in BENEFIT_RAMP_PCT.iter().zip(factors) {
        let year = usd(annual_savings * pct(Decimal::from(*ramp)));
        five_year += year;
        present += year / factor;
    }

    let citations = citations_for(category);
    CategoryRoi {
        category,
        label: category.label(),
        baseline_events: cents(baseline_events),
        improvement_pct: cents(improvement_pct),
        events_avoided: cents(events_avoided),
        unit_value,
        annual_savings,
        five_year_savings: five_year,
        present_value: usd(present),
        confidence: weakest_confidence(citations),
        citations,
    }
}

fn asset_capex(budget: &BudgetResults, asset: AssetKind) -> Decimal {
    let capex = &budget.capex;
    match asset {
        AssetKind::SimulationRooms => {
            capex.category_total(CostCategory::Construction)
                + capex.item_amount(CostItem::ClinicalFitOut)
                + capex.category_total(CostCategory::Furnishings)
        }
        AssetKind::HighFidelityManikins => capex.item_amount(CostItem::Manikins),
        AssetKind::TaskTrainers => capex.item_amount(CostItem::TaskTrainers),
        AssetKind::AudioVisual => capex.category_total(CostCategory::AudioVisual),
    }
}

fn attribute_to_assets(budget: &BudgetResults, categories: &[CategoryRoi]) -> Vec<AssetRoi> {
    ASSETS
        .iter()
        .enumerate()
        .map(|(idx, asset)| {
            let (annual, five_year) = categories.iter().fold(
                (Decimal::ZERO, Decimal::ZERO),
                |(a, f), c| {
                    let w = pct(Decimal::from(asset_weights(c.category)[idx]));
                    (a + c.annual_savings * w, f + c.five_year_savings * w)
                },
            );
            let capex = asset_capex(budget, *asset);
            let roi_pct = if capex.is_zero() {
                None
            } else {
                Some(cents((five_year - capex) / capex * Decimal::ONE_HUNDRED))
            };
            AssetRoi {
                asset: *asset,
                capex,
                attributed_annual_savings: usd(annual),
                attributed_five_year_savings: usd(five_year),
                roi_pct,
            }
        })
        .collect()
}

fn payback(timeline: &[YearValue]) -> Option<Decimal> {
    let mut prev = Decimal::ZERO;
    for y in timeline {
        if y.cumulative_net >= Decimal::ZERO && y.net > Decimal::ZERO {
            let into_year = ratio(-prev, y.net).max(Decimal::ZERO);
            let years = Decimal::from(y.year - 1) + into_year;
            return Some(years.round_dp(1));
        }
        prev = y.cumulative_net;
    }
    None
}

/// Value the program for the given configuration, budget and assumptions.
pub fn calculate_roi(
    params: &SimulatorParameters,
    results: &BudgetResults,
    roi: &RoiParameters,
) -> RoiResults {
    let factors = discount_factors(roi.discount_rate_pct);
    let coverage = training_coverage(results, roi);
    tracing::trace!(
        sim_rooms = params.sim_rooms,
        %coverage,
        "valuing simulation program"
    );

    let by_category: Vec<CategoryRoi> = RoiCategory::ALL
        .iter()
        .map(|c| value_category(*c, roi, coverage, &factors))
        .collect();

    let mut value_timeline = Vec::with_capacity(PROJECTION_YEARS);
    let mut cumulative = Decimal::ZERO;
    let mut cumulative_discounted = Decimal::ZERO;
    let mut pv_costs = Decimal::ZERO;
    for (idx, (year, factor)) in results.five_year.years.iter().zip(&factors).enumerate() {
        let ramp = pct(Decimal::from(BENEFIT_RAMP_PCT[idx]));
        let savings: Decimal = by_category
            .iter()
            .map(|c| usd(c.annual_savings * ramp))
            .sum();
        let net = savings - year.total;
        cumulative += net;
        let discounted = net / factor;
        cumulative_discounted += discounted;
        pv_costs += year.total / factor;
        value_timeline.push(YearValue {
            year: year.year,
            savings,
            costs: year.total,
            net,
            cumulative_net: cumulative,
            discounted_net: usd(discounted),
            cumulative_discounted_net: usd(cumulative_discounted),
        });
    }

    let annual_savings = by_category.iter().map(|c| c.annual_savings).sum();
    let five_year_savings: Decimal = by_category.iter().map(|c| c.five_year_savings).sum();
    let five_year_cost = results.five_year.grand_total;
    let net_benefit = five_year_savings - five_year_cost;

    let (low, high) = by_category.iter().fold((Decimal::ZERO, Decimal::ZERO), |(l, h), c| {
        let band = pct(band_pct(c.confidence));
        (
            l + c.present_value * (Decimal::ONE - band),
            h + c.present_value * (Decimal::ONE + band),
        )
    });
    let pv_savings: Decimal = by_category.iter().map(|c| c.present_value).sum();
    let confidence_range = ConfidenceRange {
        low: usd(low - pv_costs),
        expected: usd(pv_savings - pv_costs),
        high: usd(high - pv_costs),
    };

    let summary = RoiSummary {
        annual_savings,
        five_year_savings,
        five_year_cost,
        net_benefit,
        roi_pct: ratio(net_benefit, five_year_cost)
            .checked_mul(Decimal::ONE_HUNDRED)
            .map(|v| v.round_dp(1))
            .unwrap_or(Decimal::ZERO),
        benefit_cost_ratio: cents(ratio(five_year_savings, five_year_cost)),
        npv: usd(cumulative_discounted),
        payback_years: payback(&value_timeline),
        training_coverage_pct: cents(coverage * Decimal::ONE_HUNDRED),
    };

    RoiResults {
        summary,
        by_asset: attribute_to_assets(results, &by_category),
        by_category,
        value_timeline,
        confidence_range,
        source: roi.source,
    }
}
