//! Organisational inputs for the ROI engine.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Where the current ROI assumptions came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AssumptionSource {
    /// Published benchmark values shipped with the planner.
    IndustryBenchmark,
    /// At least one value was entered by the organisation.
    OrganizationSupplied,
}

/// Workforce, clinical and financial baselines used to value simulation
/// training. Defaults are industry benchmarks for a ~300-bed hospital.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoiParameters {
    // Workforce
    pub total_nurses: u32,
    /// Annual RN turnover, in percent.
    pub annual_turnover_pct: Decimal,
    /// Fully loaded cost of replacing one bedside RN (USD).
    pub turnover_cost_per_nurse: Decimal,
    pub new_hires_per_year: u32,
    /// Baseline orientation length in weeks.
    pub onboarding_weeks: u32,
    /// Cost of one orientation week per new hire (USD).
    pub onboarding_weekly_cost: Decimal,

    // Clinical events
    pub code_blue_events_per_year: u32,
    /// Baseline survival to discharge after in-hospital arrest, in percent.
    pub baseline_code_survival_pct: Decimal,
    /// Incremental cost of one adverse arrest outcome (USD).
    pub cost_per_adverse_code_outcome: Decimal,
    pub medication_errors_per_year: u32,
    /// Share of medication errors that cause harm, in percent.
    pub harmful_med_error_pct: Decimal,
    pub cost_per_med_error: Decimal,

    // Infection prevention
    pub hai_cases_per_year: u32,
    pub cost_per_hai: Decimal,

    // Financial
    pub annual_malpractice_premium: Decimal,
    /// Whether the organisation is pursuing an accreditation or designation
    /// (e.g. Magnet, SSH accreditation) that simulation supports.
    pub pursuing_accreditation: bool,
    /// Annual value attributed to holding that status (USD).
    pub accreditation_annual_value: Decimal,
    /// Discount rate for present-value figures, in percent.
    pub discount_rate_pct: Decimal,

    pub source: AssumptionSource,
}

impl Default for RoiParameters {
    fn default() -> Self {
        Self {
            total_nurses: 500,
            annual_turnover_pct: Decimal::new(184, 1),
            turnover_cost_per_nurse: Decimal::new(56_300, 0),
            new_hires_per_year: 90,
            onboarding_weeks: 12,
            onboarding_weekly_cost: Decimal::new(2_400, 0),
            code_blue_events_per_year: 150,
            baseline_code_survival_pct: Decimal::new(25, 0),
            cost_per_adverse_code_outcome: Decimal::new(35_000, 0),
            medication_errors_per_year: 400,
            harmful_med_error_pct: Decimal::new(25, 0),
            cost_per_med_error: Decimal::new(8_750, 0),
            hai_cases_per_year: 24,
            cost_per_hai: Decimal::new(48_000, 0),
            annual_malpractice_premium: Decimal::new(2_500_000, 0),
            pursuing_accreditation: true,
            accreditation_annual_value: Decimal::new(1_200_000, 0),
            discount_rate_pct: Decimal::new(5, 0),
            source: AssumptionSource::IndustryBenchmark,
        }
    }
}

/// Shallow merge-patch over [`RoiParameters`]. Applying any non-empty patch
/// re-tags the result as organisation supplied.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RoiParamsPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_nurses: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annual_turnover_pct: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub turnover_cost_per_nurse: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_hires_per_year: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub onboarding_weeks: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub onboarding_weekly_cost: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_blue_events_per_year: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baseline_code_survival_pct: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_per_adverse_code_outcome: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medication_errors_per_year: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub harmful_med_error_pct: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_per_med_error: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hai_cases_per_year: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_per_hai: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annual_malpractice_premium: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pursuing_accreditation: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accreditation_annual_value: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_rate_pct: Option<Decimal>,
}

impl RoiParamsPatch {
    pub fn is_empty(&self) -> bool {
        *self == RoiParamsPatch::default()
    }

    /// Returns `base` with every populated field of the patch written over it.
    pub fn apply(&self, base: &RoiParameters) -> RoiParameters {
        let source = if self.is_empty() {
            base.source
        } else {
            AssumptionSource::OrganizationSupplied
        };
        RoiParameters {
            total_nurses: self.total_nurses.unwrap_or(base.total_nurses),
            annual_turnover_pct: self.annual_turnover_pct.unwrap_or(base.annual_turnover_pct),
            turnover_cost_per_nurse: self
                .turnover_cost_per_nurse
                .unwrap_or(base.turnover_cost_per_nurse),
            new_hires_per_year: self.new_hires_per_year.unwrap_or(base.new_hires_per_year),
            onboarding_weeks: self.onboarding_weeks.unwrap_or(base.onboarding_weeks),
            onboarding_weekly_cost: self
                .onboarding_weekly_cost
                .unwrap_or(base.onboarding_weekly_cost),
            code_blue_events_per_year: self
                .code_blue_events_per_year
                .unwrap_or(base.code_blue_events_per_year),
            baseline_code_survival_pct: self
                .baseline_code_survival_pct
                .unwrap_or(base.baseline_code_survival_pct),
            cost_per_adverse_code_outcome: self
                .cost_per_adverse_code_outcome
                .unwrap_or(base.cost_per_adverse_code_outcome),
            medication_errors_per_year: self
                .medication_errors_per_year
                .unwrap_or(base.medication_errors_per_year),
            harmful_med_error_pct: self.harmful_med_error_pct.unwrap_or(base.harmful_med_error_pct),
            cost_per_med_error: self.cost_per_med_error.unwrap_or(base.cost_per_med_error),
            hai_cases_per_year: self.hai_cases_per_year.unwrap_or(base.hai_cases_per_year),
            cost_per_hai: self.cost_per_hai.unwrap_or(base.cost_per_hai),
            annual_malpractice_premium: self
                .annual_malpractice_premium
                .unwrap_or(base.annual_malpractice_premium),
            pursuing_accreditation: self
                .pursuing_accreditation
                .unwrap_or(base.pursuing_accreditation),
            accreditation_annual_value: self
                .accreditation_annual_value
                .unwrap_or(base.accreditation_annual_value),
            discount_rate_pct: self.discount_rate_pct.unwrap_or(base.discount_rate_pct),
            source,
        }
    }
}
