//! Domain validation. These checks run at the store boundary so meaningless
//! configurations never reach the engines.
//!
//! The upper bounds are far beyond any real center but keep every product the
//! engines form well inside `Decimal` range, so the engines are total over
//! everything that validates.

use crate::params::SimulatorParameters;
use crate::roi_params::RoiParameters;
use rust_decimal::Decimal;
use thiserror::Error;

/// Largest gross floor area accepted, in square feet.
pub const MAX_FLOOR_AREA_SQFT: u32 = 10_000_000;
/// Largest count accepted for rooms, manikins and trainers.
pub const MAX_UNITS: u32 = 10_000;
/// Largest weekly sessions per room or learners per session.
pub const MAX_PER_SESSION_COUNT: u32 = 1_000;
/// Longest session accepted, in hours.
pub const MAX_SESSION_HOURS: i64 = 24;
/// Largest staffing level accepted, in FTE.
pub const MAX_FTE: i64 = 100_000;
/// Largest workforce or annual event count accepted.
pub const MAX_POPULATION: u32 = 1_000_000;
/// Longest orientation accepted, in weeks.
pub const MAX_ONBOARDING_WEEKS: u32 = 520;
/// Largest money amount accepted for any single field (USD).
pub const MAX_AMOUNT_USD: i64 = 1_000_000_000_000;

/// Validation errors for parameter invariants.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// Floor area must be strictly positive.
    #[error("floor area must be > 0")]
    NonPositiveArea,
    /// A center needs at least one simulation room.
    #[error("at least one simulation room is required")]
    NoSimulationRooms,
    /// Percentage field outside [0, 100].
    #[error("{0} must be within [0, 100]")]
    PercentOutOfRange(&'static str),
    /// Money or FTE field below zero.
    #[error("{0} must not be negative")]
    Negative(&'static str),
    /// Operating weeks must be within 1..=52.
    #[error("operating weeks {0} is out of range [1, 52]")]
    WeeksOutOfRange(u32),
    /// Session length must be strictly positive.
    #[error("session length must be > 0 hours")]
    NonPositiveSessionLength,
    /// Field above its supported maximum.
    #[error("{0} exceeds the supported maximum of {1}")]
    TooLarge(&'static str, i64),
}

fn check_pct(value: Decimal, field: &'static str) -> Result<(), ValidationError> {
    if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
        return Err(ValidationError::PercentOutOfRange(field));
    }
    Ok(())
}

fn check_non_negative(value: Decimal, field: &'static str) -> Result<(), ValidationError> {
    if value < Decimal::ZERO {
        return Err(ValidationError::Negative(field));
    }
    Ok(())
}

fn check_at_most(value: Decimal, max: i64, field: &'static str) -> Result<(), ValidationError> {
    if value > Decimal::from(max) {
        return Err(ValidationError::TooLarge(field, max));
    }
    Ok(())
}

fn check_count(value: u32, max: u32, field: &'static str) -> Result<(), ValidationError> {
    if value > max {
        return Err(ValidationError::TooLarge(field, i64::from(max)));
    }
    Ok(())
}

fn check_amount(value: Decimal, field: &'static str) -> Result<(), ValidationError> {
    check_non_negative(value, field)?;
    check_at_most(value, MAX_AMOUNT_USD, field)
}

/// Validate a facility configuration.
pub fn validate_parameters(p: &SimulatorParameters) -> Result<(), ValidationError> {
    if p.floor_area_sqft == 0 {
        return Err(ValidationError::NonPositiveArea);
    }
    if p.sim_rooms == 0 {
        return Err(ValidationError::NoSimulationRooms);
    }
    if !(1..=52).contains(&p.operating_weeks_per_year) {
        return Err(ValidationError::WeeksOutOfRange(p.operating_weeks_per_year));
    }
    if p.session_hours <= Decimal::ZERO {
        return Err(ValidationError::NonPositiveSessionLength);
    }
    check_count(p.floor_area_sqft, MAX_FLOOR_AREA_SQFT, "floor_area_sqft")?;
    check_count(p.sim_rooms, MAX_UNITS, "sim_rooms")?;
    check_count(p.control_rooms, MAX_UNITS, "control_rooms")?;
    check_count(p.debrief_rooms, MAX_UNITS, "debrief_rooms")?;
    check_count(p.high_fidelity_manikins, MAX_UNITS, "high_fidelity_manikins")?;
    check_count(p.task_trainers, MAX_UNITS, "task_trainers")?;
    check_count(
        p.sessions_per_room_per_week,
        MAX_PER_SESSION_COUNT,
        "sessions_per_room_per_week",
    )?;
    check_count(p.learners_per_session, MAX_PER_SESSION_COUNT, "learners_per_session")?;
    check_at_most(p.session_hours, MAX_SESSION_HOURS, "session_hours")?;
    check_non_negative(p.core_fte, "core_fte")?;
    check_at_most(p.core_fte, MAX_FTE, "core_fte")?;
    check_amount(p.capital_credits, "capital_credits")?;
    check_pct(p.faculty_allocation_pct, "faculty_allocation_pct")?;
    check_pct(p.target_utilization_pct, "target_utilization_pct")?;
    check_pct(p.contingency_pct, "contingency_pct")?;
    check_pct(p.annual_inflation_pct, "annual_inflation_pct")?;
    Ok(())
}

/// Validate ROI assumptions.
pub fn validate_roi_parameters(r: &RoiParameters) -> Result<(), ValidationError> {
    check_pct(r.annual_turnover_pct, "annual_turnover_pct")?;
    check_pct(r.baseline_code_survival_pct, "baseline_code_survival_pct")?;
    check_pct(r.harmful_med_error_pct, "harmful_med_error_pct")?;
    check_pct(r.discount_rate_pct, "discount_rate_pct")?;
    check_count(r.total_nurses, MAX_POPULATION, "total_nurses")?;
    check_count(r.new_hires_per_year, MAX_POPULATION, "new_hires_per_year")?;
    check_count(r.onboarding_weeks, MAX_ONBOARDING_WEEKS, "onboarding_weeks")?;
    check_count(r.code_blue_events_per_year, MAX_POPULATION, "code_blue_events_per_year")?;
    check_count(r.medication_errors_per_year, MAX_POPULATION, "medication_errors_per_year")?;
    check_count(r.hai_cases_per_year, MAX_POPULATION, "hai_cases_per_year")?;
    check_amount(r.turnover_cost_per_nurse, "turnover_cost_per_nurse")?;
    check_amount(r.onboarding_weekly_cost, "onboarding_weekly_cost")?;
    check_amount(r.cost_per_adverse_code_outcome, "cost_per_adverse_code_outcome")?;
    check_amount(r.cost_per_med_error, "cost_per_med_error")?;
    check_amount(r.cost_per_hai, "cost_per_hai")?;
    check_amount(r.annual_malpractice_premium, "annual_malpractice_premium")?;
    check_amount(r.accreditation_annual_value, "accreditation_annual_value")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParamsPatch;
    use proptest::prelude::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(validate_parameters(&SimulatorParameters::default()), Ok(()));
        assert_eq!(validate_roi_parameters(&RoiParameters::default()), Ok(()));
    }

    #[test]
    fn zero_rooms_and_area_rejected() {
        let mut p = SimulatorParameters::default();
        p.sim_rooms = 0;
        assert_eq!(validate_parameters(&p), Err(ValidationError::NoSimulationRooms));
        let mut p = SimulatorParameters::default();
        p.floor_area_sqft = 0;
        assert_eq!(validate_parameters(&p), Err(ValidationError::NonPositiveArea));
    }

    #[test]
    fn negative_money_rejected() {
        let p = ParamsPatch {
            capital_credits: Some(Decimal::new(-1, 0)),
            ..Default::default()
        }
        .apply(&SimulatorParameters::default());
        assert_eq!(
            validate_parameters(&p),
            Err(ValidationError::Negative("capital_credits"))
        );
        let mut r = RoiParameters::default();
        r.cost_per_hai = Decimal::new(-5, 0);
        assert!(validate_roi_parameters(&r).is_err());
    }

    #[test]
    fn oversized_inputs_rejected() {
        let mut p = SimulatorParameters::default();
        p.sim_rooms = 2_000_000;
        assert_eq!(
            validate_parameters(&p),
            Err(ValidationError::TooLarge("sim_rooms", 10_000))
        );
        let mut p = SimulatorParameters::default();
        p.core_fte = Decimal::from_i128_with_scale(10i128.pow(27), 0);
        assert_eq!(
            validate_parameters(&p),
            Err(ValidationError::TooLarge("core_fte", MAX_FTE))
        );
        let mut p = SimulatorParameters::default();
        p.session_hours = Decimal::new(25, 0);
        assert!(validate_parameters(&p).is_err());

        let mut r = RoiParameters::default();
        r.total_nurses = u32::MAX;
        assert!(validate_roi_parameters(&r).is_err());
        let mut r = RoiParameters::default();
        r.cost_per_hai = Decimal::MAX;
        assert_eq!(
            validate_roi_parameters(&r),
            Err(ValidationError::TooLarge("cost_per_hai", MAX_AMOUNT_USD))
        );
    }

    #[test]
    fn weeks_bounds() {
        let mut p = SimulatorParameters::default();
        p.operating_weeks_per_year = 53;
        assert_eq!(validate_parameters(&p), Err(ValidationError::WeeksOutOfRange(53)));
    }

    proptest! {
        #[test]
        fn contingency_range(c in 0i64..=100) {
            let mut p = SimulatorParameters::default();
            p.contingency_pct = Decimal::new(c, 0);
            prop_assert!(validate_parameters(&p).is_ok());
        }

        #[test]
        fn contingency_above_hundred_rejected(c in 101i64..10_000) {
            let mut p = SimulatorParameters::default();
            p.contingency_pct = Decimal::new(c, 0);
            prop_assert_eq!(
                validate_parameters(&p),
                Err(ValidationError::PercentOutOfRange("contingency_pct"))
            );
        }
    }
}
