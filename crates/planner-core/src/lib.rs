#![deny(warnings)]

//! Core domain models and invariants for the simulation-center planner.
//!
//! This crate defines the serializable parameter sets consumed by the budget
//! and ROI engines, the merge-patch types used to edit them, the evidence
//! catalogue that backs ROI estimates, and validation helpers that reject
//! physically meaningless configurations.

pub mod citations;
pub mod params;
pub mod roi_params;
pub mod validation;

pub use citations::{
    citations_for, weakest_confidence, Confidence, EvidenceCitation, RoiCategory, StudyType,
};
pub use params::{AvTier, OpexModel, ParamsPatch, QualityLevel, SimulatorParameters};
pub use roi_params::{AssumptionSource, RoiParameters, RoiParamsPatch};
pub use validation::{validate_parameters, validate_roi_parameters, ValidationError};

use rust_decimal::Decimal;

/// Convert a percentage such as `10` into the fraction `0.10`.
pub fn pct(value: Decimal) -> Decimal {
    value / Decimal::ONE_HUNDRED
}
