#![deny(warnings)]

//! Economic engines for the simulation-center planner.
//!
//! - [`budget`]: capital, operating and five-year projections from a facility
//!   configuration
//! - [`roi`]: evidence-backed savings, NPV and confidence bands
//! - [`presets`]: predefined configurations applied as merge patches
//!
//! Both engines are pure: identical inputs always produce identical outputs.

pub mod budget;
pub mod presets;
pub mod rates;
pub mod roi;

pub use budget::{
    calculate_budget, BudgetMetrics, BudgetResults, CapexBreakdown, CostCategory, CostItem,
    FiveYearProjection, LineItem, OpexBreakdown, YearProjection,
};
pub use presets::{find_preset, predefined_scenarios, PredefinedScenario, PresetError};
pub use roi::{
    calculate_roi, AssetKind, AssetRoi, CategoryRoi, ConfidenceRange, RoiResults, RoiSummary,
    YearValue,
};
