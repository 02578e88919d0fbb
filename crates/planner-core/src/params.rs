//! Facility configuration consumed by the budget engine.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Audio-visual capture and debrief tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AvTier {
    /// Fixed cameras and a single recording stream per room.
    Basic,
    /// PTZ cameras, patient-monitor capture and LMS integration.
    Standard,
    /// Multi-angle capture, live streaming and analytics.
    Advanced,
}

/// Construction finish level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QualityLevel {
    Standard,
    Enhanced,
    Premium,
}

/// How annual operating costs are modelled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OpexModel {
    /// Costs scale with the number of rooms kept ready for use.
    RoomBased,
    /// Costs scale with the projected annual session volume.
    SessionsBased,
}

impl std::str::FromStr for OpexModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "room-based" => Ok(OpexModel::RoomBased),
            "sessions-based" => Ok(OpexModel::SessionsBased),
            other => Err(format!("unknown opex model: {other}")),
        }
    }
}

/// Full facility configuration. Every field is always populated; use
/// [`SimulatorParameters::default`] for the reference build-out.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulatorParameters {
    /// Gross floor area in square feet (> 0).
    pub floor_area_sqft: u32,
    /// Simulation (patient-care) rooms (>= 1).
    pub sim_rooms: u32,
    /// Control rooms overlooking simulation rooms.
    pub control_rooms: u32,
    /// Debrief / classroom spaces.
    pub debrief_rooms: u32,
    /// High-fidelity manikins.
    pub high_fidelity_manikins: u32,
    /// Part-task trainers (IV arms, airway heads, ...).
    pub task_trainers: u32,
    pub av_tier: AvTier,
    pub quality_level: QualityLevel,
    /// Dedicated operations staff (coordinators, sim techs) in FTE.
    pub core_fte: Decimal,
    /// Share of faculty time allocated to simulation, in percent.
    pub faculty_allocation_pct: Decimal,
    /// Scheduled sessions per simulation room per week at full utilisation.
    pub sessions_per_room_per_week: u32,
    /// Operating weeks per year (1..=52).
    pub operating_weeks_per_year: u32,
    /// Steady-state utilisation target, in percent.
    pub target_utilization_pct: Decimal,
    pub learners_per_session: u32,
    /// Scheduled length of one session in hours.
    pub session_hours: Decimal,
    /// Contingency applied to the base capital subtotal, in percent.
    pub contingency_pct: Decimal,
    /// Grants, donations or reused equipment netted off capital cost (USD).
    pub capital_credits: Decimal,
    /// Annual escalation applied to operating costs, in percent.
    pub annual_inflation_pct: Decimal,
    pub opex_model: OpexModel,
}

impl Default for SimulatorParameters {
    fn default() -> Self {
        Self {
            floor_area_sqft: 5_000,
            sim_rooms: 3,
            control_rooms: 2,
            debrief_rooms: 2,
            high_fidelity_manikins: 4,
            task_trainers: 10,
            av_tier: AvTier::Standard,
            quality_level: QualityLevel::Enhanced,
            core_fte: Decimal::new(40, 1),
            faculty_allocation_pct: Decimal::new(20, 0),
            sessions_per_room_per_week: 10,
            operating_weeks_per_year: 48,
            target_utilization_pct: Decimal::new(75, 0),
            learners_per_session: 6,
            session_hours: Decimal::new(2, 0),
            contingency_pct: Decimal::new(10, 0),
            capital_credits: Decimal::ZERO,
            annual_inflation_pct: Decimal::new(3, 0),
            opex_model: OpexModel::RoomBased,
        }
    }
}

/// Shallow merge-patch over [`SimulatorParameters`]. `None` keeps the current
/// value.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParamsPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub floor_area_sqft: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sim_rooms: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub control_rooms: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debrief_rooms: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub high_fidelity_manikins: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_trainers: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub av_tier: Option<AvTier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality_level: Option<QualityLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub core_fte: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub faculty_allocation_pct: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sessions_per_room_per_week: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operating_weeks_per_year: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_utilization_pct: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub learners_per_session: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_hours: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contingency_pct: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capital_credits: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annual_inflation_pct: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opex_model: Option<OpexModel>,
}

impl ParamsPatch {
    /// Returns `base` with every populated field of the patch written over it.
    pub fn apply(&self, base: &SimulatorParameters) -> SimulatorParameters {
        SimulatorParameters {
            floor_area_sqft: self.floor_area_sqft.unwrap_or(base.floor_area_sqft),
            sim_rooms: self.sim_rooms.unwrap_or(base.sim_rooms),
            control_rooms: self.control_rooms.unwrap_or(base.control_rooms),
            debrief_rooms: self.debrief_rooms.unwrap_or(base.debrief_rooms),
            high_fidelity_manikins: self
                .high_fidelity_manikins
                .unwrap_or(base.high_fidelity_manikins),
            task_trainers: self.task_trainers.unwrap_or(base.task_trainers),
            av_tier: self.av_tier.unwrap_or(base.av_tier),
            quality_level: self.quality_level.unwrap_or(base.quality_level),
            core_fte: self.core_fte.unwrap_or(base.core_fte),
            faculty_allocation_pct: self
                .faculty_allocation_pct
                .unwrap_or(base.faculty_allocation_pct),
            sessions_per_room_per_week: self
                .sessions_per_room_per_week
                .unwrap_or(base.sessions_per_room_per_week),
            operating_weeks_per_year: self
                .operating_weeks_per_year
                .unwrap_or(base.operating_weeks_per_year),
            target_utilization_pct: self
                .target_utilization_pct
                .unwrap_or(base.target_utilization_pct),
            learners_per_session: self.learners_per_session.unwrap_or(base.learners_per_session),
            session_hours: self.session_hours.unwrap_or(base.session_hours),
            contingency_pct: self.contingency_pct.unwrap_or(base.contingency_pct),
            capital_credits: self.capital_credits.unwrap_or(base.capital_credits),
            annual_inflation_pct: self.annual_inflation_pct.unwrap_or(base.annual_inflation_pct),
            opex_model: self.opex_model.unwrap_or(base.opex_model),
        }
    }

    /// True when the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        *self == ParamsPatch::default()
    }
}
