//! Unit-cost tables used by the budget engine (USD, 2024 dollars).

use planner_core::{AvTier, QualityLevel};

pub struct ConstructionRates {
    pub standard_per_sqft: i64,
    pub enhanced_per_sqft: i64,
    pub premium_per_sqft: i64,
}

pub const CONSTRUCTION: ConstructionRates = ConstructionRates {
    standard_per_sqft: 350,
    enhanced_per_sqft: 450,
    premium_per_sqft: 575,
};

pub struct EquipmentRates {
    pub high_fidelity_manikin: i64,
    pub task_trainer: i64,
    /// Headwall, bed, monitor and med-dispensing mock-up per simulation room.
    pub clinical_fit_out_per_room: i64,
}

pub const EQUIPMENT: EquipmentRates = EquipmentRates {
    high_fidelity_manikin: 85_000,
    task_trainer: 6_500,
    clinical_fit_out_per_room: 45_000,
};

/// A/V capital cost per room type for one tier.
pub struct AvRates {
    pub per_sim_room: i64,
    pub per_control_room: i64,
    pub per_debrief_room: i64,
    /// One-time recording / debrief platform licence.
    pub platform_license: i64,
    /// Annual service contract as a percentage of A/V capital.
    pub service_pct: i64,
}

pub const AV_BASIC: AvRates = AvRates {
    per_sim_room: 35_000,
    per_control_room: 12_000,
    per_debrief_room: 8_000,
    platform_license: 15_000,
    service_pct: 8,
};

pub const AV_STANDARD: AvRates = AvRates {
    per_sim_room: 60_000,
    per_control_room: 20_000,
    per_debrief_room: 15_000,
    platform_license: 30_000,
    service_pct: 10,
};

pub const AV_ADVANCED: AvRates = AvRates {
    per_sim_room: 95_000,
    per_control_room: 32_000,
    per_debrief_room: 25_000,
    platform_license: 60_000,
    service_pct: 12,
};

pub struct FurnishingRates {
    pub per_control_room: i64,
    pub per_debrief_room: i64,
}

pub const FURNISHINGS: FurnishingRates = FurnishingRates {
    per_control_room: 10_000,
    per_debrief_room: 18_000,
};

pub struct OperatingRates {
    /// Fully loaded salary per core FTE.
    pub core_fte_salary: i64,
    /// Fully loaded faculty salary (one FTE).
    pub faculty_salary: i64,
    pub faculty_hourly: i64,
    pub consumables_per_room: i64,
    pub consumables_per_session: i64,
    pub supplies_per_learner: i64,
    pub maintenance_per_room: i64,
    pub manikin_service_contract: i64,
    /// Equipment maintenance as a percentage of equipment capital.
    pub equipment_maintenance_pct: i64,
    pub facility_ops_per_sqft: i64,
}

pub const OPERATING: OperatingRates = OperatingRates {
    core_fte_salary: 92_000,
    faculty_salary: 165_000,
    faculty_hourly: 110,
    consumables_per_room: 15_000,
    consumables_per_session: 85,
    supplies_per_learner: 12,
    maintenance_per_room: 9_000,
    manikin_service_contract: 4_500,
    equipment_maintenance_pct: 8,
    facility_ops_per_sqft: 14,
};

/// Share of steady-state sessions delivered in each projection year, percent.
pub const UTILIZATION_RAMP_PCT: [i64; 5] = [60, 80, 90, 100, 100];

pub fn construction_per_sqft(level: QualityLevel) -> i64 {
    match level {
        QualityLevel::Standard => CONSTRUCTION.standard_per_sqft,
        QualityLevel::Enhanced => CONSTRUCTION.enhanced_per_sqft,
        QualityLevel::Premium => CONSTRUCTION.premium_per_sqft,
    }
}

pub fn av_rates(tier: AvTier) -> &'static AvRates {
    match tier {
        AvTier::Basic => &AV_BASIC,
        AvTier::Standard => &AV_STANDARD,
        AvTier::Advanced => &AV_ADVANCED,
    }
}
