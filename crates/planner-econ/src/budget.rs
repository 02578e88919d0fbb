//! Budget engine: capital, operating and five-year cost projections.
//!
//! [`calculate_budget`] is deterministic and never panics for parameters that
//! pass `validate_parameters`. All money is rounded to whole dollars per line
//! item, half away from zero.

use crate::rates::{self, OPERATING, UTILIZATION_RAMP_PCT};
use planner_core::{pct, OpexModel, SimulatorParameters};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Number of years covered by the projection.
pub const PROJECTION_YEARS: usize = 5;

/// Accounting bucket a line item rolls up into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CostCategory {
    Construction,
    Equipment,
    AudioVisual,
    Furnishings,
    Contingency,
    Staffing,
    Faculty,
    Consumables,
    Maintenance,
    Facility,
}

/// Individual priced item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CostItem {
    Construction,
    ClinicalFitOut,
    Manikins,
    TaskTrainers,
    SimRoomAv,
    ControlRoomAv,
    DebriefRoomAv,
    AvPlatform,
    ControlRoomFurnishings,
    DebriefRoomFurnishings,
    Contingency,
    CoreStaff,
    Faculty,
    RoomConsumables,
    SessionConsumables,
    LearnerSupplies,
    RoomMaintenance,
    ManikinService,
    EquipmentMaintenance,
    AvService,
    FacilityOperations,
}

impl CostItem {
    pub fn category(self) -> CostCategory {
        use CostItem::*;
        match self {
            Construction => CostCategory::Construction,
            ClinicalFitOut | Manikins | TaskTrainers => CostCategory::Equipment,
            SimRoomAv | ControlRoomAv | DebriefRoomAv | AvPlatform => CostCategory::AudioVisual,
            ControlRoomFurnishings | DebriefRoomFurnishings => CostCategory::Furnishings,
            Contingency => CostCategory::Contingency,
            CoreStaff => CostCategory::Staffing,
            Faculty => CostCategory::Faculty,
            RoomConsumables | SessionConsumables | LearnerSupplies => CostCategory::Consumables,
            RoomMaintenance | ManikinService | EquipmentMaintenance | AvService => {
                CostCategory::Maintenance
            }
            FacilityOperations => CostCategory::Facility,
        }
    }

    pub fn label(self) -> &'static str {
        use CostItem::*;
        match self {
            Construction => "Construction and fit-out",
            ClinicalFitOut => "Clinical room fit-out",
            Manikins => "High-fidelity manikins",
            TaskTrainers => "Task trainers",
            SimRoomAv => "Simulation room A/V",
            ControlRoomAv => "Control room A/V",
            DebriefRoomAv => "Debrief room A/V",
            AvPlatform => "Recording platform licence",
            ControlRoomFurnishings => "Control room furnishings & IT",
            DebriefRoomFurnishings => "Debrief room furnishings & IT",
            Contingency => "Contingency",
            CoreStaff => "Core operations staff",
            Faculty => "Faculty time",
            RoomConsumables => "Consumables (per room)",
            SessionConsumables => "Consumables (per session)",
            LearnerSupplies => "Learner supplies",
            RoomMaintenance => "Room maintenance",
            ManikinService => "Manikin service contracts",
            EquipmentMaintenance => "Equipment maintenance",
            AvService => "A/V service contract",
            FacilityOperations => "Facility operations",
        }
    }
}

/// Priced line: `amount = round(quantity * unit_cost)`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub item: CostItem,
    pub category: CostCategory,
    pub label: String,
    pub quantity: Decimal,
    pub unit_cost: Decimal,
    pub amount: Decimal,
}

impl LineItem {
    fn priced(item: CostItem, quantity: Decimal, unit_cost: Decimal) -> Self {
        Self {
            item,
            category: item.category(),
            label: item.label().to_string(),
            quantity,
            unit_cost,
            amount: usd(quantity * unit_cost),
        }
    }
}

/// Capital expenditure.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CapexBreakdown {
    /// Base items followed by the contingency line.
    pub items: Vec<LineItem>,
    /// Sum of base items (construction, equipment, A/V, furnishings).
    pub base_total: Decimal,
    /// `contingency_pct` of `base_total`.
    pub contingency: Decimal,
    /// `base_total + contingency`.
    pub subtotal: Decimal,
    pub credits: Decimal,
    /// `subtotal - credits`.
    pub net: Decimal,
}

impl CapexBreakdown {
    /// Sum of items in the given category.
    pub fn category_total(&self, category: CostCategory) -> Decimal {
        self.items
            .iter()
            .filter(|i| i.category == category)
            .map(|i| i.amount)
            .sum()
    }

    pub fn item_amount(&self, item: CostItem) -> Decimal {
        self.items
            .iter()
            .filter(|i| i.item == item)
            .map(|i| i.amount)
            .sum()
    }
}

/// Annual operating expenditure under one costing model.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OpexBreakdown {
    pub model: OpexModel,
    pub items: Vec<LineItem>,
    pub total: Decimal,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct YearProjection {
    /// 1-based year index.
    pub year: u8,
    pub capex: Decimal,
    pub opex: Decimal,
    pub total: Decimal,
    pub sessions: u64,
    pub cumulative_total: Decimal,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FiveYearProjection {
    pub years: Vec<YearProjection>,
    pub total_capex: Decimal,
    pub total_opex: Decimal,
    pub grand_total: Decimal,
    pub total_sessions: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BudgetMetrics {
    /// Steady-state sessions per year.
    pub annual_sessions: u64,
    pub annual_learner_hours: Decimal,
    /// Five-year total cost over five-year sessions.
    pub cost_per_session: Decimal,
    pub cost_per_learner_hour: Decimal,
    pub capex_per_sqft: Decimal,
    pub opex_per_sim_room: Decimal,
    pub utilization_pct: Decimal,
}

/// Everything derived from one [`SimulatorParameters`] value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BudgetResults {
    pub capex: CapexBreakdown,
    pub opex: OpexBreakdown,
    pub five_year: FiveYearProjection,
    pub metrics: BudgetMetrics,
}

pub(crate) fn usd(x: Decimal) -> Decimal {
    x.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

pub(crate) fn cents(x: Decimal) -> Decimal {
    x.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Division that yields zero for a zero denominator.
pub(crate) fn ratio(num: Decimal, den: Decimal) -> Decimal {
    if den.is_zero() {
        Decimal::ZERO
    } else {
        num / den
    }
}

/// Derive the full budget from a facility configuration.
pub fn calculate_budget(params: &SimulatorParameters) -> BudgetResults {
    let capex = calculate_capex(params);
    let annual_sessions = steady_state_sessions(params);
    let opex = calculate_opex(params, &capex, annual_sessions);
    let five_year = project_five_years(params, &capex, &opex, annual_sessions);
    let metrics = derive_metrics(params, &capex, &opex, &five_year, annual_sessions);
    BudgetResults {
        capex,
        opex,
        five_year,
        metrics,
    }
}

/// Capital line items, contingency on the base subtotal, then credits.
pub fn calculate_capex(p: &SimulatorParameters) -> CapexBreakdown {
    let av = rates::av_rates(p.av_tier);
    let n = |v: u32| Decimal::from(v);
    let d = |v: i64| Decimal::from(v);

    let mut items = vec![
        LineItem::priced(
            CostItem::Construction,
            n(p.floor_area_sqft),
            d(rates::construction_per_sqft(p.quality_level)),
        ),
        LineItem::priced(
            CostItem::ClinicalFitOut,
            n(p.sim_rooms),
            d(rates::EQUIPMENT.clinical_fit_out_per_room),
        ),
        LineItem::priced(
            CostItem::Manikins,
            n(p.high_fidelity_manikins),
            d(rates::EQUIPMENT.high_fidelity_manikin),
        ),
        LineItem::priced(
            CostItem::TaskTrainers,
            n(p.task_trainers),
            d(rates::EQUIPMENT.task_trainer),
        ),
        LineItem::priced(CostItem::SimRoomAv, n(p.sim_rooms), d(av.per_sim_room)),
        LineItem::priced(CostItem::ControlRoomAv, n(p.control_rooms), d(av.per_control_room)),
        LineItem::priced(CostItem::DebriefRoomAv, n(p.debrief_rooms), d(av.per_debrief_room)),
        LineItem::priced(CostItem::AvPlatform, Decimal::ONE, d(av.platform_license)),
        LineItem::priced(
            CostItem::ControlRoomFurnishings,
            n(p.control_rooms),
            d(rates::FURNISHINGS.per_control_room),
        ),
        LineItem::priced(
            CostItem::DebriefRoomFurnishings,
            n(p.debrief_rooms),
            d(rates::FURNISHINGS.per_debrief_room),
        ),
    ];

    // Contingency is a percentage of the base subtotal, not of the net.
    let base_total: Decimal = items.iter().map(|i| i.amount).sum();
    let contingency_item =
        LineItem::priced(CostItem::Contingency, pct(p.contingency_pct), base_total);
    let contingency = contingency_item.amount;
    items.push(contingency_item);

    let subtotal = base_total + contingency;
    let credits = usd(p.capital_credits);
    CapexBreakdown {
        items,
        base_total,
        contingency,
        subtotal,
        credits,
        net: subtotal - credits,
    }
}

/// Sessions per year once the center reaches its utilisation target.
pub fn steady_state_sessions(p: &SimulatorParameters) -> Decimal {
    let capacity = Decimal::from(p.sim_rooms)
        * Decimal::from(p.sessions_per_room_per_week)
        * Decimal::from(p.operating_weeks_per_year);
    usd(capacity * pct(p.target_utilization_pct))
}

/// Annual operating costs under the configured model.
pub fn calculate_opex(
    p: &SimulatorParameters,
    capex: &CapexBreakdown,
    annual_sessions: Decimal,
) -> OpexBreakdown {
    let d = |v: i64| Decimal::from(v);
    let n = |v: u32| Decimal::from(v);
    let av = rates::av_rates(p.av_tier);
    let faculty_share = pct(p.faculty_allocation_pct);

    let core = LineItem::priced(CostItem::CoreStaff, p.core_fte, d(OPERATING.core_fte_salary));
    let av_service = LineItem::priced(
        CostItem::AvService,
        pct(d(av.service_pct)),
        capex.category_total(CostCategory::AudioVisual),
    );
    let facility = LineItem::priced(
        CostItem::FacilityOperations,
        n(p.floor_area_sqft),
        d(OPERATING.facility_ops_per_sqft),
    );

    let items = match p.opex_model {
        OpexModel::RoomBased => vec![
            core,
            LineItem::priced(
                CostItem::Faculty,
                n(p.sim_rooms) * faculty_share,
                d(OPERATING.faculty_salary),
            ),
            LineItem::priced(
                CostItem::RoomConsumables,
                n(p.sim_rooms),
                d(OPERATING.consumables_per_room),
            ),
            LineItem::priced(
                CostItem::RoomMaintenance,
                n(p.sim_rooms),
                d(OPERATING.maintenance_per_room),
            ),
            LineItem::priced(
                CostItem::ManikinService,
                n(p.high_fidelity_manikins),
                d(OPERATING.manikin_service_contract),
            ),
            av_service,
            facility,
        ],
        OpexModel::SessionsBased => {
            let faculty_hours = annual_sessions * p.session_hours * faculty_share;
            let learners = annual_sessions * n(p.learners_per_session);
            vec![
                core,
                LineItem::priced(CostItem::Faculty, faculty_hours, d(OPERATING.faculty_hourly)),
                LineItem::priced(
                    CostItem::SessionConsumables,
                    annual_sessions,
                    d(OPERATING.consumables_per_session),
                ),
                LineItem::priced(
                    CostItem::LearnerSupplies,
                    learners,
                    d(OPERATING.supplies_per_learner),
                ),
                LineItem::priced(
                    CostItem::EquipmentMaintenance,
                    pct(d(OPERATING.equipment_maintenance_pct)),
                    capex.category_total(CostCategory::Equipment),
                ),
                av_service,
                facility,
            ]
        }
    };

    let total = items.iter().map(|i| i.amount).sum();
    OpexBreakdown {
        model: p.opex_model,
        items,
        total,
    }
}

/// Five-year view: capex in year 1 only, opex escalated by inflation.
pub fn project_five_years(
    p: &SimulatorParameters,
    capex: &CapexBreakdown,
    opex: &OpexBreakdown,
    annual_sessions: Decimal,
) -> FiveYearProjection {
    let escalation = Decimal::ONE + pct(p.annual_inflation_pct);
    let mut factor = Decimal::ONE;
    let mut cumulative = Decimal::ZERO;
    let mut years = Vec::with_capacity(PROJECTION_YEARS);

    for (idx, ramp) in UTILIZATION_RAMP_PCT.iter().enumerate() {
        let year_capex = if idx == 0 { capex.net } else { Decimal::ZERO };
        let year_opex = usd(opex.total * factor);
        let total = year_capex + year_opex;
        cumulative += total;
        let sessions = usd(annual_sessions * pct(Decimal::from(*ramp)));
        years.push(YearProjection {
            year: (idx + 1) as u8,
            capex: year_capex,
            opex: year_opex,
            total,
            // Non-negative and bounded by validation.
            sessions: sessions.to_u64().unwrap_or(0),
            cumulative_total: cumulative,
        });
        factor *= escalation;
    }

    let total_capex = years.iter().map(|y| y.capex).sum();
    let total_opex = years.iter().map(|y| y.opex).sum();
    let total_sessions = years.iter().map(|y| y.sessions).sum();
    FiveYearProjection {
        years,
        total_capex,
        total_opex,
        grand_total: cumulative,
        total_sessions,
    }
}

fn derive_metrics(
    p: &SimulatorParameters,
    capex: &CapexBreakdown,
    opex: &OpexBreakdown,
    five_year: &FiveYearProjection,
    annual_sessions: Decimal,
) -> BudgetMetrics {
    let learner_hours_per_session = Decimal::from(p.learners_per_session) * p.session_hours;
    let five_year_sessions = Decimal::from(five_year.total_sessions);
    BudgetMetrics {
        annual_sessions: annual_sessions.to_u64().unwrap_or(0),
        annual_learner_hours: cents(annual_sessions * learner_hours_per_session),
        cost_per_session: cents(ratio(five_year.grand_total, five_year_sessions)),
        cost_per_learner_hour: cents(ratio(
            five_year.grand_total,
            five_year_sessions * learner_hours_per_session,
        )),
        capex_per_sqft: cents(ratio(capex.net, Decimal::from(p.floor_area_sqft))),
        opex_per_sim_room: cents(ratio(opex.total, Decimal::from(p.sim_rooms))),
        utilization_pct: p.target_utilization_pct,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use planner_core::{AvTier, ParamsPatch, QualityLevel};
    use proptest::prelude::*;

    /// Decimal in `[0, max]` with up to four fractional digits.
    fn decimal_upto(max: i64) -> impl Strategy<Value = Decimal> {
        (0..=max * 10_000).prop_map(|v| Decimal::new(v, 4))
    }

    /// Any configuration the validator accepts, edges included.
    fn validated_params() -> impl Strategy<Value = SimulatorParameters> {
        use planner_core::validation::*;
        let counts = (
            1..=MAX_FLOOR_AREA_SQFT,
            1..=MAX_UNITS,
            0..=MAX_UNITS,
            0..=MAX_UNITS,
            0..=MAX_UNITS,
            0..=MAX_UNITS,
            0..=MAX_PER_SESSION_COUNT,
            1u32..=52,
            0..=MAX_PER_SESSION_COUNT,
        );
        let tiers = (
            prop_oneof![Just(AvTier::Basic), Just(AvTier::Standard), Just(AvTier::Advanced)],
            prop_oneof![
                Just(QualityLevel::Standard),
                Just(QualityLevel::Enhanced),
                Just(QualityLevel::Premium)
            ],
            prop_oneof![Just(OpexModel::RoomBased), Just(OpexModel::SessionsBased)],
        );
        let amounts = (
            decimal_upto(MAX_FTE),
            decimal_upto(100),
            decimal_upto(100),
            (1i64..=MAX_SESSION_HOURS * 10_000).prop_map(|v| Decimal::new(v, 4)),
            decimal_upto(100),
            (0..=MAX_AMOUNT_USD).prop_map(Decimal::from),
            decimal_upto(100),
        );
        (counts, tiers, amounts).prop_map(
            |(
                (area, rooms, control, debrief, manikins, trainers, weekly, weeks, learners),
                (av_tier, quality_level, opex_model),
                (fte, faculty, util, hours, contingency, credits, inflation),
            )| SimulatorParameters {
                floor_area_sqft: area,
                sim_rooms: rooms,
                control_rooms: control,
                debrief_rooms: debrief,
                high_fidelity_manikins: manikins,
                task_trainers: trainers,
                av_tier,
                quality_level,
                core_fte: fte,
                faculty_allocation_pct: faculty,
                sessions_per_room_per_week: weekly,
                operating_weeks_per_year: weeks,
                target_utilization_pct: util,
                learners_per_session: learners,
                session_hours: hours,
                contingency_pct: contingency,
                capital_credits: credits,
                annual_inflation_pct: inflation,
                opex_model,
            },
        )
    }

    /// Every field at its validated maximum.
    fn largest_params(opex_model: OpexModel) -> SimulatorParameters {
        use planner_core::validation::*;
        SimulatorParameters {
            floor_area_sqft: MAX_FLOOR_AREA_SQFT,
            sim_rooms: MAX_UNITS,
            control_rooms: MAX_UNITS,
            debrief_rooms: MAX_UNITS,
            high_fidelity_manikins: MAX_UNITS,
            task_trainers: MAX_UNITS,
            av_tier: AvTier::Advanced,
            quality_level: QualityLevel::Premium,
            core_fte: Decimal::from(MAX_FTE),
            faculty_allocation_pct: Decimal::ONE_HUNDRED,
            sessions_per_room_per_week: MAX_PER_SESSION_COUNT,
            operating_weeks_per_year: 52,
            target_utilization_pct: Decimal::ONE_HUNDRED,
            learners_per_session: MAX_PER_SESSION_COUNT,
            session_hours: Decimal::from(MAX_SESSION_HOURS),
            contingency_pct: Decimal::ONE_HUNDRED,
            capital_credits: Decimal::from(MAX_AMOUNT_USD),
            annual_inflation_pct: Decimal::ONE_HUNDRED,
            opex_model,
        }
    }

    fn base_sum(capex: &CapexBreakdown) -> Decimal {
        capex
            .items
            .iter()
            .filter(|i| i.category != CostCategory::Contingency)
            .map(|i| i.amount)
            .sum()
    }

    #[test]
    fn reference_build_out_capex() {
        let r = calculate_budget(&SimulatorParameters::default());
        // 5000 sqft * 450 = 2.25M construction
        assert_eq!(r.capex.item_amount(CostItem::Construction), Decimal::new(2_250_000, 0));
        assert_eq!(r.capex.base_total, base_sum(&r.capex));
        assert_eq!(r.capex.contingency, usd(r.capex.base_total * Decimal::new(1, 1)));
        assert!(r.capex.net > r.capex.base_total);
    }

    #[test]
    fn contingency_applies_to_base_subtotal_not_net() {
        let p = ParamsPatch {
            contingency_pct: Some(Decimal::new(10, 0)),
            capital_credits: Some(Decimal::new(250_000, 0)),
            ..Default::default()
        }
        .apply(&SimulatorParameters::default());
        let capex = calculate_capex(&p);
        let base = base_sum(&capex);
        let expected_contingency = usd(base * Decimal::new(1, 1));
        assert_eq!(capex.contingency, expected_contingency);
        assert_eq!(capex.net, base + expected_contingency - Decimal::new(250_000, 0));
        assert_ne!(capex.net, usd(base * Decimal::new(11, 1)));
    }

    #[test]
    fn capex_items_sum_to_subtotal() {
        let capex = calculate_capex(&SimulatorParameters::default());
        let sum: Decimal = capex.items.iter().map(|i| i.amount).sum();
        assert_eq!(sum, capex.subtotal);
    }

    #[test]
    fn opex_models_produce_different_line_items() {
        let room = SimulatorParameters::default();
        let sessions = ParamsPatch {
            opex_model: Some(OpexModel::SessionsBased),
            ..Default::default()
        }
        .apply(&room);
        let a = calculate_budget(&room).opex;
        let b = calculate_budget(&sessions).opex;
        let keys = |o: &OpexBreakdown| o.items.iter().map(|i| i.item).collect::<Vec<_>>();
        assert_ne!(keys(&a), keys(&b));
        assert_ne!(a.items, b.items);
        assert_eq!(a.model, OpexModel::RoomBased);
        assert_eq!(b.model, OpexModel::SessionsBased);
    }

    #[test]
    fn sessions_based_scales_with_volume() {
        let mut low = SimulatorParameters::default();
        low.opex_model = OpexModel::SessionsBased;
        let mut high = low.clone();
        high.sessions_per_room_per_week = low.sessions_per_room_per_week * 2;
        assert!(calculate_budget(&high).opex.total > calculate_budget(&low).opex.total);
        // Room-based ignores session volume.
        let mut room_low = low.clone();
        room_low.opex_model = OpexModel::RoomBased;
        let mut room_high = high.clone();
        room_high.opex_model = OpexModel::RoomBased;
        assert_eq!(
            calculate_budget(&room_low).opex.total,
            calculate_budget(&room_high).opex.total
        );
    }

    #[test]
    fn five_year_capex_is_one_time() {
        let r = calculate_budget(&SimulatorParameters::default());
        assert_eq!(r.five_year.years.len(), PROJECTION_YEARS);
        assert_eq!(r.five_year.total_capex, r.capex.net);
        let capex_sum: Decimal = r.five_year.years.iter().map(|y| y.capex).sum();
        assert_eq!(capex_sum, r.capex.net);
        assert!(r.five_year.years[1..].iter().all(|y| y.capex.is_zero()));
    }

    #[test]
    fn five_year_opex_escalates_and_accumulates() {
        let r = calculate_budget(&SimulatorParameters::default());
        let ys = &r.five_year.years;
        assert_eq!(ys[0].opex, r.opex.total);
        assert!(ys.windows(2).all(|w| w[1].opex > w[0].opex));
        assert_eq!(ys[4].cumulative_total, r.five_year.grand_total);
        assert_eq!(
            r.five_year.grand_total,
            r.five_year.total_capex + r.five_year.total_opex
        );
    }

    #[test]
    fn zero_inflation_keeps_opex_flat() {
        let mut p = SimulatorParameters::default();
        p.annual_inflation_pct = Decimal::ZERO;
        let r = calculate_budget(&p);
        assert!(r.five_year.years.iter().all(|y| y.opex == r.opex.total));
    }

    #[test]
    fn sessions_ramp_and_do_not_feed_costs() {
        let r = calculate_budget(&SimulatorParameters::default());
        // 3 rooms * 10/week * 48 weeks * 75% = 1080
        assert_eq!(r.metrics.annual_sessions, 1_080);
        assert_eq!(r.five_year.years[0].sessions, 648);
        assert_eq!(r.five_year.years[4].sessions, 1_080);
        assert!(r.metrics.cost_per_session > Decimal::ZERO);
    }

    #[test]
    fn zero_utilization_gives_zero_per_session_metrics() {
        let mut p = SimulatorParameters::default();
        p.target_utilization_pct = Decimal::ZERO;
        let r = calculate_budget(&p);
        assert_eq!(r.five_year.total_sessions, 0);
        assert_eq!(r.metrics.cost_per_session, Decimal::ZERO);
        assert_eq!(r.metrics.cost_per_learner_hour, Decimal::ZERO);
    }

    #[test]
    fn largest_valid_center_is_priced_without_overflow() {
        for model in [OpexModel::RoomBased, OpexModel::SessionsBased] {
            let p = largest_params(model);
            assert_eq!(planner_core::validate_parameters(&p), Ok(()));
            let r = calculate_budget(&p);
            // 10k rooms * 1000/week * 52 weeks at full utilisation.
            assert_eq!(r.metrics.annual_sessions, 520_000_000);
            assert!(r.five_year.total_sessions > u64::from(u32::MAX) / 2);
            assert!(r.five_year.years.iter().all(|y| y.sessions > 0));
        }
    }

    #[test]
    fn higher_tiers_cost_more() {
        let mut p = SimulatorParameters::default();
        p.av_tier = AvTier::Basic;
        p.quality_level = QualityLevel::Standard;
        let cheap = calculate_budget(&p).capex.net;
        p.av_tier = AvTier::Advanced;
        p.quality_level = QualityLevel::Premium;
        let rich = calculate_budget(&p).capex.net;
        assert!(rich > cheap);
    }

    proptest! {
        #[test]
        fn budget_is_pure(area in 500u32..50_000, rooms in 1u32..20, cont in 0i64..=100) {
            let p = ParamsPatch {
                floor_area_sqft: Some(area),
                sim_rooms: Some(rooms),
                contingency_pct: Some(Decimal::new(cont, 0)),
                ..Default::default()
            }
            .apply(&SimulatorParameters::default());
            prop_assert_eq!(calculate_budget(&p), calculate_budget(&p.clone()));
        }

        #[test]
        fn contingency_ordering_holds(area in 500u32..50_000, rooms in 1u32..20, cont in 0i64..=100, credit in 0i64..500_000) {
            let p = ParamsPatch {
                floor_area_sqft: Some(area),
                sim_rooms: Some(rooms),
                contingency_pct: Some(Decimal::new(cont, 0)),
                capital_credits: Some(Decimal::new(credit, 0)),
                ..Default::default()
            }
            .apply(&SimulatorParameters::default());
            let c = calculate_capex(&p);
            let base = base_sum(&c);
            let expected = base + usd(Decimal::new(cont, 2) * base) - Decimal::new(credit, 0);
            prop_assert_eq!(c.net, expected);
        }

        #[test]
        fn validated_parameters_never_panic(p in validated_params()) {
            prop_assume!(planner_core::validate_parameters(&p).is_ok());
            let r = calculate_budget(&p);
            prop_assert_eq!(r.five_year.years.len(), PROJECTION_YEARS);
            prop_assert_eq!(
                r.five_year.total_sessions,
                r.five_year.years.iter().map(|y| y.sessions).sum::<u64>()
            );
            let roi = crate::calculate_roi(&p, &r, &planner_core::RoiParameters::default());
            prop_assert_eq!(roi.value_timeline.len(), PROJECTION_YEARS);
        }

        #[test]
        fn models_never_coincide(rooms in 1u32..20, weekly in 1u32..40) {
            let mut p = SimulatorParameters::default();
            p.sim_rooms = rooms;
            p.sessions_per_room_per_week = weekly;
            let a = calculate_opex(&p, &calculate_capex(&p), steady_state_sessions(&p));
            p.opex_model = OpexModel::SessionsBased;
            let b = calculate_opex(&p, &calculate_capex(&p), steady_state_sessions(&p));
            prop_assert_ne!(a.items, b.items);
        }
    }
}
