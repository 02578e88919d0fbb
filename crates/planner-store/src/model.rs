//! The recomputed `{params, results, roi_results}` triple and its reducer.

use planner_core::{
    validate_parameters, validate_roi_parameters, ParamsPatch, RoiParameters, RoiParamsPatch,
    SimulatorParameters, ValidationError,
};
use planner_econ::{calculate_budget, calculate_roi, BudgetResults, RoiResults};
use serde::Serialize;

/// Parameter edits understood by [`Model::reduce`].
#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    PatchParams(ParamsPatch),
    PatchRoi(RoiParamsPatch),
    ResetParams,
    ResetRoi,
    /// Replace facility parameters wholesale (scenario loads).
    ReplaceParams(SimulatorParameters),
    /// Replace both parameter sets (rehydration).
    Replace {
        params: SimulatorParameters,
        roi_params: RoiParameters,
    },
}

/// Parameters together with everything derived from them.
///
/// Fields are private: a `Model` only comes out of [`Model::new`] or
/// [`Model::reduce`], both of which run the engines, so `results` and
/// `roi_results` always match the parameters they sit next to.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Model {
    params: SimulatorParameters,
    roi_params: RoiParameters,
    results: BudgetResults,
    roi_results: RoiResults,
}

impl Model {
    pub fn new(
        params: SimulatorParameters,
        roi_params: RoiParameters,
    ) -> Result<Self, ValidationError> {
        validate_parameters(&params)?;
        validate_roi_parameters(&roi_params)?;
        Ok(Self::compute(params, roi_params))
    }

    fn compute(params: SimulatorParameters, roi_params: RoiParameters) -> Self {
        let results = calculate_budget(&params);
        let roi_results = calculate_roi(&params, &results, &roi_params);
        Self {
            params,
            roi_params,
            results,
            roi_results,
        }
    }

    /// Apply `action` and return the recomputed model. `self` is untouched;
    /// an action that yields invalid parameters is rejected as a whole.
    pub fn reduce(&self, action: Action) -> Result<Self, ValidationError> {
        let (params, roi_params) = match action {
            Action::PatchParams(patch) => (patch.apply(&self.params), self.roi_params.clone()),
            Action::PatchRoi(patch) => (self.params.clone(), patch.apply(&self.roi_params)),
            Action::ResetParams => (SimulatorParameters::default(), self.roi_params.clone()),
            Action::ResetRoi => (self.params.clone(), RoiParameters::default()),
            Action::ReplaceParams(params) => (params, self.roi_params.clone()),
            Action::Replace { params, roi_params } => (params, roi_params),
        };
        Self::new(params, roi_params)
    }

    pub fn params(&self) -> &SimulatorParameters {
        &self.params
    }

    pub fn roi_params(&self) -> &RoiParameters {
        &self.roi_params
    }

    pub fn results(&self) -> &BudgetResults {
        &self.results
    }

    pub fn roi_results(&self) -> &RoiResults {
        &self.roi_results
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::compute(SimulatorParameters::default(), RoiParameters::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use planner_core::{AssumptionSource, OpexModel};
    use proptest::prelude::*;
    use rust_decimal::Decimal;

    fn assert_consistent(m: &Model) {
        let results = calculate_budget(m.params());
        assert_eq!(m.results(), &results);
        assert_eq!(
            m.roi_results(),
            &calculate_roi(m.params(), &results, m.roi_params())
        );
    }

    #[test]
    fn default_model_is_valid_and_consistent() {
        let m = Model::default();
        assert_eq!(
            Model::new(SimulatorParameters::default(), RoiParameters::default()).unwrap(),
            m
        );
        assert_consistent(&m);
    }

    #[test]
    fn patch_recomputes_results() {
        let m = Model::default();
        let next = m
            .reduce(Action::PatchParams(ParamsPatch {
                sim_rooms: Some(6),
                ..Default::default()
            }))
            .unwrap();
        assert_eq!(next.params().sim_rooms, 6);
        assert!(next.results().capex.net > m.results().capex.net);
        assert_consistent(&next);
    }

    #[test]
    fn invalid_patch_is_rejected_and_input_untouched() {
        let m = Model::default();
        let before = m.clone();
        let err = m
            .reduce(Action::PatchParams(ParamsPatch {
                sim_rooms: Some(0),
                ..Default::default()
            }))
            .unwrap_err();
        assert_eq!(err, ValidationError::NoSimulationRooms);
        assert_eq!(m, before);
    }

    #[test]
    fn roi_patch_and_reset() {
        let m = Model::default()
            .reduce(Action::PatchRoi(RoiParamsPatch {
                total_nurses: Some(800),
                ..Default::default()
            }))
            .unwrap();
        assert_eq!(m.roi_params().source, AssumptionSource::OrganizationSupplied);
        let reset = m.reduce(Action::ResetRoi).unwrap();
        assert_eq!(reset.roi_params(), &RoiParameters::default());
        assert_eq!(reset.params(), m.params());
    }

    #[test]
    fn replace_keeps_roi_assumptions() {
        let m = Model::default()
            .reduce(Action::PatchRoi(RoiParamsPatch {
                discount_rate_pct: Some(Decimal::new(7, 0)),
                ..Default::default()
            }))
            .unwrap();
        let params = SimulatorParameters {
            opex_model: OpexModel::SessionsBased,
            ..Default::default()
        };
        let next = m.reduce(Action::ReplaceParams(params.clone())).unwrap();
        assert_eq!(next.params(), &params);
        assert_eq!(next.roi_params().discount_rate_pct, Decimal::new(7, 0));
        assert_consistent(&next);
    }

    proptest! {
        #[test]
        fn every_reduction_is_consistent(
            rooms in 1u32..12,
            area in 500u32..40_000,
            contingency in 0i64..=30,
            sessions in proptest::bool::ANY,
        ) {
            let patch = ParamsPatch {
                sim_rooms: Some(rooms),
                floor_area_sqft: Some(area),
                contingency_pct: Some(Decimal::from(contingency)),
                opex_model: Some(if sessions { OpexModel::SessionsBased } else { OpexModel::RoomBased }),
                ..Default::default()
            };
            let m = Model::default().reduce(Action::PatchParams(patch)).unwrap();
            assert_consistent(&m);
        }
    }
}
