//! Evidence catalogue backing ROI estimates.
//!
//! Citations are immutable reference data. The ROI engine borrows them by
//! category and never builds its own.

use serde::{Deserialize, Serialize};

/// Strength of evidence. Ordered so that `Low < Moderate < High`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Confidence {
    Low,
    Moderate,
    High,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StudyType {
    MetaAnalysis,
    Cohort,
    Rct,
    CaseStudy,
    IndustryReport,
}

/// Clinical or operational improvement area valued by the ROI engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoiCategory {
    NurseRetention,
    CodeBlueOutcomes,
    MedicationErrors,
    InfectionPrevention,
    Malpractice,
    Accreditation,
    OnboardingEfficiency,
}

impl RoiCategory {
    pub const ALL: [RoiCategory; 7] = [
        RoiCategory::NurseRetention,
        RoiCategory::CodeBlueOutcomes,
        RoiCategory::MedicationErrors,
        RoiCategory::InfectionPrevention,
        RoiCategory::Malpractice,
        RoiCategory::Accreditation,
        RoiCategory::OnboardingEfficiency,
    ];

    pub fn label(self) -> &'static str {
        match self {
            RoiCategory::NurseRetention => "Nurse retention",
            RoiCategory::CodeBlueOutcomes => "Code blue outcomes",
            RoiCategory::MedicationErrors => "Medication errors",
            RoiCategory::InfectionPrevention => "Infection prevention",
            RoiCategory::Malpractice => "Malpractice exposure",
            RoiCategory::Accreditation => "Accreditation / status premium",
            RoiCategory::OnboardingEfficiency => "Onboarding efficiency",
        }
    }
}

/// A published source supporting an ROI assumption.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EvidenceCitation {
    pub source: &'static str,
    pub year: u16,
    pub study_type: StudyType,
    pub confidence: Confidence,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<&'static str>,
}

const fn cite(
    source: &'static str,
    year: u16,
    study_type: StudyType,
    confidence: Confidence,
    sample_size: Option<u32>,
) -> EvidenceCitation {
    EvidenceCitation {
        source,
        year,
        study_type,
        confidence,
        sample_size,
        url: None,
    }
}

static NURSE_RETENTION: [EvidenceCitation; 2] = [
    cite(
        "NSI National Health Care Retention & RN Staffing Report",
        2024,
        StudyType::IndustryReport,
        Confidence::Moderate,
        None,
    ),
    cite(
        "NCSBN National Simulation Study (Hayden et al.)",
        2014,
        StudyType::Rct,
        Confidence::High,
        Some(666),
    ),
];

static CODE_BLUE: [EvidenceCitation; 2] = [
    cite(
        "Simulation-based ACLS training and guideline adherence (Wayne et al.)",
        2008,
        StudyType::Cohort,
        Confidence::Moderate,
        None,
    ),
    cite(
        "Get With The Guidelines-Resuscitation registry analysis",
        2019,
        StudyType::Cohort,
        Confidence::Moderate,
        None,
    ),
];

static MEDICATION_ERRORS: [EvidenceCitation; 2] = [
    cite(
        "Systematic review of simulation for medication safety",
        2019,
        StudyType::MetaAnalysis,
        Confidence::Moderate,
        None,
    ),
    cite(
        "Interprofessional medication-safety simulation programme",
        2016,
        StudyType::CaseStudy,
        Confidence::Low,
        None,
    ),
];

static INFECTION_PREVENTION: [EvidenceCitation; 2] = [
    cite(
        "Simulation-based mastery learning and CLABSI rates (Barsuk et al.)",
        2009,
        StudyType::Cohort,
        Confidence::High,
        None,
    ),
    cite(
        "Cost savings from reduced catheter-related infection (Cohen et al.)",
        2010,
        StudyType::Cohort,
        Confidence::High,
        None,
    ),
];

static MALPRACTICE: [EvidenceCitation; 1] = [cite(
    "Obstetric team simulation and malpractice claims experience",
    2014,
    StudyType::CaseStudy,
    Confidence::Low,
    None,
)];

static ACCREDITATION: [EvidenceCitation; 1] = [cite(
    "Magnet recognition financial outcomes review",
    2020,
    StudyType::IndustryReport,
    Confidence::Low,
    None,
)];

static ONBOARDING: [EvidenceCitation; 2] = [
    cite(
        "Simulation-based residency for new graduate nurses (Beyea et al.)",
        2010,
        StudyType::Cohort,
        Confidence::Moderate,
        None,
    ),
    cite(
        "Transition-to-practice programme outcomes",
        2015,
        StudyType::Rct,
        Confidence::High,
        Some(1_088),
    ),
];

/// Citations supporting the given category.
pub fn citations_for(category: RoiCategory) -> &'static [EvidenceCitation] {
    match category {
        RoiCategory::NurseRetention => &NURSE_RETENTION,
        RoiCategory::CodeBlueOutcomes => &CODE_BLUE,
        RoiCategory::MedicationErrors => &MEDICATION_ERRORS,
        RoiCategory::InfectionPrevention => &INFECTION_PREVENTION,
        RoiCategory::Malpractice => &MALPRACTICE,
        RoiCategory::Accreditation => &ACCREDITATION,
        RoiCategory::OnboardingEfficiency => &ONBOARDING,
    }
}

/// Weakest confidence across a set of citations; `Low` when empty.
pub fn weakest_confidence(citations: &[EvidenceCitation]) -> Confidence {
    citations
        .iter()
        .map(|c| c.confidence)
        .min()
        .unwrap_or(Confidence::Low)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confidence_orders_low_to_high() {
        assert!(Confidence::Low < Confidence::Moderate);
        assert!(Confidence::Moderate < Confidence::High);
    }

    #[test]
    fn every_category_has_evidence() {
        for cat in RoiCategory::ALL {
            assert!(!citations_for(cat).is_empty(), "{cat:?}");
        }
    }

    #[test]
    fn weakest_confidence_takes_minimum() {
        assert_eq!(
            weakest_confidence(citations_for(RoiCategory::NurseRetention)),
            Confidence::Moderate
        );
        assert_eq!(
            weakest_confidence(citations_for(RoiCategory::InfectionPrevention)),
            Confidence::High
        );
        assert_eq!(weakest_confidence(&[]), Confidence::Low);
    }

    #[test]
    fn citation_serializes_without_empty_optionals() {
        let json = serde_json::to_value(&citations_for(RoiCategory::Malpractice)[0]).unwrap();
        assert_eq!(json["study_type"], "case-study");
        assert!(json.get("url").is_none());
    }
}
