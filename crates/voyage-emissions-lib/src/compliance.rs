//! FuelEU Maritime compliance verdict and EU ETS cost estimate.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_EUA_PRICE_EUR, DEFAULT_GHG_TARGET_G_PER_MJ, DEFAULT_PENALTY_RATE_EUR_PER_MJ,
};

/// Regulatory figures that parameterise the compliance and cost estimates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegulatoryParameters {
    /// FuelEU Maritime GHG intensity target in gCO2e/MJ.
    pub ghg_target_g_per_mj: f64,
    /// Price of one EU Allowance in euros.
    pub eua_price_eur: f64,
    /// Euros per MJ of energy for each gCO2e/MJ above target.
    pub penalty_rate_eur_per_mj: f64,
}

impl Default for RegulatoryParameters {
    fn default() -> Self {
        Self {
            ghg_target_g_per_mj: DEFAULT_GHG_TARGET_G_PER_MJ,
            eua_price_eur: DEFAULT_EUA_PRICE_EUR,
            penalty_rate_eur_per_mj: DEFAULT_PENALTY_RATE_EUR_PER_MJ,
        }
    }
}

/// Outcome classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceStatus {
    /// Intensity at or below target.
    Compliant,
    /// Intensity above target.
    NonCompliant,
    /// No energy consumed, so intensity is undefined.
    NotApplicable,
}

impl ComplianceStatus {
    pub fn label(self) -> &'static str {
        match self {
            ComplianceStatus::Compliant => "Compliant",
            ComplianceStatus::NonCompliant => "Non-compliant",
            ComplianceStatus::NotApplicable => "Not applicable",
        }
    }
}

/// FuelEU Maritime assessment for a voyage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComplianceAssessment {
    pub status: ComplianceStatus,
    pub compliant: bool,
    pub intensity_g_per_mj: Option<f64>,
    pub target_g_per_mj: f64,
    /// `intensity - target`; negative values are the margin below target.
    pub gap_g_per_mj: Option<f64>,
    pub penalty_eur: f64,
}

impl ComplianceAssessment {
    /// Distance below target when compliant.
    pub fn margin_g_per_mj(&self) -> Option<f64> {
        match (self.status, self.gap_g_per_mj) {
            (ComplianceStatus::Compliant, Some(gap)) => Some(gap.abs()),
            _ => None,
        }
    }

    /// Distance above target when non-compliant.
    pub fn excess_g_per_mj(&self) -> Option<f64> {
        match (self.status, self.gap_g_per_mj) {
            (ComplianceStatus::NonCompliant, Some(gap)) => Some(gap),
            _ => None,
        }
    }
}

/// Compare `intensity_g_per_mj` with the configured target.
///
/// A voyage is non-compliant only when intensity strictly exceeds the target;
/// the penalty is then `gap * total_energy_mj * penalty_rate_eur_per_mj`.
pub fn evaluate(
    intensity_g_per_mj: Option<f64>,
    total_energy_mj: f64,
    params: &RegulatoryParameters,
) -> ComplianceAssessment {
    let target = params.ghg_target_g_per_mj;

    let Some(intensity) = intensity_g_per_mj else {
        return ComplianceAssessment {
            status: ComplianceStatus::NotApplicable,
            compliant: true,
            intensity_g_per_mj: None,
            target_g_per_mj: target,
            gap_g_per_mj: None,
            penalty_eur: 0.0,
        };
    };

    let gap = intensity - target;
    if gap <= 0.0 {
        ComplianceAssessment {
            status: ComplianceStatus::Compliant,
            compliant: true,
            intensity_g_per_mj: Some(intensity),
            target_g_per_mj: target,
            gap_g_per_mj: Some(gap),
            penalty_eur: 0.0,
        }
    } else {
        ComplianceAssessment {
            status: ComplianceStatus::NonCompliant,
            compliant: false,
            intensity_g_per_mj: Some(intensity),
            target_g_per_mj: target,
            gap_g_per_mj: Some(gap),
            penalty_eur: gap * total_energy_mj * params.penalty_rate_eur_per_mj,
        }
    }
}

/// Estimated EU ETS cost of surrendering `total_eua` allowances.
pub fn eua_cost_eur(total_eua: f64, params: &RegulatoryParameters) -> f64 {
    total_eua * params.eua_price_eur
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(target: f64) -> RegulatoryParameters {
        RegulatoryParameters {
            ghg_target_g_per_mj: target,
            ..RegulatoryParameters::default()
        }
    }

    #[test]
    fn above_target_is_penalised() {
        let p = params(89.34);
        let energy = 4_050_000.0;
        let assessment = evaluate(Some(95.0), energy, &p);
        assert_eq!(assessment.status, ComplianceStatus::NonCompliant);
        assert!(!assessment.compliant);
        let gap = assessment.gap_g_per_mj.unwrap();
        assert!((gap - 5.66).abs() < 1e-9);
        assert_eq!(assessment.penalty_eur, gap * energy * p.penalty_rate_eur_per_mj);
        assert_eq!(assessment.excess_g_per_mj(), Some(gap));
        assert_eq!(assessment.margin_g_per_mj(), None);
    }

    #[test]
    fn exactly_on_target_is_compliant_without_penalty() {
        let assessment = evaluate(Some(89.34), 1_000_000.0, &params(89.34));
        assert_eq!(assessment.status, ComplianceStatus::Compliant);
        assert_eq!(assessment.penalty_eur, 0.0);
        assert_eq!(assessment.gap_g_per_mj, Some(0.0));
    }

    #[test]
    fn below_target_reports_margin() {
        let assessment = evaluate(Some(80.0), 1_000_000.0, &params(89.0));
        assert!(assessment.compliant);
        assert_eq!(assessment.margin_g_per_mj(), Some(9.0));
        assert_eq!(assessment.penalty_eur, 0.0);
    }

    #[test]
    fn undefined_intensity_is_not_applicable() {
        let assessment = evaluate(None, 0.0, &RegulatoryParameters::default());
        assert_eq!(assessment.status, ComplianceStatus::NotApplicable);
        assert!(assessment.compliant);
        assert_eq!(assessment.gap_g_per_mj, None);
        assert_eq!(assessment.penalty_eur, 0.0);
    }

    #[test]
    fn penalty_scales_with_configured_rate() {
        let base = params(89.0);
        let doubled = RegulatoryParameters {
            penalty_rate_eur_per_mj: base.penalty_rate_eur_per_mj * 2.0,
            ..base
        };
        let a = evaluate(Some(92.0), 2_000_000.0, &base);
        let b = evaluate(Some(92.0), 2_000_000.0, &doubled);
        assert!((b.penalty_eur - 2.0 * a.penalty_eur).abs() < 1e-6);
    }

    #[test]
    fn default_penalty_rate_is_2400_per_tj() {
        // 1 gCO2e/MJ over target on 1 TJ.
        let assessment = evaluate(Some(90.3368), 1e6, &RegulatoryParameters::default());
        assert!((assessment.penalty_eur - 2400.0).abs() < 1e-6);
    }

    #[test]
    fn eua_cost_uses_configured_price() {
        let p = RegulatoryParameters {
            eua_price_eur: 70.0,
            ..RegulatoryParameters::default()
        };
        assert_eq!(eua_cost_eur(10.0, &p), 700.0);
        assert_eq!(eua_cost_eur(10.0, &RegulatoryParameters::default()), 850.0);
    }
}
