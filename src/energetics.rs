//! # Energetics モジュール
//!
//! 衝突エネルギーと被害半径の簡易モデルを提供します。
//!
//! 小惑星を一様な球体とみなし、組成区分と構造区分から密度を決め、
//! 運動エネルギー・被害半径・TNT換算量を算出します。被害半径は
//! べき乗則による大まかなスケーリングで、物理的な精度は主張しません。
//!
//! ## 深刻度
//!
//! 算出したエネルギーを既知の事象の基準エネルギー表（昇順）と比較し、
//! 超えた最大の基準を報告します。

use crate::models::{AsteroidParameters, Composition, Structure};
use serde::Serialize;
use std::fmt;

/// TNT 1トンあたりのエネルギー（J）
pub const JOULES_PER_TON_TNT: f64 = 4.184e9;

/// 被害半径スケーリングの基準エネルギー（J）
const DAMAGE_REFERENCE_ENERGY_J: f64 = 1e15;
/// 被害半径スケーリングの係数（km）
const DAMAGE_RADIUS_SCALE_KM: f64 = 10.0;
/// 被害半径スケーリングの指数
const DAMAGE_RADIUS_EXPONENT: f64 = 0.33;

/// 深刻度（比較対象となる既知の事象）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Severity {
    Negligible,
    Earthquake,
    AirBurst,
    GroundImpact,
    MassExtinction,
}

/// 基準エネルギー表（昇順、しきい値は「より大きい」で判定）
pub const SEVERITY_THRESHOLDS: [(f64, Severity); 4] = [
    (1e10, Severity::Earthquake),
    (1e14, Severity::AirBurst),
    (4e16, Severity::GroundImpact),
    (1e24, Severity::MassExtinction),
];

impl Severity {
    /// エネルギーから深刻度を判定
    pub fn classify(energy_j: f64) -> Self {
        SEVERITY_THRESHOLDS
            .iter()
            .rev()
            .find(|(threshold, _)| energy_j > *threshold)
            .map(|(_, severity)| *severity)
            .unwrap_or(Severity::Negligible)
    }

    /// 比較対象となる事象の説明
    pub fn reference_event(self) -> &'static str {
        match self {
            Severity::Negligible => "a firecracker",
            Severity::Earthquake => "a Magnitude 2 Earthquake",
            Severity::AirBurst => "the Hiroshima Atom Bomb",
            Severity::GroundImpact => "the Tunguska event",
            Severity::MassExtinction => "the Dinosaur Extinction causing asteroid",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.reference_event())
    }
}

/// 衝突エネルギー評価結果
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ImpactEnergetics {
    /// 質量（kg）
    pub mass_kg: f64,
    /// 運動エネルギー（J）
    pub kinetic_energy_j: f64,
    /// 被害半径（km）
    pub damage_radius_km: f64,
    /// TNT換算（トン）
    pub tnt_tons: f64,
    pub severity: Severity,
}

impl ImpactEnergetics {
    /// パラメータからエネルギーを評価
    pub fn evaluate(params: &AsteroidParameters) -> Self {
        Self::from_body(
            params.diameter_m,
            params.speed_km_s(),
            params.composition,
            params.structure,
        )
    }

    pub fn from_body(
        diameter_m: f64,
        speed_km_s: f64,
        composition: Composition,
        structure: Structure,
    ) -> Self {
        let mass_kg = mass_kg(diameter_m, composition, structure);
        let kinetic_energy_j = kinetic_energy_j(mass_kg, speed_km_s);
        Self {
            mass_kg,
            kinetic_energy_j,
            damage_radius_km: damage_radius_km(kinetic_energy_j),
            tnt_tons: tnt_equivalent_tons(kinetic_energy_j),
            severity: Severity::classify(kinetic_energy_j),
        }
    }
}

/// 実効密度（kg/m³）
pub fn effective_density_kg_m3(composition: Composition, structure: Structure) -> f64 {
    composition.density_kg_m3() - structure.density_penalty_kg_m3()
}

/// 球体の体積（m³）
pub fn sphere_volume_m3(diameter_m: f64) -> f64 {
    let radius = diameter_m / 2.0;
    (4.0 / 3.0) * std::f64::consts::PI * radius.powi(3)
}

pub fn mass_kg(diameter_m: f64, composition: Composition, structure: Structure) -> f64 {
    effective_density_kg_m3(composition, structure) * sphere_volume_m3(diameter_m)
}

/// 運動エネルギー（J）
///
/// 速度はkm/sで与え、1e6を掛けて(m/s)²に換算します。
pub fn kinetic_energy_j(mass_kg: f64, speed_km_s: f64) -> f64 {
    0.5 * mass_kg * speed_km_s.powi(2) * 1e6
}

/// 被害半径（km） = 10·(E/1e15)^0.33
pub fn damage_radius_km(energy_j: f64) -> f64 {
    DAMAGE_RADIUS_SCALE_KM * (energy_j / DAMAGE_REFERENCE_ENERGY_J).powf(DAMAGE_RADIUS_EXPONENT)
}

pub fn tnt_equivalent_tons(energy_j: f64) -> f64 {
    energy_j / JOULES_PER_TON_TNT
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_rocky_500m_reference_body() {
        let e = ImpactEnergetics::from_body(500.0, 12.0_f64.sqrt(), Composition::Rocky, Structure::Solid);
        let volume = (4.0 / 3.0) * std::f64::consts::PI * 250.0_f64.powi(3);
        let expected = 0.5 * 3300.0 * volume * 12.0 * 1e6;
        assert_relative_eq!(e.kinetic_energy_j, expected, max_relative = 1e-12);
        assert_relative_eq!(e.kinetic_energy_j, 1.2959e18, max_relative = 1e-3);
        assert_relative_eq!(
            e.damage_radius_km,
            10.0 * (expected / 1e15).powf(0.33),
            max_relative = 1e-12
        );
        assert_relative_eq!(e.tnt_tons, expected / 4.184e9, max_relative = 1e-12);
        assert_eq!(e.severity, Severity::GroundImpact);
    }

    #[test]
    fn test_density_table() {
        assert_eq!(effective_density_kg_m3(Composition::Default, Structure::Solid), 3000.0);
        assert_eq!(effective_density_kg_m3(Composition::Rocky, Structure::Solid), 3300.0);
        assert_eq!(effective_density_kg_m3(Composition::Metallic, Structure::Solid), 4200.0);
        assert_eq!(effective_density_kg_m3(Composition::Icy, Structure::Rubble), 700.0);
        assert_eq!(
            effective_density_kg_m3(Composition::parse("unobtainium"), Structure::Solid),
            3000.0
        );
    }

    #[test]
    fn test_severity_boundaries() {
        assert_eq!(Severity::classify(0.0), Severity::Negligible);
        assert_eq!(Severity::classify(1e10), Severity::Negligible);
        assert_eq!(Severity::classify(1.01e10), Severity::Earthquake);
        assert_eq!(Severity::classify(5e14), Severity::AirBurst);
        assert_eq!(Severity::classify(4e16), Severity::AirBurst);
        assert_eq!(Severity::classify(1e17), Severity::GroundImpact);
        assert_eq!(Severity::classify(2e24), Severity::MassExtinction);
    }

    #[test]
    fn test_doubling_rules() {
        let base = ImpactEnergetics::from_body(100.0, 10.0, Composition::Icy, Structure::Solid);
        let fast = ImpactEnergetics::from_body(100.0, 20.0, Composition::Icy, Structure::Solid);
        let big = ImpactEnergetics::from_body(200.0, 10.0, Composition::Icy, Structure::Solid);
        assert_relative_eq!(fast.kinetic_energy_j, 4.0 * base.kinetic_energy_j, max_relative = 1e-12);
        assert_relative_eq!(big.kinetic_energy_j, 8.0 * base.kinetic_energy_j, max_relative = 1e-12);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        /// エネルギーは直径・速度に対して単調非減少
        #[test]
        fn prop_energy_monotonic(
            d in 1.0f64..5000.0,
            s in 0.1f64..70.0,
            dd in 0.0f64..1000.0,
            ds in 0.0f64..30.0,
        ) {
            let e = |d, s| ImpactEnergetics::from_body(d, s, Composition::Rocky, Structure::Solid).kinetic_energy_j;
            prop_assert!(e(d + dd, s) >= e(d, s));
            prop_assert!(e(d, s + ds) >= e(d, s));
        }

        /// ラブルパイルは常に一枚岩より低エネルギー
        #[test]
        fn prop_rubble_lower_than_solid(
            d in 1.0f64..5000.0,
            s in 0.1f64..70.0,
            idx in 0usize..4,
        ) {
            let composition = [Composition::Default, Composition::Rocky, Composition::Metallic, Composition::Icy][idx];
            let solid = ImpactEnergetics::from_body(d, s, composition, Structure::Solid);
            let rubble = ImpactEnergetics::from_body(d, s, composition, Structure::Rubble);
            prop_assert!(rubble.kinetic_energy_j < solid.kinetic_energy_j);
            let rho = composition.density_kg_m3();
            let ratio = rubble.kinetic_energy_j / solid.kinetic_energy_j;
            prop_assert!((ratio - (rho - 500.0) / rho).abs() < 1e-9);
        }
    }
}
