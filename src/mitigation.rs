//! # Mitigation モジュール
//!
//! 小惑星の大きさと初期距離から、推奨される回避・防衛戦略を選定します。
//!
//! 半径区分（4段階）と距離区分（3段階）の静的な決定表による参照で、
//! 探索や最適化は行いません。境界の扱いは以下の通りです。
//!
//! | 区分 | 条件 |
//! |---|---|
//! | Small | 半径 ≤ 50 m |
//! | Medium | 50 m < 半径 ≤ 120 m |
//! | Large | 120 m < 半径 ≤ 250 m |
//! | Huge | 半径 > 250 m |
//! | Far | 距離 ≥ 2×10⁷ km |
//! | Imminent | 距離 ≤ 2×10⁵ km |
//! | Moderate | それ以外 |

use crate::energetics::ImpactEnergetics;
use crate::models::AsteroidParameters;
use serde::Serialize;
use std::fmt;

/// 遠距離判定の下限（km、この値を含む）
pub const FAR_STANDOFF_KM: f64 = 2e7;
/// 切迫判定の上限（km、この値を含む）
pub const IMMINENT_STANDOFF_KM: f64 = 2e5;

/// 半径区分
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RadiusClass {
    Small,
    Medium,
    Large,
    Huge,
}

impl RadiusClass {
    pub fn from_radius_m(radius_m: f64) -> Self {
        if radius_m <= 50.0 {
            RadiusClass::Small
        } else if radius_m <= 120.0 {
            RadiusClass::Medium
        } else if radius_m <= 250.0 {
            RadiusClass::Large
        } else {
            RadiusClass::Huge
        }
    }

    fn index(self) -> usize {
        match self {
            RadiusClass::Small => 0,
            RadiusClass::Medium => 1,
            RadiusClass::Large => 2,
            RadiusClass::Huge => 3,
        }
    }
}

/// 距離区分
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StandoffClass {
    Far,
    Moderate,
    Imminent,
}

impl StandoffClass {
    pub fn from_distance_km(distance_km: f64) -> Self {
        if distance_km >= FAR_STANDOFF_KM {
            StandoffClass::Far
        } else if distance_km <= IMMINENT_STANDOFF_KM {
            StandoffClass::Imminent
        } else {
            StandoffClass::Moderate
        }
    }

    fn index(self) -> usize {
        match self {
            StandoffClass::Far => 0,
            StandoffClass::Moderate => 1,
            StandoffClass::Imminent => 2,
        }
    }
}

/// 防衛戦略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Strategy {
    GravityTractorOrKineticImpactor,
    HighPowerExplosives,
    KineticImpactors,
    ExplosivesOrNuclear,
    NuclearOrUltraHighExplosives,
    TungstenPenetrators,
    TungstenAndNuclearPenetrators,
    TungstenAndNuclearWithLosses,
    Unavoidable,
}

impl Strategy {
    pub fn label(self) -> &'static str {
        match self {
            Strategy::GravityTractorOrKineticImpactor => "Gravity tractor or Kinetic Impactor",
            Strategy::HighPowerExplosives => "High power explosives or other weapons",
            Strategy::KineticImpactors => "Kinetic Impactors",
            Strategy::ExplosivesOrNuclear => "High power explosives or Nuclear weapons",
            Strategy::NuclearOrUltraHighExplosives => "Nuclear weapons or ultra high power explosives",
            Strategy::TungstenPenetrators => "Tungsten Penetrators",
            Strategy::TungstenAndNuclearPenetrators => "Combination of Tungsten and Nuclear Penetrators",
            Strategy::TungstenAndNuclearWithLosses => {
                "Combination of Tungsten and Nuclear Penetrators with almost unavoidable loss of life"
            }
            Strategy::Unavoidable => {
                "Most likely impossible to avoid extensive damage and loss of life with current technology"
            }
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 決定表 [半径区分][距離区分: Far, Moderate, Imminent]
const STRATEGY_TABLE: [[Strategy; 3]; 4] = [
    [
        Strategy::GravityTractorOrKineticImpactor,
        Strategy::HighPowerExplosives,
        Strategy::HighPowerExplosives,
    ],
    [
        Strategy::KineticImpactors,
        Strategy::ExplosivesOrNuclear,
        Strategy::Unavoidable,
    ],
    [
        Strategy::NuclearOrUltraHighExplosives,
        Strategy::TungstenPenetrators,
        Strategy::Unavoidable,
    ],
    [
        Strategy::TungstenAndNuclearPenetrators,
        Strategy::TungstenAndNuclearWithLosses,
        Strategy::Unavoidable,
    ],
];

/// 区分の組から戦略を参照
pub fn select_strategy(radius: RadiusClass, standoff: StandoffClass) -> Strategy {
    STRATEGY_TABLE[radius.index()][standoff.index()]
}

/// 防衛戦略の推奨結果
///
/// 軌道とは独立に、パラメータのみから算出します。
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MitigationRecommendation {
    pub radius_class: RadiusClass,
    pub standoff_class: StandoffClass,
    pub strategy: Strategy,
    /// 同じ密度モデルによる運動エネルギー（J）
    pub kinetic_energy_j: f64,
    /// 同じ密度モデルによる被害半径（km）
    pub damage_radius_km: f64,
}

impl MitigationRecommendation {
    pub fn recommend(params: &AsteroidParameters) -> Self {
        let radius_class = RadiusClass::from_radius_m(params.radius_m());
        let standoff_class = StandoffClass::from_distance_km(params.distance_km);
        let energetics = ImpactEnergetics::evaluate(params);
        Self {
            radius_class,
            standoff_class,
            strategy: select_strategy(radius_class, standoff_class),
            kinetic_energy_j: energetics.kinetic_energy_j,
            damage_radius_km: energetics.damage_radius_km,
        }
    }
}
