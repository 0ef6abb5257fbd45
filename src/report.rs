//! # Report モジュール
//!
//! 軌道積分とエネルギー評価の結果を1つの衝突レポートにまとめます。
//! レポートは1回の実行の最後に構築され、以後変更されません。

use crate::energetics::ImpactEnergetics;
use crate::integrator::{Termination, Trajectory};
use crate::mitigation::MitigationRecommendation;
use crate::models::Vector3;
use crate::outcome::{GeoPoint, Outcome};
use serde::Serialize;
use std::fmt;

/// 人口分布との照合は行わないため常にこの表記
pub const AFFECTED_POPULATION_UNKNOWN: &str = "Unknown";

/// 衝突レポート
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImpactReport {
    /// 最終位置（km）
    pub final_position: Vector3,
    /// 自転補正済みの地理座標
    pub impact_site: GeoPoint,
    pub outcome: Outcome,
    pub termination: Termination,
    pub energetics: ImpactEnergetics,
    pub mitigation: MitigationRecommendation,
}

impl ImpactReport {
    pub fn kinetic_energy_j(&self) -> f64 {
        self.energetics.kinetic_energy_j
    }

    pub fn damage_radius_km(&self) -> f64 {
        self.energetics.damage_radius_km
    }

    pub fn tnt_tons(&self) -> f64 {
        self.energetics.tnt_tons
    }

    /// 衝突地点の方位表記
    pub fn impact_location(&self) -> String {
        self.impact_site.bearing()
    }

    /// 表示用の説明文
    pub fn narrative(&self) -> String {
        format!(
            "Impact Effects :-\n \
             Kinetic Energy of the Asteroid : {:.2e} J which is equal to {:.2e} tons of TNT.\n \
             This is more energy than {}.\n \
             Impact Radius : {:.2} km.\n \
             Impact Location : {}.\n \
             No. of People instantly killed in the blast radius : {}.\n \
             Final State of the Asteroid : {}\n \
             Recommended Strategy : {}",
            self.energetics.kinetic_energy_j,
            self.energetics.tnt_tons,
            self.energetics.severity.reference_event(),
            self.energetics.damage_radius_km,
            self.impact_location(),
            AFFECTED_POPULATION_UNKNOWN,
            self.outcome.status_text(),
            self.mitigation.strategy.label(),
        )
    }
}

impl fmt::Display for ImpactReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.narrative())
    }
}

/// 1回のシミュレーション実行の出力
///
/// 描画用の軌道サンプルとレポートの組です。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationOutcome {
    pub trajectory: Trajectory,
    pub report: ImpactReport,
}
