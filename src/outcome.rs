//! # Outcome モジュール
//!
//! 積分結果の最終状態から、衝突判定と地理座標（緯度・経度）を求めます。

use crate::error::{SimError, SimResult};
use crate::integrator::TrajectoryRun;
use crate::models::{PlanetModel, Vector3, math_utils};
use serde::Serialize;
use std::fmt;

/// 最終状態の分類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Outcome {
    /// 地表に衝突
    Impact,
    /// 地表からニアミス判定マージン未満を通過
    NearMiss,
    /// 通過
    Miss,
}

impl Outcome {
    /// 最終動径から分類
    pub fn classify(final_radius_km: f64, planet: &PlanetModel) -> Self {
        let altitude = planet.altitude(final_radius_km);
        if altitude <= 0.0 {
            Outcome::Impact
        } else if altitude < planet.near_miss_margin_km {
            Outcome::NearMiss
        } else {
            Outcome::Miss
        }
    }

    /// 積分結果から分類
    ///
    /// 地表貫通で終了した実行は、最終点の位置によらず`Impact`とします。
    pub fn for_run(run: &TrajectoryRun, planet: &PlanetModel) -> Self {
        if run.termination.reached_surface() {
            Outcome::Impact
        } else {
            Self::classify(run.final_state.radius(), planet)
        }
    }

    pub fn status_text(self) -> &'static str {
        match self {
            Outcome::Impact => "Impact",
            Outcome::NearMiss => "Miss. Phew! That was a close one.",
            Outcome::Miss => "Miss. Phew!",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.status_text())
    }
}

/// 地表上の地理座標（度）
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoPoint {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    /// 地表へ投影した位置（km）
    pub surface_position: Vector3,
}

impl GeoPoint {
    /// 最終位置を動径方向に地表へ投影し、自転補正を適用
    ///
    /// 補正量 `rotation_rate × 時間刻み × 時刻` を緯度・経度の両方から差し引きます。
    pub fn project(
        position: Vector3,
        planet: &PlanetModel,
        step_size_s: f64,
        clock_time_s: f64,
    ) -> SimResult<Self> {
        let surface = planet.surface_radius_km;
        let scaled = position.with_magnitude(surface).ok_or_else(|| {
            SimError::DegenerateGeometry(format!(
                "位置 ({:.3}, {:.3}, {:.3}) を地表へ投影できません",
                position.x, position.y, position.z
            ))
        })?;

        let ratio = (scaled.z / surface).clamp(-1.0, 1.0);
        let latitude = math_utils::rad_to_deg(ratio.asin());
        let longitude = math_utils::rad_to_deg(scaled.y.atan2(scaled.x));
        let delta = rotation_correction_deg(planet, step_size_s, clock_time_s);

        Ok(Self {
            latitude_deg: latitude - delta,
            longitude_deg: longitude - delta,
            surface_position: scaled,
        })
    }

    /// 方位表記（例: "73.8200°W 15.3000°N"）
    ///
    /// 値がちょうど0の場合は接尾辞を付けません。
    pub fn bearing(&self) -> String {
        format!(
            "{} {}",
            hemisphere(self.longitude_deg, "°W", "°E"),
            hemisphere(self.latitude_deg, "°S", "°N")
        )
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.bearing())
    }
}

/// 自転補正量（度）
pub fn rotation_correction_deg(planet: &PlanetModel, step_size_s: f64, clock_time_s: f64) -> f64 {
    planet.rotation_rate * step_size_s * clock_time_s
}

fn hemisphere(value: f64, negative: &str, positive: &str) -> String {
    let suffix = if value < 0.0 {
        negative
    } else if value > 0.0 {
        positive
    } else {
        ""
    };
    format!("{:.4}{}", value.abs(), suffix)
}
