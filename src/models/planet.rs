use serde::{Deserialize, Serialize};

/// 万有引力定数（km³/kg/s²）
pub const GRAVITATIONAL_CONSTANT_KM: f64 = 6.67430e-20;
/// 地球質量（kg）
pub const EARTH_MASS_KG: f64 = 5.972e24;
/// 地球半径（km）
pub const EARTH_RADIUS_KM: f64 = 6371.0;
/// 自転補正の角速度定数（度/秒）
pub const EARTH_ROTATION_RATE: f64 = 0.0042;
/// ニアミス判定の高度マージン（km）
pub const NEAR_MISS_MARGIN_KM: f64 = 3000.0;

/// 中心天体モデル
///
/// 原点に固定された点質量として扱います。大気や第三天体の影響は考慮しません。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanetModel {
    /// 地表半径（km）
    pub surface_radius_km: f64,
    /// 重力パラメータ μ = G·M（km³/s²）
    pub gravitational_parameter_km3_s2: f64,
    /// 自転補正の角速度定数
    pub rotation_rate: f64,
    /// ニアミス判定マージン（km）
    pub near_miss_margin_km: f64,
}

impl Default for PlanetModel {
    fn default() -> Self {
        Self::earth()
    }
}

impl PlanetModel {
    pub fn earth() -> Self {
        Self {
            surface_radius_km: EARTH_RADIUS_KM,
            gravitational_parameter_km3_s2: GRAVITATIONAL_CONSTANT_KM * EARTH_MASS_KG,
            rotation_rate: EARTH_ROTATION_RATE,
            near_miss_margin_km: NEAR_MISS_MARGIN_KM,
        }
    }

    /// 地表からの高度（km）。負の値は地表下を表します。
    pub fn altitude(&self, radius_km: f64) -> f64 {
        radius_km - self.surface_radius_km
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_earth_mu() {
        let earth = PlanetModel::default();
        assert_relative_eq!(earth.gravitational_parameter_km3_s2, 398_600.0, max_relative = 1e-3);
        assert_relative_eq!(earth.altitude(7371.0), 1000.0);
    }
}
