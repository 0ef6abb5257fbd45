use crate::error::{SimError, SimResult};
use crate::models::common::{StateVector, Vector3};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// 組成区分
///
/// 仮定するかさ密度を決定します。未知の文字列は`Default`として扱います。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Composition {
    /// 組成不明（標準岩石）
    #[default]
    Default,
    /// 岩石質
    Rocky,
    /// 金属質
    Metallic,
    /// 氷質
    Icy,
}

impl Composition {
    /// かさ密度（kg/m³）
    pub fn density_kg_m3(self) -> f64 {
        match self {
            Composition::Default => 3000.0,
            Composition::Rocky => 3300.0,
            Composition::Metallic => 4200.0,
            Composition::Icy => 1200.0,
        }
    }

    /// 文字列から組成を解釈
    ///
    /// 大文字小文字は区別しません。認識できない値は`Default`にフォールバックします。
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "rocky" => Composition::Rocky,
            "metallic" => Composition::Metallic,
            "icy" => Composition::Icy,
            "default" => Composition::Default,
            other => {
                debug!("未知の組成区分 '{}'. default として扱います", other);
                Composition::Default
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Composition::Default => "default",
            Composition::Rocky => "rocky",
            Composition::Metallic => "metallic",
            Composition::Icy => "icy",
        }
    }
}

impl From<String> for Composition {
    fn from(s: String) -> Self {
        Composition::parse(&s)
    }
}

impl From<Composition> for String {
    fn from(c: Composition) -> Self {
        c.as_str().to_string()
    }
}

impl fmt::Display for Composition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 構造区分
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Structure {
    /// 一枚岩
    #[default]
    Solid,
    /// ラブルパイル（瓦礫の集合体）
    Rubble,
}

impl Structure {
    /// ラブルパイルの密度減少量（kg/m³）
    pub const RUBBLE_DENSITY_PENALTY: f64 = 500.0;

    pub fn density_penalty_kg_m3(self) -> f64 {
        match self {
            Structure::Solid => 0.0,
            Structure::Rubble => Self::RUBBLE_DENSITY_PENALTY,
        }
    }

    /// "rubble" 以外はすべて`Solid`
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "rubble" => Structure::Rubble,
            _ => Structure::Solid,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Structure::Solid => "solid",
            Structure::Rubble => "rubble",
        }
    }
}

impl From<String> for Structure {
    fn from(s: String) -> Self {
        Structure::parse(&s)
    }
}

impl From<Structure> for String {
    fn from(s: Structure) -> Self {
        s.as_str().to_string()
    }
}

impl fmt::Display for Structure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 小惑星パラメータ
///
/// 呼び出し側が与える不変の入力値です。接近速度は速度成分のノルムとして導出します。
#[derive(Debug, Clone, PartialEq)]
pub struct AsteroidParameters {
    /// 速度成分（km/s）
    pub velocity: Vector3,
    /// 地表からの初期距離（km）
    pub distance_km: f64,
    /// 直径（m）
    pub diameter_m: f64,
    /// XY平面内の進入角（度）
    pub angle_deg: f64,
    /// Z軸からの傾斜角（度）
    pub tilt_angle_deg: f64,
    pub composition: Composition,
    pub structure: Structure,
    /// 観測時刻（秒）
    pub clock_time_s: f64,
}

impl AsteroidParameters {
    /// 新しいパラメータを作成して検証
    ///
    /// 角度・時刻は0、組成は`Default`、構造は`Solid`で初期化されます。
    pub fn new(velocity: Vector3, distance_km: f64, diameter_m: f64) -> SimResult<Self> {
        let params = Self {
            velocity,
            distance_km,
            diameter_m,
            angle_deg: 0.0,
            tilt_angle_deg: 0.0,
            composition: Composition::Default,
            structure: Structure::Solid,
            clock_time_s: 0.0,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn with_angles(mut self, angle_deg: f64, tilt_angle_deg: f64) -> SimResult<Self> {
        self.angle_deg = angle_deg;
        self.tilt_angle_deg = tilt_angle_deg;
        self.validate()?;
        Ok(self)
    }

    pub fn with_composition(mut self, composition: Composition) -> Self {
        self.composition = composition;
        self
    }

    pub fn with_structure(mut self, structure: Structure) -> Self {
        self.structure = structure;
        self
    }

    pub fn with_clock_time(mut self, clock_time_s: f64) -> SimResult<Self> {
        self.clock_time_s = clock_time_s;
        self.validate()?;
        Ok(self)
    }

    /// 接近速度（km/s）
    pub fn speed_km_s(&self) -> f64 {
        self.velocity.magnitude()
    }

    /// 半径（m）
    pub fn radius_m(&self) -> f64 {
        self.diameter_m / 2.0
    }

    /// 不変条件の検証
    ///
    /// 速度ゼロはステップ数計算でゼロ除算となるため、積分前に拒否します。
    pub fn validate(&self) -> SimResult<()> {
        if !self.velocity.is_finite() {
            return Err(SimError::invalid("velocity_km_s", "must be numeric"));
        }
        if self.speed_km_s() <= 0.0 {
            return Err(SimError::invalid("velocity_km_s", "speed must be positive"));
        }
        if !self.distance_km.is_finite() || self.distance_km <= 0.0 {
            return Err(SimError::invalid("distance_km", "must be positive"));
        }
        if !self.diameter_m.is_finite() || self.diameter_m <= 0.0 {
            return Err(SimError::invalid("diameter_m", "must be positive"));
        }
        if !self.angle_deg.is_finite() {
            return Err(SimError::invalid("angle_deg", "must be numeric"));
        }
        if !self.tilt_angle_deg.is_finite() {
            return Err(SimError::invalid("tilt_angle_deg", "must be numeric"));
        }
        if !self.clock_time_s.is_finite() {
            return Err(SimError::invalid("clock_time_s", "must be numeric"));
        }
        Ok(())
    }
}

/// 小惑星の状態（積分器が実行中に専有）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AsteroidState {
    pub state: StateVector,
}

impl AsteroidState {
    pub fn new(position: Vector3, velocity: Vector3) -> Self {
        Self {
            state: StateVector::new(position, velocity),
        }
    }

    pub fn position(&self) -> Vector3 {
        self.state.position
    }

    pub fn velocity(&self) -> Vector3 {
        self.state.velocity
    }

    pub fn radius(&self) -> f64 {
        self.state.radius()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_composition_parse() {
        assert_eq!(Composition::parse("Rocky"), Composition::Rocky);
        assert_eq!(Composition::parse("METALLIC"), Composition::Metallic);
        assert_eq!(Composition::parse("icy"), Composition::Icy);
        assert_eq!(Composition::parse("chondrite"), Composition::Default);
        assert_eq!(
            Composition::parse("chondrite").density_kg_m3(),
            Composition::Default.density_kg_m3()
        );
    }

    #[test]
    fn test_structure_parse() {
        assert_eq!(Structure::parse("Rubble"), Structure::Rubble);
        assert_eq!(Structure::parse("solid"), Structure::Solid);
        assert_eq!(Structure::parse("gravel"), Structure::Solid);
    }

    #[test]
    fn test_parameters_reject_zero_speed() {
        let result = AsteroidParameters::new(Vector3::ZERO, 1000.0, 100.0);
        assert!(matches!(
            result,
            Err(SimError::InvalidInput { field: "velocity_km_s", .. })
        ));
    }

    #[test]
    fn test_parameters_reject_non_positive_sizes() {
        let v = Vector3::new(1.0, 0.0, 0.0);
        assert!(AsteroidParameters::new(v, 0.0, 100.0).is_err());
        assert!(AsteroidParameters::new(v, 1000.0, -1.0).is_err());
        assert!(AsteroidParameters::new(v, f64::NAN, 100.0).is_err());
        assert!(AsteroidParameters::new(v, 1000.0, 100.0).is_ok());
    }

    #[test]
    fn test_speed_is_norm() {
        let p = AsteroidParameters::new(Vector3::new(2.0, 2.0, 2.0), 20000.0, 500.0).unwrap();
        assert!((p.speed_km_s() - 12.0_f64.sqrt()).abs() < 1e-12);
        assert_eq!(p.radius_m(), 250.0);
    }
}
