use crate::error::{SimError, SimResult};
use crate::models::{AsteroidParameters, Composition, PlanetModel, Structure, Vector3};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// シナリオメタデータ
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScenarioMeta {
    pub version: String,
    pub name: String,
    pub description: String,
}

impl Default for ScenarioMeta {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            name: "default".to_string(),
            description: "入力フォームの初期値による標準シナリオ".to_string(),
        }
    }
}

/// 速度成分の入力（km/s）
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct VelocityInput {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub z: Option<f64>,
}

/// 小惑星の入力値
///
/// 数値項目はすべて必須ですが、外部から欠落（null）のまま渡される可能性が
/// あるため`Option`で受け取ります。欠落があれば計算を行わずに拒否します。
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AsteroidInput {
    #[serde(default)]
    pub velocity_km_s: VelocityInput,
    pub distance_km: Option<f64>,
    pub diameter_m: Option<f64>,
    pub angle_deg: Option<f64>,
    pub tilt_angle_deg: Option<f64>,
    pub clock_time_s: Option<f64>,
    #[serde(default)]
    pub composition: Composition,
    #[serde(default)]
    pub structure: Structure,
}

impl Default for AsteroidInput {
    fn default() -> Self {
        Self {
            velocity_km_s: VelocityInput {
                x: Some(2.0),
                y: Some(2.0),
                z: Some(2.0),
            },
            distance_km: Some(20000.0),
            diameter_m: Some(500.0),
            angle_deg: Some(120.0),
            tilt_angle_deg: Some(120.0),
            clock_time_s: Some(0.0),
            composition: Composition::Rocky,
            structure: Structure::Solid,
        }
    }
}

fn required(value: Option<f64>, field: &'static str) -> SimResult<f64> {
    match value {
        Some(v) if v.is_finite() => Ok(v),
        Some(_) => Err(SimError::invalid(field, "must be numeric")),
        None => Err(SimError::invalid(field, "missing")),
    }
}

impl AsteroidInput {
    /// 入力値を検証済みのパラメータへ変換
    ///
    /// 最初に見つかった欠落項目で処理を打ち切ります。
    pub fn to_parameters(&self) -> SimResult<AsteroidParameters> {
        let velocity = Vector3::new(
            required(self.velocity_km_s.x, "velocity_km_s.x")?,
            required(self.velocity_km_s.y, "velocity_km_s.y")?,
            required(self.velocity_km_s.z, "velocity_km_s.z")?,
        );
        let distance_km = required(self.distance_km, "distance_km")?;
        let diameter_m = required(self.diameter_m, "diameter_m")?;
        let angle_deg = required(self.angle_deg, "angle_deg")?;
        let tilt_angle_deg = required(self.tilt_angle_deg, "tilt_angle_deg")?;
        let clock_time_s = required(self.clock_time_s, "clock_time_s")?;

        AsteroidParameters::new(velocity, distance_km, diameter_m)?
            .with_angles(angle_deg, tilt_angle_deg)?
            .with_clock_time(clock_time_s)
            .map(|p| p.with_composition(self.composition).with_structure(self.structure))
    }
}

/// 完全なシナリオ設定
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ScenarioConfig {
    #[serde(default)]
    pub meta: ScenarioMeta,
    pub asteroid: AsteroidInput,
    #[serde(default)]
    pub planet: PlanetModel,
}

impl ScenarioConfig {
    /// YAMLファイルからシナリオ設定を読み込み
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ScenarioError> {
        let path = path.as_ref();

        // ファイル存在チェック
        if !path.exists() {
            return Err(ScenarioError::FileNotFound(path.to_path_buf()));
        }

        // ファイル読み込み
        let contents =
            fs::read_to_string(path).map_err(|e| ScenarioError::IoError(path.to_path_buf(), e))?;

        // YAML解析
        let config: ScenarioConfig = serde_yaml::from_str(&contents)
            .map_err(|e| ScenarioError::ParseError(path.to_path_buf(), e))?;

        // 基本的な検証
        config.validate()?;

        Ok(config)
    }

    /// YAML文字列から読み込み
    pub fn from_yaml_str(contents: &str) -> Result<Self, ScenarioError> {
        let config: ScenarioConfig = serde_yaml::from_str(contents)
            .map_err(|e| ScenarioError::ParseError(PathBuf::from("<inline>"), e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, ScenarioError> {
        serde_yaml::to_string(self).map_err(|e| ScenarioError::ParseError(PathBuf::from("<inline>"), e))
    }

    /// 中心天体設定の検証
    ///
    /// 小惑星の入力値の欠落は実行時に扱うため、ここでは検証しません。
    pub fn validate(&self) -> Result<(), ScenarioError> {
        let planet = &self.planet;
        let positive = |v: f64| v.is_finite() && v > 0.0;

        if !positive(planet.surface_radius_km) {
            return Err(ScenarioError::ValidationError(
                "surface_radius_km must be positive".to_string(),
            ));
        }
        if !positive(planet.gravitational_parameter_km3_s2) {
            return Err(ScenarioError::ValidationError(
                "gravitational_parameter_km3_s2 must be positive".to_string(),
            ));
        }
        if !planet.rotation_rate.is_finite() {
            return Err(ScenarioError::ValidationError(
                "rotation_rate must be numeric".to_string(),
            ));
        }
        if !positive(planet.near_miss_margin_km) {
            return Err(ScenarioError::ValidationError(
                "near_miss_margin_km must be positive".to_string(),
            ));
        }

        Ok(())
    }

    /// シナリオの概要を表示
    pub fn print_summary(&self) {
        println!("=== シナリオ情報 ===");
        println!("名前: {}", self.meta.name);
        println!("説明: {}", self.meta.description);
        println!("バージョン: {}", self.meta.version);
        println!();

        let show = |v: Option<f64>| v.map_or_else(|| "(未入力)".to_string(), |v| format!("{}", v));
        let a = &self.asteroid;
        println!("=== 小惑星 ===");
        println!(
            "速度成分: ({}, {}, {}) km/s",
            show(a.velocity_km_s.x),
            show(a.velocity_km_s.y),
            show(a.velocity_km_s.z)
        );
        println!("初期距離: {} km", show(a.distance_km));
        println!("直径: {} m", show(a.diameter_m));
        println!("進入角: {} 度, 傾斜角: {} 度", show(a.angle_deg), show(a.tilt_angle_deg));
        println!("観測時刻: {} 秒", show(a.clock_time_s));
        println!("組成: {}, 構造: {}", a.composition, a.structure);
        println!();

        println!("=== 中心天体 ===");
        println!("地表半径: {:.1} km", self.planet.surface_radius_km);
        println!("重力パラメータ: {:.1} km³/s²", self.planet.gravitational_parameter_km3_s2);
        println!("ニアミス判定マージン: {:.1} km", self.planet.near_miss_margin_km);
    }
}

/// シナリオ読み込みエラー
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("シナリオファイルが見つかりません: {}", .0.display())]
    FileNotFound(PathBuf),
    #[error("ファイル読み込みエラー {}: {}", .0.display(), .1)]
    IoError(PathBuf, std::io::Error),
    #[error("YAML解析エラー {}: {}", .0.display(), .1)]
    ParseError(PathBuf, serde_yaml::Error),
    #[error("設定検証エラー: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_SCENARIO: &str = r#"
meta:
  version: "1.0"
  name: test
  description: inline
asteroid:
  velocity_km_s: { x: 2.0, y: 2.0, z: 2.0 }
  distance_km: 20000
  diameter_m: 500
  angle_deg: 120
  tilt_angle_deg: 120
  clock_time_s: 0
  composition: Metallic
  structure: rubble
"#;

    #[test]
    fn test_parse_full_scenario() {
        let config = ScenarioConfig::from_yaml_str(FULL_SCENARIO).unwrap();
        assert_eq!(config.planet, PlanetModel::earth());
        let params = config.asteroid.to_parameters().unwrap();
        assert_eq!(params.composition, Composition::Metallic);
        assert_eq!(params.structure, Structure::Rubble);
        assert_eq!(params.distance_km, 20000.0);
    }

    #[test]
    fn test_unknown_composition_falls_back() {
        let yaml = FULL_SCENARIO.replace("Metallic", "carbonaceous");
        let config = ScenarioConfig::from_yaml_str(&yaml).unwrap();
        assert_eq!(config.asteroid.composition, Composition::Default);
    }

    #[test]
    fn test_missing_field_short_circuits() {
        let yaml = FULL_SCENARIO.replace("  diameter_m: 500\n", "");
        let config = ScenarioConfig::from_yaml_str(&yaml).unwrap();
        match config.asteroid.to_parameters() {
            Err(SimError::InvalidInput { field, .. }) => assert_eq!(field, "diameter_m"),
            other => panic!("unexpected: {:?}", other),
        }

        let yaml = FULL_SCENARIO.replace("y: 2.0", "y: null");
        let config = ScenarioConfig::from_yaml_str(&yaml).unwrap();
        assert!(matches!(
            config.asteroid.to_parameters(),
            Err(SimError::InvalidInput { field: "velocity_km_s.y", .. })
        ));
    }

    #[test]
    fn test_zero_speed_rejected() {
        let mut input = AsteroidInput::default();
        input.velocity_km_s = VelocityInput {
            x: Some(0.0),
            y: Some(0.0),
            z: Some(0.0),
        };
        assert!(input.to_parameters().is_err());
    }

    #[test]
    fn test_invalid_planet_rejected() {
        let yaml = format!("{}planet:\n  surface_radius_km: -1\n", FULL_SCENARIO);
        assert!(matches!(
            ScenarioConfig::from_yaml_str(&yaml),
            Err(ScenarioError::ValidationError(_))
        ));
    }

    #[test]
    fn test_default_round_trips_through_yaml() {
        let config = ScenarioConfig::default();
        let yaml = config.to_yaml().unwrap();
        let parsed = ScenarioConfig::from_yaml_str(&yaml).unwrap();
        assert_eq!(parsed.asteroid, config.asteroid);
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            ScenarioConfig::from_file("does/not/exist.yaml"),
            Err(ScenarioError::FileNotFound(_))
        ));
    }
}
