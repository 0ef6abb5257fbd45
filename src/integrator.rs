//! # Integrator モジュール
//!
//! 中心天体の逆二乗重力の下で小惑星（質点）の軌道を数値積分します。
//!
//! 二体問題近似のみを扱い、中心天体は原点に固定します。各ステップは
//! 古典的4次ルンゲ・クッタ法（RK4）で状態ベクトルを一括して進めます。
//!
//! ## 時間刻みと積分ステップ数
//!
//! 時間刻みは初期距離から実行開始時に一度だけ決定し、実行中は変更しません。
//!
//! | 初期距離 (km) | 時間刻み (s) |
//! |---|---|
//! | < 3500 | 35.0 |
//! | [3500, 6000) | 40.0 |
//! | [6000, 12000) | 45.0 |
//! | ≥ 12000 | 50.0 |
//!
//! ステップ数の上限は `floor(floor(距離/速度)·30 / 時間刻み)` です。重力加速を
//! 考慮しない通過時間に固定係数を掛けた近似値で、正確な到達時刻ではありません。
//!
//! ## 終了条件
//!
//! - ステップ開始時点で動径が地表半径未満: オイラー法で1ステップだけ進め、
//!   その点を追加して終了（地表下への外挿を避ける切り替え）
//! - ステップ開始時点で動径が地表半径と等しい: 点を追加せずに終了
//! - ステップ数の上限に到達: そのまま終了（Miss として扱われる正当な結果）
//!
//! オイラー切り替えでは動径を `地表半径 − r` として再計算します。この値が
//! 0以下、または結果が非有限になる場合は退化とみなし、追加の点を出さずに
//! 直前の有効な点で終了します。

use crate::models::{AsteroidParameters, AsteroidState, PlanetModel, StateVector, Vector3};
use serde::Serialize;
use tracing::{debug, trace, warn};

/// 時間刻みの選択表（距離の上限（未満）, 時間刻み）
pub const STEP_SIZE_POLICY: [(f64, f64); 3] = [(3500.0, 35.0), (6000.0, 40.0), (12000.0, 45.0)];
/// 12000 km 以上での時間刻み（s）
pub const FAR_STEP_SIZE_S: f64 = 50.0;
/// 通過時間に掛けるステップ数の係数
pub const STEP_BUDGET_FACTOR: f64 = 30.0;

/// 積分の終了理由
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Termination {
    /// ステップ数の上限に到達
    BudgetExhausted,
    /// ステップ開始時点でちょうど地表に到達（点は追加しない）
    SurfaceContact,
    /// 地表貫通を検知し、オイラー法の1ステップで終了
    EulerCutover,
    /// オイラー切り替えの再計算半径が退化したため直前の点で終了
    DegenerateRadius,
}

impl Termination {
    /// 地表到達を検知して終了したかどうか
    pub fn reached_surface(self) -> bool {
        !matches!(self, Termination::BudgetExhausted)
    }
}

/// 軌道サンプル
///
/// 時刻順に並んだ位置の列です。初期位置はサンプル列に含めず別に保持します。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trajectory {
    pub initial_position: Vector3,
    pub samples: Vec<Vector3>,
    /// 時間刻み（s）
    pub step_size_s: f64,
}

impl Trajectory {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// 最後のサンプル（サンプルが無ければ初期位置）
    pub fn last_position(&self) -> Vector3 {
        self.samples.last().copied().unwrap_or(self.initial_position)
    }

    /// シミュレーション上の経過時間（s）
    pub fn elapsed_s(&self) -> f64 {
        self.samples.len() as f64 * self.step_size_s
    }

    pub fn iter(&self) -> impl Iterator<Item = &Vector3> {
        self.samples.iter()
    }
}

/// 1回の積分実行の結果
#[derive(Debug, Clone, PartialEq)]
pub struct TrajectoryRun {
    pub trajectory: Trajectory,
    pub final_state: AsteroidState,
    pub termination: Termination,
    pub steps_taken: u64,
    pub step_budget: u64,
}

/// 軌道積分器
#[derive(Debug, Clone)]
pub struct TrajectoryIntegrator {
    pub planet: PlanetModel,
    pub verbose_level: u8,
}

impl TrajectoryIntegrator {
    pub fn new(planet: PlanetModel) -> Self {
        Self {
            planet,
            verbose_level: 0,
        }
    }

    pub fn with_verbose_level(mut self, verbose_level: u8) -> Self {
        self.verbose_level = verbose_level;
        self
    }

    /// 初期距離から時間刻み（s）を選択
    pub fn step_size_for(distance_km: f64) -> f64 {
        STEP_SIZE_POLICY
            .iter()
            .find(|(upper, _)| distance_km < *upper)
            .map(|(_, dt)| *dt)
            .unwrap_or(FAR_STEP_SIZE_S)
    }

    /// ステップ数の上限
    ///
    /// 速度は正であることを前提とします（`AsteroidParameters::validate`で保証）。
    pub fn step_budget(distance_km: f64, speed_km_s: f64, step_size_s: f64) -> u64 {
        let transit_s = (distance_km / speed_km_s).floor();
        (transit_s * STEP_BUDGET_FACTOR / step_size_s).floor() as u64
    }

    /// 初期状態
    ///
    /// 位置は地表半径 + 初期距離を動径とする球面座標から求め、速度は入力成分を
    /// そのまま使用します（位置の座標系へ回転させない簡略化）。
    pub fn initial_state(&self, params: &AsteroidParameters) -> AsteroidState {
        let radius = self.planet.surface_radius_km + params.distance_km;
        let position = Vector3::from_spherical(radius, params.angle_deg, params.tilt_angle_deg);
        AsteroidState::new(position, params.velocity)
    }

    /// 動径 `r` を与えたときの重力加速度 −μ·x/r³
    fn gravity(&self, position: Vector3, r: f64) -> Vector3 {
        position * (-self.planet.gravitational_parameter_km3_s2 / r.powi(3))
    }

    /// 状態の時間微分（速度, 加速度）
    pub fn derivative(&self, state: &StateVector) -> StateVector {
        StateVector::new(state.velocity, self.gravity(state.position, state.radius()))
    }

    /// RK4 による1ステップ
    pub fn rk4_step(&self, state: &StateVector, dt: f64) -> StateVector {
        let k1 = self.derivative(state) * dt;
        let k2 = self.derivative(&(*state + k1 * 0.5)) * dt;
        let k3 = self.derivative(&(*state + k2 * 0.5)) * dt;
        let k4 = self.derivative(&(*state + k3)) * dt;
        *state + (k1 + k2 * 2.0 + k3 * 2.0 + k4) * (1.0 / 6.0)
    }

    /// 地表貫通時のオイラー1ステップ
    ///
    /// 再計算半径が退化する場合は`None`。
    fn euler_cutover(&self, state: &StateVector, dt: f64) -> Option<StateVector> {
        let recomputed = self.planet.surface_radius_km - state.radius();
        if recomputed <= 0.0 || !recomputed.is_finite() {
            return None;
        }
        let velocity = state.velocity + self.gravity(state.position, recomputed) * dt;
        let position = state.position + velocity * dt;
        let next = StateVector::new(position, velocity);
        next.is_finite().then_some(next)
    }

    /// 軌道を積分
    pub fn integrate(&self, params: &AsteroidParameters) -> TrajectoryRun {
        let step_size = Self::step_size_for(params.distance_km);
        let step_budget = Self::step_budget(params.distance_km, params.speed_km_s(), step_size);
        let initial = self.initial_state(params);
        let surface = self.planet.surface_radius_km;

        debug!(
            "軌道積分開始: 時間刻み {:.1}秒, 最大ステップ数 {}, 初期動径 {:.1}km",
            step_size,
            step_budget,
            initial.radius()
        );

        let mut state = initial.state;
        let mut samples = Vec::with_capacity(step_budget.min(100_000) as usize);
        let mut termination = Termination::BudgetExhausted;
        let mut steps_taken = 0;

        for step in 0..step_budget {
            let r = state.radius();
            if r < surface {
                match self.euler_cutover(&state, step_size) {
                    Some(next) => {
                        state = next;
                        samples.push(state.position);
                        termination = Termination::EulerCutover;
                    }
                    None => {
                        warn!(
                            "地表貫通時の再計算半径が退化しました (r = {:.6}km). 直前の点で終了します",
                            r
                        );
                        termination = Termination::DegenerateRadius;
                    }
                }
                steps_taken += 1;
                break;
            }
            if r == surface {
                termination = Termination::SurfaceContact;
                break;
            }

            state = self.rk4_step(&state, step_size);
            samples.push(state.position);
            steps_taken += 1;

            if self.verbose_level > 2 {
                trace!("ステップ {}: 動径 {:.1}km", step, state.radius());
            }
            if self.verbose_level > 0 && steps_taken % 100 == 0 {
                debug!(
                    "進行状況: {}/{} ステップ (高度 {:.1}km)",
                    steps_taken,
                    step_budget,
                    self.planet.altitude(state.radius())
                );
            }
        }

        debug!(
            "軌道積分終了: {:?}, {} ステップ, 最終動径 {:.1}km",
            termination,
            steps_taken,
            state.radius()
        );

        TrajectoryRun {
            trajectory: Trajectory {
                initial_position: initial.position(),
                samples,
                step_size_s: step_size,
            },
            final_state: AsteroidState { state },
            termination,
            steps_taken,
            step_budget,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn earth_integrator() -> TrajectoryIntegrator {
        TrajectoryIntegrator::new(PlanetModel::earth())
    }

    #[test]
    fn test_step_size_policy() {
        assert_eq!(TrajectoryIntegrator::step_size_for(1000.0), 35.0);
        assert_eq!(TrajectoryIntegrator::step_size_for(3499.9), 35.0);
        assert_eq!(TrajectoryIntegrator::step_size_for(3500.0), 40.0);
        assert_eq!(TrajectoryIntegrator::step_size_for(5999.0), 40.0);
        assert_eq!(TrajectoryIntegrator::step_size_for(6000.0), 45.0);
        assert_eq!(TrajectoryIntegrator::step_size_for(12000.0), 50.0);
        assert_eq!(TrajectoryIntegrator::step_size_for(20000.0), 50.0);
    }

    #[test]
    fn test_step_budget_reference_case() {
        let speed = 12.0_f64.sqrt();
        let dt = TrajectoryIntegrator::step_size_for(20000.0);
        let budget = TrajectoryIntegrator::step_budget(20000.0, speed, dt);
        // floor(20000 / 3.4641) = 5773, 5773 * 30 / 50 = 3463.8
        assert_eq!(budget, 3463);
    }

    #[test]
    fn test_initial_state_on_sphere() {
        let params = AsteroidParameters::new(Vector3::new(1.0, -2.0, 0.5), 1000.0, 100.0)
            .unwrap()
            .with_angles(120.0, 60.0)
            .unwrap();
        let s = earth_integrator().initial_state(&params);
        assert_relative_eq!(s.radius(), 7371.0, epsilon = 1e-9);
        assert_eq!(s.velocity(), params.velocity);
    }

    #[test]
    fn test_derivative_points_inward() {
        let integrator = earth_integrator();
        let state = StateVector::new(Vector3::new(7000.0, 0.0, 0.0), Vector3::new(0.0, 7.5, 0.0));
        let d = integrator.derivative(&state);
        assert_eq!(d.position, state.velocity);
        let mu = integrator.planet.gravitational_parameter_km3_s2;
        assert_relative_eq!(d.velocity.x, -mu / 7000.0_f64.powi(2), max_relative = 1e-12);
        assert_eq!(d.velocity.y, 0.0);
    }

    #[test]
    fn test_rk4_circular_orbit_keeps_radius() {
        let integrator = earth_integrator();
        let r = 7000.0;
        let v = (integrator.planet.gravitational_parameter_km3_s2 / r).sqrt();
        let mut state = StateVector::new(Vector3::new(r, 0.0, 0.0), Vector3::new(0.0, v, 0.0));
        for _ in 0..200 {
            state = integrator.rk4_step(&state, 10.0);
        }
        assert_relative_eq!(state.radius(), r, max_relative = 1e-6);
    }

    #[test]
    fn test_slow_body_falls_in() {
        let params = AsteroidParameters::new(Vector3::new(0.01, 0.0, 0.0), 1000.0, 100.0)
            .unwrap()
            .with_angles(0.0, 90.0)
            .unwrap();
        let run = earth_integrator().integrate(&params);
        assert!(run.termination.reached_surface());
        assert_eq!(run.termination, Termination::EulerCutover);
        assert!(run.steps_taken < run.step_budget);
        assert_eq!(run.trajectory.len() as u64, run.steps_taken);
        assert_eq!(run.trajectory.last_position(), run.final_state.position());
    }

    #[test]
    fn test_fast_outbound_body_exhausts_budget() {
        let params = AsteroidParameters::new(Vector3::new(50.0, 50.0, 50.0), 20000.0, 100.0)
            .unwrap()
            .with_angles(45.0, 54.7356)
            .unwrap();
        let run = earth_integrator().integrate(&params);
        assert_eq!(run.termination, Termination::BudgetExhausted);
        assert_eq!(run.steps_taken, run.step_budget);
        assert!(run.final_state.radius() > run.trajectory.initial_position.magnitude());
    }

    #[test]
    fn test_zero_budget_keeps_initial_state() {
        // 距離 < 速度 なので通過時間が0になる
        let params = AsteroidParameters::new(Vector3::new(30.0, 0.0, 0.0), 10.0, 100.0).unwrap();
        let run = earth_integrator().integrate(&params);
        assert_eq!(run.step_budget, 0);
        assert!(run.trajectory.is_empty());
        assert_eq!(run.final_state.position(), run.trajectory.initial_position);
        assert_eq!(run.termination, Termination::BudgetExhausted);
    }

    #[test]
    fn test_degenerate_cutover_keeps_last_sample() {
        let integrator = earth_integrator();
        let nan_state = StateVector::new(Vector3::new(f64::NAN, 0.0, 0.0), Vector3::ZERO);
        assert!(integrator.euler_cutover(&nan_state, 35.0).is_none());

        let inside = StateVector::new(Vector3::new(6000.0, 0.0, 0.0), Vector3::new(-1.0, 0.0, 0.0));
        let next = integrator.euler_cutover(&inside, 35.0).unwrap();
        assert!(next.is_finite());
    }

    #[test]
    fn test_integration_is_deterministic() {
        let params = AsteroidParameters::new(Vector3::new(2.0, 2.0, 2.0), 20000.0, 500.0)
            .unwrap()
            .with_angles(120.0, 120.0)
            .unwrap();
        let a = earth_integrator().integrate(&params);
        let b = earth_integrator().integrate(&params);
        assert_eq!(a, b);
    }
}
