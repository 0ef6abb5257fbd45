//! # Simulation モジュール
//!
//! 小惑星衝突シミュレーションの実行エンジンを提供します。
//!
//! 1回の実行は入出力を伴わない純粋な計算で、状態はすべて呼び出しの内部に
//! 閉じています。複数の実行を同時に行っても調整は不要です。
//!
//! ## 処理順序
//!
//! 1. **入力検証**: 速度ゼロや欠落値を積分前に拒否
//! 2. **軌道積分**: 時間刻みとステップ数を決定し、RK4で軌道を計算
//! 3. **結果分類**: 最終状態から Impact / NearMiss / Miss を判定
//! 4. **地理座標**: 最終位置を地表へ投影し、自転補正を適用
//! 5. **エネルギー評価**: 質量と接近速度から運動エネルギーと被害半径を算出
//! 6. **戦略選定**: 大きさと初期距離から防衛戦略を選定
//!
//! ## 使用例
//!
//! ```no_run
//! use impactsim::scenario::ScenarioConfig;
//! use impactsim::simulation::SimulationEngine;
//!
//! let config = ScenarioConfig::from_file("scenarios/default_impact.yaml")?;
//! let params = config.asteroid.to_parameters()?;
//! let engine = SimulationEngine::new(config.planet, 1);
//! let outcome = engine.run(&params)?;
//! println!("{}", outcome.report);
//! # Ok::<(), impactsim::SimError>(())
//! ```

use crate::energetics::ImpactEnergetics;
use crate::error::SimResult;
use crate::integrator::TrajectoryIntegrator;
use crate::mitigation::MitigationRecommendation;
use crate::models::{AsteroidParameters, PlanetModel};
use crate::outcome::{GeoPoint, Outcome};
use crate::report::{ImpactReport, SimulationOutcome};
use tracing::{debug, info};

pub struct SimulationEngine {
    pub planet: PlanetModel,
    pub verbose_level: u8,
}

impl SimulationEngine {
    pub fn new(planet: PlanetModel, verbose_level: u8) -> Self {
        Self {
            planet,
            verbose_level,
        }
    }

    /// 1回のシミュレーションを実行
    pub fn run(&self, params: &AsteroidParameters) -> SimResult<SimulationOutcome> {
        params.validate()?;

        if self.verbose_level > 0 {
            info!("=== シミュレーション実行開始 ===");
            info!(
                "  接近速度: {:.3}km/s, 初期距離: {:.1}km, 直径: {:.1}m",
                params.speed_km_s(),
                params.distance_km,
                params.diameter_m
            );
            info!("  組成: {}, 構造: {}", params.composition, params.structure);
        }

        let integrator = TrajectoryIntegrator::new(self.planet).with_verbose_level(self.verbose_level);
        let run = integrator.integrate(params);

        let outcome = Outcome::for_run(&run, &self.planet);
        let final_position = run.final_state.position();
        let impact_site = GeoPoint::project(
            final_position,
            &self.planet,
            run.trajectory.step_size_s,
            params.clock_time_s,
        )?;

        if self.verbose_level > 1 {
            debug!(
                "最終位置: ({:.1}, {:.1}, {:.1}) 高度 {:.1}km",
                final_position.x,
                final_position.y,
                final_position.z,
                self.planet.altitude(run.final_state.radius())
            );
        }

        let energetics = ImpactEnergetics::evaluate(params);
        let mitigation = MitigationRecommendation::recommend(params);

        info!(
            "=== シミュレーション完了 === 結果: {:?}, ステップ数: {}/{}, 経過時間: {:.1}秒",
            outcome,
            run.steps_taken,
            run.step_budget,
            run.trajectory.elapsed_s()
        );
        if self.verbose_level > 0 {
            info!(
                "  運動エネルギー: {:.2e}J, 被害半径: {:.2}km, 衝突地点: {}",
                energetics.kinetic_energy_j,
                energetics.damage_radius_km,
                impact_site.bearing()
            );
        }

        let report = ImpactReport {
            final_position,
            impact_site,
            outcome,
            termination: run.termination,
            energetics,
            mitigation,
        };

        Ok(SimulationOutcome {
            trajectory: run.trajectory,
            report,
        })
    }
}
