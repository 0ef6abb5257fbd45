//! # impactsim
//!
//! 惑星重力下での小惑星の軌道推定と、衝突時のエネルギー評価を行うライブラリです。
//!
//! - [`integrator`]: 逆二乗重力下の軌道積分（RK4）と地表到達検知
//! - [`outcome`]: 衝突判定と地理座標への投影
//! - [`energetics`]: 運動エネルギー・被害半径・深刻度の簡易モデル
//! - [`mitigation`]: 大きさと距離による防衛戦略の選定
//! - [`simulation`]: 上記をまとめて1回の実行を行うエンジン
//! - [`scenario`]: YAMLシナリオファイル

pub mod energetics;
pub mod error;
pub mod integrator;
pub mod logging;
pub mod mitigation;
pub mod models;
pub mod outcome;
pub mod report;
pub mod scenario;
pub mod simulation;

pub use error::{SimError, SimResult};
pub use report::{ImpactReport, SimulationOutcome};
pub use simulation::SimulationEngine;
