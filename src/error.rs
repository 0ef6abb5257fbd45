//! # Error モジュール
//!
//! 衝突シミュレーションで発生するエラー型を定義します。

use crate::scenario::ScenarioError;
use thiserror::Error;

/// シミュレーションエラー
#[derive(Debug, Error)]
pub enum SimError {
    /// 入力値の欠落・非数値・範囲外（速度ゼロを含む）
    #[error("入力が不完全です: {field} ({reason})")]
    InvalidInput { field: &'static str, reason: String },

    /// 幾何学的に処理できない状態（原点にある位置の地表投影など）
    #[error("幾何学的に不正な状態: {0}")]
    DegenerateGeometry(String),

    /// シナリオファイルの読み込み・検証エラー
    #[error(transparent)]
    Scenario(#[from] ScenarioError),
}

impl SimError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        SimError::InvalidInput {
            field,
            reason: reason.into(),
        }
    }
}

pub type SimResult<T> = Result<T, SimError>;
