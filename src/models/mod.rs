// 基本的なデータ型と数学ユーティリティ
pub mod common;

// 小惑星と中心天体のモデル
pub mod asteroid;
pub mod planet;

// 便利な re-export
pub use asteroid::{AsteroidParameters, AsteroidState, Composition, Structure};
pub use common::*;
pub use planet::PlanetModel;
