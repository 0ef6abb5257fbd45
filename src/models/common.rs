use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

/// 惑星中心デカルト座標系の3次元ベクトル
///
/// 位置（km）と速度（km/s）の両方に使用します。
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub const ZERO: Vector3 = Vector3 { x: 0.0, y: 0.0, z: 0.0 };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// ベクトルの長さ（原点からの距離）
    pub fn magnitude(&self) -> f64 {
        (self.x.powi(2) + self.y.powi(2) + self.z.powi(2)).sqrt()
    }

    /// 指定した長さにスケーリング
    ///
    /// 長さゼロのベクトルは方向が定まらないため`None`を返します。
    pub fn with_magnitude(&self, length: f64) -> Option<Self> {
        let mag = self.magnitude();
        if mag > 0.0 && mag.is_finite() {
            Some(*self * (length / mag))
        } else {
            None
        }
    }

    /// 球面座標からデカルト座標へ変換
    ///
    /// * `radius` - 動径（km）
    /// * `theta_deg` - XY平面内の角度（度）
    /// * `phi_deg` - Z軸からの極角（度）
    pub fn from_spherical(radius: f64, theta_deg: f64, phi_deg: f64) -> Self {
        let theta = math_utils::deg_to_rad(theta_deg);
        let phi = math_utils::deg_to_rad(phi_deg);
        Self::new(
            radius * theta.cos() * phi.sin(),
            radius * theta.sin() * phi.sin(),
            radius * phi.cos(),
        )
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Add for Vector3 {
    type Output = Self;

    fn add(self, other: Self) -> Self::Output {
        Self::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl Sub for Vector3 {
    type Output = Self;

    fn sub(self, other: Self) -> Self::Output {
        Self::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl Mul<f64> for Vector3 {
    type Output = Self;

    fn mul(self, scalar: f64) -> Self::Output {
        Self::new(self.x * scalar, self.y * scalar, self.z * scalar)
    }
}

/// 6要素の状態ベクトル（位置3成分 + 速度3成分）
///
/// 位置と速度は常に一組として更新され、片方だけが進むことはありません。
/// 加速度関数の戻り値（速度 + 加速度）も同じ形で表現します。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateVector {
    pub position: Vector3,
    pub velocity: Vector3,
}

impl StateVector {
    pub fn new(position: Vector3, velocity: Vector3) -> Self {
        Self { position, velocity }
    }

    /// 現在の動径（km）
    pub fn radius(&self) -> f64 {
        self.position.magnitude()
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.velocity.is_finite()
    }
}

impl Add for StateVector {
    type Output = Self;

    fn add(self, other: Self) -> Self::Output {
        Self::new(self.position + other.position, self.velocity + other.velocity)
    }
}

impl Mul<f64> for StateVector {
    type Output = Self;

    fn mul(self, scalar: f64) -> Self::Output {
        Self::new(self.position * scalar, self.velocity * scalar)
    }
}

/// 数学ユーティリティ関数
pub mod math_utils {
    /// 度をラジアンに変換
    pub fn deg_to_rad(degrees: f64) -> f64 {
        degrees * std::f64::consts::PI / 180.0
    }

    /// ラジアンを度に変換
    pub fn rad_to_deg(radians: f64) -> f64 {
        radians * 180.0 / std::f64::consts::PI
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_from_spherical_axes() {
        let p = Vector3::from_spherical(10.0, 0.0, 90.0);
        assert_relative_eq!(p.x, 10.0, epsilon = 1e-12);
        assert_relative_eq!(p.y, 0.0, epsilon = 1e-12);
        assert_relative_eq!(p.z, 0.0, epsilon = 1e-12);

        let p = Vector3::from_spherical(10.0, 37.0, 0.0);
        assert_relative_eq!(p.z, 10.0, epsilon = 1e-12);
        assert_relative_eq!(p.magnitude(), 10.0, epsilon = 1e-12);
    }

    #[test]
    fn test_with_magnitude() {
        let v = Vector3::new(3.0, 4.0, 0.0).with_magnitude(10.0).unwrap();
        assert_relative_eq!(v.x, 6.0, epsilon = 1e-12);
        assert_relative_eq!(v.y, 8.0, epsilon = 1e-12);
        assert!(Vector3::ZERO.with_magnitude(1.0).is_none());
    }

    #[test]
    fn test_state_vector_arithmetic() {
        let s = StateVector::new(Vector3::new(1.0, 2.0, 2.0), Vector3::new(1.0, 0.0, 0.0));
        let doubled = s + s * 1.0;
        assert_eq!(doubled.position, Vector3::new(2.0, 4.0, 4.0));
        assert_eq!(doubled.velocity, Vector3::new(2.0, 0.0, 0.0));
        assert_relative_eq!(s.radius(), 3.0);
    }
}
