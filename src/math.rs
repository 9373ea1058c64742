//! 齐次变换工具
//!
//! 所有函数都是纯函数，返回新的值。
//! 组合顺序：compose(a, b) = a · b，即 b 先作用于点。

use std::f32::consts::{PI, TAU};

use glam::{Mat4, Vec3};

/// 旋转轴
///
/// `Identity` 表示无效轴：旋转退化为单位矩阵，而不是报错
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
    Identity,
}

impl Axis {
    /// 从字符解析，未知字符得到 `Identity`
    pub fn from_char(c: char) -> Self {
        match c.to_ascii_lowercase() {
            'x' => Axis::X,
            'y' => Axis::Y,
            'z' => Axis::Z,
            _ => Axis::Identity,
        }
    }

    /// 轴向量（`Identity` 为零向量）
    #[inline]
    pub fn unit(self) -> Vec3 {
        match self {
            Axis::X => Vec3::X,
            Axis::Y => Vec3::Y,
            Axis::Z => Vec3::Z,
            Axis::Identity => Vec3::ZERO,
        }
    }
}

#[inline]
pub fn identity() -> Mat4 {
    Mat4::IDENTITY
}

#[inline]
pub fn translation(x: f32, y: f32, z: f32) -> Mat4 {
    Mat4::from_translation(Vec3::new(x, y, z))
}

/// 绕坐标轴旋转 `angle` 弧度
pub fn rotation(angle: f32, axis: Axis) -> Mat4 {
    match axis {
        Axis::X => Mat4::from_rotation_x(angle),
        Axis::Y => Mat4::from_rotation_y(angle),
        Axis::Z => Mat4::from_rotation_z(angle),
        Axis::Identity => Mat4::IDENTITY,
    }
}

/// 非均匀缩放
#[inline]
pub fn scaling(x: f32, y: f32, z: f32) -> Mat4 {
    Mat4::from_scale(Vec3::new(x, y, z))
}

#[inline]
pub fn compose(a: Mat4, b: Mat4) -> Mat4 {
    a * b
}

/// 求逆；奇异矩阵返回零矩阵
pub fn invert(m: Mat4) -> Mat4 {
    let det = m.determinant();
    if det == 0.0 || !det.is_finite() {
        Mat4::ZERO
    } else {
        m.inverse()
    }
}

/// 绕支点旋转：先把支点移到原点，旋转，再移回
///
/// 结果为 T(pivot) · R · T(-pivot)
#[inline]
pub fn pivot_rotation(pivot: Vec3, rotation: Mat4) -> Mat4 {
    Mat4::from_translation(pivot) * rotation * Mat4::from_translation(-pivot)
}

/// 旋转向量（无平移）
#[inline]
pub fn rotate_vec3(v: Vec3, angle: f32, axis: Axis) -> Vec3 {
    rotation(angle, axis).transform_vector3(v)
}

/// 把点映射到变换后的空间
#[inline]
pub fn transform_point(m: Mat4, p: Vec3) -> Vec3 {
    m.transform_point3(p)
}

/// 角度量化到两位小数
///
/// 行走循环用精确相等比较阈值（0.2, -0.4 ...），累加必须在每次更新后量化
#[inline]
pub fn correct_angle(angle: f32) -> f32 {
    (angle * 100.0).round() / 100.0
}

/// 把角度折回 (-π, π]
pub fn wrap_angle(angle: f32) -> f32 {
    let mut a = angle % TAU;
    if a > PI {
        a -= TAU;
    } else if a <= -PI {
        a += TAU;
    }
    a
}
