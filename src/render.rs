//! 渲染协作者接口
//!
//! 引擎只负责算出每个段的绝对变换，几何体构建与绘制由外部渲染器完成。

use glam::{Mat4, Quat, Vec3};

/// 段的可渲染句柄
pub trait Renderable {
    /// 接收新的绝对变换
    fn set_transform(&mut self, transform: Mat4);
}

/// 忽略所有更新的句柄
#[derive(Clone, Copy, Debug, Default)]
pub struct NullRenderable;

impl Renderable for NullRenderable {
    fn set_transform(&mut self, _transform: Mat4) {}
}

/// 渲染器应为段构建的基础几何体
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Primitive {
    /// 按真实尺寸构建的长方体（无需额外缩放）
    Cuboid { width: f32, height: f32, depth: f32 },
    /// 单位球，由段的缩放矩阵拉伸为椭球
    UnitSphere,
}

/// 段变换分解结果
#[derive(Clone, Copy, Debug)]
pub struct SegmentTransform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for SegmentTransform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl SegmentTransform {
    /// 转换为 4x4 矩阵
    #[inline]
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }

    /// 从矩阵分解
    #[inline]
    pub fn from_matrix(m: Mat4) -> Self {
        let (scale, rotation, translation) = m.to_scale_rotation_translation();
        Self { translation, rotation, scale }
    }
}
