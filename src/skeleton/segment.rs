//! 段 - 角色的单个刚体部件
//!
//! 静态数据（尺寸、初始变换、缩放矩阵、支点）在构建时计算一次；
//! 动态数据（关节旋转、绝对变换）随姿态更新。

use std::fmt;

use glam::{Mat4, Vec3};

use crate::config::RigConfig;
use crate::math::{self, compose, invert, scaling, translation};
use crate::render::{Primitive, Renderable};

use super::hierarchy::{SegmentId, Side};

/// 段的逻辑尺寸
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Extent {
    pub height: f32,
    pub radius: f32,
}

/// 段的静态描述
#[derive(Clone, Copy, Debug)]
pub struct SegmentSpec {
    pub extent: Extent,
    pub primitive: Primitive,
    /// 相对父段局部原点的位置
    pub init_transform: Mat4,
    /// 把单位几何体拉伸到逻辑尺寸
    pub rescale: Mat4,
    /// 关节支点（段局部坐标）
    pub pivot: Vec3,
}

impl SegmentSpec {
    /// 按配置计算段的静态描述
    pub fn for_segment(id: SegmentId, config: &RigConfig) -> Self {
        let c = config;
        match id {
            SegmentId::Torso => Self {
                extent: Extent { height: c.torso_height, radius: c.torso_radius },
                primitive: Primitive::Cuboid {
                    width: 2.0 * c.torso_radius,
                    height: c.torso_height,
                    depth: c.torso_radius,
                },
                init_transform: translation(0.0, c.standing_height(), 0.0),
                rescale: Mat4::IDENTITY,
                pivot: Vec3::ZERO,
            },
            SegmentId::Head => Self {
                extent: Extent { height: c.head_radius, radius: c.head_radius },
                primitive: Primitive::Cuboid {
                    width: 2.0 * c.head_radius,
                    height: c.head_radius,
                    depth: c.head_radius,
                },
                init_transform: translation(0.0, c.torso_height / 2.0 + c.head_radius / 2.0, 0.0),
                rescale: Mat4::IDENTITY,
                // 绕头底部（颈部）旋转
                pivot: Vec3::new(0.0, -c.head_radius / 2.0, 0.0),
            },
            SegmentId::EyeLeft | SegmentId::EyeRight => {
                let sign = side_sign(id);
                let offset = c.head_radius / 2.0;
                Self {
                    extent: Extent { height: c.eye_radius, radius: c.eye_radius },
                    primitive: Primitive::UnitSphere,
                    init_transform: translation(sign * offset, 0.0, offset),
                    rescale: scaling(c.eye_radius, c.eye_radius, c.eye_radius),
                    pivot: Vec3::ZERO,
                }
            }
            SegmentId::ThighLeft | SegmentId::ThighRight => {
                let sign = side_sign(id);
                Self {
                    extent: Extent { height: c.thigh_height, radius: c.thigh_radius },
                    primitive: Primitive::UnitSphere,
                    init_transform: translation(
                        sign * c.torso_radius / 2.0,
                        -c.torso_height / 2.0 - c.thigh_height / 2.0,
                        0.0,
                    ),
                    rescale: scaling(c.thigh_radius, c.thigh_height / 2.0, c.thigh_radius),
                    // 髋关节在大腿顶端
                    pivot: Vec3::new(0.0, c.thigh_height / 2.0, 0.0),
                }
            }
            SegmentId::LegLeft | SegmentId::LegRight => Self {
                extent: Extent { height: c.leg_height, radius: c.leg_radius },
                primitive: Primitive::UnitSphere,
                init_transform: translation(0.0, -c.thigh_height / 2.0 - c.leg_height / 2.0, 0.0),
                rescale: scaling(c.leg_radius, c.leg_height / 2.0, c.leg_radius),
                // 膝关节在小腿顶端
                pivot: Vec3::new(0.0, c.leg_height / 2.0, 0.0),
            },
            SegmentId::ArmLeft | SegmentId::ArmRight => {
                let sign = side_sign(id);
                Self {
                    extent: Extent { height: c.arm_height, radius: c.arm_radius },
                    primitive: Primitive::UnitSphere,
                    init_transform: translation(
                        sign * (c.torso_radius + c.arm_height),
                        3.0 / 4.0 * c.torso_height / 2.0,
                        0.0,
                    ),
                    rescale: scaling(c.arm_height, c.arm_radius, c.arm_radius),
                    // 肩关节在靠近躯干的一端
                    pivot: Vec3::new(-sign * c.arm_height, 0.0, 0.0),
                }
            }
            SegmentId::ForearmLeft | SegmentId::ForearmRight => {
                let sign = side_sign(id);
                Self {
                    extent: Extent { height: c.forearm_height, radius: c.forearm_radius },
                    primitive: Primitive::UnitSphere,
                    init_transform: translation(sign * (c.arm_height + c.forearm_height), 0.0, 0.0),
                    rescale: scaling(c.forearm_height, c.forearm_radius, c.forearm_radius),
                    pivot: Vec3::new(-sign * c.forearm_height, 0.0, 0.0),
                }
            }
        }
    }
}

fn side_sign(id: SegmentId) -> f32 {
    id.side().map(Side::sign).unwrap_or(0.0)
}

/// 段
///
/// 绝对变换：local_to_world = parent_frame · init · local_rotation · rescale
/// 传给子段的帧去掉了本段的缩放：frame_to_world = local_to_world · rescale⁻¹
pub struct Segment {
    // ========================================
    // 静态数据（构建后不变）
    // ========================================

    pub id: SegmentId,
    pub extent: Extent,
    pub primitive: Primitive,
    pub init_transform: Mat4,
    pub rescale: Mat4,
    pub rescale_inverse: Mat4,
    pub pivot: Vec3,

    // ========================================
    // 动态数据
    // ========================================

    /// 关节旋转（绕支点）
    pub(crate) local_rotation: Mat4,

    /// 绝对变换（含缩放，交给渲染器）
    pub(crate) local_to_world: Mat4,

    /// 不含本段缩放的绝对变换（子段的父帧）
    pub(crate) frame_to_world: Mat4,

    /// 可渲染句柄（段独占）
    handle: Box<dyn Renderable>,
}

impl Segment {
    pub fn new(id: SegmentId, spec: SegmentSpec, handle: Box<dyn Renderable>) -> Self {
        Self {
            id,
            extent: spec.extent,
            primitive: spec.primitive,
            init_transform: spec.init_transform,
            rescale: spec.rescale,
            rescale_inverse: invert(spec.rescale),
            pivot: spec.pivot,
            local_rotation: Mat4::IDENTITY,
            local_to_world: Mat4::IDENTITY,
            frame_to_world: Mat4::IDENTITY,
            handle,
        }
    }

    // ========================================
    // 访问器
    // ========================================

    /// 绝对变换（含缩放）
    #[inline]
    pub fn world_transform(&self) -> Mat4 {
        self.local_to_world
    }

    /// 不含本段缩放的绝对变换
    #[inline]
    pub fn frame_transform(&self) -> Mat4 {
        self.frame_to_world
    }

    /// 关节旋转矩阵
    #[inline]
    pub fn local_rotation(&self) -> Mat4 {
        self.local_rotation
    }

    /// 段中心的世界位置
    #[inline]
    pub fn position(&self) -> Vec3 {
        self.local_to_world.col(3).truncate()
    }

    /// 把段局部坐标（缩放前的单位几何体空间）映射到世界
    #[inline]
    pub fn to_world(&self, local: Vec3) -> Vec3 {
        math::transform_point(self.local_to_world, local)
    }

    // ========================================
    // 变换计算
    // ========================================

    /// 按当前关节角重建绕支点的旋转
    pub(crate) fn set_joint_rotation(&mut self, rotation: Mat4) {
        self.local_rotation = math::pivot_rotation(self.pivot, rotation);
    }

    /// 从父帧计算绝对变换，返回传给子段的帧
    pub(crate) fn update(&mut self, parent_frame: Mat4) -> Mat4 {
        let world = compose(
            compose(compose(parent_frame, self.init_transform), self.local_rotation),
            self.rescale,
        );
        self.local_to_world = world;
        self.frame_to_world = compose(world, self.rescale_inverse);
        self.frame_to_world
    }

    /// 把当前绝对变换推送给渲染句柄
    pub(crate) fn push_transform(&mut self) {
        self.handle.set_transform(self.local_to_world);
    }
}

impl fmt::Debug for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Segment")
            .field("id", &self.id)
            .field("extent", &self.extent)
            .field("primitive", &self.primitive)
            .field("local_to_world", &self.local_to_world)
            .finish_non_exhaustive()
    }
}
