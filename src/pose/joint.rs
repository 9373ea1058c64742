//! 关节状态
//!
//! 每个可旋转关节保存各轴当前角度、对称夹紧上限以及行走循环的方向标志。

use bitflags::bitflags;
use glam::{Mat4, Vec3};

use crate::config::RigConfig;
use crate::math::{correct_angle, rotation, Axis};
use crate::skeleton::{SegmentId, Side};

bitflags! {
    /// 关节可旋转的轴
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct JointAxes: u8 {
        const X = 1 << 0;
        const Y = 1 << 1;
        const Z = 1 << 2;
    }
}

impl JointAxes {
    /// 是否允许绕 `axis` 旋转
    pub fn allows(self, axis: Axis) -> bool {
        match axis {
            Axis::X => self.contains(JointAxes::X),
            Axis::Y => self.contains(JointAxes::Y),
            Axis::Z => self.contains(JointAxes::Z),
            Axis::Identity => false,
        }
    }
}

/// 关节标识
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum JointId {
    Head,
    ArmLeft,
    ArmRight,
    ForearmLeft,
    ForearmRight,
    ThighLeft,
    ThighRight,
    LegLeft,
    LegRight,
}

pub const JOINT_COUNT: usize = 9;

impl JointId {
    pub const ALL: [JointId; JOINT_COUNT] = [
        JointId::Head,
        JointId::ArmLeft,
        JointId::ArmRight,
        JointId::ForearmLeft,
        JointId::ForearmRight,
        JointId::ThighLeft,
        JointId::ThighRight,
        JointId::LegLeft,
        JointId::LegRight,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// 关节驱动的段（旋转后从该段开始传播）
    pub fn segment(self) -> SegmentId {
        match self {
            JointId::Head => SegmentId::Head,
            JointId::ArmLeft => SegmentId::ArmLeft,
            JointId::ArmRight => SegmentId::ArmRight,
            JointId::ForearmLeft => SegmentId::ForearmLeft,
            JointId::ForearmRight => SegmentId::ForearmRight,
            JointId::ThighLeft => SegmentId::ThighLeft,
            JointId::ThighRight => SegmentId::ThighRight,
            JointId::LegLeft => SegmentId::LegLeft,
            JointId::LegRight => SegmentId::LegRight,
        }
    }

    /// 可旋转的轴
    pub fn axes(self) -> JointAxes {
        match self {
            JointId::Head => JointAxes::X | JointAxes::Y,
            JointId::ArmLeft | JointId::ArmRight => JointAxes::Y | JointAxes::Z,
            JointId::ForearmLeft | JointId::ForearmRight => JointAxes::Z,
            JointId::ThighLeft | JointId::ThighRight | JointId::LegLeft | JointId::LegRight => {
                JointAxes::X
            }
        }
    }

    /// 对称夹紧上限，手臂不夹紧
    pub fn limit(self, config: &RigConfig) -> Option<f32> {
        match self {
            JointId::Head => Some(config.head_angle_max),
            JointId::ThighLeft | JointId::ThighRight => Some(config.thigh_angle_max),
            JointId::LegLeft | JointId::LegRight => Some(config.leg_angle_max),
            _ => None,
        }
    }

    pub fn thigh(side: Side) -> Self {
        match side {
            Side::Left => JointId::ThighLeft,
            Side::Right => JointId::ThighRight,
        }
    }

    pub fn leg(side: Side) -> Self {
        match side {
            Side::Left => JointId::LegLeft,
            Side::Right => JointId::LegRight,
        }
    }

    pub fn arm(side: Side) -> Self {
        match side {
            Side::Left => JointId::ArmLeft,
            Side::Right => JointId::ArmRight,
        }
    }

    pub fn forearm(side: Side) -> Self {
        match side {
            Side::Left => JointId::ForearmLeft,
            Side::Right => JointId::ForearmRight,
        }
    }
}

/// 关节状态
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct JointState {
    pub id: JointId,
    /// 各轴当前角度（弧度）
    angles: Vec3,
    pub axes: JointAxes,
    /// 对称夹紧上限
    pub limit: Option<f32>,
    /// 行走循环中是否正在抬起
    pub rising: bool,
}

impl JointState {
    pub fn new(id: JointId, config: &RigConfig) -> Self {
        Self {
            id,
            angles: Vec3::ZERO,
            axes: id.axes(),
            limit: id.limit(config),
            rising: false,
        }
    }

    /// 主轴角度：有 X 轴时取 X，否则取首个可用轴
    #[inline]
    pub fn angle(&self) -> f32 {
        if self.axes.contains(JointAxes::X) {
            self.angles.x
        } else if self.axes.contains(JointAxes::Y) {
            self.angles.y
        } else {
            self.angles.z
        }
    }

    /// 指定轴的角度
    #[inline]
    pub fn angle_on(&self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.angles.x,
            Axis::Y => self.angles.y,
            Axis::Z => self.angles.z,
            Axis::Identity => 0.0,
        }
    }

    #[inline]
    pub fn angles(&self) -> Vec3 {
        self.angles
    }

    /// 累加角度：量化到两位小数后夹紧
    ///
    /// 不允许的轴不改变角度，返回 false
    pub fn rotate(&mut self, delta: f32, axis: Axis) -> bool {
        if !self.axes.allows(axis) {
            return false;
        }
        let current = self.angle_on(axis);
        self.write(axis, current + delta);
        true
    }

    /// 直接设定角度（同样量化并夹紧）
    pub fn set_angle(&mut self, axis: Axis, angle: f32) -> bool {
        if !self.axes.allows(axis) {
            return false;
        }
        self.write(axis, angle);
        true
    }

    fn write(&mut self, axis: Axis, angle: f32) {
        let mut a = correct_angle(angle);
        if let Some(max) = self.limit {
            a = a.clamp(-max, max);
        }
        match axis {
            Axis::X => self.angles.x = a,
            Axis::Y => self.angles.y = a,
            Axis::Z => self.angles.z = a,
            Axis::Identity => {}
        }
    }

    /// 清零角度与标志
    pub fn reset(&mut self) {
        self.angles = Vec3::ZERO;
        self.rising = false;
    }

    /// 关节旋转矩阵（未含支点平移）
    ///
    /// 头部先 X 后 Y，手臂先 Y 后 Z
    pub fn rotation_matrix(&self) -> Mat4 {
        let mut m = Mat4::IDENTITY;
        for axis in [Axis::X, Axis::Y, Axis::Z] {
            if self.axes.allows(axis) {
                m = rotation(self.angle_on(axis), axis) * m;
            }
        }
        m
    }
}
