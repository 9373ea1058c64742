//! 姿态状态
//!
//! RigPose 汇总躯干累计变换、行走方向、所有关节状态与行走循环标志。
//! 只有 Rig 的旋转/移动/注视入口会修改它。

mod joint;

pub use joint::{JointAxes, JointId, JointState, JOINT_COUNT};

use glam::{Mat4, Vec3};

use crate::config::RigConfig;
use crate::math::wrap_angle;
use crate::skeleton::Side;

/// 角色姿态
#[derive(Clone, Debug, PartialEq)]
pub struct RigPose {
    /// 躯干累计变换（移动与转向，不含初始变换）
    pub torso_matrix: Mat4,
    /// 躯干累计偏航角，保持在 (-π, π]
    pub torso_angle: f32,
    /// 当前行走方向（单位向量，随躯干偏航旋转）
    pub walk_direction: Vec3,
    joints: [JointState; JOINT_COUNT],
    /// 是否处于行走动画中
    pub in_walk_animation: bool,
    /// 是否为行走的第一步
    pub is_first_step: bool,
}

impl RigPose {
    pub fn new(config: &RigConfig) -> Self {
        let mut pose = Self {
            torso_matrix: Mat4::IDENTITY,
            torso_angle: 0.0,
            walk_direction: Vec3::Z,
            joints: JointId::ALL.map(|id| JointState::new(id, config)),
            in_walk_animation: true,
            is_first_step: true,
        };
        pose.reset_gait();
        pose
    }

    #[inline]
    pub fn joint(&self, id: JointId) -> &JointState {
        &self.joints[id.index()]
    }

    #[inline]
    pub fn joint_mut(&mut self, id: JointId) -> &mut JointState {
        &mut self.joints[id.index()]
    }

    pub fn joints(&self) -> &[JointState] {
        &self.joints
    }

    /// 腿部回到标准起步姿态：右大腿抬起，其余放平
    pub fn reset_gait(&mut self) {
        for side in [Side::Left, Side::Right] {
            self.joint_mut(JointId::thigh(side)).reset();
            self.joint_mut(JointId::leg(side)).reset();
        }
        self.joint_mut(JointId::ThighRight).rising = true;
        self.in_walk_animation = true;
        self.is_first_step = true;
    }

    /// 累加躯干偏航并折回 (-π, π]
    pub(crate) fn accumulate_yaw(&mut self, delta: f32) {
        self.torso_angle = wrap_angle(self.torso_angle + delta);
    }
}
