//! 角色上下文
//!
//! Rig 独占段集合与姿态状态，所有姿态修改都经过这里的入口，
//! 保证量化、夹紧与传播不会被绕过。

use glam::{Mat4, Vec3};

use crate::config::RigConfig;
use crate::math::{self, Axis};
use crate::pose::{JointId, JointState, RigPose};
use crate::render::{NullRenderable, Primitive, Renderable};
use crate::Result;

use super::hierarchy::{SegmentId, Side};
use super::segment::{Segment, SegmentSpec};

/// 角色
#[derive(Debug)]
pub struct Rig {
    config: RigConfig,
    /// 按 `SegmentId::ALL` 顺序排列
    pub(crate) segments: Vec<Segment>,
    pub(crate) pose: RigPose,
}

impl Rig {
    /// 创建角色
    ///
    /// `factory` 为每个段创建渲染句柄，参数为段标识与应构建的几何体
    pub fn new<F>(config: RigConfig, mut factory: F) -> Result<Self>
    where
        F: FnMut(SegmentId, Primitive) -> Box<dyn Renderable>,
    {
        config.validate()?;

        let segments = SegmentId::ALL
            .iter()
            .map(|&id| {
                let spec = SegmentSpec::for_segment(id, &config);
                Segment::new(id, spec, factory(id, spec.primitive))
            })
            .collect();

        let pose = RigPose::new(&config);
        let mut rig = Self { config, segments, pose };

        for joint in JointId::ALL {
            rig.rebuild_joint(joint);
        }
        rig.propagate_all();

        log::info!(
            "[Rig] 角色创建: 段数={}, 站立高度={}",
            rig.segments.len(),
            rig.config.standing_height()
        );

        Ok(rig)
    }

    /// 不连接渲染器的角色
    pub fn headless(config: RigConfig) -> Result<Self> {
        Self::new(config, |_, _| Box::new(NullRenderable))
    }

    // ========================================
    // 访问器
    // ========================================

    #[inline]
    pub fn config(&self) -> &RigConfig {
        &self.config
    }

    #[inline]
    pub fn pose(&self) -> &RigPose {
        &self.pose
    }

    #[inline]
    pub fn segment(&self, id: SegmentId) -> &Segment {
        &self.segments[id.index()]
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// 段的绝对变换（含缩放）
    #[inline]
    pub fn world_transform(&self, id: SegmentId) -> Mat4 {
        self.segments[id.index()].world_transform()
    }

    #[inline]
    pub fn joint(&self, id: JointId) -> &JointState {
        self.pose.joint(id)
    }

    /// 躯干偏航角 (-π, π]
    #[inline]
    pub fn torso_angle(&self) -> f32 {
        self.pose.torso_angle
    }

    #[inline]
    pub fn walk_direction(&self) -> Vec3 {
        self.pose.walk_direction
    }

    #[inline]
    pub fn in_walk_animation(&self) -> bool {
        self.pose.in_walk_animation
    }

    #[inline]
    pub fn is_first_step(&self) -> bool {
        self.pose.is_first_step
    }

    // ========================================
    // 躯干
    // ========================================

    /// 绕 Y 轴转动躯干
    ///
    /// 行走方向随之旋转，偏航角折回 (-π, π]，整个角色重算
    pub fn rotate_torso(&mut self, angle: f32) {
        self.turn_torso(angle);
        self.propagate_all();
    }

    /// 沿行走方向移动躯干并推进行走循环
    ///
    /// 每个段在本帧只推送一次变换（由地面接触的最终传播完成）
    pub fn move_torso(&mut self, speed: f32) {
        let step = self.pose.walk_direction * speed;
        self.pose.torso_matrix = math::compose(
            math::translation(step.x, step.y, step.z),
            self.pose.torso_matrix,
        );

        self.advance_walk_cycle(speed);
        self.stand_on_floor();
    }

    /// 只更新躯干偏航状态，不传播
    pub(crate) fn turn_torso(&mut self, angle: f32) {
        self.pose.torso_matrix = math::compose(self.pose.torso_matrix, math::rotation(angle, Axis::Y));
        self.pose.walk_direction = math::rotate_vec3(self.pose.walk_direction, angle, Axis::Y);
        self.pose.accumulate_yaw(angle);
    }

    // ========================================
    // 关节
    // ========================================

    /// 转动任意关节
    ///
    /// 手动摆动大腿或小腿会中断行走动画，下次移动时腿部重置
    pub fn rotate_joint(&mut self, joint: JointId, delta: f32, axis: Axis) {
        if matches!(
            joint,
            JointId::ThighLeft | JointId::ThighRight | JointId::LegLeft | JointId::LegRight
        ) {
            self.pose.in_walk_animation = false;
        }
        self.turn_joint(joint, delta, axis);
    }

    /// 头部绕 X（俯仰）或 Y（偏航）转动
    pub fn rotate_head(&mut self, angle: f32, axis: Axis) {
        self.rotate_joint(JointId::Head, angle, axis);
    }

    /// 上臂绕 Y 或 Z 转动
    pub fn rotate_arm(&mut self, side: Side, angle: f32, axis: Axis) {
        self.rotate_joint(JointId::arm(side), angle, axis);
    }

    /// 前臂绕 Z 转动
    pub fn rotate_forearm(&mut self, side: Side, angle: f32) {
        self.rotate_joint(JointId::forearm(side), angle, Axis::Z);
    }

    /// 大腿绕 X 转动
    pub fn rotate_thigh(&mut self, side: Side, angle: f32) {
        self.rotate_joint(JointId::thigh(side), angle, Axis::X);
    }

    /// 小腿绕 X 转动
    pub fn rotate_leg(&mut self, side: Side, angle: f32) {
        self.rotate_joint(JointId::leg(side), angle, Axis::X);
    }

    /// 累加关节角、重建旋转并重算该关节子树（不影响行走状态）
    pub(crate) fn turn_joint(&mut self, joint: JointId, delta: f32, axis: Axis) {
        self.pose_joint(joint, delta, axis);
        self.propagate_from(joint.segment());
    }

    /// 累加关节角并重建旋转，不传播
    pub(crate) fn pose_joint(&mut self, joint: JointId, delta: f32, axis: Axis) {
        self.pose.joint_mut(joint).rotate(delta, axis);
        self.rebuild_joint(joint);
    }

    /// 直接设定关节角（量化并夹紧），不传播
    pub(crate) fn snap_joint(&mut self, joint: JointId, axis: Axis, angle: f32) {
        self.pose.joint_mut(joint).set_angle(axis, angle);
        self.rebuild_joint(joint);
    }

    /// 按关节当前角度重建段的局部旋转
    pub(crate) fn rebuild_joint(&mut self, joint: JointId) {
        let rotation = self.pose.joint(joint).rotation_matrix();
        self.segments[joint.segment().index()].set_joint_rotation(rotation);
    }
}
