//! 行走循环 - 程序化步态状态机
//!
//! 每次躯干前后移动推进一次：
//! - 首步：右腿先抬，左腿跟随，右大腿到 -0.5 后结束
//! - 稳态：大腿与小腿各自按 (抬起/落下, 角度区间) 查表得到下一状态、吸附值与速率
//!
//! 所有阈值都是对量化角度的精确比较，依赖关节角两位小数的量化。
//! 这里只改关节状态，传播由随后的地面接触统一完成。

use crate::math::Axis;
use crate::pose::JointId;
use crate::skeleton::{Rig, Side};

// ============================================================================
// 阈值
// ============================================================================

/// 大腿向前抬起的极限
const THIGH_FRONT: f32 = -0.6;
/// 大腿向后摆的极限
const THIGH_BACK: f32 = 0.3;
/// 小腿抬起途中的停顿角
const KNEE_HOLD: f32 = 0.2;
/// 小腿离开停顿角时对应的大腿角
const KNEE_SYNC_THIGH: f32 = -0.4;
/// 小腿快速弯曲区间上界
const KNEE_FAST: f32 = 0.5;
/// 小腿最大弯曲
const KNEE_MAX: f32 = 0.8;

/// 首步结束时右大腿的角度
const FIRST_STEP_THIGH: f32 = -0.5;
/// 首步右小腿弯曲上限
const FIRST_STEP_KNEE: f32 = 0.4;
/// 首步左小腿开始弯曲时左大腿的角度
const FIRST_STEP_LIFT: f32 = 0.1;

/// 行走方向
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    /// 速度为正时向前
    pub fn of(speed: f32) -> Self {
        if speed > 0.0 {
            Direction::Forward
        } else {
            Direction::Backward
        }
    }

    /// 步幅系数：后退时步态与前进相同，速率取反后抵消速度符号
    pub fn factor(self) -> f32 {
        match self {
            Direction::Forward => 1.0,
            Direction::Backward => -1.0,
        }
    }
}

/// 单个关节的一次状态转移
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transition {
    /// 转移后的 rising 标志
    pub next_rising: bool,
    /// 转动前先把角度吸附到该值
    pub snap: Option<f32>,
    /// 角度增量 = rate * 步幅
    pub rate: f32,
}

impl Transition {
    const fn keep(rising: bool, rate: f32) -> Self {
        Self { next_rising: rising, snap: None, rate }
    }

    const fn flip(next_rising: bool, snap: f32, rate: f32) -> Self {
        Self { next_rising, snap: Some(snap), rate }
    }
}

/// 大腿转移表
pub fn thigh_transition(rising: bool, angle: f32) -> Transition {
    match (rising, angle) {
        (true, a) if a > THIGH_FRONT => Transition::keep(true, -1.0),
        (true, _) => Transition::flip(false, THIGH_FRONT, 1.0),
        (false, a) if a < THIGH_BACK => Transition::keep(false, 1.0),
        (false, _) => Transition::flip(true, THIGH_BACK, -1.0),
    }
}

/// 小腿转移表，`thigh` 为同侧大腿本帧更新后的角度
pub fn leg_transition(rising: bool, angle: f32, thigh: f32) -> Transition {
    match (rising, angle) {
        // 抬起：伸直，途中在 0.2 处等大腿
        (true, a) if a > KNEE_HOLD => Transition::keep(true, -1.0),
        (true, a) if a == KNEE_HOLD && thigh == KNEE_SYNC_THIGH => Transition::keep(true, 1.0),
        (true, a) if a == KNEE_HOLD => Transition::keep(true, 0.0),
        (true, a) if a > 0.0 => Transition::keep(true, -1.0),
        (true, _) => Transition::flip(false, 0.0, 0.0),
        // 落下：先慢后快再慢地弯曲
        (false, a) if a == 0.0 && thigh == 0.0 => Transition::keep(false, 0.5),
        (false, a) if a == 0.0 => Transition::keep(false, 0.0),
        (false, a) if a < KNEE_FAST => Transition::keep(false, 1.5),
        (false, a) if a < KNEE_MAX => Transition::keep(false, 1.0),
        (false, _) => Transition::flip(true, KNEE_MAX, -1.0),
    }
}

impl Rig {
    /// 推进一次行走循环
    pub(crate) fn advance_walk_cycle(&mut self, speed: f32) {
        if !self.pose.in_walk_animation {
            self.restart_gait();
        }

        let direction = Direction::of(speed);
        let stride = direction.factor() * speed;

        if self.pose.is_first_step {
            self.first_step(stride);
        } else {
            self.steady_step(stride);
        }
    }

    /// 腿部回到起步姿态
    fn restart_gait(&mut self) {
        self.pose.reset_gait();
        for side in [Side::Left, Side::Right] {
            self.rebuild_joint(JointId::thigh(side));
            self.rebuild_joint(JointId::leg(side));
        }
        log::debug!("[Walk] 重新进入行走，腿部重置");
    }

    fn first_step(&mut self, stride: f32) {
        if self.joint(JointId::ThighRight).angle() <= FIRST_STEP_THIGH {
            self.snap_joint(JointId::ThighRight, Axis::X, FIRST_STEP_THIGH);
            self.pose.is_first_step = false;
            log::debug!("[Walk] 首步结束");
        }

        self.pose_joint(JointId::ThighRight, -stride, Axis::X);
        self.pose_joint(JointId::ThighLeft, 0.5 * stride, Axis::X);

        if self.joint(JointId::LegRight).rising {
            self.pose_joint(JointId::LegRight, -stride, Axis::X);
        } else {
            self.pose_joint(JointId::LegRight, stride, Axis::X);
            if self.joint(JointId::LegRight).angle() >= FIRST_STEP_KNEE {
                self.snap_joint(JointId::LegRight, Axis::X, FIRST_STEP_KNEE);
                self.pose.joint_mut(JointId::LegRight).rising = true;
            }
        }

        if self.joint(JointId::ThighLeft).angle() >= FIRST_STEP_LIFT {
            self.pose_joint(JointId::LegLeft, stride, Axis::X);
        }
    }

    fn steady_step(&mut self, stride: f32) {
        for side in [Side::Left, Side::Right] {
            let joint = JointId::thigh(side);
            let state = self.joint(joint);
            let transition = thigh_transition(state.rising, state.angle());
            self.apply_transition(joint, transition, stride);
        }

        for side in [Side::Left, Side::Right] {
            let joint = JointId::leg(side);
            let thigh = self.joint(JointId::thigh(side)).angle();
            let state = self.joint(joint);
            let transition = leg_transition(state.rising, state.angle(), thigh);
            self.apply_transition(joint, transition, stride);
        }
    }

    fn apply_transition(&mut self, joint: JointId, transition: Transition, stride: f32) {
        if let Some(angle) = transition.snap {
            self.snap_joint(joint, Axis::X, angle);
            log::debug!(
                "[Walk] {:?} 换向: rising={}, 吸附={}",
                joint,
                transition.next_rising,
                angle
            );
        }
        self.pose.joint_mut(joint).rising = transition.next_rising;
        self.pose_joint(joint, transition.rate * stride, Axis::X);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RigConfig;
    use crate::math::correct_angle;
    use crate::skeleton::SegmentId;

    fn angle(rig: &Rig, joint: JointId) -> f32 {
        rig.joint(joint).angle()
    }

    #[test]
    fn test_thigh_table() {
        assert_eq!(thigh_transition(true, -0.2), Transition::keep(true, -1.0));
        assert_eq!(thigh_transition(true, -0.6), Transition::flip(false, -0.6, 1.0));
        assert_eq!(thigh_transition(true, -0.7), Transition::flip(false, -0.6, 1.0));
        assert_eq!(thigh_transition(false, 0.1), Transition::keep(false, 1.0));
        assert_eq!(thigh_transition(false, 0.3), Transition::flip(true, 0.3, -1.0));
    }

    #[test]
    fn test_leg_table_rising() {
        assert_eq!(leg_transition(true, 0.5, 0.0).rate, -1.0);
        assert_eq!(leg_transition(true, 0.2, -0.4).rate, 1.0);
        assert_eq!(leg_transition(true, 0.2, -0.3).rate, 0.0);
        assert_eq!(leg_transition(true, 0.1, -0.3).rate, -1.0);
        assert_eq!(leg_transition(true, 0.0, 0.1), Transition::flip(false, 0.0, 0.0));
    }

    #[test]
    fn test_leg_table_falling() {
        assert_eq!(leg_transition(false, 0.0, 0.0).rate, 0.5);
        assert_eq!(leg_transition(false, 0.0, 0.2).rate, 0.0);
        assert_eq!(leg_transition(false, 0.3, 0.2).rate, 1.5);
        assert_eq!(leg_transition(false, 0.6, 0.2).rate, 1.0);
        assert_eq!(leg_transition(false, 0.8, 0.2), Transition::flip(true, 0.8, -1.0));
    }

    #[test]
    fn test_direction() {
        assert_eq!(Direction::of(0.1), Direction::Forward);
        assert_eq!(Direction::of(-0.1), Direction::Backward);
        assert_eq!(Direction::of(-0.1).factor() * -0.1, 0.1);
    }

    #[test]
    fn test_first_step_ends_when_thigh_reaches_limit() {
        let mut rig = Rig::headless(RigConfig::default()).unwrap();
        let expected = [-0.1, -0.2, -0.3, -0.4, -0.5];
        for (i, &a) in expected.iter().enumerate() {
            rig.move_torso(0.1);
            assert!(rig.is_first_step(), "call {}", i + 1);
            assert_eq!(angle(&rig, JointId::ThighRight), a);
        }

        // 第 6 次调用前右大腿已到 -0.5
        rig.move_torso(0.1);
        assert!(!rig.is_first_step());
        assert_eq!(angle(&rig, JointId::ThighRight), -0.6);

        // 稳态：右大腿换向
        rig.move_torso(0.1);
        assert!(!rig.joint(JointId::ThighRight).rising);
        assert_eq!(angle(&rig, JointId::ThighRight), -0.5);
        rig.move_torso(0.1);
        assert_eq!(angle(&rig, JointId::ThighRight), -0.4);
        assert!(!rig.is_first_step());
    }

    #[test]
    fn test_first_step_leg_profile() {
        let mut rig = Rig::headless(RigConfig::default()).unwrap();
        rig.move_torso(0.1);
        assert_eq!(angle(&rig, JointId::ThighLeft), 0.05);
        assert_eq!(angle(&rig, JointId::LegRight), 0.1);
        // 左大腿未到 0.1，左小腿不动
        assert_eq!(angle(&rig, JointId::LegLeft), 0.0);

        for _ in 0..3 {
            rig.move_torso(0.1);
        }
        // 右小腿到 0.4 后开始回收
        assert_eq!(angle(&rig, JointId::LegRight), 0.4);
        assert!(rig.joint(JointId::LegRight).rising);
        assert_eq!(angle(&rig, JointId::LegLeft), 0.3);

        rig.move_torso(0.1);
        assert_eq!(angle(&rig, JointId::LegRight), 0.3);
    }

    #[test]
    fn test_manual_pose_resets_gait() {
        let mut rig = Rig::headless(RigConfig::default()).unwrap();
        for _ in 0..10 {
            rig.move_torso(0.1);
        }
        rig.rotate_thigh(Side::Left, 1.0);
        rig.rotate_leg(Side::Right, -0.7);
        assert!(!rig.in_walk_animation());

        rig.move_torso(0.1);
        assert!(rig.in_walk_animation());
        assert!(rig.is_first_step());
        assert_eq!(angle(&rig, JointId::ThighRight), -0.1);
        assert_eq!(angle(&rig, JointId::ThighLeft), 0.05);
        assert_eq!(angle(&rig, JointId::LegRight), 0.1);
        assert_eq!(angle(&rig, JointId::LegLeft), 0.0);
    }

    #[test]
    fn test_backward_walk_mirrors_forward_gait() {
        let mut forward = Rig::headless(RigConfig::default()).unwrap();
        let mut backward = Rig::headless(RigConfig::default()).unwrap();
        for _ in 0..30 {
            forward.move_torso(0.1);
            backward.move_torso(-0.1);
        }
        assert!(!backward.is_first_step());
        for joint in JointId::ALL {
            assert_eq!(forward.joint(joint).angles(), backward.joint(joint).angles());
        }
        let f = forward.segment(SegmentId::Torso).position();
        let b = backward.segment(SegmentId::Torso).position();
        assert!(f.z > 2.5);
        assert!(b.z < -2.5);
    }

    #[test]
    fn test_walking_keeps_feet_on_floor() {
        let mut rig = Rig::headless(RigConfig::default()).unwrap();
        for i in 0..120 {
            if i % 40 == 20 {
                rig.rotate_torso(0.5);
            }
            rig.move_torso(0.1);
            let [l, r] = rig.foot_endpoints();
            assert!(l.y.min(r.y).abs() < 1e-4);
            for joint in [JointId::ThighLeft, JointId::ThighRight, JointId::LegLeft, JointId::LegRight] {
                let a = angle(&rig, joint);
                assert_eq!(a, correct_angle(a));
                assert!((-0.7..=0.9).contains(&a), "{:?} = {}", joint, a);
            }
        }
    }

    #[test]
    fn test_feet_on_floor_at_any_speed() {
        for speed in [0.1, 0.15, 0.25, 0.3, 0.35, -0.15, -0.25] {
            let mut rig = Rig::headless(RigConfig::default()).unwrap();
            for call in 1..=60 {
                rig.move_torso(speed);
                let [l, r] = rig.foot_endpoints();
                let lowest = l.y.min(r.y);
                assert!(
                    lowest.abs() < 1e-4,
                    "speed={} call={} lowest={} legR={}",
                    speed,
                    call,
                    lowest,
                    angle(&rig, JointId::LegRight)
                );
            }
        }
    }
}
