//! 注视求解 - 闭式启发式，不是通用 IK
//!
//! 两步：
//! 1. 在地面平面 (X, Z) 内求躯干偏航，沿最短路径转过去
//! 2. 头部偏航归零后，求头部俯仰并转到该角度（受头部夹紧限制）

use std::f32::consts::{FRAC_PI_2, PI};

use glam::Vec3;

use crate::math::{wrap_angle, Axis};
use crate::pose::JointId;

use super::hierarchy::SegmentId;
use super::rig::Rig;

/// 注视求解结果
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GazeSolution {
    /// 期望的躯干偏航
    pub theta_y: f32,
    /// 实际施加的躯干转角（无需转动时为 None）
    pub torso_delta: Option<f32>,
    /// 期望的头部俯仰（向上为正）
    pub theta_x: f32,
    /// 施加到头部 X 轴的转角
    pub head_delta: f32,
}

/// 从 (dx, dz) 求偏航角，+Z 为 0，+X 为 π/2
///
/// 坐标轴方向上直接给出结果，避免除零
pub fn heading(dx: f32, dz: f32) -> f32 {
    if dx == 0.0 && dz >= 0.0 {
        0.0
    } else if dx == 0.0 {
        PI
    } else if dz == 0.0 && dx > 0.0 {
        FRAC_PI_2
    } else if dz == 0.0 {
        -FRAC_PI_2
    } else {
        let theta = (dx / dz).atan();
        if dz < 0.0 && dx > 0.0 {
            theta + PI
        } else if dz < 0.0 {
            theta - PI
        } else {
            theta
        }
    }
}

/// 从相对位移求俯仰角，正上方为 π/2，正下方为 -π/2
pub fn pitch(d: Vec3) -> f32 {
    if d.y == 0.0 {
        0.0
    } else if d.x == 0.0 && d.z == 0.0 {
        if d.y >= 0.0 {
            FRAC_PI_2
        } else {
            -FRAC_PI_2
        }
    } else {
        (d.y / d.length()).asin()
    }
}

/// 从当前偏航到目标偏航的最短有符号转角，取 (-π, π] 内的代表；无需转动时为 None
pub fn shortest_turn(current: f32, target: f32) -> Option<f32> {
    if current == target {
        return None;
    }
    let delta = wrap_angle(target - current);
    if delta == 0.0 {
        None
    } else {
        Some(delta)
    }
}

impl Rig {
    /// 让角色注视 `target`
    ///
    /// 每次调用执行两次关节旋转（躯干偏航、头部俯仰），不做联合求解。
    /// 躯干转动时整体推送一次，否则只推送头部子树。
    pub fn look_at(&mut self, target: Vec3) -> GazeSolution {
        // 躯干偏航
        let torso = self.segment(SegmentId::Torso).position();
        let theta_y = heading(target.x - torso.x, target.z - torso.z);
        let torso_delta = shortest_turn(self.torso_angle(), theta_y);
        if let Some(delta) = torso_delta {
            self.turn_torso(delta);
        }

        // 头部先转回正前方
        let head_yaw = self.joint(JointId::Head).angle_on(Axis::Y);
        self.pose_joint(JointId::Head, -head_yaw, Axis::Y);
        self.refresh_all();

        // 头部俯仰
        let head = self.segment(SegmentId::Head).position();
        let theta_x = pitch(target - head);
        let head_delta = -self.joint(JointId::Head).angle_on(Axis::X) - theta_x;
        self.pose_joint(JointId::Head, head_delta, Axis::X);

        match torso_delta {
            Some(_) => self.propagate_all(),
            None => self.propagate_from(SegmentId::Head),
        }

        log::debug!(
            "[Gaze] 目标={:?}, 偏航={:.3}, 躯干转角={:?}, 俯仰={:.3}",
            target,
            theta_y,
            torso_delta,
            theta_x
        );

        GazeSolution {
            theta_y,
            torso_delta,
            theta_x,
            head_delta,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RigConfig;
    use crate::skeleton::Side;

    #[test]
    fn test_heading_quadrants() {
        assert_eq!(heading(0.0, 5.0), 0.0);
        assert_eq!(heading(0.0, 0.0), 0.0);
        assert_eq!(heading(0.0, -5.0), PI);
        assert_eq!(heading(3.0, 0.0), FRAC_PI_2);
        assert_eq!(heading(-3.0, 0.0), -FRAC_PI_2);
        assert!((heading(1.0, 1.0) - PI / 4.0).abs() < 1e-6);
        assert!((heading(1.0, -1.0) - 3.0 * PI / 4.0).abs() < 1e-6);
        assert!((heading(-1.0, -1.0) + 3.0 * PI / 4.0).abs() < 1e-6);
        assert!((heading(-1.0, 1.0) + PI / 4.0).abs() < 1e-6);
    }

    #[test]
    fn test_pitch_special_cases() {
        assert_eq!(pitch(Vec3::new(1.0, 0.0, 4.0)), 0.0);
        assert_eq!(pitch(Vec3::new(0.0, 2.0, 0.0)), FRAC_PI_2);
        assert_eq!(pitch(Vec3::new(0.0, -2.0, 0.0)), -FRAC_PI_2);
        assert!((pitch(Vec3::new(0.0, 1.0, 1.0)) - PI / 4.0).abs() < 1e-6);
    }

    #[test]
    fn test_shortest_turn_wraps() {
        assert_eq!(shortest_turn(0.5, 0.5), None);
        let d = shortest_turn(3.0, -3.0).unwrap();
        assert!((d - (2.0 * PI - 6.0)).abs() < 1e-5);
        let d = shortest_turn(-3.0, 3.0).unwrap();
        assert!((d + (2.0 * PI - 6.0)).abs() < 1e-5);
    }

    #[test]
    fn test_look_straight_ahead_keeps_torso() {
        let mut rig = Rig::headless(RigConfig::default()).unwrap();
        let before = rig.world_transform(SegmentId::Torso);
        let solution = rig.look_at(Vec3::new(0.0, 0.0, 10.0));
        assert_eq!(solution.theta_y, 0.0);
        assert_eq!(solution.torso_delta, None);
        assert_eq!(rig.world_transform(SegmentId::Torso), before);
        // 目标在下方，头部低头（X 角为正）
        assert!(solution.theta_x < 0.0);
        assert!(rig.joint(JointId::Head).angle_on(Axis::X) > 0.0);
    }

    #[test]
    fn test_look_behind_turns_half_circle_once() {
        let mut rig = Rig::headless(RigConfig::default()).unwrap();
        let solution = rig.look_at(Vec3::new(0.0, 0.0, -10.0));
        assert_eq!(solution.theta_y, PI);
        let delta = solution.torso_delta.unwrap();
        assert!((delta.abs() - PI).abs() < 1e-5);
        assert!((rig.torso_angle().abs() - PI).abs() < 1e-5);
        assert!(rig.walk_direction().abs_diff_eq(Vec3::new(0.0, 0.0, -1.0), 1e-5));

        // 再看同一点不再转动
        let again = rig.look_at(Vec3::new(0.0, 0.0, -10.0));
        assert_eq!(again.torso_delta, None);
    }

    #[test]
    fn test_look_resets_head_yaw_and_clamps_pitch() {
        let mut rig = Rig::headless(RigConfig::default()).unwrap();
        rig.rotate_head(0.8, Axis::Y);
        let head = rig.segment(SegmentId::Head).position();
        let solution = rig.look_at(head + Vec3::new(0.0, 5.0, 0.0));
        assert_eq!(rig.joint(JointId::Head).angle_on(Axis::Y), 0.0);
        assert_eq!(solution.theta_x, FRAC_PI_2);
        assert_eq!(rig.joint(JointId::Head).angle_on(Axis::X), -1.57);
    }

    #[test]
    fn test_look_to_the_side() {
        let mut rig = Rig::headless(RigConfig::default()).unwrap();
        rig.rotate_arm(Side::Left, 0.3, Axis::Z);
        let solution = rig.look_at(Vec3::new(10.0, 2.0, 0.0));
        assert_eq!(solution.theta_y, FRAC_PI_2);
        assert!((rig.torso_angle() - FRAC_PI_2).abs() < 1e-5);
        assert!(rig.walk_direction().abs_diff_eq(Vec3::X, 1e-5));
    }
}
