//! 动画驱动
//!
//! 每帧：轮询动作 → 更新选中部件 → 最多执行一个角色动作。
//! 同一帧的多个角色动作按 移动 > 转动 > 注视 取第一个，其余丢弃。

use glam::Vec3;

use crate::math::Axis;
use crate::pose::JointId;
use crate::skeleton::Rig;

use super::{Actions, Component, InputSource, PointerPicker};

/// 按优先级排列的角色动作
const RIG_ACTIONS: [Actions; 5] = [
    Actions::MOVE_POSITIVE,
    Actions::MOVE_NEGATIVE,
    Actions::ROTATE_POSITIVE,
    Actions::ROTATE_NEGATIVE,
    Actions::GAZE,
];

/// 动画驱动器
#[derive(Clone, Copy, Debug, Default)]
pub struct AnimationDriver {
    selected: Component,
    gaze_target: Option<Vec3>,
}

impl AnimationDriver {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn selected(&self) -> Component {
        self.selected
    }

    /// 当前注视目标（松开注视键后清空）
    #[inline]
    pub fn gaze_target(&self) -> Option<Vec3> {
        self.gaze_target
    }

    /// 推进一帧，返回实际执行的角色动作（可能为空）
    pub fn tick<I, P>(&mut self, rig: &mut Rig, input: &mut I, picker: &mut P) -> Actions
    where
        I: InputSource + ?Sized,
        P: PointerPicker + ?Sized,
    {
        let actions = input.poll_actions();
        self.dispatch(rig, actions, picker)
    }

    /// 输入与拾取来自同一对象时使用
    pub fn tick_with<S>(&mut self, rig: &mut Rig, source: &mut S) -> Actions
    where
        S: InputSource + PointerPicker + ?Sized,
    {
        let actions = source.poll_actions();
        self.dispatch(rig, actions, source)
    }

    /// 分派一帧的动作
    pub fn dispatch<P>(&mut self, rig: &mut Rig, actions: Actions, picker: &mut P) -> Actions
    where
        P: PointerPicker + ?Sized,
    {
        if actions.contains(Actions::SELECT_NEXT) {
            self.selected = self.selected.next();
        }
        if actions.contains(Actions::SELECT_PREVIOUS) {
            self.selected = self.selected.previous();
        }
        if actions.intersects(Actions::SELECT_NEXT | Actions::SELECT_PREVIOUS) {
            log::debug!("[Driver] 选中 {:?}", self.selected);
        }

        if !actions.contains(Actions::GAZE) {
            self.gaze_target = None;
        }

        let Some(action) = RIG_ACTIONS.into_iter().find(|&a| actions.contains(a)) else {
            return Actions::empty();
        };

        let dropped = actions & Actions::all().difference(Actions::SELECT_NEXT | Actions::SELECT_PREVIOUS | action);
        if !dropped.is_empty() {
            log::warn!("[Driver] 同帧多个动作，丢弃 {:?}", dropped);
        }

        let step = rig.config().step;
        match action {
            Actions::MOVE_POSITIVE => self.apply_move(rig, step),
            Actions::MOVE_NEGATIVE => self.apply_move(rig, -step),
            Actions::ROTATE_POSITIVE => self.apply_rotate(rig, step),
            Actions::ROTATE_NEGATIVE => self.apply_rotate(rig, -step),
            _ => self.apply_gaze(rig, picker),
        }

        action
    }

    /// w/s：躯干前后移动，其余部件绕主轴反向转动
    fn apply_move(&self, rig: &mut Rig, amount: f32) {
        match self.selected.joint() {
            None => rig.move_torso(amount),
            Some(joint) => rig.rotate_joint(joint, -amount, move_axis(joint)),
        }
    }

    /// a/d：躯干与头部偏航，上臂绕 Z，其余部件不响应
    fn apply_rotate(&self, rig: &mut Rig, amount: f32) {
        match self.selected.joint() {
            None => rig.rotate_torso(amount),
            Some(JointId::Head) => rig.rotate_head(amount, Axis::Y),
            Some(joint @ (JointId::ArmLeft | JointId::ArmRight)) => {
                rig.rotate_joint(joint, -amount, Axis::Z)
            }
            Some(_) => {}
        }
    }

    fn apply_gaze<P: PointerPicker + ?Sized>(&mut self, rig: &mut Rig, picker: &mut P) {
        match picker.pick() {
            Some(target) => {
                self.gaze_target = Some(target);
                rig.look_at(target);
            }
            None => log::warn!("[Driver] 拾取未命中，注视目标不更新"),
        }
    }
}

fn move_axis(joint: JointId) -> Axis {
    match joint {
        JointId::ArmLeft | JointId::ArmRight => Axis::Y,
        JointId::ForearmLeft | JointId::ForearmRight => Axis::Z,
        _ => Axis::X,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RigConfig;
    use crate::input::ScriptedInput;
    use crate::skeleton::SegmentId;

    struct Frames(Vec<Actions>);

    impl InputSource for Frames {
        fn poll_actions(&mut self) -> Actions {
            if self.0.is_empty() {
                Actions::empty()
            } else {
                self.0.remove(0)
            }
        }
    }

    struct Fixed(Option<Vec3>);

    impl PointerPicker for Fixed {
        fn pick(&mut self) -> Option<Vec3> {
            self.0
        }
    }

    fn run(driver: &mut AnimationDriver, rig: &mut Rig, frames: Vec<Actions>, hit: Option<Vec3>) {
        let mut input = Frames(frames);
        let mut picker = Fixed(hit);
        while !input.0.is_empty() {
            driver.tick(rig, &mut input, &mut picker);
        }
    }

    #[test]
    fn test_move_torso_walks_forward() {
        let mut rig = Rig::headless(RigConfig::default()).unwrap();
        let mut driver = AnimationDriver::new();
        run(&mut driver, &mut rig, vec![Actions::MOVE_POSITIVE; 3], None);
        assert!((rig.segment(SegmentId::Torso).position().z - 0.3).abs() < 1e-4);
        assert_eq!(rig.joint(JointId::ThighRight).angle(), -0.3);
    }

    #[test]
    fn test_selected_joint_rotation() {
        let mut rig = Rig::headless(RigConfig::default()).unwrap();
        let mut driver = AnimationDriver::new();
        // Torso -> Head -> ArmLeft
        run(
            &mut driver,
            &mut rig,
            vec![
                Actions::SELECT_NEXT,
                Actions::MOVE_POSITIVE,
                Actions::ROTATE_NEGATIVE,
                Actions::SELECT_NEXT,
                Actions::MOVE_NEGATIVE,
                Actions::ROTATE_POSITIVE,
            ],
            None,
        );
        assert_eq!(driver.selected(), Component::ArmLeft);
        assert_eq!(rig.joint(JointId::Head).angle_on(Axis::X), -0.1);
        assert_eq!(rig.joint(JointId::Head).angle_on(Axis::Y), -0.1);
        assert_eq!(rig.joint(JointId::ArmLeft).angle_on(Axis::Y), 0.1);
        assert_eq!(rig.joint(JointId::ArmLeft).angle_on(Axis::Z), -0.1);
    }

    #[test]
    fn test_leg_selection_interrupts_walk() {
        let mut rig = Rig::headless(RigConfig::default()).unwrap();
        let mut driver = AnimationDriver::new();
        run(&mut driver, &mut rig, vec![Actions::SELECT_PREVIOUS, Actions::MOVE_POSITIVE], None);
        assert_eq!(driver.selected(), Component::LegRight);
        assert_eq!(rig.joint(JointId::LegRight).angle(), -0.1);
        assert!(!rig.in_walk_animation());

        // 小腿不响应 a/d
        run(&mut driver, &mut rig, vec![Actions::ROTATE_POSITIVE], None);
        assert_eq!(rig.joint(JointId::LegRight).angle(), -0.1);
    }

    #[test]
    fn test_one_rig_action_per_tick() {
        let mut rig = Rig::headless(RigConfig::default()).unwrap();
        let mut driver = AnimationDriver::new();
        let mut input = Frames(vec![Actions::MOVE_POSITIVE | Actions::ROTATE_POSITIVE | Actions::GAZE]);
        let mut picker = Fixed(Some(Vec3::new(5.0, 0.0, 0.0)));
        let applied = driver.tick(&mut rig, &mut input, &mut picker);
        assert_eq!(applied, Actions::MOVE_POSITIVE);
        assert_eq!(rig.torso_angle(), 0.0);
        assert_eq!(driver.gaze_target(), None);
    }

    #[test]
    fn test_gaze_hold_and_release() {
        let mut rig = Rig::headless(RigConfig::default()).unwrap();
        let mut driver = AnimationDriver::new();
        let mut picker = Fixed(Some(Vec3::new(10.0, 0.0, 0.0)));

        let mut input = Frames(vec![Actions::GAZE]);
        driver.tick(&mut rig, &mut input, &mut picker);
        assert_eq!(driver.gaze_target(), Some(Vec3::new(10.0, 0.0, 0.0)));
        assert!((rig.torso_angle() - std::f32::consts::FRAC_PI_2).abs() < 1e-5);

        let mut input = Frames(vec![Actions::empty()]);
        driver.tick(&mut rig, &mut input, &mut picker);
        assert_eq!(driver.gaze_target(), None);
    }

    #[test]
    fn test_gaze_miss_keeps_pose() {
        let mut rig = Rig::headless(RigConfig::default()).unwrap();
        let mut driver = AnimationDriver::new();
        let before = rig.world_transform(SegmentId::Head);
        let mut input = Frames(vec![Actions::GAZE]);
        let applied = driver.tick(&mut rig, &mut input, &mut Fixed(None));
        assert_eq!(applied, Actions::GAZE);
        assert_eq!(driver.gaze_target(), None);
        assert_eq!(rig.world_transform(SegmentId::Head), before);
    }

    #[test]
    fn test_scripted_session() {
        let mut rig = Rig::headless(RigConfig::default()).unwrap();
        let mut driver = AnimationDriver::new();
        let mut script = ScriptedInput::parse("w\nw\nf 0 0 -10\nf\n\na\n").unwrap();
        while !script.is_finished() {
            driver.tick_with(&mut rig, &mut script);
        }
        // 转身 π 后再左转 0.1，偏航折回 (-π, π]
        assert!((rig.torso_angle().abs() - std::f32::consts::PI).abs() < 0.11);
        assert_eq!(driver.gaze_target(), None);
        assert_eq!(driver.selected(), Component::Torso);
        let [l, r] = rig.foot_endpoints();
        assert!(l.y.min(r.y).abs() < 1e-4);
    }
}
