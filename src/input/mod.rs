//! 输入层
//!
//! 每帧轮询一次离散动作集合，由 `AnimationDriver` 分派到角色。
//! 真实窗口/键盘/射线拾取由外部提供，这里只定义接口与一个脚本实现。

mod driver;
mod script;

pub use driver::AnimationDriver;
pub use script::{Frame, ScriptedInput};

use bitflags::bitflags;
use glam::Vec3;

use crate::pose::JointId;
use crate::skeleton::Side;

bitflags! {
    /// 一帧内按下的动作
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct Actions: u8 {
        const SELECT_NEXT = 1 << 0;
        const SELECT_PREVIOUS = 1 << 1;
        const MOVE_POSITIVE = 1 << 2;
        const MOVE_NEGATIVE = 1 << 3;
        const ROTATE_POSITIVE = 1 << 4;
        const ROTATE_NEGATIVE = 1 << 5;
        const GAZE = 1 << 6;
    }
}

impl Actions {
    /// 按键到动作的映射
    pub fn from_key(key: char) -> Option<Self> {
        match key {
            'w' => Some(Actions::MOVE_POSITIVE),
            's' => Some(Actions::MOVE_NEGATIVE),
            'a' => Some(Actions::ROTATE_POSITIVE),
            'd' => Some(Actions::ROTATE_NEGATIVE),
            'e' => Some(Actions::SELECT_NEXT),
            'q' => Some(Actions::SELECT_PREVIOUS),
            'f' => Some(Actions::GAZE),
            _ => None,
        }
    }
}

/// 动作来源，每帧轮询一次
pub trait InputSource {
    fn poll_actions(&mut self) -> Actions;
}

/// 屏幕拾取：返回指针下的世界坐标点
pub trait PointerPicker {
    fn pick(&mut self) -> Option<Vec3>;
}

/// 可选中的部件
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Component {
    #[default]
    Torso,
    Head,
    ArmLeft,
    ForearmLeft,
    ArmRight,
    ForearmRight,
    ThighLeft,
    LegLeft,
    ThighRight,
    LegRight,
}

impl Component {
    /// 选择顺序
    pub const ALL: [Component; 10] = [
        Component::Torso,
        Component::Head,
        Component::ArmLeft,
        Component::ForearmLeft,
        Component::ArmRight,
        Component::ForearmRight,
        Component::ThighLeft,
        Component::LegLeft,
        Component::ThighRight,
        Component::LegRight,
    ];

    #[inline]
    fn position(self) -> usize {
        self as usize
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.position() + 1) % Self::ALL.len()]
    }

    pub fn previous(self) -> Self {
        Self::ALL[(self.position() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// 部件对应的关节，躯干没有关节
    pub fn joint(self) -> Option<JointId> {
        match self {
            Component::Torso => None,
            Component::Head => Some(JointId::Head),
            Component::ArmLeft => Some(JointId::arm(Side::Left)),
            Component::ForearmLeft => Some(JointId::forearm(Side::Left)),
            Component::ArmRight => Some(JointId::arm(Side::Right)),
            Component::ForearmRight => Some(JointId::forearm(Side::Right)),
            Component::ThighLeft => Some(JointId::thigh(Side::Left)),
            Component::LegLeft => Some(JointId::leg(Side::Left)),
            Component::ThighRight => Some(JointId::thigh(Side::Right)),
            Component::LegRight => Some(JointId::leg(Side::Right)),
        }
    }
}
