//! 动画系统
//!
//! 目前只有程序化行走循环，由 `Rig::move_torso` 驱动。

mod walk_cycle;

pub use walk_cycle::{leg_transition, thigh_transition, Direction, Transition};
