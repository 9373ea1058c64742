//! Rig Engine - 层级刚体角色动画引擎
//!
//! 模块划分：
//! - math: 4x4 齐次变换与角度量化
//! - skeleton: 段层级、变换传播、地面接触与注视求解
//! - pose: 关节角度状态与行走标志
//! - animation: 程序化行走循环
//! - input: 输入动作、拾取与每帧驱动

pub mod config;
pub mod math;
pub mod render;
pub mod skeleton;
pub mod pose;
pub mod animation;
pub mod input;

pub use config::RigConfig;
pub use math::Axis;
pub use render::{NullRenderable, Primitive, Renderable, SegmentTransform};
pub use skeleton::{Rig, RigContext, Segment, SegmentId, Side};
pub use pose::{JointAxes, JointId, JointState, RigPose};
pub use input::{Actions, AnimationDriver, Component, InputSource, PointerPicker, ScriptedInput};

use thiserror::Error;

/// 引擎错误
///
/// 动画核心本身不会失败，只有构建与外层输入可能出错
#[derive(Debug, Error)]
pub enum RigError {
    #[error("invalid rig config: {0}")]
    InvalidConfig(String),

    #[error("unknown key '{key}' on script line {line}")]
    UnknownKey { line: usize, key: char },

    #[error("invalid script line {line}: {reason}")]
    InvalidScript { line: usize, reason: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RigError>;
