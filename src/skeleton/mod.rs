//! 骨架系统
//!
//! 核心设计思想：
//! - SegmentId: 静态层次表，父子关系在编译期确定
//! - Segment: 单个刚性段，持有初始变换、去缩放矩阵、枢轴与渲染句柄
//! - Rig: 角色上下文，独占所有段与姿态状态
//! - 传播、地面接触与注视求解都以 `impl Rig` 的形式分布在各自模块中

mod gaze_solver;
mod ground_contact;
mod hierarchy;
mod propagate;
mod rig;
mod segment;

pub use gaze_solver::{heading, pitch, shortest_turn, GazeSolution};
pub use ground_contact::{support_side, GroundContact};
pub use hierarchy::{SegmentId, Side, SEGMENT_COUNT};
pub use rig::Rig;
pub use segment::{Extent, Segment, SegmentSpec};

// ============================================================================
// 类型别名
// ============================================================================

/// 角色上下文别名
pub type RigContext = Rig;
