//! 地面接触求解
//!
//! 取两只脚末端中较低的一只作为支撑脚，整体竖直平移角色，
//! 使支撑脚末端正好落在 y = 0 平面上。

use glam::Vec3;

use crate::math;

use super::hierarchy::{SegmentId, Side};
use super::rig::Rig;

/// 小腿末端（单位几何体空间，缩放前）
const FOOT_END: Vec3 = Vec3::new(0.0, -1.0, 0.0);

/// 地面接触结果
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GroundContact {
    /// 支撑脚
    pub support: Side,
    /// 施加到躯干的竖直位移
    pub shift: f32,
}

/// 选择支撑脚：y 较小者，相等时取左脚
pub fn support_side(left: Vec3, right: Vec3) -> Side {
    if left.y <= right.y {
        Side::Left
    } else {
        Side::Right
    }
}

impl Rig {
    /// 两只脚末端的世界坐标 [左, 右]
    pub fn foot_endpoints(&self) -> [Vec3; 2] {
        [Side::Left, Side::Right].map(|side| self.segment(SegmentId::leg(side)).to_world(FOOT_END))
    }

    /// 让支撑脚站在地面上并重算整个角色
    ///
    /// 先按当前姿态刷新缓存，未传播的关节改动也计入脚的位置
    pub fn stand_on_floor(&mut self) -> GroundContact {
        self.refresh_all();
        let [left, right] = self.foot_endpoints();
        let support = support_side(left, right);
        let foot = match support {
            Side::Left => left,
            Side::Right => right,
        };
        let shift = -foot.y;

        self.pose.torso_matrix = math::compose(math::translation(0.0, shift, 0.0), self.pose.torso_matrix);
        self.propagate_all();

        log::debug!("[Rig] 支撑脚={:?}, 竖直位移={:.4}", support, shift);

        GroundContact { support, shift }
    }
}
