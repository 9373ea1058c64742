//! 固定的段层级
//!
//! 层级在构建时确定且永不改变，用静态表描述父子关系，
//! `SegmentId::ALL` 按父先子后的顺序排列，可直接作为段数组的索引。

use std::fmt;

/// 左右侧
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// 沿 X 轴的方向：左为 -1，右为 +1
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Side::Left => -1.0,
            Side::Right => 1.0,
        }
    }

    #[inline]
    pub fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// 段标识
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SegmentId {
    Torso,
    Head,
    EyeLeft,
    EyeRight,
    ThighLeft,
    LegLeft,
    ThighRight,
    LegRight,
    ArmLeft,
    ForearmLeft,
    ArmRight,
    ForearmRight,
}

/// 段总数
pub const SEGMENT_COUNT: usize = 12;

impl SegmentId {
    /// 父先子后的拓扑顺序
    pub const ALL: [SegmentId; SEGMENT_COUNT] = [
        SegmentId::Torso,
        SegmentId::Head,
        SegmentId::EyeLeft,
        SegmentId::EyeRight,
        SegmentId::ThighLeft,
        SegmentId::LegLeft,
        SegmentId::ThighRight,
        SegmentId::LegRight,
        SegmentId::ArmLeft,
        SegmentId::ForearmLeft,
        SegmentId::ArmRight,
        SegmentId::ForearmRight,
    ];

    /// 在 `ALL` 中的索引
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// 父段（躯干为根）
    pub fn parent(self) -> Option<SegmentId> {
        use SegmentId::*;
        match self {
            Torso => None,
            Head | ThighLeft | ThighRight | ArmLeft | ArmRight => Some(Torso),
            EyeLeft | EyeRight => Some(Head),
            LegLeft => Some(ThighLeft),
            LegRight => Some(ThighRight),
            ForearmLeft => Some(ArmLeft),
            ForearmRight => Some(ArmRight),
        }
    }

    /// 直接子段
    pub fn children(self) -> &'static [SegmentId] {
        use SegmentId::*;
        match self {
            Torso => &[Head, ThighLeft, ThighRight, ArmLeft, ArmRight],
            Head => &[EyeLeft, EyeRight],
            ThighLeft => &[LegLeft],
            ThighRight => &[LegRight],
            ArmLeft => &[ForearmLeft],
            ArmRight => &[ForearmRight],
            EyeLeft | EyeRight | LegLeft | LegRight | ForearmLeft | ForearmRight => &[],
        }
    }

    /// 所在侧（躯干和头无侧）
    pub fn side(self) -> Option<Side> {
        use SegmentId::*;
        match self {
            Torso | Head => None,
            EyeLeft | ThighLeft | LegLeft | ArmLeft | ForearmLeft => Some(Side::Left),
            EyeRight | ThighRight | LegRight | ArmRight | ForearmRight => Some(Side::Right),
        }
    }

    #[inline]
    pub fn is_leaf(self) -> bool {
        self.children().is_empty()
    }

    /// `ancestor` 是否为本段或其祖先
    pub fn is_descendant_of(self, ancestor: SegmentId) -> bool {
        let mut current = Some(self);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = id.parent();
        }
        false
    }

    pub fn thigh(side: Side) -> Self {
        match side {
            Side::Left => SegmentId::ThighLeft,
            Side::Right => SegmentId::ThighRight,
        }
    }

    pub fn leg(side: Side) -> Self {
        match side {
            Side::Left => SegmentId::LegLeft,
            Side::Right => SegmentId::LegRight,
        }
    }

    pub fn arm(side: Side) -> Self {
        match side {
            Side::Left => SegmentId::ArmLeft,
            Side::Right => SegmentId::ArmRight,
        }
    }

    pub fn forearm(side: Side) -> Self {
        match side {
            Side::Left => SegmentId::ForearmLeft,
            Side::Right => SegmentId::ForearmRight,
        }
    }

    pub fn eye(side: Side) -> Self {
        match side {
            Side::Left => SegmentId::EyeLeft,
            Side::Right => SegmentId::EyeRight,
        }
    }
}

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
