//! 变换传播
//!
//! 自上而下拉取更新：段的绝对变换只依赖父帧，
//! 修改段 S 时只重算 S 的子树，其余段保持不变。
//! 只刷新缓存的重算不通知渲染句柄，每帧结束时的传播才推送。

use glam::Mat4;

use super::hierarchy::SegmentId;
use super::rig::Rig;
use super::segment::Segment;

impl Rig {
    /// 从躯干开始重算整个角色
    pub fn propagate_all(&mut self) {
        self.propagate_from(SegmentId::Torso);
    }

    /// 重算 `root` 及其所有后代
    pub fn propagate_from(&mut self, root: SegmentId) {
        let parent_frame = self.parent_frame(root);
        update_subtree(&mut self.segments, root, parent_frame, true);
    }

    /// 重算所有段的缓存变换，不推送给渲染句柄
    pub(crate) fn refresh_all(&mut self) {
        let parent_frame = self.pose.torso_matrix;
        update_subtree(&mut self.segments, SegmentId::Torso, parent_frame, false);
    }

    /// 段的父帧：躯干取累计变换，其余取父段去缩放后的绝对变换
    fn parent_frame(&self, id: SegmentId) -> Mat4 {
        match id.parent() {
            Some(parent) => self.segments[parent.index()].frame_transform(),
            None => self.pose.torso_matrix,
        }
    }
}

/// 递归更新子树（父先子后），`push` 为真时通知渲染句柄
pub(crate) fn update_subtree(segments: &mut [Segment], id: SegmentId, parent_frame: Mat4, push: bool) {
    let segment = &mut segments[id.index()];
    let frame = segment.update(parent_frame);
    if push {
        segment.push_transform();
        log::trace!("[Rig] 更新段 {}", id);
    }

    for &child in id.children() {
        update_subtree(segments, child, frame, push);
    }
}
