//! 无窗口驱动
//!
//! 用法: puppet [script]
//!
//! 从文件（省略时为标准输入）读取帧脚本，逐帧驱动角色，
//! 并把每个段收到的变换分解后输出到日志。

use std::cell::RefCell;
use std::fs::File;
use std::io::{self, BufReader};
use std::rc::Rc;

use glam::Mat4;
use rig_engine::{
    AnimationDriver, Renderable, Result, Rig, RigConfig, ScriptedInput, SegmentId, SegmentTransform,
};

/// 记录最近一次变换的渲染句柄
struct LoggingHandle {
    id: SegmentId,
    frame: Rc<RefCell<usize>>,
}

impl Renderable for LoggingHandle {
    fn set_transform(&mut self, transform: Mat4) {
        let t = SegmentTransform::from_matrix(transform);
        log::trace!(
            "[Driver] 帧 {} {}: 位置={:?}, 旋转={:?}, 缩放={:?}",
            self.frame.borrow(),
            self.id,
            t.translation,
            t.rotation,
            t.scale
        );
    }
}

fn load_script() -> Result<ScriptedInput> {
    match std::env::args().nth(1) {
        Some(path) => {
            log::info!("[Driver] 读取脚本: {}", path);
            ScriptedInput::from_reader(BufReader::new(File::open(path)?))
        }
        None => ScriptedInput::from_reader(io::stdin().lock()),
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut script = load_script()?;
    let frame = Rc::new(RefCell::new(0usize));

    let mut rig = Rig::new(RigConfig::default(), |id, primitive| {
        log::debug!("[Driver] 创建几何体 {}: {:?}", id, primitive);
        Box::new(LoggingHandle { id, frame: frame.clone() })
    })?;
    let mut driver = AnimationDriver::new();

    while !script.is_finished() {
        *frame.borrow_mut() += 1;
        let applied = driver.tick_with(&mut rig, &mut script);
        log::debug!("[Driver] 帧 {}: 选中={:?}, 动作={:?}", frame.borrow(), driver.selected(), applied);
    }

    let torso = rig.segment(SegmentId::Torso).position();
    let [left, right] = rig.foot_endpoints();
    log::info!(
        "[Driver] 结束: 帧数={}, 躯干={:?}, 偏航={:.3}, 左脚={:?}, 右脚={:?}",
        frame.borrow(),
        torso,
        rig.torso_angle(),
        left,
        right
    );

    Ok(())
}
