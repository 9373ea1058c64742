//! 脚本输入
//!
//! 每行一帧，空行为空闲帧，`#` 开头的行是注释。
//! 每个记号由按键字符组成（`w s a d q e f`），`f` 后可跟三个数字给出注视点：
//!
//! ```text
//! w
//! w
//! qq w
//! f 2.0 0.0 5.0
//! f
//! ```
//!
//! 不带坐标的 `f` 沿用最近一次给出的注视点。

use std::collections::VecDeque;
use std::io::BufRead;

use glam::Vec3;

use crate::{Result, RigError};

use super::{Actions, InputSource, PointerPicker};

/// 脚本中的一帧
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Frame {
    pub actions: Actions,
    pub target: Option<Vec3>,
}

/// 从文本脚本回放的输入
#[derive(Clone, Debug, Default)]
pub struct ScriptedInput {
    frames: VecDeque<Frame>,
    last_target: Option<Vec3>,
}

impl ScriptedInput {
    /// 解析整段脚本
    pub fn parse(text: &str) -> Result<Self> {
        let mut frames = VecDeque::new();
        for (i, line) in text.lines().enumerate() {
            if let Some(frame) = parse_line(i + 1, line)? {
                frames.push_back(frame);
            }
        }
        log::debug!("[Driver] 脚本解析完成: {} 帧", frames.len());
        Ok(Self { frames, last_target: None })
    }

    /// 从读取器逐行解析
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut frames = VecDeque::new();
        for (i, line) in reader.lines().enumerate() {
            if let Some(frame) = parse_line(i + 1, &line?)? {
                frames.push_back(frame);
            }
        }
        Ok(Self { frames, last_target: None })
    }

    /// 剩余帧数
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }

    pub fn is_finished(&self) -> bool {
        self.frames.is_empty()
    }
}

impl InputSource for ScriptedInput {
    fn poll_actions(&mut self) -> Actions {
        match self.frames.pop_front() {
            Some(frame) => {
                if frame.target.is_some() {
                    self.last_target = frame.target;
                }
                frame.actions
            }
            None => Actions::empty(),
        }
    }
}

impl PointerPicker for ScriptedInput {
    fn pick(&mut self) -> Option<Vec3> {
        self.last_target
    }
}

/// 解析一行，注释行返回 None
fn parse_line(line: usize, text: &str) -> Result<Option<Frame>> {
    let text = text.trim();
    if text.starts_with('#') {
        return Ok(None);
    }

    let mut frame = Frame::default();
    let mut tokens = text.split_whitespace().peekable();

    while let Some(token) = tokens.next() {
        for key in token.chars() {
            let action = Actions::from_key(key).ok_or(RigError::UnknownKey { line, key })?;
            frame.actions |= action;
        }

        // `f` 后可选三个坐标
        let wants_target = token.ends_with('f');
        let has_number = tokens.peek().is_some_and(|t| t.parse::<f32>().is_ok());
        if wants_target && has_number {
            let mut coords = [0.0f32; 3];
            for c in coords.iter_mut() {
                let raw = tokens.next().ok_or_else(|| RigError::InvalidScript {
                    line,
                    reason: "gaze target needs three coordinates".to_string(),
                })?;
                *c = raw.parse().map_err(|_| RigError::InvalidScript {
                    line,
                    reason: format!("bad coordinate '{}'", raw),
                })?;
            }
            frame.target = Some(Vec3::from_array(coords));
        }
    }

    Ok(Some(frame))
}
