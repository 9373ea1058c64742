//! 角色配置
//!
//! 所有参数扁平化，默认值即为标准机器人尺寸。配置由 Rig 持有，不使用全局状态。

use crate::math::correct_angle;
use crate::{Result, RigError};

/// 角色配置（扁平化，不嵌套）
#[derive(Debug, Clone, PartialEq)]
pub struct RigConfig {
    // ========== 躯干 ==========
    /// 躯干高度，默认 1.5
    pub torso_height: f32,
    /// 躯干深度，宽度为其两倍，默认 0.75
    pub torso_radius: f32,

    // ========== 头与眼 ==========
    /// 头部高度与深度，宽度为其两倍，默认 0.32
    pub head_radius: f32,
    /// 眼球半径，默认 0.08
    pub eye_radius: f32,

    // ========== 手臂 ==========
    /// 上臂半长，默认 0.6
    pub arm_height: f32,
    pub arm_radius: f32,
    /// 前臂半长，默认 0.4
    pub forearm_height: f32,
    pub forearm_radius: f32,

    // ========== 腿部 ==========
    /// 大腿长度，默认 0.9
    pub thigh_height: f32,
    pub thigh_radius: f32,
    /// 小腿长度，默认 0.7
    pub leg_height: f32,
    pub leg_radius: f32,

    // ========== 关节限制 (弧度) ==========
    /// 大腿最大转角，默认 2.4
    pub thigh_angle_max: f32,
    /// 小腿最大转角，默认 1.5
    pub leg_angle_max: f32,
    /// 头部两轴最大转角，默认为量化后的 π/2 (1.57)
    pub head_angle_max: f32,

    // ========== 输入步长 ==========
    /// 每次按键的旋转量（弧度）与移动速度，默认 0.1
    pub step: f32,
}

impl Default for RigConfig {
    fn default() -> Self {
        Self {
            torso_height: 1.5,
            torso_radius: 0.75,

            head_radius: 0.32,
            eye_radius: 0.08,

            arm_height: 0.6,
            arm_radius: 0.15,
            forearm_height: 0.4,
            forearm_radius: 0.12,

            thigh_height: 0.9,
            thigh_radius: 0.3,
            leg_height: 0.7,
            leg_radius: 0.2,

            thigh_angle_max: 2.4,
            leg_angle_max: 1.5,
            // 量化后的值才能保证夹紧结果仍是两位小数
            head_angle_max: correct_angle(std::f32::consts::FRAC_PI_2),

            step: 0.1,
        }
    }
}

impl RigConfig {
    /// 躯干初始高度：站立时脚底正好落在地面
    #[inline]
    pub fn standing_height(&self) -> f32 {
        self.torso_height / 2.0 + self.thigh_height + self.leg_height
    }

    /// 检查所有尺寸与限制
    pub fn validate(&self) -> Result<()> {
        let dimensions = [
            ("torso_height", self.torso_height),
            ("torso_radius", self.torso_radius),
            ("head_radius", self.head_radius),
            ("eye_radius", self.eye_radius),
            ("arm_height", self.arm_height),
            ("arm_radius", self.arm_radius),
            ("forearm_height", self.forearm_height),
            ("forearm_radius", self.forearm_radius),
            ("thigh_height", self.thigh_height),
            ("thigh_radius", self.thigh_radius),
            ("leg_height", self.leg_height),
            ("leg_radius", self.leg_radius),
            ("thigh_angle_max", self.thigh_angle_max),
            ("leg_angle_max", self.leg_angle_max),
            ("head_angle_max", self.head_angle_max),
            ("step", self.step),
        ];

        for (name, value) in dimensions {
            if !value.is_finite() || value <= 0.0 {
                return Err(RigError::InvalidConfig(format!(
                    "{} must be a positive finite number, got {}",
                    name, value
                )));
            }
        }

        Ok(())
    }
}
