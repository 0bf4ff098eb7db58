//! # 外部积分引擎封装
//!
//! 2D -> 1D 方位角积分委托给外部标定 / 积分程序（pyFAI 系）完成，
//! 本模块只负责组织参数、定位标定文件并逐张调用。
//!
//! ## 功能
//! - 整次运行共享的只读积分参数
//! - 启动时一次性校验 .poni 标定文件与静态掩模
//! - `Integrator` trait 作为引擎接缝，便于测试替换
//!
//! ## 依赖关系
//! - 被 `commands/integrate.rs` 调用
//! - 使用 `cli/integrate.rs` 的参数枚举
//! - 子模块: pyfai

pub mod pyfai;

pub use pyfai::PyFaiEngine;

use crate::cli::integrate::{ErrorModel, IntMethod, RadialUnit};
use crate::error::Result;

use std::path::Path;

/// 整次运行不变的积分参数
#[derive(Debug, Clone, Copy)]
pub struct IntegrationParams {
    /// 像素分割方法
    pub method: IntMethod,
    /// 径向轴单位
    pub unit: RadialUnit,
    /// 方位角积分点数（输出分箱数）
    pub npt: u32,
    /// 低于此强度的像素按哑值剔除
    pub dummy: f64,
    /// 方差估计模型
    pub error_model: ErrorModel,
}

/// 方位角积分引擎接缝
///
/// 实现方读取 `image` 指向的 2D 图像，将原始 1D 图样写入 `output`。
pub trait Integrator {
    fn integrate(&self, image: &Path, output: &Path) -> Result<()>;
}
