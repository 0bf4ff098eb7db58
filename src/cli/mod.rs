//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `integrate`: 批量方位角积分（2D 图像 -> 1D 图样）
//! - `convert`: 图样文本格式转换 (.chi -> .xy)
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: integrate, convert

pub mod convert;
pub mod integrate;

use clap::{Parser, Subcommand};

/// azint - 粉末衍射批量积分工具箱
#[derive(Parser)]
#[command(name = "azint")]
#[command(author = "Changjiang Wu")]
#[command(version)]
#[command(about = "Batch azimuthal integration and pattern format conversion toolkit", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Integrate 2D detector images into 1D patterns via an external engine
    Integrate(integrate::IntegrateArgs),

    /// Convert text pattern files between formats (.chi -> .xy)
    Convert(convert::ConvertArgs),
}
