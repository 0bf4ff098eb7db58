//! # convert 子命令 CLI 定义
//!
//! 批量转换图样文本格式 (.chi -> .xy)
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/convert.rs`

use clap::Args;
use std::path::PathBuf;

/// convert 子命令参数
#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Input directory containing .chi pattern files
    #[arg(short, long)]
    pub input: PathBuf,

    /// Number of leading metadata lines to skip in each source file
    #[arg(short, long)]
    pub skip_rows: usize,

    /// Output directory for converted files (defaults to the input directory)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Source file extension
    #[arg(long, default_value = "chi")]
    pub from_ext: String,

    /// Target file extension
    #[arg(long, default_value = "xy")]
    pub to_ext: String,
}
