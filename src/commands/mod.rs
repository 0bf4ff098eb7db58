//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `engine/`, `mirror`, `pattern`, `batch/`, `utils/`
//! - 子模块: integrate, convert

pub mod convert;
pub mod integrate;

use crate::cli::Commands;
use crate::error::Result;

/// 执行命令
pub fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Integrate(args) => integrate::execute(args),
        Commands::Convert(args) => convert::execute(args),
    }
}
