//! # azint - 粉末衍射批量积分工具箱
//!
//! 将同步辐射线站的积分与格式转换脚本用 Rust 重构，统一成单一可执行文件。
//!
//! ## 子命令
//! - `integrate` - 批量调用外部方位角积分引擎，将 2D 衍射图像归约为 1D 图样
//! - `convert`   - 批量转换文本图样格式 (.chi -> .xy)
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── engine/    (外部积分引擎封装)
//!   │     ├── mirror     (目录镜像)
//!   │     └── pattern    (图样表读写)
//!   ├── batch/      (运行报告与并行执行)
//!   ├── utils/      (工具函数)
//!   └── error.rs    (错误处理)
//! ```

mod batch;
mod cli;
mod commands;
mod engine;
mod error;
mod mirror;
mod pattern;
mod utils;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    if let Err(e) = commands::run(cli.command) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
