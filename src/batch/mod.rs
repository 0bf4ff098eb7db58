//! # 批量处理模块
//!
//! 提供逐图像结果收集、运行报告与可选的并行执行。
//!
//! ## 功能
//! - 显式的逐项成功 / 失败结果（而非遇错即崩）
//! - 逐文件夹与整次运行的耗时统计
//! - 终端汇总表与可选 CSV 报告
//! - `--jobs > 1` 时基于 rayon 的文件夹内并行
//!
//! ## 依赖关系
//! - 被 `commands/integrate.rs` 使用
//! - 使用 `rayon` 进行并行处理
//! - 使用 `indicatif` 显示进度
//! - 使用 `tabled`, `csv` 输出报告

pub mod report;
pub mod runner;

pub use report::{FolderSummary, ProcessResult, RunReport};
pub use runner::BatchRunner;
