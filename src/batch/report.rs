//! # 运行报告
//!
//! 收集逐图像处理结果，汇总为终端表格与可选的 CSV 报告。
//!
//! ## 依赖关系
//! - 被 `commands/integrate.rs` 使用
//! - 使用 `tabled` 渲染汇总表
//! - 使用 `csv` + `serde` 写报告文件

use crate::error::Result;
use crate::utils::output;

use serde::Serialize;
use std::path::Path;
use tabled::{Table, Tabled};

/// 单张图像处理结果
#[derive(Debug, Clone)]
pub enum ProcessResult {
    /// 积分并重写成功
    Success { image: String, seconds: f64 },
    /// 处理失败
    Failed {
        image: String,
        seconds: f64,
        error: String,
    },
}

impl ProcessResult {
    pub fn is_failed(&self) -> bool {
        matches!(self, ProcessResult::Failed { .. })
    }
}

/// 单个样品文件夹统计
#[derive(Debug, Clone)]
pub struct FolderSummary {
    /// 文件夹名
    pub folder: String,
    /// 处理的图像数
    pub images: usize,
    /// 失败数
    pub failed: usize,
    /// 文件夹耗时 (s)
    pub seconds: f64,
}

/// CSV 报告行
#[derive(Debug, Clone, Serialize)]
struct ImageRecord {
    folder: String,
    image: String,
    status: String,
    seconds: f64,
    error: String,
}

/// 整次运行报告
#[derive(Debug, Default)]
pub struct RunReport {
    folders: Vec<FolderSummary>,
    records: Vec<ImageRecord>,
}

impl RunReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录一张图像的处理结果
    pub fn record(&mut self, folder: &str, result: &ProcessResult) {
        let record = match result {
            ProcessResult::Success { image, seconds } => ImageRecord {
                folder: folder.to_string(),
                image: image.clone(),
                status: "ok".to_string(),
                seconds: *seconds,
                error: String::new(),
            },
            ProcessResult::Failed {
                image,
                seconds,
                error,
            } => ImageRecord {
                folder: folder.to_string(),
                image: image.clone(),
                status: "failed".to_string(),
                seconds: *seconds,
                error: error.clone(),
            },
        };
        self.records.push(record);
    }

    /// 记录一个文件夹的汇总
    pub fn finish_folder(&mut self, summary: FolderSummary) {
        self.folders.push(summary);
    }

    /// 处理的图像总数
    pub fn total_images(&self) -> usize {
        self.records.len()
    }

    /// 失败总数
    pub fn total_failed(&self) -> usize {
        self.records.iter().filter(|r| r.status == "failed").count()
    }

    /// 单张图像平均耗时 (s)
    pub fn mean_seconds(&self, total_seconds: f64) -> f64 {
        if self.records.is_empty() {
            0.0
        } else {
            total_seconds / self.records.len() as f64
        }
    }

    /// 打印逐文件夹汇总表与运行总计
    pub fn print_summary(&self, total_seconds: f64) {
        #[derive(Tabled)]
        struct FolderRow {
            #[tabled(rename = "Folder")]
            folder: String,
            #[tabled(rename = "Images")]
            images: String,
            #[tabled(rename = "Failed")]
            failed: String,
            #[tabled(rename = "Time (s)")]
            seconds: String,
        }

        if !self.folders.is_empty() {
            output::print_header("Integration Summary");
            let rows: Vec<FolderRow> = self
                .folders
                .iter()
                .map(|f| FolderRow {
                    folder: f.folder.clone(),
                    images: f.images.to_string(),
                    failed: f.failed.to_string(),
                    seconds: format!("{:.2}", f.seconds),
                })
                .collect();
            println!("{}", Table::new(&rows));
        }

        for record in self.records.iter().filter(|r| r.status == "failed") {
            output::print_error(&format!(
                "{}/{}: {}",
                record.folder, record.image, record.error
            ));
        }

        output::print_done(&format!(
            "Integrated {} image(s) in {:.2} s ({:.2} s/image, {} failed)",
            self.total_images(),
            total_seconds,
            self.mean_seconds(total_seconds),
            self.total_failed()
        ));
    }

    /// 写出逐图像 CSV 报告
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        let mut wtr = csv::Writer::from_path(path)?;
        for record in &self.records {
            wtr.serialize(record)?;
        }
        wtr.flush().map_err(csv::Error::from)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_totals() {
        let mut report = RunReport::new();
        report.record(
            "SiSample1",
            &ProcessResult::Success {
                image: "img001.tiff".to_string(),
                seconds: 1.0,
            },
        );
        report.record(
            "SiSample1",
            &ProcessResult::Failed {
                image: "img002.tiff".to_string(),
                seconds: 0.5,
                error: "boom".to_string(),
            },
        );

        assert_eq!(report.total_images(), 2);
        assert_eq!(report.total_failed(), 1);
        assert!((report.mean_seconds(3.0) - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_write_csv_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.csv");

        let mut report = RunReport::new();
        report.record(
            "SiSample1",
            &ProcessResult::Success {
                image: "img001.tiff".to_string(),
                seconds: 1.25,
            },
        );
        report.write_csv(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("folder,image,status,seconds,error\n"));
        assert!(content.contains("SiSample1,img001.tiff,ok,1.25,"));
    }
}
