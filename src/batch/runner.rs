//! # 批量执行器
//!
//! `--jobs > 1` 时在单个样品文件夹内并行处理图像。
//! 标定对象与掩模整次运行只读共享，逐图像输出互不相交，
//! 因此文件夹内并行不需要额外同步。
//!
//! ## 依赖关系
//! - 被 `commands/integrate.rs` 调用
//! - 使用 `utils/progress.rs` 创建进度条
//! - 使用 `rayon` 进行并行计算

use crate::batch::report::ProcessResult;
use crate::utils::progress;

use rayon::prelude::*;
use std::path::PathBuf;

/// 批量执行器
pub struct BatchRunner {
    /// 并行作业数
    jobs: usize,
}

impl BatchRunner {
    /// 创建新的批量执行器
    pub fn new(jobs: usize) -> Self {
        let jobs = if jobs == 0 { num_cpus::get() } else { jobs };
        Self { jobs }
    }

    /// 并行处理一个文件夹内的图像列表
    ///
    /// 结果按输入顺序收集返回；并行模式下失败不会中断同文件夹内
    /// 其余图像（收集后统一汇报）。
    pub fn run<F>(&self, images: Vec<PathBuf>, label: &str, processor: F) -> Vec<ProcessResult>
    where
        F: Fn(&PathBuf) -> ProcessResult + Sync + Send,
    {
        let pb = progress::create_progress_bar(images.len() as u64, label);

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.jobs)
            .build()
            .unwrap();

        let results: Vec<ProcessResult> = pool.install(|| {
            images
                .par_iter()
                .map(|image| {
                    let result = processor(image);
                    pb.inc(1);
                    result
                })
                .collect()
        });

        pb.finish_and_clear();
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_preserves_input_order() {
        let runner = BatchRunner::new(4);
        let images: Vec<PathBuf> = (0..16).map(|i| PathBuf::from(format!("img{:03}.tiff", i))).collect();

        let results = runner.run(images.clone(), "test", |image| ProcessResult::Success {
            image: image.display().to_string(),
            seconds: 0.0,
        });

        assert_eq!(results.len(), 16);
        for (image, result) in images.iter().zip(&results) {
            match result {
                ProcessResult::Success { image: name, .. } => {
                    assert_eq!(name, &image.display().to_string())
                }
                _ => panic!("unexpected failure"),
            }
        }
    }
}
