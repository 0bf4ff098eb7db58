//! # integrate 命令实现
//!
//! 批量方位角积分驱动：
//! 镜像目标目录 -> 逐文件夹枚举暗场扣除图像 -> 逐张调用外部
//! 积分引擎 -> 原地重写输出为统一两列格式。
//!
//! ## 功能
//! - 逐图像 / 逐文件夹 / 整次运行的耗时遥测
//! - 默认遇错即止（参考行为），`--keep-going` 记录失败并继续
//! - `--jobs > 1` 时文件夹内并行（隐含失败收集语义）
//!
//! ## 依赖关系
//! - 使用 `cli/integrate.rs` 定义的参数
//! - 使用 `engine/`, `mirror.rs`, `pattern.rs`
//! - 使用 `batch/`, `utils/output.rs`

use crate::batch::{BatchRunner, FolderSummary, ProcessResult, RunReport};
use crate::cli::integrate::IntegrateArgs;
use crate::engine::{IntegrationParams, Integrator, PyFaiEngine};
use crate::error::{AzintError, Result};
use crate::mirror;
use crate::pattern;
use crate::utils::output;

use std::path::{Path, PathBuf};
use std::time::Instant;
use walkdir::WalkDir;

/// 执行 integrate 命令
pub fn execute(args: IntegrateArgs) -> Result<()> {
    output::print_header("Batch Azimuthal Integration");

    if !args.input.exists() {
        return Err(AzintError::DirectoryNotFound {
            path: args.input.display().to_string(),
        });
    }

    let params = IntegrationParams {
        method: args.method,
        unit: args.unit,
        npt: args.npt,
        dummy: args.dummy,
        error_model: args.error_model,
    };
    let engine = PyFaiEngine::new(args.engine.clone(), args.poni.clone(), args.mask.clone(), params)?;

    run_with_engine(&args, &engine)
}

/// 用任意引擎执行批量积分（测试经此替换引擎）
pub(crate) fn run_with_engine(args: &IntegrateArgs, engine: &(dyn Integrator + Sync)) -> Result<()> {
    // 镜像输出目录树
    let summary = mirror::mirror_folders(&args.input, &args.output, &args.keyword)?;
    output::print_info(&format!(
        "Mirrored {} folder(s) ({} created, {} already existed)",
        summary.matched.len(),
        summary.created,
        summary.existing
    ));

    if mirror::check_folder_counts(&summary, &args.output, &args.keyword)? {
        output::print_info("Same number of image and pattern folders - good to go");
    }

    if summary.matched.is_empty() {
        output::print_warning(&format!(
            "No folders matching '{}' under {}",
            args.keyword,
            args.input.display()
        ));
        return Ok(());
    }

    let num_folders = summary.matched.len();
    let mut report = RunReport::new();
    let t_run = Instant::now();

    for (folder_idx, folder) in summary.matched.iter().enumerate() {
        let t_folder = Instant::now();
        output::print_info(&format!(
            "Integrating folder #{} of {}: {}",
            folder_idx + 1,
            num_folders,
            folder
        ));

        let int_dir = args.input.join(folder).join(&args.subdir);
        if !int_dir.is_dir() {
            if args.keep_going {
                output::print_warning(&format!(
                    "{}: no '{}' subfolder, skipping",
                    folder, args.subdir
                ));
                continue;
            }
            return Err(AzintError::DirectoryNotFound {
                path: int_dir.display().to_string(),
            });
        }

        let images = collect_images(&int_dir, &args.pattern)?;
        if images.is_empty() {
            output::print_warning(&format!(
                "No images matching '{}' in {}",
                args.pattern,
                int_dir.display()
            ));
            continue;
        }

        let out_dir = args.output.join(folder);
        let num_images = images.len();

        let results = if args.jobs == 1 {
            let mut results = Vec::with_capacity(num_images);
            for (image_idx, image) in images.iter().enumerate() {
                let t_image = Instant::now();
                let outcome = process_image(engine, image, &out_dir, args.skip_rows);
                let seconds = t_image.elapsed().as_secs_f64();
                let name = image_name(image);

                match outcome {
                    Ok(()) => {
                        output::print_info(&format!(
                            "Integrated image #{} of {} for {} in {:.2} s",
                            image_idx + 1,
                            num_images,
                            folder,
                            seconds
                        ));
                        results.push(ProcessResult::Success {
                            image: name,
                            seconds,
                        });
                    }
                    Err(e) => {
                        if !args.keep_going {
                            output::print_error(&format!("{}/{} failed", folder, name));
                            return Err(e);
                        }
                        results.push(ProcessResult::Failed {
                            image: name,
                            seconds,
                            error: e.to_string(),
                        });
                    }
                }
            }
            results
        } else {
            // 并行模式下结果统一收集，不逐张中断
            let runner = BatchRunner::new(args.jobs);
            runner.run(images, folder, |image| {
                let t_image = Instant::now();
                let outcome = process_image(engine, image, &out_dir, args.skip_rows);
                let seconds = t_image.elapsed().as_secs_f64();
                let name = image_name(image);
                match outcome {
                    Ok(()) => ProcessResult::Success {
                        image: name,
                        seconds,
                    },
                    Err(e) => ProcessResult::Failed {
                        image: name,
                        seconds,
                        error: e.to_string(),
                    },
                }
            })
        };

        let failed = results.iter().filter(|r| r.is_failed()).count();
        for result in &results {
            report.record(folder, result);
        }

        let folder_seconds = t_folder.elapsed().as_secs_f64();
        output::print_info(&format!(
            "Folder #{} ({}) done in {:.2} s",
            folder_idx + 1,
            folder,
            folder_seconds
        ));
        report.finish_folder(FolderSummary {
            folder: folder.clone(),
            images: num_images,
            failed,
            seconds: folder_seconds,
        });
    }

    report.print_summary(t_run.elapsed().as_secs_f64());

    if let Some(ref path) = args.report_csv {
        report.write_csv(path)?;
        output::print_info(&format!("Run report written to {}", path.display()));
    }

    Ok(())
}

/// 积分单张图像并重写输出为统一两列格式
fn process_image(
    engine: &dyn Integrator,
    image: &Path,
    out_dir: &Path,
    skip_rows: usize,
) -> Result<()> {
    let stem = image
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("image");
    let out_path = out_dir.join(format!("{}.xy", stem));

    engine.integrate(image, &out_path)?;
    pattern::reformat_in_place(&out_path, skip_rows)
}

/// 收集子文件夹内匹配模式的图像，排序返回
fn collect_images(int_dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let glob_pattern = glob::Pattern::new(pattern)
        .map_err(|e| AzintError::InvalidArgument(format!("Invalid pattern '{}': {}", pattern, e)))?;

    let mut images = Vec::new();
    for entry in WalkDir::new(int_dir).max_depth(1).into_iter().filter_map(|e| e.ok()) {
        if entry.file_type().is_file() {
            if let Some(name) = entry.file_name().to_str() {
                if glob_pattern.matches(name) {
                    images.push(entry.path().to_path_buf());
                }
            }
        }
    }

    images.sort();
    Ok(images)
}

fn image_name(image: &Path) -> String {
    image
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("image")
        .to_string()
}
