//! # 目录镜像
//!
//! 根据关键词筛选图像根目录下的样品文件夹，在输出根目录下
//! 建立同名文件夹，供 1D 图样落盘。
//!
//! ## 功能
//! - 关键词为大小写敏感的子串匹配
//! - 目标文件夹已存在时跳过（幂等，可重复运行）
//! - 运行后按数量核对源 / 目标文件夹（仅计数，咨询性检查）
//!
//! ## 依赖关系
//! - 被 `commands/integrate.rs` 调用
//! - 使用 `error.rs`, `utils/output.rs`

use crate::error::{AzintError, Result};
use crate::utils::output;

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// 镜像结果统计
#[derive(Debug)]
pub struct MirrorSummary {
    /// 匹配关键词的源文件夹名（排序后）
    pub matched: Vec<String>,
    /// 本次新建的目标文件夹数
    pub created: usize,
    /// 已存在而跳过的目标文件夹数
    pub existing: usize,
}

/// 列出 `root` 下名字包含 `keyword` 的一级子目录，排序返回
pub fn list_matching_folders(root: &Path, keyword: &str) -> Result<Vec<String>> {
    let entries = fs::read_dir(root).map_err(|e| AzintError::FileReadError {
        path: root.display().to_string(),
        source: e,
    })?;

    let mut folders = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| AzintError::FileReadError {
            path: root.display().to_string(),
            source: e,
        })?;
        if !entry.path().is_dir() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            if name.contains(keyword) {
                folders.push(name.to_string());
            }
        }
    }

    folders.sort();
    Ok(folders)
}

/// 为每个匹配的源文件夹在 `dst_root` 下建立同名目标文件夹
///
/// `dst_root` 不存在时先创建（含父目录）。目标文件夹已存在
/// 仅跳过并计数，其他创建失败一律上抛。
pub fn mirror_folders(src_root: &Path, dst_root: &Path, keyword: &str) -> Result<MirrorSummary> {
    if !src_root.is_dir() {
        return Err(AzintError::DirectoryNotFound {
            path: src_root.display().to_string(),
        });
    }

    fs::create_dir_all(dst_root).map_err(|e| AzintError::DirectoryCreateError {
        path: dst_root.display().to_string(),
        source: e,
    })?;

    let matched = list_matching_folders(src_root, keyword)?;

    let mut created = 0;
    let mut existing = 0;
    for folder in &matched {
        let target = dst_root.join(folder);
        match fs::create_dir(&target) {
            Ok(()) => created += 1,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                output::print_skip(&format!("folder for {} already exists", folder));
                existing += 1;
            }
            Err(e) => {
                return Err(AzintError::DirectoryCreateError {
                    path: target.display().to_string(),
                    source: e,
                })
            }
        }
    }

    Ok(MirrorSummary {
        matched,
        created,
        existing,
    })
}

/// 计数核对：匹配的源文件夹数与目标文件夹数是否一致
///
/// 仅比较数量不比较名字，不一致也只给出警告，不阻断积分。
pub fn check_folder_counts(summary: &MirrorSummary, dst_root: &Path, keyword: &str) -> Result<bool> {
    let dst_matched = list_matching_folders(dst_root, keyword)?;

    if summary.matched.len() != dst_matched.len() {
        output::print_warning(&format!(
            "Mismatch in folder counts: {} source folder(s) vs {} output folder(s)",
            summary.matched.len(),
            dst_matched.len()
        ));
        return Ok(false);
    }

    Ok(true)
}
