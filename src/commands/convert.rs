//! # convert 命令实现
//!
//! 批量转换图样文本格式：读取目录下所有 .chi 文件，
//! 跳过指定行数的元数据头，重写为制表符分隔、8 位小数、
//! 无表头的 .xy 文件。
//!
//! ## 依赖关系
//! - 使用 `cli/convert.rs` 定义的参数
//! - 使用 `pattern.rs`
//! - 使用 `utils/output.rs`

use crate::cli::convert::ConvertArgs;
use crate::error::{AzintError, Result};
use crate::pattern;
use crate::utils::output;

use std::fs;
use std::path::{Path, PathBuf};

/// 执行 convert 命令
pub fn execute(args: ConvertArgs) -> Result<()> {
    output::print_header(&format!(
        "Converting .{} -> .{}",
        args.from_ext, args.to_ext
    ));

    if !args.input.is_dir() {
        return Err(AzintError::DirectoryNotFound {
            path: args.input.display().to_string(),
        });
    }

    let out_dir = args.output.clone().unwrap_or_else(|| args.input.clone());
    fs::create_dir_all(&out_dir).map_err(|e| AzintError::DirectoryCreateError {
        path: out_dir.display().to_string(),
        source: e,
    })?;

    let files = collect_source_files(&args.input, &args.from_ext)?;
    if files.is_empty() {
        output::print_warning(&format!(
            "No .{} files found under {}",
            args.from_ext,
            args.input.display()
        ));
        return Ok(());
    }

    for path in &files {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("pattern");
        let out_path = out_dir.join(format!("{}.{}", stem, args.to_ext));

        let rows = pattern::read_rows(path, args.skip_rows)?;
        pattern::write_rows(&out_path, &rows)?;
    }

    output::print_done(&format!(
        "Converted {} file(s) to .{} in '{}'",
        files.len(),
        args.to_ext,
        out_dir.display()
    ));

    Ok(())
}

/// 收集输入目录下指定扩展名的文件，排序返回
fn collect_source_files(input_dir: &Path, ext: &str) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(input_dir).map_err(|e| AzintError::FileReadError {
        path: input_dir.display().to_string(),
        source: e,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| AzintError::FileReadError {
            path: input_dir.display().to_string(),
            source: e,
        })?;
        let path = entry.path();
        if path.is_file() && path.extension().and_then(|e| e.to_str()) == Some(ext) {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_CHI: &str = "\
sample.chi: 2-theta scan
2-Theta Angle (Degrees)
Intensity
        10 points
1.0 101.5
2.0 102.5
3.0 103.5
4.0 104.5
5.0 105.5
6.0 106.5
7.0 107.5
8.0 108.5
9.0 109.5
10.0 110.5
";

    fn make_args(input: &Path, skip_rows: usize) -> ConvertArgs {
        ConvertArgs {
            input: input.to_path_buf(),
            skip_rows,
            output: None,
            from_ext: "chi".to_string(),
            to_ext: "xy".to_string(),
        }
    }

    #[test]
    fn test_chi_to_xy_example() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("sample.chi"), SAMPLE_CHI).unwrap();

        execute(make_args(dir.path(), 4)).unwrap();

        let content = fs::read_to_string(dir.path().join("sample.xy")).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 10);
        assert_eq!(lines[0], "1.00000000\t101.50000000");
        assert_eq!(lines[9], "10.00000000\t110.50000000");
    }

    #[test]
    fn test_output_directory_auto_created() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("sample.chi"), SAMPLE_CHI).unwrap();

        let nested = dir.path().join("a").join("b").join("xy_out");
        let mut args = make_args(dir.path(), 4);
        args.output = Some(nested.clone());

        execute(args).unwrap();

        assert!(nested.join("sample.xy").is_file());
        // 输入目录保持不变
        assert!(!dir.path().join("sample.xy").exists());
    }

    #[test]
    fn test_rerun_is_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("sample.chi"), SAMPLE_CHI).unwrap();

        execute(make_args(dir.path(), 4)).unwrap();
        let first = fs::read(dir.path().join("sample.xy")).unwrap();

        execute(make_args(dir.path(), 4)).unwrap();
        let second = fs::read(dir.path().join("sample.xy")).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_wrong_skip_count_fails() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("sample.chi"), SAMPLE_CHI).unwrap();

        // 跳过行数不足，元数据落入数据区
        let err = execute(make_args(dir.path(), 3));
        assert!(matches!(err, Err(AzintError::ParseError { .. })));
    }

    #[test]
    fn test_empty_directory_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        execute(make_args(dir.path(), 4)).unwrap();
    }
}
