//! # 图样表读写
//!
//! 读取带元数据前缀的空白分隔数值表，并以固定格式重写：
//! 制表符分隔、8 位小数、无表头、无索引列。
//! 下游精修软件依赖这一统一模式，与生成原始文件的引擎无关。
//!
//! ## 依赖关系
//! - 被 `commands/integrate.rs`, `commands/convert.rs` 使用
//! - 使用 `error.rs`

use crate::error::{AzintError, Result};

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// 读取数值表，跳过前 `skip_rows` 行元数据
///
/// 其余非空行按空白分隔解析为 f64，列数不限。
/// 表头之后出现非数值内容即报 `ParseError`（含 1 基行号）。
pub fn read_rows(path: &Path, skip_rows: usize) -> Result<Vec<Vec<f64>>> {
    let file = File::open(path).map_err(|e| AzintError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    let reader = BufReader::new(file);

    let mut rows = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| AzintError::FileReadError {
            path: path.display().to_string(),
            source: e,
        })?;

        if idx < skip_rows {
            continue;
        }
        if line.trim().is_empty() {
            continue;
        }

        let mut row = Vec::new();
        for token in line.split_whitespace() {
            let value: f64 = token.parse().map_err(|_| AzintError::ParseError {
                path: path.display().to_string(),
                line: idx + 1,
                reason: format!("not a number: '{}'", token),
            })?;
            row.push(value);
        }
        rows.push(row);
    }

    Ok(rows)
}

/// 读取两列图样表 (自变量, 强度)
///
/// 行宽不为 2 视为格式错误。
pub fn read_pattern(path: &Path, skip_rows: usize) -> Result<Vec<(f64, f64)>> {
    let rows = read_rows(path, skip_rows)?;

    let mut points = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        if row.len() != 2 {
            return Err(AzintError::ParseError {
                path: path.display().to_string(),
                line: skip_rows + i + 1,
                reason: format!("expected 2 columns, found {}", row.len()),
            });
        }
        points.push((row[0], row[1]));
    }

    Ok(points)
}

/// 写出数值表：制表符分隔，8 位小数，无表头
pub fn write_rows(path: &Path, rows: &[Vec<f64>]) -> Result<()> {
    let file = File::create(path).map_err(|e| AzintError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    })?;
    let mut writer = BufWriter::new(file);

    for row in rows {
        let formatted: Vec<String> = row.iter().map(|v| format!("{:.8}", v)).collect();
        writeln!(writer, "{}", formatted.join("\t")).map_err(|e| AzintError::FileWriteError {
            path: path.display().to_string(),
            source: e,
        })?;
    }

    writer.flush().map_err(|e| AzintError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    })?;

    Ok(())
}

/// 写出两列图样表
pub fn write_pattern(path: &Path, points: &[(f64, f64)]) -> Result<()> {
    let file = File::create(path).map_err(|e| AzintError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    })?;
    let mut writer = BufWriter::new(file);

    for (x, intensity) in points {
        writeln!(writer, "{:.8}\t{:.8}", x, intensity).map_err(|e| AzintError::FileWriteError {
            path: path.display().to_string(),
            source: e,
        })?;
    }

    writer.flush().map_err(|e| AzintError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    })?;

    Ok(())
}

/// 原地重写引擎输出：去掉元数据头，统一为两列固定格式
pub fn reformat_in_place(path: &Path, skip_rows: usize) -> Result<()> {
    let points = read_pattern(path, skip_rows)?;
    write_pattern(path, &points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    fn write_temp(dir: &tempfile::TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    fn read_string(path: &Path) -> String {
        let mut s = String::new();
        File::open(path).unwrap().read_to_string(&mut s).unwrap();
        s
    }

    #[test]
    fn test_read_rows_skips_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_temp(
            &dir,
            "sample.chi",
            "# title\n# wavelength 0.1867\n1.0 10.0\n2.0 20.0\n",
        );

        let rows = read_rows(&path, 2).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], vec![1.0, 10.0]);
        assert_eq!(rows[1], vec![2.0, 20.0]);
    }

    #[test]
    fn test_read_rows_header_off_by_one_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_temp(&dir, "sample.chi", "# meta 1\n# meta 2\n1.0 10.0\n");

        // Skipping one line too few leaves a metadata line in the data region.
        let err = read_rows(&path, 1).unwrap_err();
        match err {
            AzintError::ParseError { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_read_rows_header_over_skip_drops_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_temp(&dir, "sample.chi", "# meta\n1.0 10.0\n2.0 20.0\n");

        // Skipping one line too many silently loses the first data row.
        let rows = read_rows(&path, 2).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0], vec![2.0, 20.0]);
    }

    #[test]
    fn test_read_pattern_rejects_three_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_temp(&dir, "sample.xy", "1.0 10.0 0.5\n");

        let err = read_pattern(&path, 0).unwrap_err();
        match err {
            AzintError::ParseError { reason, .. } => {
                assert!(reason.contains("expected 2 columns"))
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_write_pattern_fixed_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xy");

        write_pattern(&path, &[(1.5, 100.0), (2.0, 0.123456789)]).unwrap();

        let content = read_string(&path);
        assert_eq!(content, "1.50000000\t100.00000000\n2.00000000\t0.12345679\n");
    }

    #[test]
    fn test_reformat_in_place_uniform_schema() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_temp(
            &dir,
            "img001.xy",
            "# == pyFAI calibration ==\n# npt 3\n# 2th_deg I\n0.03 12.5\n0.06 13.25\n0.09 14\n",
        );

        reformat_in_place(&path, 3).unwrap();

        let content = read_string(&path);
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        for line in &lines {
            let cols: Vec<&str> = line.split('\t').collect();
            assert_eq!(cols.len(), 2);
            for col in cols {
                // 8 decimal places, no exponent
                let frac = col.split('.').nth(1).unwrap();
                assert_eq!(frac.len(), 8);
            }
        }
        assert_eq!(lines[2], "0.09000000\t14.00000000");
    }

    #[test]
    fn test_reformat_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_temp(&dir, "img.xy", "# h\n1.0 2.0\n3.0 4.0\n");

        reformat_in_place(&path, 1).unwrap();
        let first = read_string(&path);

        reformat_in_place(&path, 0).unwrap();
        let second = read_string(&path);

        assert_eq!(first, second);
    }
}
