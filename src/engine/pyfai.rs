//! # pyFAI 命令行引擎
//!
//! 通过子进程调用 pyFAI 兼容的积分命令行工具。
//! 标定文件解析与图像解码都发生在引擎内部，本侧不触碰像素数据。
//!
//! ## 依赖关系
//! - 被 `commands/integrate.rs` 经 `Integrator` trait 使用
//! - 使用 `engine/mod.rs` 的 IntegrationParams

use crate::engine::{IntegrationParams, Integrator};
use crate::error::{AzintError, Result};

use std::path::{Path, PathBuf};
use std::process::Command;

/// pyFAI 命令行积分引擎
pub struct PyFaiEngine {
    /// 引擎可执行命令名
    command: String,
    /// 探测器几何标定文件 (.poni)
    poni: PathBuf,
    /// 静态像素掩模 (.tif)
    mask: PathBuf,
    /// 共享积分参数
    params: IntegrationParams,
}

impl PyFaiEngine {
    /// 创建引擎，启动时一次性校验标定文件与掩模存在
    pub fn new(
        command: impl Into<String>,
        poni: PathBuf,
        mask: PathBuf,
        params: IntegrationParams,
    ) -> Result<Self> {
        for path in [&poni, &mask] {
            if !path.is_file() {
                return Err(AzintError::FileNotFound {
                    path: path.display().to_string(),
                });
            }
        }

        Ok(Self {
            command: command.into(),
            poni,
            mask,
            params,
        })
    }
}

impl Integrator for PyFaiEngine {
    fn integrate(&self, image: &Path, output: &Path) -> Result<()> {
        if !image.is_file() {
            return Err(AzintError::ImageLoadError {
                path: image.display().to_string(),
                reason: "file does not exist".to_string(),
            });
        }

        let result = Command::new(&self.command)
            .arg("--poni")
            .arg(&self.poni)
            .arg("--mask")
            .arg(&self.mask)
            .arg("--method")
            .arg(self.params.method.to_string())
            .arg("--unit")
            .arg(self.params.unit.as_engine_str())
            .arg("--npt")
            .arg(self.params.npt.to_string())
            .arg("--dummy")
            .arg(format!("{:e}", self.params.dummy))
            .arg("--error-model")
            .arg(self.params.error_model.to_string())
            .arg("--no-solid-angle")
            .arg("-o")
            .arg(output)
            .arg(image)
            .output();

        let output_info = match result {
            Ok(o) => o,
            Err(_) => {
                return Err(AzintError::CommandNotFound {
                    command: self.command.clone(),
                })
            }
        };

        if output_info.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output_info.stderr).to_string();

        // 引擎打不开图像时归类为图像加载错误，保留文件上下文
        if stderr.contains("unable to read") || stderr.contains("not a valid image") {
            return Err(AzintError::ImageLoadError {
                path: image.display().to_string(),
                reason: stderr,
            });
        }

        Err(AzintError::CommandFailed {
            command: self.command.clone(),
            stderr,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::integrate::{ErrorModel, IntMethod, RadialUnit};

    fn params() -> IntegrationParams {
        IntegrationParams {
            method: IntMethod::Full,
            unit: RadialUnit::TthDeg,
            npt: 6000,
            dummy: -1e-10,
            error_model: ErrorModel::None,
        }
    }

    #[test]
    fn test_new_requires_calibration_files() {
        let dir = tempfile::tempdir().unwrap();
        let poni = dir.path().join("Si_allrings.poni");
        let mask = dir.path().join("Si_mask.tif");

        let err = PyFaiEngine::new("pyfai-integrate", poni.clone(), mask.clone(), params());
        assert!(matches!(err, Err(AzintError::FileNotFound { .. })));

        std::fs::write(&poni, "poni").unwrap();
        std::fs::write(&mask, "mask").unwrap();
        assert!(PyFaiEngine::new("pyfai-integrate", poni, mask, params()).is_ok());
    }

    #[test]
    fn test_missing_image_is_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let poni = dir.path().join("a.poni");
        let mask = dir.path().join("m.tif");
        std::fs::write(&poni, "poni").unwrap();
        std::fs::write(&mask, "mask").unwrap();

        let engine = PyFaiEngine::new("pyfai-integrate", poni, mask, params()).unwrap();
        let err = engine.integrate(&dir.path().join("missing.tiff"), &dir.path().join("o.xy"));
        assert!(matches!(err, Err(AzintError::ImageLoadError { .. })));
    }
}
