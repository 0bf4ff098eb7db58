//! # integrate 子命令 CLI 定义
//!
//! 批量方位角积分：扫描图像根目录，按关键词筛选样品文件夹，
//! 逐张调用外部积分引擎并重写输出图样。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/integrate.rs`
//! - 积分参数枚举被 `engine/` 使用

use clap::{Args, ValueEnum};
use std::path::PathBuf;

/// 像素分割 / 分箱方法
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum IntMethod {
    /// Full pixel splitting
    Full,
    /// Compressed sparse row (default engine method)
    Csr,
    /// Bounding-box pixel splitting
    Bbox,
    /// No pixel splitting
    NoSplit,
}

impl std::fmt::Display for IntMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IntMethod::Full => write!(f, "full"),
            IntMethod::Csr => write!(f, "csr"),
            IntMethod::Bbox => write!(f, "bbox"),
            IntMethod::NoSplit => write!(f, "nosplit"),
        }
    }
}

/// 输出图样自变量单位
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum RadialUnit {
    /// Scattering angle 2theta in degrees
    TthDeg,
    /// Scattering angle 2theta in radians
    TthRad,
    /// Momentum transfer q in inverse nanometers
    QNm,
    /// Momentum transfer q in inverse Angstroms
    QA,
    /// Radial distance in millimeters
    RMm,
    /// Radial distance in meters
    RM,
}

impl RadialUnit {
    /// 引擎侧单位字符串
    pub fn as_engine_str(&self) -> &'static str {
        match self {
            RadialUnit::TthDeg => "2th_deg",
            RadialUnit::TthRad => "2th_rad",
            RadialUnit::QNm => "q_nm^-1",
            RadialUnit::QA => "q_A^-1",
            RadialUnit::RMm => "r_mm",
            RadialUnit::RM => "r_m",
        }
    }
}

impl std::fmt::Display for RadialUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_engine_str())
    }
}

/// 方差估计模型
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
pub enum ErrorModel {
    /// No error model
    #[default]
    None,
    /// Poisson statistics (variance = I)
    Poisson,
    /// Azimuthal statistics (variance = (I - <I>)^2)
    Azimuthal,
}

impl std::fmt::Display for ErrorModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorModel::None => write!(f, "none"),
            ErrorModel::Poisson => write!(f, "poisson"),
            ErrorModel::Azimuthal => write!(f, "azimuthal"),
        }
    }
}

/// integrate 子命令参数
#[derive(Args, Debug)]
pub struct IntegrateArgs {
    /// Root directory containing sample image folders (e.g. tiff_base)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Root directory for mirrored 1D pattern folders (e.g. XY)
    #[arg(short, long)]
    pub output: PathBuf,

    /// Substring selecting which sample folders to integrate (case-sensitive)
    #[arg(short, long)]
    pub keyword: String,

    /// Detector geometry calibration file (.poni)
    #[arg(long)]
    pub poni: PathBuf,

    /// Static pixel mask image (.tif)
    #[arg(long)]
    pub mask: PathBuf,

    /// Pixel splitting method passed to the integration engine
    #[arg(long, value_enum, default_value = "full")]
    pub method: IntMethod,

    /// Physical unit of the radial axis in output patterns
    #[arg(long, value_enum, default_value = "tth-deg")]
    pub unit: RadialUnit,

    /// Number of azimuthal integration points (output bins)
    #[arg(long, default_value_t = 6000)]
    pub npt: u32,

    /// Dummy threshold: pixels below this intensity are masked out
    #[arg(long, default_value_t = -1e-10, allow_hyphen_values = true)]
    pub dummy: f64,

    /// Variance estimation model passed to the integration engine
    #[arg(long, value_enum, default_value = "none")]
    pub error_model: ErrorModel,

    /// Number of engine metadata lines to strip from raw output files
    #[arg(long, default_value_t = 23)]
    pub skip_rows: usize,

    /// Conventional subfolder holding dark-subtracted images
    #[arg(long, default_value = "dark_sub")]
    pub subdir: String,

    /// Glob pattern for image files
    #[arg(short, long, default_value = "*.tiff")]
    pub pattern: String,

    /// External integration engine command
    #[arg(long, default_value = "pyfai-integrate")]
    pub engine: String,

    /// Record failures and continue instead of aborting on the first error
    #[arg(long, default_value_t = false)]
    pub keep_going: bool,

    /// Number of parallel jobs per folder (0 = auto, 1 = sequential)
    #[arg(short, long, default_value_t = 1)]
    pub jobs: usize,

    /// Write a per-image CSV run report to this path
    #[arg(long)]
    pub report_csv: Option<PathBuf>,
}
