//! # 命令行接口模块
//!
//! 使用 `clap` 定义了程序的命令行结构，包括子命令和参数。
//! 所有用户通过命令行与程序交互的入口点都在此模块中定义。

use crate::constants::{DEFAULT_BITS_PER_CHANNEL, DEFAULT_HIDDEN_HEIGHT, DEFAULT_HIDDEN_WIDTH};
use crate::steganography::Reconstruction;
use clap::{ArgAction, Parser, ValueEnum};
use log::Level;
use std::path::PathBuf;

/// 一款基于 LSB (最低有效位) 隐写术的命令行工具，用于将一张图片隐藏到另一张无损格式图像中，或将其提取出来。
#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = "一款基于 LSB (最低有效位) 隐写术的命令行工具，用于将一张图片隐藏到另一张无损格式图像 (如 PNG, BMP) 中，或从隐写图像中提取出隐藏的图片。"
)]
pub struct Cli {
    /// 输出更详细的日志，可重复使用 (-v, -vv, -vvv)。
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// 根据 `-v` 出现的次数确定日志级别。
    pub fn log_level(&self) -> Level {
        match self.verbose {
            0 => Level::Warn,
            1 => Level::Info,
            2 => Level::Debug,
            _ => Level::Trace,
        }
    }
}

/// 可用的子命令：embed (嵌入) 和 extract (提取)。
#[derive(Parser, Debug)]
pub enum Commands {
    /// 将隐藏图像嵌入到载体图像中，生成隐写图像。
    Embed(EmbedArgs),

    /// 从隐写图像中提取隐藏的图像。
    Extract(ExtractArgs),
}

/// 'embed' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct EmbedArgs {
    /// 载体图像文件路径。
    pub carrier: PathBuf,

    /// 要隐藏的图像文件路径。
    pub hidden: PathBuf,

    /// 隐写图像的输出路径，必须是无损格式。
    /// 默认为载体所在目录下的 `stego_<载体文件名>.png`。
    #[arg(short, long)]
    pub dest: Option<PathBuf>,

    /// 每个颜色通道使用的低位数量 (1-8)。
    #[arg(short, long, default_value_t = DEFAULT_BITS_PER_CHANNEL, value_parser = clap::value_parser!(u8).range(1..=8))]
    pub bits: u8,

    /// 输出文件已存在时强制覆盖。
    #[arg(short, long)]
    pub force: bool,
}

/// 'extract' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct ExtractArgs {
    /// 隐写图像文件路径。
    pub stego: PathBuf,

    /// 隐藏图像的宽度 (像素)，无法从隐写图像中推断。
    #[arg(short = 'W', long, default_value_t = DEFAULT_HIDDEN_WIDTH)]
    pub width: u32,

    /// 隐藏图像的高度 (像素)，无法从隐写图像中推断。
    #[arg(short = 'H', long, default_value_t = DEFAULT_HIDDEN_HEIGHT)]
    pub height: u32,

    /// 提取结果的输出路径。默认为隐写图像所在目录下的 `extracted_<时间戳>.png`。
    #[arg(short, long)]
    pub dest: Option<PathBuf>,

    /// 每个颜色通道使用的低位数量，必须与嵌入时一致。
    #[arg(short, long, default_value_t = DEFAULT_BITS_PER_CHANNEL, value_parser = clap::value_parser!(u8).range(1..=8))]
    pub bits: u8,

    /// 将低位还原到 0-255 范围的方式。默认线性拉伸，K = 2 时白色仍还原为 255。
    #[arg(short, long, value_enum, default_value_t = Scaling::Scale)]
    pub scaling: Scaling,

    /// 输出文件已存在时强制覆盖。
    #[arg(short, long)]
    pub force: bool,
}

/// `--scaling` 的可选值。
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Scaling {
    /// 将低位左移回最高位。
    Shift,
    /// 线性拉伸到完整的 0-255 范围。
    Scale,
}

impl From<Scaling> for Reconstruction {
    fn from(scaling: Scaling) -> Self {
        match scaling {
            Scaling::Shift => Reconstruction::Shift,
            Scaling::Scale => Reconstruction::Scale,
        }
    }
}
