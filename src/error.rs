//! # 错误类型模块
//!
//! 定义隐写核心算法可能返回的全部错误。文件读写等 I/O 错误不在此处建模，
//! 由调用方 (`handler`) 通过 `anyhow` 原样向上传递。

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StegoError {
    /// 载体图像无法逐像素容纳隐藏图像。
    #[error(
        "Carrier image {carrier_width}x{carrier_height} is too small to hold the hidden image {hidden_width}x{hidden_height}"
    )]
    InsufficientCapacity {
        carrier_width: u32,
        carrier_height: u32,
        hidden_width: u32,
        hidden_height: u32,
    },

    /// 请求的区域超出了图像的范围。
    #[error("Requested region {width}x{height} exceeds the image bounds {max_width}x{max_height}")]
    OutOfBounds {
        width: u32,
        height: u32,
        max_width: u32,
        max_height: u32,
    },

    /// 每通道位数必须位于 1 到 8 之间。
    #[error("Invalid bit depth {0}: expected a value between 1 and 8")]
    InvalidBitDepth(u8),

    #[error("Pixel data of length {len} does not match dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32, len: usize },
}
