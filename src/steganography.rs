//! # 隐写核心算法模块
//!
//! 将隐藏图像每个通道的最高 K 位写入载体图像对应通道的最低 K 位，
//! 以及从隐写图像的最低 K 位中重建隐藏图像的近似值。
//!
//! 两个变换都是纯函数：输入以引用传入，结果总是新分配的缓冲区；
//! 任何前置条件不满足时立即返回错误，不会产生部分结果。

use crate::constants::{CHANNEL_BITS, DEFAULT_BITS_PER_CHANNEL};
use crate::error::StegoError;
use crate::pixel_buffer::{PixelBuffer, Rgb8};
use log::{debug, trace};
use std::fmt;

/// 每个颜色通道中用于承载隐藏数据的低位数量 K，取值范围为 `1..=8`。
///
/// 嵌入和提取必须使用相同的 K，否则重建结果没有意义。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitDepth(u8);

impl BitDepth {
    /// # Errors
    ///
    /// `bits` 不在 `1..=8` 范围内时返回 [`StegoError::InvalidBitDepth`]。
    pub fn new(bits: u8) -> Result<Self, StegoError> {
        if (1..=CHANNEL_BITS).contains(&bits) {
            Ok(Self(bits))
        } else {
            Err(StegoError::InvalidBitDepth(bits))
        }
    }

    #[inline]
    pub fn bits(self) -> u8 {
        self.0
    }

    /// 低 K 位掩码，即 `(1 << K) - 1`。
    #[inline]
    pub fn mask(self) -> u8 {
        ((1u16 << self.0) - 1) as u8
    }

    /// 隐藏通道被舍弃的低位数量，即 `8 - K`。
    #[inline]
    fn discarded_bits(self) -> u8 {
        CHANNEL_BITS - self.0
    }
}

impl Default for BitDepth {
    fn default() -> Self {
        Self(DEFAULT_BITS_PER_CHANNEL)
    }
}

impl TryFrom<u8> for BitDepth {
    type Error = StegoError;

    fn try_from(bits: u8) -> Result<Self, Self::Error> {
        Self::new(bits)
    }
}

impl fmt::Display for BitDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 提取时将 K 个低位还原到 0-255 范围的方式。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Reconstruction {
    /// 将低位左移回最高位：`bits << (8 - K)`。
    #[default]
    Shift,
    /// 线性拉伸到完整范围：`bits * (255 / mask(K))`，例如 K = 2 时得到 0、85、170、255。
    Scale,
}

impl Reconstruction {
    fn restore(self, low_bits: u8, depth: BitDepth) -> u8 {
        match self {
            Self::Shift => low_bits << depth.discarded_bits(),
            Self::Scale => low_bits * (u8::MAX / depth.mask()),
        }
    }
}

/// 清除载体通道的低 K 位，并写入隐藏通道的高 K 位。
#[inline]
fn embed_channel(carrier: u8, hidden: u8, depth: BitDepth) -> u8 {
    let mask = depth.mask();
    (carrier & !mask) | ((hidden >> depth.discarded_bits()) & mask)
}

#[inline]
fn embed_pixel(carrier: Rgb8, hidden: Rgb8, depth: BitDepth) -> Rgb8 {
    std::array::from_fn(|c| embed_channel(carrier[c], hidden[c], depth))
}

#[inline]
fn recover_pixel(stego: Rgb8, depth: BitDepth, reconstruction: Reconstruction) -> Rgb8 {
    stego.map(|channel| reconstruction.restore(channel & depth.mask(), depth))
}

/// 隐藏像素按坐标一一对应地写入载体，因此隐藏图像的宽和高都不能超过载体。
/// 这同时保证了载体像素总数不小于隐藏图像像素总数。
fn check_capacity(carrier: &PixelBuffer, hidden: &PixelBuffer) -> Result<(), StegoError> {
    let fits = hidden.width() <= carrier.width()
        && hidden.height() <= carrier.height()
        && hidden.pixel_count() <= carrier.pixel_count();

    trace!(
        "Capacity check: {} of {} carrier pixels requested, fits = {}",
        hidden.pixel_count(),
        carrier.pixel_count(),
        fits
    );

    if fits {
        Ok(())
    } else {
        Err(StegoError::InsufficientCapacity {
            carrier_width: carrier.width(),
            carrier_height: carrier.height(),
            hidden_width: hidden.width(),
            hidden_height: hidden.height(),
        })
    }
}

/// 将 `hidden` 隐藏到 `carrier` 中，返回新的隐写图像缓冲区。
///
/// 输出与载体尺寸相同；隐藏图像范围之外的载体像素保持不变。
///
/// # Arguments
///
/// * `carrier` - 载体图像。
/// * `hidden` - 要隐藏的图像。
/// * `depth` - 每个通道占用的低位数量 K。
///
/// # Errors
///
/// 载体无法逐像素容纳隐藏图像时返回 [`StegoError::InsufficientCapacity`]。
pub fn embed(
    carrier: &PixelBuffer,
    hidden: &PixelBuffer,
    depth: BitDepth,
) -> Result<PixelBuffer, StegoError> {
    check_capacity(carrier, hidden)?;

    debug!(
        "Embedding {}x{} pixels into {}x{} carrier with {} bit(s) per channel",
        hidden.width(),
        hidden.height(),
        carrier.width(),
        carrier.height(),
        depth
    );

    let mut stego = carrier.clone();

    stego
        .rows_mut()
        .zip(hidden.rows())
        .for_each(|(stego_row, hidden_row)| {
            stego_row
                .iter_mut()
                .zip(hidden_row)
                .for_each(|(pixel, &payload)| *pixel = embed_pixel(*pixel, payload, depth));
        });

    Ok(stego)
}

/// 以默认的 [`Reconstruction::Shift`] 方式从 `stego` 中提取 `width x height` 的隐藏图像。
///
/// 隐藏图像的尺寸无法从隐写图像中推断，必须由调用方提供。
///
/// # Errors
///
/// 请求的尺寸超出隐写图像范围时返回 [`StegoError::OutOfBounds`]。
pub fn extract(
    stego: &PixelBuffer,
    width: u32,
    height: u32,
    depth: BitDepth,
) -> Result<PixelBuffer, StegoError> {
    extract_with(stego, width, height, depth, Reconstruction::default())
}

/// 与 [`extract`] 相同，但可以指定低位还原方式。
///
/// 当 K < 8 时结果是有损的：每个通道只保留了原始值的最高 K 位。
///
/// # Errors
///
/// * 请求的尺寸超出隐写图像范围时返回 [`StegoError::OutOfBounds`]。
/// * 重建的像素数量与请求尺寸不一致时返回 [`StegoError::InvalidDimensions`]。
pub fn extract_with(
    stego: &PixelBuffer,
    width: u32,
    height: u32,
    depth: BitDepth,
    reconstruction: Reconstruction,
) -> Result<PixelBuffer, StegoError> {
    if width > stego.width() || height > stego.height() {
        return Err(StegoError::OutOfBounds {
            width,
            height,
            max_width: stego.width(),
            max_height: stego.height(),
        });
    }

    debug!(
        "Extracting {}x{} pixels from {}x{} stego image with {} bit(s) per channel ({:?})",
        width,
        height,
        stego.width(),
        stego.height(),
        depth,
        reconstruction
    );

    let pixels = stego
        .rows()
        .take(height as usize)
        .flat_map(|row| {
            row[..width as usize]
                .iter()
                .map(move |&pixel| recover_pixel(pixel, depth, reconstruction))
        })
        .collect::<Vec<_>>();

    trace!("Recovered {} pixels", pixels.len());

    PixelBuffer::from_pixels(width, height, pixels)
}
