//! # 像素缓冲区模块
//!
//! 隐写算法操作的二维 RGB 像素网格。缓冲区是普通的值类型：由创建它的阶段独占，
//! 以只读引用传入算法，算法总是返回一个新的缓冲区，从不修改调用方的数据。

use crate::constants::OPAQUE_ALPHA;
use crate::error::StegoError;
use image::{DynamicImage, RgbImage, Rgba, RgbaImage};

/// 单个像素的 R、G、B 三个 8 位通道。
pub type Rgb8 = [u8; 3];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    /// 按行优先顺序存储的像素。
    pixels: Vec<Rgb8>,
}

impl PixelBuffer {
    /// 创建一个指定尺寸、全黑的缓冲区。
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![[0; 3]; width as usize * height as usize],
        }
    }

    /// 由行优先排列的像素数据构造缓冲区。
    ///
    /// # Errors
    ///
    /// 当 `pixels` 的长度与 `width * height` 不一致时返回 [`StegoError::InvalidDimensions`]。
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Rgb8>) -> Result<Self, StegoError> {
        if pixels.len() as u64 != u64::from(width) * u64::from(height) {
            return Err(StegoError::InvalidDimensions {
                width,
                height,
                len: pixels.len(),
            });
        }

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// 通过对每个坐标调用 `f` 生成缓冲区。
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> Rgb8) -> Self {
        let pixels = (0..height)
            .flat_map(|y| (0..width).map(move |x| (x, y)))
            .map(|(x, y)| f(x, y))
            .collect();

        Self {
            width,
            height,
            pixels,
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// 像素总数，使用 `u64` 避免大尺寸图像相乘溢出。
    #[inline]
    pub fn pixel_count(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height)
            .then(|| y as usize * self.width as usize + x as usize)
    }

    /// 读取 `(x, y)` 处的像素，坐标越界时返回 `None`。
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<Rgb8> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// 写入 `(x, y)` 处的像素。
    ///
    /// # Errors
    ///
    /// 坐标超出缓冲区范围时返回 [`StegoError::OutOfBounds`]。
    pub fn put_pixel(&mut self, x: u32, y: u32, rgb: Rgb8) -> Result<(), StegoError> {
        let i = self.index(x, y).ok_or(StegoError::OutOfBounds {
            width: x.saturating_add(1),
            height: y.saturating_add(1),
            max_width: self.width,
            max_height: self.height,
        })?;
        self.pixels[i] = rgb;
        Ok(())
    }

    /// 所有像素，按行优先顺序排列。
    pub fn pixels(&self) -> &[Rgb8] {
        &self.pixels
    }

    /// 逐行遍历像素。宽度为 0 时不产生任何行。
    pub fn rows(&self) -> impl Iterator<Item = &[Rgb8]> {
        self.pixels.chunks_exact(self.width.max(1) as usize)
    }

    pub fn rows_mut(&mut self) -> impl Iterator<Item = &mut [Rgb8]> {
        self.pixels.chunks_exact_mut(self.width.max(1) as usize)
    }

    /// 转换为 RGBA 图像以便保存，Alpha 通道固定为完全不透明。
    pub fn to_rgba_image(&self) -> RgbaImage {
        let mut image = RgbaImage::new(self.width, self.height);
        image
            .pixels_mut()
            .zip(&self.pixels)
            .for_each(|(pixel, &[r, g, b])| *pixel = Rgba([r, g, b, OPAQUE_ALPHA]));
        image
    }
}

impl From<RgbImage> for PixelBuffer {
    fn from(image: RgbImage) -> Self {
        let (width, height) = image.dimensions();
        let pixels = image.pixels().map(|pixel| pixel.0).collect();

        Self {
            width,
            height,
            pixels,
        }
    }
}

/// 解码后的任意图像都会被转换为 8 位 RGB，Alpha 通道被丢弃。
impl From<&DynamicImage> for PixelBuffer {
    fn from(image: &DynamicImage) -> Self {
        image.to_rgb8().into()
    }
}
