use image::ImageFormat;

/// 默认每个颜色通道用于承载隐藏数据的低位数量。
/// 取 2 位时，隐藏图像每个通道保留最高的 2 位，载体图像的失真仍难以察觉。
pub const DEFAULT_BITS_PER_CHANNEL: u8 = 2;

/// 单个颜色通道的位宽。
pub const CHANNEL_BITS: u8 = 8;

/// 提取时默认假定的隐藏图像宽度 (像素)。
/// 隐藏图像的尺寸无法从隐写图像本身恢复，必须由调用方另行提供。
pub const DEFAULT_HIDDEN_WIDTH: u32 = 720;

/// 提取时默认假定的隐藏图像高度 (像素)。
pub const DEFAULT_HIDDEN_HEIGHT: u32 = 720;

/// 输出图像的 Alpha 通道值，始终完全不透明。
pub const OPAQUE_ALPHA: u8 = u8::MAX;

/// 未指定输出路径时，隐写图像文件名的前缀。
pub const STEGO_PREFIX: &str = "stego";

/// 未指定输出路径时，提取结果文件名的前缀。
pub const EXTRACTED_PREFIX: &str = "extracted";

/// 默认输出文件的扩展名。PNG 为无损格式，不会破坏低位中的数据。
pub const DEFAULT_EXTENSION: &str = "png";

/// 提取结果文件名中时间戳的格式。
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// 允许作为输出的无损图像格式。有损压缩会破坏嵌入在低位中的数据。
pub const LOSSLESS_FORMATS: &[ImageFormat] = &[
    ImageFormat::Png,
    ImageFormat::Bmp,
    ImageFormat::Tiff,
    ImageFormat::WebP,
    ImageFormat::Qoi,
];
