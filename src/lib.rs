//! # lsb_picture 库
//!
//! 本库包含图片 LSB 隐写工具的核心逻辑。

// 声明库包含的所有模块。

pub mod cli;
pub mod constants;
pub mod error;
pub mod handler;
pub mod naming;
pub mod pixel_buffer;
pub mod steganography;
