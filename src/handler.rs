//! # 命令处理逻辑模块
//!
//! 包含处理 `embed` 和 `extract` 子命令的高级业务逻辑。
//! 本模块负责协调文件 I/O、调用核心隐写算法以及向用户报告结果。

use crate::cli::{EmbedArgs, ExtractArgs};
use crate::constants::LOSSLESS_FORMATS;
use crate::naming::{default_extracted_path, default_stego_path};
use crate::pixel_buffer::PixelBuffer;
use crate::steganography::{BitDepth, embed, extract_with};
use anyhow::{Context, Result};
use colored::Colorize;
use image::ImageFormat;
use log::info;
use std::path::Path;

/// 处理 'Embed' 命令的执行逻辑。
///
/// 负责读取载体图像和隐藏图像、调用隐写核心函数，最后将隐写图像写入目标文件。
/// 只有在隐写完全成功后才会写入文件，不会留下不完整的输出。
///
/// # Arguments
///
/// * `args` - 包含输入/输出路径与位深度的 `EmbedArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 目标文件已存在且未指定 `--force`，或目标格式不是无损格式。
/// * 无法读取或解码载体图像或隐藏图像。
/// * 载体图像无法容纳隐藏图像。
/// * 无法写入到目标图像文件。
pub fn handle_embed(args: EmbedArgs) -> Result<()> {
    let depth = BitDepth::new(args.bits)?;
    let dest = args
        .dest
        .unwrap_or_else(|| default_stego_path(&args.carrier));

    ensure_writable(&dest, args.force)?;
    let format = lossless_format(&dest)?;

    let carrier = load_buffer(&args.carrier)?;
    let hidden = load_buffer(&args.hidden)?;

    info!(
        "Carrier {} is {}x{}, hidden {} is {}x{}",
        args.carrier.display(),
        carrier.width(),
        carrier.height(),
        args.hidden.display(),
        hidden.width(),
        hidden.height()
    );

    let stego = embed(&carrier, &hidden, depth).with_context(|| {
        format!(
            "Unable to hide {} inside {}.",
            args.hidden.to_string_lossy().red().bold(),
            args.carrier.to_string_lossy().red().bold()
        )
    })?;

    save_buffer(&stego, &dest, format)?;

    println!(
        "The image has been successfully hidden and saved: {}",
        dest.to_string_lossy().green().bold()
    );

    Ok(())
}

/// 处理 'Extract' 命令的执行逻辑。
///
/// 负责读取隐写图像、按指定的尺寸与位深度调用提取核心函数，
/// 最后将重建的隐藏图像写入目标文件。
///
/// # Arguments
///
/// * `args` - 包含输入/输出路径、隐藏图像尺寸与位深度的 `ExtractArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 目标文件已存在且未指定 `--force`，或目标格式不是无损格式。
/// * 无法读取或解码隐写图像。
/// * 请求的尺寸超出隐写图像范围。
/// * 无法写入到目标图像文件。
pub fn handle_extract(args: ExtractArgs) -> Result<()> {
    let depth = BitDepth::new(args.bits)?;
    let dest = args
        .dest
        .unwrap_or_else(|| default_extracted_path(&args.stego));

    ensure_writable(&dest, args.force)?;
    let format = lossless_format(&dest)?;

    let stego = load_buffer(&args.stego)?;

    info!(
        "Stego image {} is {}x{}, extracting {}x{}",
        args.stego.display(),
        stego.width(),
        stego.height(),
        args.width,
        args.height
    );

    let extracted = extract_with(&stego, args.width, args.height, depth, args.scaling.into())
        .with_context(|| {
            format!(
                "Unable to extract a {}x{} image from {}.",
                args.width.to_string().red().bold(),
                args.height.to_string().red().bold(),
                args.stego.to_string_lossy().red().bold()
            )
        })?;

    save_buffer(&extracted, &dest, format)?;

    println!(
        "The hidden image has been successfully extracted and saved: {}",
        dest.to_string_lossy().green().bold()
    );

    Ok(())
}

fn ensure_writable(dest: &Path, force: bool) -> Result<()> {
    anyhow::ensure!(
        force || !dest.exists(),
        "Output file already exists: {}. \nUse --force to overwrite it.",
        dest.to_string_lossy().red().bold()
    );
    Ok(())
}

/// 根据扩展名确定输出格式，只接受无损格式。
fn lossless_format(dest: &Path) -> Result<ImageFormat> {
    let format = ImageFormat::from_path(dest).with_context(|| {
        format!(
            "Unable to determine the output image format: {}",
            dest.to_string_lossy().red().bold()
        )
    })?;

    anyhow::ensure!(
        LOSSLESS_FORMATS.contains(&format),
        "Output format {:?} is not a supported lossless format. \nLossy compression would destroy the hidden data: {}",
        format,
        dest.to_string_lossy().red().bold()
    );

    Ok(format)
}

fn load_buffer(path: &Path) -> Result<PixelBuffer> {
    let image = image::open(path).with_context(|| {
        format!(
            "Unable to read image file: {}",
            path.to_string_lossy().red().bold()
        )
    })?;

    Ok(PixelBuffer::from(&image))
}

fn save_buffer(buffer: &PixelBuffer, dest: &Path, format: ImageFormat) -> Result<()> {
    buffer
        .to_rgba_image()
        .save_with_format(dest, format)
        .with_context(|| {
            format!(
                "Unable to write to target image file: {}",
                dest.to_string_lossy().red().bold()
            )
        })
}
