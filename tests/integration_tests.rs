use clap::Parser;
use image::{GenericImageView, ImageBuffer, Rgba};
use lsb_picture::{
    cli::{Cli, Commands, EmbedArgs, ExtractArgs, Scaling},
    handler::{handle_embed, handle_extract},
    naming::{default_stego_path, extracted_path_at},
    steganography::Reconstruction,
};
use rand::RngCore;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

/// 一个辅助函数，用于创建一个带有随机像素的测试图像
fn create_test_image(path: &Path, width: u32, height: u32) {
    let mut img_buf = ImageBuffer::new(width, height);
    let mut raw_pixels = vec![0u8; (width * height * 4) as usize];
    rand::rng().fill_bytes(&mut raw_pixels);

    img_buf
        .pixels_mut()
        .zip(raw_pixels.chunks_exact(4))
        .for_each(|(pixel, chunk)| {
            *pixel = Rgba([chunk[0], chunk[1], chunk[2], 255]);
        });

    img_buf.save(path).expect("Failed to create test image.");
}

fn embed_args(carrier: &Path, hidden: &Path, dest: Option<PathBuf>) -> EmbedArgs {
    EmbedArgs {
        carrier: carrier.to_path_buf(),
        hidden: hidden.to_path_buf(),
        dest,
        bits: 2,
        force: false,
    }
}

fn extract_args(stego: &Path, width: u32, height: u32, dest: Option<PathBuf>) -> ExtractArgs {
    ExtractArgs {
        stego: stego.to_path_buf(),
        width,
        height,
        dest,
        bits: 2,
        scaling: Scaling::Shift,
        force: false,
    }
}

/// 验证从嵌入到提取的完整流程
#[test]
fn test_handle_embed_and_extract_integration() -> anyhow::Result<()> {
    // 1. 准备环境
    let dir = tempdir()?;
    let carrier_path = dir.path().join("carrier.png");
    let hidden_path = dir.path().join("hidden.png");
    let stego_path = dir.path().join("stego.png");
    let extracted_path = dir.path().join("extracted.png");

    create_test_image(&carrier_path, 64, 48);
    create_test_image(&hidden_path, 32, 20);

    // 2. 测试 handle_embed
    handle_embed(embed_args(
        &carrier_path,
        &hidden_path,
        Some(stego_path.clone()),
    ))?;
    assert!(stego_path.exists(), "Stego image should be created.");

    // 3. 测试 handle_extract
    handle_extract(extract_args(
        &stego_path,
        32,
        20,
        Some(extracted_path.clone()),
    ))?;
    assert!(extracted_path.exists(), "Extracted image should be created.");

    // 4. 验证结果
    let carrier = image::open(&carrier_path)?.to_rgba8();
    let hidden = image::open(&hidden_path)?.to_rgba8();
    let stego = image::open(&stego_path)?.to_rgba8();
    let extracted = image::open(&extracted_path)?.to_rgba8();

    assert_eq!(stego.dimensions(), (64, 48));
    assert_eq!(extracted.dimensions(), (32, 20));

    for (x, y, pixel) in stego.enumerate_pixels() {
        let original = carrier.get_pixel(x, y);
        assert_eq!(pixel.0[3], 255, "Stego image must be opaque.");
        for c in 0..3 {
            assert_eq!(pixel.0[c] & 0xFC, original.0[c] & 0xFC);
        }
        if x >= 32 || y >= 20 {
            assert_eq!(pixel, original, "Pixels outside the payload must be untouched.");
        }
    }

    for (x, y, pixel) in extracted.enumerate_pixels() {
        let original = hidden.get_pixel(x, y);
        assert_eq!(pixel.0[3], 255);
        for c in 0..3 {
            assert_eq!(pixel.0[c], original.0[c] & 0xC0);
        }
    }

    Ok(())
}

/// 验证当用户不提供输出路径时，是否能正确生成默认路径并完成操作
#[test]
fn test_handle_embed_and_extract_with_defaults() -> anyhow::Result<()> {
    // 1. 准备环境
    let dir = tempdir()?;
    let carrier_path = dir.path().join("carrier.png");
    let hidden_path = dir.path().join("hidden.png");

    create_test_image(&carrier_path, 40, 40);
    create_test_image(&hidden_path, 10, 10);

    // 2. 测试 handle_embed，不提供 dest 路径
    handle_embed(embed_args(&carrier_path, &hidden_path, None))?;

    let expected_stego_path = dir.path().join("stego_carrier.png");
    assert_eq!(default_stego_path(&carrier_path), expected_stego_path);
    assert!(
        expected_stego_path.exists(),
        "Default stego image should be created at: {:?}",
        expected_stego_path
    );

    // 3. 测试 handle_extract，不提供 dest 路径
    handle_extract(extract_args(&expected_stego_path, 10, 10, None))?;

    let extracted: Vec<PathBuf> = fs::read_dir(dir.path())?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.starts_with("extracted_") && name.ends_with(".png"))
        })
        .collect();
    assert_eq!(extracted.len(), 1, "Exactly one default extracted image expected.");
    assert_eq!(image::open(&extracted[0])?.dimensions(), (10, 10));

    Ok(())
}

#[test]
fn test_extracted_path_naming() {
    let path = extracted_path_at(Path::new("some/dir/stego.png"), "2024-01-02_03-04-05");
    assert_eq!(
        path,
        Path::new("some/dir").join("extracted_2024-01-02_03-04-05.png")
    );

    let bare = extracted_path_at(Path::new("stego.png"), "stamp");
    assert_eq!(bare, PathBuf::from("extracted_stamp.png"));
}

/// 验证覆盖保护机制以及 `--force` 标志是否按预期工作
#[test]
fn test_overwrite_protection_and_force_flag() -> anyhow::Result<()> {
    // 1. 准备环境
    let dir = tempdir()?;
    let carrier_path = dir.path().join("carrier.png");
    let hidden_path = dir.path().join("hidden.png");
    let dest_path = dir.path().join("dest.png");

    create_test_image(&carrier_path, 20, 20);
    create_test_image(&hidden_path, 5, 5);

    // 2. 场景一：测试覆盖保护
    fs::write(&dest_path, "this is a dummy file to be overwritten")?;

    let result = handle_embed(embed_args(
        &carrier_path,
        &hidden_path,
        Some(dest_path.clone()),
    ));
    assert!(result.is_err(), "Execution should fail without --force when file exists.");
    if let Err(e) = result {
        assert!(e.to_string().contains("Output file already exists"));
    }

    // 3. 场景二：测试强制覆盖
    let mut forced = embed_args(&carrier_path, &hidden_path, Some(dest_path.clone()));
    forced.force = true;
    handle_embed(forced)?;

    let content = fs::read(&dest_path)?;
    assert_ne!(content, b"this is a dummy file to be overwritten");
    assert_eq!(image::open(&dest_path)?.dimensions(), (20, 20));

    Ok(())
}

/// 验证载体过小时的错误处理，且不会写出任何文件
#[test]
fn test_handle_embed_insufficient_capacity() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let carrier_path = dir.path().join("small.png");
    let hidden_path = dir.path().join("large.png");
    let dest_path = dir.path().join("dest.png");

    create_test_image(&carrier_path, 10, 10);
    create_test_image(&hidden_path, 30, 30);

    let result = handle_embed(embed_args(
        &carrier_path,
        &hidden_path,
        Some(dest_path.clone()),
    ));

    assert!(result.is_err());
    if let Err(e) = result {
        assert!(format!("{e:#}").contains("too small"));
    }
    assert!(!dest_path.exists(), "No output may be written on failure.");

    Ok(())
}

/// 验证提取尺寸超出隐写图像时的错误处理
#[test]
fn test_handle_extract_out_of_bounds() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let stego_path = dir.path().join("stego.png");
    let dest_path = dir.path().join("out.png");

    create_test_image(&stego_path, 16, 16);

    let result = handle_extract(extract_args(&stego_path, 720, 720, Some(dest_path.clone())));

    assert!(result.is_err());
    if let Err(e) = result {
        assert!(format!("{e:#}").contains("exceeds the image bounds"));
    }
    assert!(!dest_path.exists());

    Ok(())
}

/// 有损格式会破坏低位数据，必须在处理前拒绝
#[test]
fn test_lossy_output_rejected() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let carrier_path = dir.path().join("carrier.png");
    let hidden_path = dir.path().join("hidden.png");
    let dest_path = dir.path().join("stego.jpg");

    create_test_image(&carrier_path, 8, 8);
    create_test_image(&hidden_path, 4, 4);

    let result = handle_embed(embed_args(&carrier_path, &hidden_path, Some(dest_path.clone())));

    assert!(result.is_err());
    if let Err(e) = result {
        assert!(e.to_string().contains("lossless"));
    }
    assert!(!dest_path.exists());

    Ok(())
}

#[test]
fn test_missing_input_reported() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let missing = dir.path().join("missing.png");

    let result = handle_extract(extract_args(&missing, 1, 1, Some(dir.path().join("out.png"))));

    assert!(result.is_err());
    if let Err(e) = result {
        assert!(e.to_string().contains("Unable to read image file"));
    }

    Ok(())
}

/// 验证命令行解析与默认参数
#[test]
fn test_cli_parsing() {
    let cli = Cli::try_parse_from(["lsb_picture", "-vv", "extract", "stego.png", "-W", "32"])
        .expect("valid invocation");
    assert_eq!(cli.log_level(), log::Level::Debug);

    match cli.command {
        Commands::Extract(args) => {
            assert_eq!(args.stego, PathBuf::from("stego.png"));
            assert_eq!((args.width, args.height), (32, 720));
            assert_eq!(args.bits, 2);
            assert_eq!(args.scaling, Scaling::Scale);
            assert_eq!(Reconstruction::from(args.scaling), Reconstruction::Scale);
            assert!(args.dest.is_none());
        }
        other => panic!("unexpected command: {other:?}"),
    }

    let trace = Cli::try_parse_from(["lsb_picture", "-vvv", "embed", "a.png", "b.png"])
        .expect("valid invocation");
    assert_eq!(trace.log_level(), log::Level::Trace);

    assert!(Cli::try_parse_from(["lsb_picture", "embed", "a.png", "b.png", "-b", "9"]).is_err());
    assert!(Cli::try_parse_from(["lsb_picture", "embed", "a.png"]).is_err());
}

/// 使用命令行默认参数提取时，2 位通道应按 85 的步长还原，白色还原为 255
#[test]
fn test_handle_extract_default_scaling() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let carrier_path = dir.path().join("carrier.png");
    let hidden_path = dir.path().join("hidden.png");
    let stego_path = dir.path().join("stego.png");
    let extracted_path = dir.path().join("extracted.png");

    create_test_image(&carrier_path, 8, 8);

    let mut hidden = ImageBuffer::new(4, 1);
    hidden.put_pixel(0, 0, Rgba([255u8, 255, 255, 255]));
    hidden.put_pixel(1, 0, Rgba([0, 0, 0, 255]));
    hidden.put_pixel(2, 0, Rgba([100, 150, 200, 255]));
    hidden.put_pixel(3, 0, Rgba([64, 128, 192, 255]));
    hidden.save(&hidden_path)?;

    handle_embed(embed_args(&carrier_path, &hidden_path, Some(stego_path.clone())))?;

    let stego = stego_path.to_string_lossy().into_owned();
    let dest = extracted_path.to_string_lossy().into_owned();
    let cli = Cli::try_parse_from([
        "lsb_picture",
        "extract",
        stego.as_str(),
        "-W",
        "4",
        "-H",
        "1",
        "-d",
        dest.as_str(),
    ])?;

    match cli.command {
        Commands::Extract(args) => handle_extract(args)?,
        other => panic!("unexpected command: {other:?}"),
    }

    let extracted = image::open(&extracted_path)?.to_rgba8();
    assert_eq!(extracted.get_pixel(0, 0).0, [255, 255, 255, 255]);
    assert_eq!(extracted.get_pixel(1, 0).0, [0, 0, 0, 255]);
    assert_eq!(extracted.get_pixel(2, 0).0, [85, 170, 255, 255]);
    assert_eq!(extracted.get_pixel(3, 0).0, [85, 170, 255, 255]);
    assert!(
        extracted
            .pixels()
            .flat_map(|p| p.0[..3].to_vec())
            .all(|v| v % 85 == 0)
    );

    Ok(())
}
