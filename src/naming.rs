//! # 输出路径生成模块
//!
//! 用户未指定输出路径时，在输入文件所在目录下生成默认文件名。

use crate::constants::{DEFAULT_EXTENSION, EXTRACTED_PREFIX, STEGO_PREFIX, TIMESTAMP_FORMAT};
use chrono::Local;
use std::path::{Path, PathBuf};

/// 当前本地时间，格式为 `YYYY-MM-DD_HH-MM-SS`。
pub fn timestamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// 隐写图像的默认路径：`<载体目录>/stego_<载体文件名>.png`。
pub fn default_stego_path(carrier: &Path) -> PathBuf {
    let stem = carrier
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_owned());

    sibling(
        carrier,
        format!("{STEGO_PREFIX}_{stem}.{DEFAULT_EXTENSION}"),
    )
}

/// 提取结果的默认路径：`<隐写图像目录>/extracted_<时间戳>.png`。
pub fn default_extracted_path(stego: &Path) -> PathBuf {
    extracted_path_at(stego, &timestamp())
}

pub fn extracted_path_at(stego: &Path, stamp: &str) -> PathBuf {
    sibling(
        stego,
        format!("{EXTRACTED_PREFIX}_{stamp}.{DEFAULT_EXTENSION}"),
    )
}

fn sibling(path: &Path, file_name: String) -> PathBuf {
    match path.parent() {
        Some(dir) => dir.join(file_name),
        None => PathBuf::from(file_name),
    }
}
