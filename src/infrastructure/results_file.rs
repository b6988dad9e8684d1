// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// 结果日志文件
///
/// 每次运行新建（已存在则清空），之后只追加写入
pub struct ResultsFile {
    path: PathBuf,
    file: fs::File,
}

impl ResultsFile {
    /// 创建结果文件，父目录不存在时自动创建
    pub async fn create(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        let file = fs::File::create(&path).await?;
        Ok(Self { path, file })
    }

    /// 追加一段文本
    pub async fn append(&mut self, text: &str) -> std::io::Result<()> {
        self.file.write_all(text.as_bytes()).await?;
        self.file.flush().await
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
