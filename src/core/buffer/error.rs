// 缓冲区错误
//
// 职责：定义可恢复的环境错误（文件已存在、IO失败），
//       契约违规由断言处理，不在此列

use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum BufferError {
    #[error("文件已存在: {}", .0.display())]
    AlreadyExists(PathBuf),

    #[error("无法打开文件 {}: {source}", path.display())]
    Open { path: PathBuf, source: io::Error },

    #[error("无法写入文件 {}: {source}", path.display())]
    Persist { path: PathBuf, source: io::Error },

    #[error("缓冲区选项无效: {0}")]
    InvalidOptions(String),

    #[error("IO错误: {0}")]
    Io(#[from] io::Error),
}
