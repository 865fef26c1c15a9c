// 缓冲区选项
//
// 职责：保存与分块流式读写相关的可配置参数

use serde::Deserialize;

use crate::core::buffer::{DEFAULT_CHUNK_SIZE, DEFAULT_TEMP_SUFFIX};

/// 缓冲区可配置参数（对应配置文件中的 `[buffer]` 表）
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BufferOptions {
    /// 保存和流式迭代时每块的字节数
    pub chunk_size: usize,
    /// 临时保存文件的后缀，追加在目标文件名之后
    pub temp_suffix: String,
}

impl Default for BufferOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            temp_suffix: DEFAULT_TEMP_SUFFIX.to_string(),
        }
    }
}

impl BufferOptions {
    /// 检查参数是否可用，返回不可用的原因
    ///
    /// 块大小必须大于0；临时文件后缀不能为空，也不能包含路径分隔符，
    /// 否则临时文件会与目标文件重合或落到其他目录。
    pub fn validate(&self) -> Result<(), String> {
        if self.chunk_size == 0 {
            return Err("chunk_size 必须大于0".to_string());
        }
        if self.temp_suffix.is_empty() {
            return Err("temp_suffix 不能为空".to_string());
        }
        if self.temp_suffix.contains(['/', '\\']) {
            return Err(format!("temp_suffix 不能包含路径分隔符: {:?}", self.temp_suffix));
        }
        Ok(())
    }
}
