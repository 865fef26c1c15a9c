// 流式迭代器
//
// 职责：按块迭代 ByteBuffer 内容，避免一次性读取整个文件

use crate::core::buffer::{error::BufferError, ByteBuffer};

/// ByteBuffer的流式迭代器
pub struct ChunkIter<'a> {
    buffer: &'a ByteBuffer,
    current_pos: usize,
    chunk_size: usize,
    total_bytes: usize,
    failed: bool,
}

impl<'a> ChunkIter<'a> {
    pub fn new(buffer: &'a ByteBuffer, start: usize, chunk_size: usize) -> Self {
        assert!(chunk_size > 0, "块大小必须大于0");

        let total_bytes = buffer.size();
        Self {
            buffer,
            current_pos: start.min(total_bytes),
            chunk_size,
            total_bytes,
            failed: false,
        }
    }

    /// 下一块的起始偏移
    pub fn position(&self) -> usize {
        self.current_pos
    }
}

impl Iterator for ChunkIter<'_> {
    type Item = Result<Vec<u8>, BufferError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.current_pos >= self.total_bytes {
            return None;
        }

        let size = self.chunk_size.min(self.total_bytes - self.current_pos);
        match self.buffer.read_bytes(self.current_pos, size) {
            Ok(chunk) => {
                self.current_pos += size;
                Some(Ok(chunk))
            }
            Err(err) => {
                // 出错后迭代结束
                self.failed = true;
                Some(Err(err))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.failed {
            return (0, Some(0));
        }
        let remaining = self.total_bytes - self.current_pos;
        let chunks = remaining.div_ceil(self.chunk_size);
        (chunks, Some(chunks))
    }
}
