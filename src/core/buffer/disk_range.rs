// 磁盘区间
//
// 职责：按需从共享文件句柄读取原始文件中未修改的字节

use crate::core::buffer::{error::BufferError, handle::SharedFile, span::Span};

/// 惰性读取磁盘内容的区间
#[derive(Debug, Clone)]
pub struct DiskRange {
    span: Span,
    handle: SharedFile,
    /// 与 `span.start_offset` 对应的物理文件偏移
    file_offset: u64,
}

impl DiskRange {
    pub fn new(start_offset: usize, size: usize, handle: SharedFile, file_offset: u64) -> Self {
        Self {
            span: Span::new(start_offset, size),
            handle,
            file_offset,
        }
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub(crate) fn span_mut(&mut self) -> &mut Span {
        &mut self.span
    }

    pub fn file_offset(&self) -> u64 {
        self.file_offset
    }

    pub fn read_into(&self, offset: usize, size: usize, out: &mut Vec<u8>) -> Result<(), BufferError> {
        self.check_bounds(offset, size);
        self.handle.read_into(self.physical(offset), size, out)?;
        Ok(())
    }

    /// 裁剪到子区间，共享同一个文件句柄
    pub fn narrowed(&self, offset: usize, size: usize) -> Self {
        self.check_bounds(offset, size);
        Self::new(offset, size, self.handle.clone(), self.physical(offset))
    }

    fn physical(&self, offset: usize) -> u64 {
        self.file_offset + (offset - self.span.start_offset) as u64
    }

    fn check_bounds(&self, offset: usize, size: usize) {
        assert!(
            self.span.contains(offset) && self.span.contains(offset + size),
            "访问范围超出磁盘区间: {}..{} 不在 {:?} 内",
            offset,
            offset + size,
            self.span
        );
    }
}
