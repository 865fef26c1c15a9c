// 内容区间
//
// 职责：统一磁盘区间与内存区间的读取和裁剪接口，
//       缓冲区只通过此类型访问字节

use crate::core::buffer::{
    disk_range::DiskRange, error::BufferError, handle::SharedFile, memory_range::MemoryRange,
    span::Span,
};

/// 区间后端类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeKind {
    Disk,
    Memory,
}

/// 一段逻辑区间及其字节来源
#[derive(Debug, Clone)]
pub enum ContentRange {
    Disk(DiskRange),
    Memory(MemoryRange),
}

impl ContentRange {
    pub fn disk(start_offset: usize, size: usize, handle: SharedFile, file_offset: u64) -> Self {
        ContentRange::Disk(DiskRange::new(start_offset, size, handle, file_offset))
    }

    pub fn memory(start_offset: usize, data: Vec<u8>) -> Self {
        ContentRange::Memory(MemoryRange::new(start_offset, data))
    }

    pub fn kind(&self) -> RangeKind {
        match self {
            ContentRange::Disk(_) => RangeKind::Disk,
            ContentRange::Memory(_) => RangeKind::Memory,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            ContentRange::Disk(range) => range.span(),
            ContentRange::Memory(range) => range.span(),
        }
    }

    pub(crate) fn span_mut(&mut self) -> &mut Span {
        match self {
            ContentRange::Disk(range) => range.span_mut(),
            ContentRange::Memory(range) => range.span_mut(),
        }
    }

    pub fn start_offset(&self) -> usize {
        self.span().start_offset
    }

    pub fn end_offset(&self) -> usize {
        self.span().end_offset()
    }

    pub fn size(&self) -> usize {
        self.span().size
    }

    pub fn contains(&self, offset: usize) -> bool {
        self.span().contains(offset)
    }

    /// 读取 `[offset, offset + size)` 的字节
    ///
    /// 两端必须落在区间内，否则 panic。
    pub fn read_bytes(&self, offset: usize, size: usize) -> Result<Vec<u8>, BufferError> {
        let mut out = Vec::with_capacity(size);
        self.read_into(offset, size, &mut out)?;
        Ok(out)
    }

    /// 与 `read_bytes` 相同，但追加到已有的输出缓冲
    pub fn read_into(&self, offset: usize, size: usize, out: &mut Vec<u8>) -> Result<(), BufferError> {
        match self {
            ContentRange::Disk(range) => range.read_into(offset, size, out),
            ContentRange::Memory(range) => {
                out.extend_from_slice(range.bytes(offset, size));
                Ok(())
            }
        }
    }

    /// 生成同类型的子区间
    pub fn narrowed(&self, offset: usize, size: usize) -> Self {
        match self {
            ContentRange::Disk(range) => ContentRange::Disk(range.narrowed(offset, size)),
            ContentRange::Memory(range) => ContentRange::Memory(range.narrowed(offset, size)),
        }
    }
}
