// 内存区间
//
// 职责：持有编辑产生的字节，按逻辑偏移切片读取

use crate::core::buffer::span::Span;

/// 直接持有字节内容的区间
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryRange {
    span: Span,
    data: Vec<u8>,
}

impl MemoryRange {
    pub fn new(start_offset: usize, data: Vec<u8>) -> Self {
        Self {
            span: Span::new(start_offset, data.len()),
            data,
        }
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub(crate) fn span_mut(&mut self) -> &mut Span {
        &mut self.span
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn bytes(&self, offset: usize, size: usize) -> &[u8] {
        assert!(
            self.span.contains(offset) && self.span.contains(offset + size),
            "读取范围超出内存区间: {}..{} 不在 {:?} 内",
            offset,
            offset + size,
            self.span
        );
        let start = offset - self.span.start_offset;
        &self.data[start..start + size]
    }

    /// 复制子区间的字节，生成新的内存区间
    pub fn narrowed(&self, offset: usize, size: usize) -> Self {
        Self::new(offset, self.bytes(offset, size).to_vec())
    }
}
