// 区间几何
//
// 职责：描述逻辑地址空间中的半开区间 [start_offset, start_offset + size)，
//       提供偏移计算与包含判断

/// 逻辑地址空间中的一段区间
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start_offset: usize,
    pub size: usize,
}

impl Span {
    pub fn new(start_offset: usize, size: usize) -> Self {
        Self { start_offset, size }
    }

    /// 结束偏移（不含）
    pub fn end_offset(&self) -> usize {
        self.start_offset + self.size
    }

    /// 移动区间使其结束于 `end_offset`，长度保持不变
    pub fn set_end_offset(&mut self, end_offset: usize) {
        assert!(
            end_offset >= self.size,
            "结束偏移小于区间长度: {} < {}",
            end_offset,
            self.size
        );
        self.start_offset = end_offset - self.size;
    }

    /// 偏移是否落在区间内（两端都包含）
    ///
    /// 插入点可以位于区间末尾，因此 `end_offset` 也视为在区间内。
    pub fn contains(&self, offset: usize) -> bool {
        self.start_offset <= offset && offset <= self.end_offset()
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }
}
