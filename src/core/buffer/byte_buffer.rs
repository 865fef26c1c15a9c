// ByteBuffer 核心实现
//
// 职责：以有序、连续、互不重叠的内容区间列表描述文件内容，
//       支持任意偏移的插入、删除、替换、读取和原子保存

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::core::buffer::{
    chunk_iter::ChunkIter, content_range::ContentRange, error::BufferError, handle::SharedFile,
    options::BufferOptions,
};

/// 未命名缓冲区的显示名
pub const UNNAMED_BUFFER: &str = "[No Name]";

/// 可编辑的字节缓冲区
///
/// 未修改的字节按需从原始文件读取，只有编辑产生的字节保存在内存中。
/// 每个公开操作结束后区间列表满足：按起始偏移升序、首尾相接、
/// 覆盖 `[0, size)`、不含零长度区间。
#[derive(Debug)]
pub struct ByteBuffer {
    ranges: Vec<ContentRange>,
    handle: Option<SharedFile>,
    path: Option<PathBuf>,
    options: BufferOptions,
}

// ========== 构造方法 ==========

impl ByteBuffer {
    /// 创建新的空缓冲区（未命名）
    pub fn new() -> Self {
        Self::with_options(BufferOptions::default())
    }

    pub fn with_options(options: BufferOptions) -> Self {
        Self {
            ranges: Vec::new(),
            handle: None,
            path: None,
            options,
        }
    }

    /// 从文件创建，整个文件对应一个磁盘区间
    pub fn open(path: impl AsRef<Path>) -> Result<Self, BufferError> {
        Self::open_with(path, BufferOptions::default())
    }

    pub fn open_with(path: impl AsRef<Path>, options: BufferOptions) -> Result<Self, BufferError> {
        let path = path.as_ref();
        let handle = SharedFile::open(path).map_err(|source| BufferError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let mut buffer = Self {
            ranges: Vec::new(),
            handle: Some(handle.clone()),
            path: Some(path.to_path_buf()),
            options,
        };
        buffer.seed_from_handle(&handle)?;

        info!(path = %path.display(), size = buffer.size(), "buffer opened");
        Ok(buffer)
    }

    /// 用单个覆盖整个文件的磁盘区间替换区间列表
    fn seed_from_handle(&mut self, handle: &SharedFile) -> Result<(), BufferError> {
        let size = usize::try_from(handle.len()?)
            .map_err(|_| io::Error::other("文件大小超出地址空间"))?;

        self.ranges.clear();
        if size > 0 {
            self.ranges.push(ContentRange::disk(0, size, handle.clone(), 0));
        }
        Ok(())
    }
}

// ========== 基本查询 ==========

impl ByteBuffer {
    /// 逻辑字节总数
    pub fn size(&self) -> usize {
        self.ranges.iter().map(ContentRange::size).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// 来源文件路径，未命名缓冲区为 `None`
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn display_name(&self) -> String {
        match &self.path {
            Some(path) => path.display().to_string(),
            None => UNNAMED_BUFFER.to_string(),
        }
    }

    pub fn options(&self) -> &BufferOptions {
        &self.options
    }

    /// 当前区间列表（只读，用于诊断）
    pub fn ranges(&self) -> &[ContentRange] {
        &self.ranges
    }

    pub fn range_count(&self) -> usize {
        self.ranges.len()
    }
}

// ========== 编辑操作 ==========

impl ByteBuffer {
    /// 在 `offset` 处插入字节，之后从 `offset` 开始读取即得到 `data`
    ///
    /// `offset` 超出 `[0, size]` 时 panic。
    pub fn insert(&mut self, offset: usize, data: &[u8]) {
        let total = self.size();
        if offset > total {
            panic!("插入位置超出范围: {} > {}", offset, total);
        }
        if data.is_empty() {
            return;
        }

        let inserted = ContentRange::memory(offset, data.to_vec());

        // 位于区间边界时直接插在旁边，不产生零长度的分裂
        let shift_from = match self.ranges.iter().position(|range| range.contains(offset)) {
            Some(i) => {
                let range = &self.ranges[i];
                let (start, end) = (range.start_offset(), range.end_offset());

                if offset == start {
                    self.ranges.insert(i, inserted);
                    i + 1
                } else if offset == end {
                    self.ranges.insert(i + 1, inserted);
                    i + 2
                } else {
                    let left = range.narrowed(start, offset - start);
                    let right = range.narrowed(offset, end - offset);
                    self.ranges.splice(i..=i, [left, inserted, right]);
                    i + 2
                }
            }
            None => {
                self.ranges.push(inserted);
                self.ranges.len()
            }
        };

        for range in &mut self.ranges[shift_from..] {
            range.span_mut().start_offset += data.len();
        }
        self.prune();

        debug!(offset, len = data.len(), ranges = self.ranges.len(), "insert");
    }

    /// 删除从 `offset` 开始的 `size` 字节
    ///
    /// `size` 超出剩余字节时截断到缓冲区末尾；`offset` 超出 `[0, size]` 时 panic。
    pub fn delete(&mut self, offset: usize, size: usize) {
        let total = self.size();
        if offset > total {
            panic!("删除位置超出范围: {} > {}", offset, total);
        }
        let size = size.min(total - offset);
        if size == 0 {
            return;
        }

        let end = offset + size;
        let first = self.ranges.iter().position(|range| range.contains(offset));
        let last = self.ranges.iter().rposition(|range| range.contains(end));
        let (Some(first), Some(last)) = (first, last) else {
            panic!("区间列表损坏: 找不到覆盖 {}..{} 的区间", offset, end);
        };

        // first == last 时两个幸存部分来自同一区间；否则中间区间整体丢弃
        let left = {
            let range = &self.ranges[first];
            range.narrowed(range.start_offset(), offset - range.start_offset())
        };
        let right = {
            let range = &self.ranges[last];
            range.narrowed(end, range.end_offset() - end)
        };
        self.ranges.splice(first..=last, [left, right]);

        self.renumber();
        self.prune();

        debug!(offset, size, ranges = self.ranges.len(), "delete");
    }

    /// 用 `data` 覆盖从 `offset` 开始的字节
    ///
    /// 等价于先 `delete(offset, data.len())` 再 `insert(offset, data)`，
    /// 不是原子操作：两步之间没有可失败的IO。
    pub fn replace(&mut self, offset: usize, data: &[u8]) {
        self.delete(offset, data.len());
        self.insert(offset, data);
    }

    /// 从0开始重新编号，恢复首尾相接
    fn renumber(&mut self) {
        let mut offset = 0;
        for range in &mut self.ranges {
            range.span_mut().start_offset = offset;
            offset += range.size();
        }
    }

    fn prune(&mut self) {
        self.ranges.retain(|range| range.size() > 0);
    }
}

// ========== 读取 ==========

impl ByteBuffer {
    /// 读取逻辑区间 `[offset, offset + size)` 的字节
    ///
    /// 超出缓冲区末尾时 panic；磁盘读取失败返回错误。
    pub fn read_bytes(&self, offset: usize, size: usize) -> Result<Vec<u8>, BufferError> {
        let total = self.size();
        assert!(
            offset <= total && size <= total - offset,
            "读取范围超出缓冲区: {}..{} > {}",
            offset,
            offset.saturating_add(size),
            total
        );

        let end = offset + size;
        let mut out = Vec::with_capacity(size);

        for range in &self.ranges {
            if out.len() == size {
                break;
            }
            if range.end_offset() <= offset {
                continue;
            }

            let from = offset.max(range.start_offset());
            let to = end.min(range.end_offset());
            if from < to {
                range.read_into(from, to - from, &mut out)?;
            }
        }

        assert_eq!(
            out.len(),
            size,
            "区间列表损坏: 读取 {}..{} 只得到 {} 字节",
            offset,
            end,
            out.len()
        );
        Ok(out)
    }

    /// 从头开始按块迭代全部内容
    pub fn chunks(&self, chunk_size: usize) -> ChunkIter<'_> {
        ChunkIter::new(self, 0, chunk_size)
    }

    /// 从 `offset` 开始按块迭代
    pub fn chunks_from(&self, offset: usize, chunk_size: usize) -> ChunkIter<'_> {
        ChunkIter::new(self, offset, chunk_size)
    }
}

// ========== 保存 ==========

impl ByteBuffer {
    /// 将当前内容写入 `target_path`
    ///
    /// 先分块写入同目录下的临时文件，再重命名到目标位置。目标与来源是同一个
    /// 文件时，重命名前关闭读取句柄，之后在新文件上重新打开，区间列表重置为
    /// 覆盖新文件的单个磁盘区间。目标已存在、不是来源文件且 `overwrite` 为
    /// false 时返回 [`BufferError::AlreadyExists`]，不写入任何内容。
    /// 选项无效（块大小为0、临时文件与目标重合）时返回
    /// [`BufferError::InvalidOptions`]。
    ///
    /// 覆盖已有文件时保留其权限位。通过硬链接等别名保存到自身后，原路径
    /// 不再指向新内容，[`path`](Self::path) 随之改为 `target_path`。
    ///
    /// 失败时临时文件会被删除，目标文件保持原样。
    pub fn save_to_file(&mut self, target_path: impl AsRef<Path>, overwrite: bool) -> Result<(), BufferError> {
        let target = target_path.as_ref();
        self.options.validate().map_err(BufferError::InvalidOptions)?;

        let temp_path = temp_path_for(target, &self.options.temp_suffix);
        if temp_path == target {
            return Err(BufferError::InvalidOptions(format!(
                "临时文件与目标重合: {}",
                target.display()
            )));
        }

        let saving_to_itself = self.is_source(target)?;
        if !overwrite && !saving_to_itself && target.exists() {
            return Err(BufferError::AlreadyExists(target.to_path_buf()));
        }

        if let Err(err) = self.write_temp(&temp_path) {
            discard_temp(&temp_path);
            return Err(err);
        }
        copy_permissions(target, &temp_path);

        if saving_to_itself {
            self.close_handle();
        }

        if let Err(source) = fs::rename(&temp_path, target) {
            discard_temp(&temp_path);
            if saving_to_itself {
                self.recover_source()?;
            }
            return Err(BufferError::Persist {
                path: target.to_path_buf(),
                source,
            });
        }

        if saving_to_itself {
            self.reopen_handle(target)?;
            if let Some(handle) = self.handle.clone() {
                self.seed_from_handle(&handle)?;
            }
            self.follow_saved_path(target);
        }

        info!(path = %target.display(), size = self.size(), "buffer saved");
        Ok(())
    }

    /// 重命名失败后在未被替换的原文件上重新打开句柄，旧的区间列表仍然有效
    fn recover_source(&mut self) -> Result<(), BufferError> {
        match self.path.clone() {
            Some(path) => self.reopen_handle(&path),
            None => Ok(()),
        }
    }

    /// 原路径不再指向刚写入的文件时（硬链接别名），改用目标路径
    fn follow_saved_path(&mut self, target: &Path) {
        let still_same = match &self.path {
            Some(path) => is_same_file(path, target).unwrap_or(false),
            None => return,
        };
        if !still_same {
            debug!(path = %target.display(), "buffer path follows saved file");
            self.path = Some(target.to_path_buf());
        }
    }

    fn is_source(&self, target: &Path) -> Result<bool, BufferError> {
        match &self.path {
            Some(path) if target.exists() && path.exists() => Ok(is_same_file(path, target)?),
            _ => Ok(false),
        }
    }

    fn write_temp(&self, temp_path: &Path) -> Result<(), BufferError> {
        let persist = |source: io::Error| BufferError::Persist {
            path: temp_path.to_path_buf(),
            source,
        };

        let mut file = File::create(temp_path).map_err(persist)?;
        for chunk in self.chunks(self.options.chunk_size) {
            file.write_all(&chunk?).map_err(persist)?;
        }
        file.sync_all().map_err(persist)?;
        Ok(())
    }

    fn close_handle(&self) {
        if let Some(handle) = &self.handle {
            handle.close();
        }
    }

    fn reopen_handle(&self, path: &Path) -> Result<(), BufferError> {
        match &self.handle {
            Some(handle) => handle.reopen(path).map_err(|source| BufferError::Open {
                path: path.to_path_buf(),
                source,
            }),
            None => Ok(()),
        }
    }
}

// ========== 默认实现 ==========

impl Default for ByteBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ByteBuffer {
    fn drop(&mut self) {
        self.close_handle();
    }
}

// ========== 辅助函数 ==========

fn temp_path_for(target: &Path, suffix: &str) -> PathBuf {
    let mut name = target.file_name().map(OsString::from).unwrap_or_default();
    name.push(suffix);
    target.with_file_name(name)
}

/// 把已有目标文件的权限位复制到临时文件，失败时只记录日志
fn copy_permissions(target: &Path, temp_path: &Path) {
    let Ok(metadata) = fs::metadata(target) else {
        return;
    };
    if let Err(err) = fs::set_permissions(temp_path, metadata.permissions()) {
        warn!(path = %temp_path.display(), error = %err, "failed to copy file permissions");
    }
}

fn discard_temp(temp_path: &Path) {
    if let Err(err) = fs::remove_file(temp_path) {
        if err.kind() != io::ErrorKind::NotFound {
            warn!(path = %temp_path.display(), error = %err, "failed to remove temporary file");
        }
    }
}

#[cfg(unix)]
fn is_same_file(a: &Path, b: &Path) -> io::Result<bool> {
    use std::os::unix::fs::MetadataExt;

    let (a, b) = (fs::metadata(a)?, fs::metadata(b)?);
    Ok(a.dev() == b.dev() && a.ino() == b.ino())
}

#[cfg(not(unix))]
fn is_same_file(a: &Path, b: &Path) -> io::Result<bool> {
    Ok(fs::canonicalize(a)? == fs::canonicalize(b)?)
}

// ========== 测试 ==========
