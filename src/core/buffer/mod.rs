// ByteBuffer 缓冲区 - 字节缓冲区核心实现
//
// 职责：以 Piece Table 方式管理文件内容，
//       未修改的字节惰性读取自磁盘，编辑内容保存在内存

mod byte_buffer;
mod chunk_iter;
mod content_range;
mod disk_range;
mod error;
mod handle;
mod memory_range;
mod options;
mod span;

// 重新导出
pub use self::byte_buffer::{ByteBuffer, UNNAMED_BUFFER};
pub use self::chunk_iter::ChunkIter;
pub use self::content_range::{ContentRange, RangeKind};
pub use self::disk_range::DiskRange;
pub use self::error::BufferError;
pub use self::handle::SharedFile;
pub use self::memory_range::MemoryRange;
pub use self::options::BufferOptions;
pub use self::span::Span;

/// 默认块大小，保存和流式读取时使用
pub const DEFAULT_CHUNK_SIZE: usize = 8 * 1024; // 8KB

/// 临时保存文件的默认后缀
pub const DEFAULT_TEMP_SUFFIX: &str = ".zhex-tmp";
