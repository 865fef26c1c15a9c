// 共享文件句柄
//
// 职责：在多个磁盘区间之间共享同一个只读文件句柄，
//       支持保存到自身时的 关闭 → 重新打开 状态切换

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

#[derive(Debug)]
enum HandleState {
    Open(File),
    Closed,
}

/// 引用计数的文件句柄（裁剪磁盘区间时只复制引用，不复制文件描述符）
#[derive(Debug, Clone)]
pub struct SharedFile {
    state: Arc<Mutex<HandleState>>,
}

impl SharedFile {
    pub fn open(path: &Path) -> io::Result<Self> {
        let file = File::open(path)?;
        debug!(path = %path.display(), "file handle opened");
        Ok(Self::from_file(file))
    }

    pub fn from_file(file: File) -> Self {
        Self {
            state: Arc::new(Mutex::new(HandleState::Open(file))),
        }
    }

    /// 文件当前长度（字节）
    pub fn len(&self) -> io::Result<u64> {
        match &*self.lock() {
            HandleState::Open(file) => Ok(file.metadata()?.len()),
            HandleState::Closed => Err(closed_error()),
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(&*self.lock(), HandleState::Open(_))
    }

    /// 从物理偏移 `position` 读取 `size` 字节并追加到 `out`
    ///
    /// 读取失败时 `out` 保持调用前的长度。
    pub fn read_into(&self, position: u64, size: usize, out: &mut Vec<u8>) -> io::Result<()> {
        let mut state = self.lock();
        let file = match &mut *state {
            HandleState::Open(file) => file,
            HandleState::Closed => return Err(closed_error()),
        };

        let start = out.len();
        out.resize(start + size, 0);

        let result = file
            .seek(SeekFrom::Start(position))
            .and_then(|_| file.read_exact(&mut out[start..]));

        if result.is_err() {
            out.truncate(start);
        }
        result
    }

    /// 关闭底层文件，所有共享此句柄的区间随之失效，直到重新打开
    pub fn close(&self) {
        *self.lock() = HandleState::Closed;
        debug!("file handle closed");
    }

    /// 在 `path` 上重新打开文件，替换当前状态
    pub fn reopen(&self, path: &Path) -> io::Result<()> {
        let file = File::open(path)?;
        *self.lock() = HandleState::Open(file);
        debug!(path = %path.display(), "file handle reopened");
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, HandleState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn closed_error() -> io::Error {
    io::Error::other("文件句柄已关闭")
}
