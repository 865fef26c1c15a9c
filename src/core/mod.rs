// Editor Core - 编辑器核心
//
// 职责：管理字节缓冲区，向命令层和只读消费者（渲染、搜索）
//       提供读取、插入、删除、替换和保存接口

pub mod buffer;

pub use buffer::{BufferError, BufferOptions, ByteBuffer, ContentRange};
