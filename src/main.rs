// zhex - A byte-level editor for files of arbitrary size
//
// Copyright (c) 2025 zhex team
//
// Licensed under MIT License

use std::path::PathBuf;

use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

use zhex::config::Config;
use zhex::core::ByteBuffer;

fn main() -> anyhow::Result<()> {
    let config = Config::load()?.unwrap_or_default();

    // 初始化日志
    let filter = match &config.log_filter {
        Some(directives) => EnvFilter::try_new(directives)?,
        None => EnvFilter::from_default_env().add_directive(Level::INFO.into()),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("zhex v{} starting...", env!("CARGO_PKG_VERSION"));

    let buffer = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => ByteBuffer::open_with(&path, config.buffer)?,
        None => ByteBuffer::with_options(config.buffer),
    };
    info!(name = %buffer.display_name(), size = buffer.size(), "buffer ready");

    // TODO: 接入终端界面（十六进制视图与命令层）

    Ok(())
}
