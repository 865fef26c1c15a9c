// zhex - A byte-level editor for files of arbitrary size
//
// Copyright (c) 2025 zhex team
//
// Licensed under MIT License

pub mod config;
pub mod core;
