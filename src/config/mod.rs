// Config System - 配置系统
//
// 职责：加载应用配置的纯数据，
//       不参与编辑逻辑

mod settings;

pub use settings::{Config, ConfigError};
