//! 错误类型
use std::path::PathBuf;
use thiserror::Error;

/// 关键词来源加载失败（可恢复：调用方回退到默认词表或空词表）
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("keyword source unavailable: {}", path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// 配置文件错误（对 CLI 而言是致命错误）
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config: {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
