//! 扫描选项（可从 TOML 配置文件加载）
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// 关键词来源不可用时的回退策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeywordFallback {
    /// 使用内置默认词表
    #[default]
    Defaults,
    /// 使用空词表（不会产生任何关键词命中）
    Empty,
}

/// 扫描选项
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScanOptions {
    /// 关键词文件（每行一个）；为空则直接使用内置词表
    pub keywords_path: Option<PathBuf>,
    /// 关键词文件读取失败时的回退策略
    pub fallback: KeywordFallback,
    /// 启发式得分达到该阈值即判为垃圾信息
    pub spam_threshold: u8,
    /// 本地 URL 黑名单（子串匹配）
    pub url_blocklist: Vec<String>,
    /// 线程数：None 表示自动（等于 CPU 核数）；Some(1) 走串行
    pub threads: Option<usize>,
}

pub(crate) const DEFAULT_SPAM_THRESHOLD: u8 = 70;

pub(crate) const DEFAULT_URL_BLOCKLIST: &[&str] = &[
    "malicious.com",
    "phishing-login.com",
    "free-money-now.net",
    "claim-prize.xyz",
];

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            keywords_path: None,
            fallback: KeywordFallback::Defaults,
            spam_threshold: DEFAULT_SPAM_THRESHOLD,
            url_blocklist: DEFAULT_URL_BLOCKLIST.iter().map(|s| s.to_string()).collect(),
            threads: None,
        }
    }
}

impl ScanOptions {
    /// 从 TOML 文件加载；缺省字段取默认值，未知字段报错
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let txt = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&txt).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// 实际使用的线程数
    pub(crate) fn effective_threads(&self) -> usize {
        match self.threads {
            Some(n) if n >= 1 => n,
            _ => num_cpus::get(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_source_application() {
        let opts = ScanOptions::default();
        assert_eq!(opts.spam_threshold, 70);
        assert_eq!(opts.fallback, KeywordFallback::Defaults);
        assert_eq!(opts.url_blocklist.len(), 4);
        assert!(opts.keywords_path.is_none());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "spam_threshold = 50\nfallback = \"empty\"\nthreads = 2").unwrap();

        let opts = ScanOptions::from_toml_file(file.path()).unwrap();
        assert_eq!(opts.spam_threshold, 50);
        assert_eq!(opts.fallback, KeywordFallback::Empty);
        assert_eq!(opts.threads, Some(2));
        assert_eq!(opts.url_blocklist.len(), 4);
    }

    #[test]
    fn unknown_field_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_states = 10").unwrap();

        let err = ScanOptions::from_toml_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ScanOptions::from_toml_file(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn zero_threads_means_auto() {
        let opts = ScanOptions { threads: Some(0), ..ScanOptions::default() };
        assert!(opts.effective_threads() >= 1);
    }
}
