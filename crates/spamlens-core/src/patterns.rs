//! 关键词字典加载与归一化
use std::path::Path;
use tracing::warn;

use crate::error::LoadError;
use crate::options::KeywordFallback;

/// 内置默认词表（关键词文件不可用时使用）
const DEFAULT_KEYWORDS: &[&str] = &[
    "win",
    "free",
    "promo",
    "claim now",
    "urgent",
    "winner",
    "click here",
];

/// 归一化后的关键词序列：非空、小写、保序、保留重复
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatternSet {
    patterns: Vec<String>,
}

impl PatternSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn defaults() -> Self {
        Self::from_lines(DEFAULT_KEYWORDS)
    }

    /// 从原始行构建：去首尾空白 → 小写 → 丢弃空行
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = lines
            .into_iter()
            .map(|line| line.as_ref().trim().to_lowercase())
            .filter(|p| !p.is_empty())
            .collect();
        Self { patterns }
    }

    /// 读取行分隔的关键词文件
    pub fn load_file(path: &Path) -> Result<Self, LoadError> {
        let txt = std::fs::read_to_string(path).map_err(|source| LoadError::SourceUnavailable {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_lines(txt.lines()))
    }

    /// 读取关键词文件；失败时记录告警并按策略回退，从不中断
    pub fn load_or_fallback(path: &Path, fallback: KeywordFallback) -> Self {
        match Self::load_file(path) {
            Ok(set) => set,
            Err(err) => {
                warn!(path = %path.display(), error = %err, ?fallback, "keyword source unavailable, using fallback");
                match fallback {
                    KeywordFallback::Defaults => Self::defaults(),
                    KeywordFallback::Empty => Self::empty(),
                }
            }
        }
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.patterns
    }
}
