//! 关键词自动机核心库
//!
//! 设计要点：
//! - 关键词字典一次性构建为 trie 形状的确定性自动机（状态 0 为起点）。
//! - 扫描为单遍、无回溯；失配时仅尝试从根重新起步，不走 Aho-Corasick 失败链接。
//! - 命中后强制回到状态 0，命中不会链式重叠（已知限制，保留原语义）。
//! - 自动机构建后只读，扫描游标与累加器全部是调用内局部变量，可多线程共享。

mod error;
mod options;
mod types;
mod patterns;
mod automaton;
mod reference;
mod verdict;

pub use error::{ConfigError, LoadError};
pub use options::{KeywordFallback, ScanOptions};
pub use types::{ScanOutcome, StateId, Status, TransitionRecord};
pub use patterns::PatternSet;
pub use automaton::{MatchAutomaton, TransitionKey};
pub use reference::{missed_overlaps, ReferenceMatch};
pub use verdict::{
    check_url, classify, classify_batch, extract_urls, heuristic_score, UrlVerdict, Verdict,
};
