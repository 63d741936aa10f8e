//! 完整 Aho-Corasick 对照（仅用于诊断）
//!
//! 用 `aho-corasick` 的重叠搜索跑一遍小写文本，找出简化自动机因
//! “失配回根 / 命中后回 0” 而漏掉的出现位置。不影响 `scan` 的语义。

use std::collections::HashSet;

use aho_corasick::AhoCorasick;
use serde::Serialize;
use tracing::warn;

use crate::patterns::PatternSet;
use crate::types::{ScanOutcome, Status};

/// 对照扫描中的一次出现（字节偏移，基于小写后的文本）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ReferenceMatch {
    pub pattern: String,
    pub start: usize,
    pub end: usize,
}

/// 返回完整 Aho-Corasick 能找到、但 `outcome` 中未报告的出现（按结束位置排序）
///
/// `outcome` 必须是同一自动机对同一 `text` 的扫描结果。
pub fn missed_overlaps(patterns: &PatternSet, text: &str, outcome: &ScanOutcome) -> Vec<ReferenceMatch> {
    if patterns.is_empty() {
        return Vec::new();
    }
    let ac = match AhoCorasick::new(patterns.as_slice()) {
        Ok(ac) => ac,
        Err(err) => {
            warn!(error = %err, "reference automaton unavailable");
            return Vec::new();
        }
    };

    let lowered = text.to_lowercase();

    // 简化自动机的命中：(关键词, 结束字节偏移)
    let mut reported: HashSet<(&str, usize)> = HashSet::new();
    for ((idx, ch), rec) in lowered.char_indices().zip(outcome.log.iter()) {
        if let Status::Match(pattern) = &rec.status {
            reported.insert((pattern.as_str(), idx + ch.len_utf8()));
        }
    }

    let mut seen: HashSet<(usize, usize)> = HashSet::new();
    let mut missed = Vec::new();
    for m in ac.find_overlapping_iter(&lowered) {
        let pattern = patterns.as_slice()[m.pattern().as_usize()].as_str();
        if reported.contains(&(pattern, m.end())) {
            continue;
        }
        // 重复关键词在同一位置会各报一次
        if !seen.insert((m.start(), m.end())) {
            continue;
        }
        missed.push(ReferenceMatch { pattern: pattern.to_string(), start: m.start(), end: m.end() });
    }
    missed
}
