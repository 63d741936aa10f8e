//! 关键词匹配自动机（trie 构建 + 简化 DFA 扫描）
//!
//! 失配策略：不走失败链接，只尝试 `transition(0, c)`，否则回到 0。
//! 因此以失败前缀中段为起点的关键词可能漏检；命中后强制回到 0，
//! 与已命中文本重叠的关键词也不会再报告。

use std::collections::HashMap;
use tracing::debug;

use crate::patterns::PatternSet;
use crate::types::{ScanOutcome, StateId, Status, TransitionRecord};

/// 转移表的复合键 `(状态, 字符)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TransitionKey {
    pub state: StateId,
    pub ch: char,
}

impl TransitionKey {
    pub fn new(state: StateId, ch: char) -> Self {
        Self { state, ch }
    }
}

/// 构建后只读的自动机；扫描不修改任何实例数据，可跨线程共享
#[derive(Debug, Clone)]
pub struct MatchAutomaton {
    transitions: HashMap<TransitionKey, StateId>,
    outputs: HashMap<StateId, String>,
    state_count: u32,
}

impl MatchAutomaton {
    /// 按关键词顺序插入 trie：已有前缀复用状态，新前缀分配下一个编号
    pub fn build(patterns: &PatternSet) -> Self {
        let mut transitions: HashMap<TransitionKey, StateId> = HashMap::new();
        let mut outputs: HashMap<StateId, String> = HashMap::new();
        let mut next_state: u32 = 1;

        for pattern in patterns.iter() {
            let mut current = StateId::START;
            for ch in pattern.chars() {
                current = *transitions.entry(TransitionKey::new(current, ch)).or_insert_with(|| {
                    let id = StateId::new(next_state);
                    next_state += 1;
                    id
                });
            }
            // PatternSet 保证非空，终点不会是状态 0
            outputs.insert(current, pattern.to_string());
        }

        debug!(
            patterns = patterns.len(),
            states = next_state,
            transitions = transitions.len(),
            outputs = outputs.len(),
            "automaton built"
        );

        Self { transitions, outputs, state_count: next_state }
    }

    /// 先经 `PatternSet::from_lines` 归一化（空串被丢弃），对任意输入都成立
    pub fn from_patterns<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::build(&PatternSet::from_lines(patterns))
    }

    /// 单遍扫描；游标与累加器均为局部变量
    pub fn scan(&self, text: &str) -> ScanOutcome {
        let lowered = text.to_lowercase();
        let mut matches = Vec::new();
        let mut log = Vec::with_capacity(lowered.len());
        let mut current = StateId::START;

        for ch in lowered.chars() {
            let start = current;
            let mut status = match self.transition(current, ch) {
                Some(next) => {
                    current = next;
                    Status::Transition
                }
                None => {
                    current = self.transition(StateId::START, ch).unwrap_or(StateId::START);
                    Status::Reset
                }
            };

            if let Some(pattern) = self.outputs.get(&current) {
                matches.push(pattern.clone());
                status = Status::Match(pattern.clone());
                current = StateId::START;
            }

            log.push(TransitionRecord { ch, from_state: start, to_state: current, status });
        }

        ScanOutcome { matches, log }
    }

    pub fn transition(&self, state: StateId, ch: char) -> Option<StateId> {
        self.transitions.get(&TransitionKey::new(state, ch)).copied()
    }

    pub fn output(&self, state: StateId) -> Option<&str> {
        self.outputs.get(&state).map(String::as_str)
    }

    /// 状态总数（含状态 0）
    pub fn state_count(&self) -> usize {
        self.state_count as usize
    }

    /// 转移表快照，按 (状态, 字符) 排序以保证输出稳定
    pub fn transitions(&self) -> Vec<(TransitionKey, StateId)> {
        let mut out: Vec<_> = self.transitions.iter().map(|(k, v)| (*k, *v)).collect();
        out.sort_unstable();
        out
    }

    /// 输出映射快照，按状态排序
    pub fn outputs(&self) -> Vec<(StateId, &str)> {
        let mut out: Vec<_> = self.outputs.iter().map(|(s, p)| (*s, p.as_str())).collect();
        out.sort_unstable_by_key(|(s, _)| *s);
        out
    }
}
