//! 公共类型（对外暴露）
use serde::{Serialize, Serializer};
use std::fmt;

/// 自动机状态编号；0 为唯一起点，构建期单调分配，从不删除
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct StateId(u32);

impl StateId {
    pub const START: StateId = StateId(0);

    pub(crate) fn new(raw: u32) -> Self {
        StateId(raw)
    }

    pub fn is_start(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 单个字符的转移状态标签
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    /// 沿已有转移前进
    Transition,
    /// 失配：从根重新尝试当前字符，或直接回到 0
    Reset,
    /// 到达输出状态（携带命中的关键词）
    Match(String),
}

impl Status {
    pub fn is_match(&self) -> bool {
        matches!(self, Status::Match(_))
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Transition => f.write_str("Transition"),
            Status::Reset => f.write_str("Reset"),
            Status::Match(pattern) => write!(f, "Match: {pattern}"),
        }
    }
}

// 可视化前端按字符串消费状态标签
impl Serialize for Status {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// 每消费一个字符产生一条记录（按输入顺序）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransitionRecord {
    #[serde(rename = "char")]
    pub ch: char,
    pub from_state: StateId,
    pub to_state: StateId,
    pub status: Status,
}

/// 单次扫描结果：命中序列 + 转移日志
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanOutcome {
    pub matches: Vec<String>,
    pub log: Vec<TransitionRecord>,
}

impl ScanOutcome {
    /// 至少命中一个关键词
    pub fn has_matches(&self) -> bool {
        !self.matches.is_empty()
    }
}
