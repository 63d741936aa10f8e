//! 消息判定：关键词自动机 + 启发式得分 + 本地 URL 黑名单
use std::sync::OnceLock;

use rayon::prelude::*;
use regex::Regex;
use serde::Serialize;
use tracing::{debug, warn};

use crate::automaton::MatchAutomaton;
use crate::options::ScanOptions;
use crate::types::TransitionRecord;

pub(crate) const SPAM_LABEL: &str = "SPAM DETECTED";
pub(crate) const HAM_LABEL: &str = "Legitimate (Ham)";

/// 单条消息的判定结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub classification: &'static str,
    pub is_spam: bool,
    pub patterns_found: Vec<String>,
    pub heuristic_score: u8,
    pub automata_logs: Vec<TransitionRecord>,
}

/// URL 检查结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UrlVerdict {
    pub malicious: bool,
    pub reason: String,
}

/// 非关键词特征的可疑度（0..=100）
/// - 大写字符占比 > 0.4：+30
/// - 感叹号多于 2 个：+20
/// - 出现 `$`：+50
pub fn heuristic_score(text: &str) -> u8 {
    let mut score: u32 = 0;
    let len = text.chars().count();
    if len > 0 {
        let upper = text.chars().filter(|c| c.is_uppercase()).count();
        if upper as f64 / (len + 1) as f64 > 0.4 {
            score += 30;
        }
    }
    if text.matches('!').count() > 2 {
        score += 20;
    }
    if text.contains('$') {
        score += 50;
    }
    score.min(100) as u8
}

fn url_regex() -> &'static Regex {
    static URL_RE: OnceLock<Regex> = OnceLock::new();
    URL_RE.get_or_init(|| {
        Regex::new(r"https?://(?:[a-zA-Z]|[0-9]|[$-_@.&+]|[!*\\(\\),]|(?:%[0-9a-fA-F][0-9a-fA-F]))+")
            .expect("compile url regex")
    })
}

/// 抽取消息中的 http/https URL（按出现顺序）
pub fn extract_urls(text: &str) -> Vec<&str> {
    url_regex().find_iter(text).map(|m| m.as_str()).collect()
}

/// 按本地黑名单（子串）检查 URL
pub fn check_url(url: &str, blocklist: &[String]) -> UrlVerdict {
    match blocklist.iter().find(|bad| !bad.is_empty() && url.contains(bad.as_str())) {
        Some(bad) => UrlVerdict { malicious: true, reason: format!("Known Malicious Site ({bad})") },
        None => UrlVerdict { malicious: false, reason: "Safe".to_string() },
    }
}

/// 判定单条消息
pub fn classify(automaton: &MatchAutomaton, text: &str, opts: &ScanOptions) -> Verdict {
    let outcome = automaton.scan(text);
    let keyword_hit = outcome.has_matches();
    let mut patterns = outcome.matches;
    let mut score = heuristic_score(text);
    let mut dangerous_url = false;

    for url in extract_urls(text) {
        let check = check_url(url, &opts.url_blocklist);
        if check.malicious {
            patterns.push(format!("DANGEROUS URL: {url} ({})", check.reason));
            score = 100;
            dangerous_url = true;
        }
    }

    let is_spam = keyword_hit || dangerous_url || score >= opts.spam_threshold;
    Verdict {
        classification: if is_spam { SPAM_LABEL } else { HAM_LABEL },
        is_spam,
        patterns_found: patterns,
        heuristic_score: score,
        automata_logs: outcome.log,
    }
}

/// 并行判定多条消息；所有线程共享同一只读自动机，结果顺序与输入一致
pub fn classify_batch<S>(automaton: &MatchAutomaton, messages: &[S], opts: &ScanOptions) -> Vec<Verdict>
where
    S: AsRef<str> + Sync,
{
    let threads = opts.effective_threads();
    debug!(messages = messages.len(), threads, "classifying batch");

    let serial = || -> Vec<Verdict> {
        messages.iter().map(|m| classify(automaton, m.as_ref(), opts)).collect()
    };
    if threads <= 1 || messages.len() <= 1 {
        return serial();
    }

    match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
        Ok(pool) => pool.install(|| {
            messages.par_iter().map(|m| classify(automaton, m.as_ref(), opts)).collect::<Vec<_>>()
        }),
        Err(err) => {
            warn!(error = %err, "thread pool unavailable, classifying serially");
            serial()
        }
    }
}
