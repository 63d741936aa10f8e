use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use spamlens_core::{
    classify_batch, missed_overlaps, MatchAutomaton, PatternSet, ScanOptions,
};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// 命令行入口（基于 clap）
#[derive(Parser, Debug)]
#[command(name = "spamlens", version, about = "关键词自动机垃圾信息检测")]
struct Cli {
    /// 配置文件路径（TOML）
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// 关键词文件（每行一个）；读取失败时回退到内置词表
    #[arg(long, global = true)]
    keywords: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 判定消息并输出 JSON 数组
    Scan {
        /// 待检测消息（可重复）
        #[arg(long = "text", conflicts_with = "input")]
        texts: Vec<String>,

        /// 消息文件（每行一条）
        #[arg(long)]
        input: Option<PathBuf>,

        /// 输出文件；缺省写到标准输出
        #[arg(long)]
        output: Option<PathBuf>,

        /// 线程数（"auto"=CPU 核心数）；缺省沿用配置文件
        #[arg(long)]
        threads: Option<String>,

        /// 启发式垃圾阈值（覆盖配置文件）
        #[arg(long)]
        threshold: Option<u8>,

        /// 附带完整 Aho-Corasick 对照，列出被简化自动机漏掉的出现
        #[arg(long)]
        compare: bool,
    },
    /// 输出自动机的转移表与输出映射（JSON，供可视化）
    States,
}

fn main() -> Result<()> {
    // 初始化日志（支持通过 RUST_LOG 控制等级，例如 info、debug）
    init_tracing();
    let cli = Cli::parse();
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    run(cli, &mut out)?;
    out.flush()?;
    Ok(())
}

/// 执行子命令；未指定输出文件时 JSON 写入 `stdout`
fn run(cli: Cli, stdout: &mut dyn Write) -> Result<()> {
    let opts = load_options(&cli)?;
    let patterns = load_patterns(&opts);
    let automaton = MatchAutomaton::build(&patterns);

    match cli.command {
        Commands::Scan { texts, input, output, compare, .. } => {
            let messages = match input {
                Some(path) => read_messages(&path)?,
                None => texts,
            };
            info!(messages = messages.len(), keywords = patterns.len(), "starting scan");

            let verdicts = classify_batch(&automaton, &messages, &opts);
            let mut items = Vec::with_capacity(verdicts.len());
            for (msg, verdict) in messages.iter().zip(verdicts) {
                let mut item = serde_json::json!({ "message": msg, "verdict": verdict });
                if compare {
                    let outcome = automaton.scan(msg);
                    item["missed_overlaps"] = serde_json::to_value(missed_overlaps(&patterns, msg, &outcome))?;
                }
                items.push(item);
            }

            let spam = items.iter().filter(|i| i["verdict"]["is_spam"] == true).count();
            write_json(output.as_deref(), stdout, &serde_json::Value::Array(items))?;
            info!(spam, "scan finished");
        }
        Commands::States => {
            let transitions: Vec<_> = automaton
                .transitions()
                .into_iter()
                .map(|(key, to)| serde_json::json!({ "from": key.state, "char": key.ch, "to": to }))
                .collect();
            let outputs: Vec<_> = automaton
                .outputs()
                .into_iter()
                .map(|(state, pattern)| serde_json::json!({ "state": state, "pattern": pattern }))
                .collect();
            let doc = serde_json::json!({
                "states": automaton.state_count(),
                "transitions": transitions,
                "outputs": outputs,
            });
            write_json(None, stdout, &doc)?;
        }
    }

    Ok(())
}

/// 合并配置文件与命令行参数；命令行显式给出的值优先
fn load_options(cli: &Cli) -> Result<ScanOptions> {
    let mut opts = match &cli.config {
        Some(path) => ScanOptions::from_toml_file(path).context("load config")?,
        None => ScanOptions::default(),
    };
    if cli.keywords.is_some() {
        opts.keywords_path = cli.keywords.clone();
    }
    if let Commands::Scan { threads, threshold, .. } = &cli.command {
        if let Some(t) = threshold {
            opts.spam_threshold = *t;
        }
        if let Some(arg) = threads {
            opts.threads = parse_threads(arg);
        }
    }
    Ok(opts)
}

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, FmtSubscriber};
    // 日志写到 stderr，stdout 留给 JSON 输出
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// 关键词来源：配置/参数给出的文件（失败回退），否则内置词表
fn load_patterns(opts: &ScanOptions) -> PatternSet {
    match &opts.keywords_path {
        Some(path) => PatternSet::load_or_fallback(path, opts.fallback),
        None => PatternSet::defaults(),
    }
}

/// 读取消息文件，忽略空行
fn read_messages(path: &Path) -> Result<Vec<String>> {
    let txt = std::fs::read_to_string(path).with_context(|| format!("read messages from {}", path.display()))?;
    Ok(txt.lines().filter(|l| !l.trim().is_empty()).map(str::to_string).collect())
}

fn write_json(path: Option<&Path>, stdout: &mut dyn Write, value: &serde_json::Value) -> Result<()> {
    match path {
        Some(p) => {
            let mut file = BufWriter::new(File::create(p).context("create output file")?);
            serde_json::to_writer_pretty(&mut file, value)?;
            writeln!(file)?;
            file.flush()?;
        }
        None => {
            serde_json::to_writer_pretty(&mut *stdout, value)?;
            writeln!(stdout)?;
        }
    }
    Ok(())
}

/// 解析线程参数
fn parse_threads(s: &str) -> Option<usize> {
    if s.eq_ignore_ascii_case("auto") { return None; }
    match s.parse::<usize>() {
        Ok(n) if n >= 1 => Some(n),
        _ => None,
    }
}
