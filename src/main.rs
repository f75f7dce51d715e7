//! adsift 命令行工具
//! 功能说明：
//! 1. 对 JSON 中的投稿数据逐条评分分级
//! 2. 从已保存的投稿通知页 HTML 提取条目并给出勾选/高亮建议
//! 3. 校验与导出规则表
//!
//! 日志级别通过 RUST_LOG 控制，-v 等价于 RUST_LOG=debug

use std::fs;
use std::path::{Path, PathBuf};

use adsift::{
    AdEvaluator, ConfigManager, GlobalConfig, GalleryExtractor, RuleCompiler, RuleLoader,
    SubmissionData, DEFAULT_AMBIGUOUS_THRESHOLD, DEFAULT_DEFINITE_THRESHOLD, CompileOptions,
    rule::EMBEDDED_RULES_JSON,
};
use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "adsift",
    about = "Detect advertisement submissions (commissions, streams, YCHs, raffles) with weighted rules",
    version
)]
struct Cli {
    #[command(flatten)]
    rules: RuleArgs,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct RuleArgs {
    /// JSON rule table to use instead of the embedded one
    #[arg(long, global = true)]
    rules: Option<PathBuf>,
    /// Minimum rating for "ambiguous"
    #[arg(long, global = true, default_value_t = DEFAULT_AMBIGUOUS_THRESHOLD, allow_negative_numbers = true)]
    ambiguous: i64,
    /// Minimum rating for "advertisement"
    #[arg(long, global = true, default_value_t = DEFAULT_DEFINITE_THRESHOLD, allow_negative_numbers = true)]
    definite: i64,
    /// Treat empty and/or combiners as true/false instead of rejecting them
    #[arg(long, global = true)]
    allow_empty_combiners: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classify submissions from a JSON array of {name, tags, description}
    Classify {
        input: PathBuf,
        /// Print the full rule trace for every submission
        #[arg(long)]
        explain: bool,
    },
    /// Extract and classify the submissions of a saved gallery page
    Gallery {
        html: PathBuf,
        /// Page URL used to resolve relative submission links
        #[arg(long)]
        base_url: Option<String>,
        /// Print the full rule trace for every submission
        #[arg(long)]
        explain: bool,
    },
    /// Load and compile a rule table, reporting configuration errors
    CheckRules,
    /// Print the embedded rule table
    DumpRules,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = build_config(&cli.rules, cli.verbose)?;

    match cli.command {
        Command::Classify { input, explain } => classify(&config, &input, explain),
        Command::Gallery { html, base_url, explain } => gallery(&config, &html, base_url.as_deref(), explain),
        Command::CheckRules => check_rules(&config),
        Command::DumpRules => {
            print!("{}", EMBEDDED_RULES_JSON);
            Ok(())
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_config(args: &RuleArgs, verbose: bool) -> anyhow::Result<GlobalConfig> {
    let mut builder = ConfigManager::custom()
        .ambiguous_threshold(args.ambiguous)
        .definite_threshold(args.definite)
        .allow_empty_combiners(args.allow_empty_combiners)
        .verbose(verbose);
    if let Some(path) = &args.rules {
        builder = builder.rule_file(path);
    }
    Ok(builder.build()?)
}

fn classify(config: &GlobalConfig, input: &Path, explain: bool) -> anyhow::Result<()> {
    let evaluator = AdEvaluator::new(config)?;
    let content = fs::read_to_string(input).with_context(|| format!("cannot read {}", input.display()))?;
    let submissions: Vec<SubmissionData> =
        serde_json::from_str(&content).with_context(|| format!("{} is not a submission array", input.display()))?;

    for data in &submissions {
        if explain {
            println!("== {:?}", data.name);
            print!("{}", evaluator.explain(data));
        } else {
            println!("{}", serde_json::to_string(&evaluator.test(data))?);
        }
    }

    info!("Classified {} submissions", submissions.len());
    Ok(())
}

fn gallery(config: &GlobalConfig, html: &Path, base_url: Option<&str>, explain: bool) -> anyhow::Result<()> {
    let evaluator = AdEvaluator::new(config)?;
    let page = fs::read_to_string(html).with_context(|| format!("cannot read {}", html.display()))?;

    let extractor = match base_url {
        Some(url) => GalleryExtractor::with_base_url(url)?,
        None => GalleryExtractor::new(),
    };
    let entries = extractor.extract(&page);
    let (decisions, summary) = evaluator.decide_all(&entries);

    for (entry, decision) in entries.iter().zip(&decisions) {
        println!("{}", serde_json::to_string(decision)?);
        if explain {
            print!("{}", evaluator.explain(&entry.data));
        }
    }
    println!("{}", summary);
    Ok(())
}

fn check_rules(config: &GlobalConfig) -> anyhow::Result<()> {
    let table = RuleLoader::load(config)?;
    let (rule_set, stats) = RuleCompiler::compile_with_stats(&table, &CompileOptions::from(config))?;

    println!(
        "OK: {} rules, {} selectors, {} combiners, {} negative-evidence rules",
        rule_set.len(),
        stats.selector_count,
        stats.combiner_count,
        stats.negative_rule_count
    );
    Ok(())
}
