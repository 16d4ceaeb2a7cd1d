mod commands;

use std::io::{self, BufRead, Write};

use anyhow::{Context as _, Result, anyhow, bail};
use tradesim_core::{EntitySnapshot, WorldState};

use crate::score::{MAX_SCORE, TERM_YEARS, TermEvaluation};
use commands::{CommandRegistry, Context};

/// Upper bound the tariff slider exposes. The core itself accepts any rate.
const MAX_TARIFF_PERCENT: f64 = 50.0;

/// Host-side state that the core does not track: the event log and the term end.
#[derive(Debug, Default)]
pub struct Session {
    log: Vec<String>,
    finished: bool,
}

impl Session {
    pub fn log_event(&mut self, year: u32, message: impl AsRef<str>) {
        let line = format!("{}年目: {}", year, message.as_ref());
        println!("{line}");
        self.log.push(line);
    }

    pub fn entries(&self) -> &[String] {
        &self.log
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn finish(&mut self) {
        self.finished = true;
    }
}

pub fn run(world: &mut WorldState) -> Result<()> {
    print_intro(world);
    let registry = CommandRegistry::default();
    let mut session = Session::default();
    let stdin = io::stdin();

    loop {
        print!("{}年目> ", world.year());
        io::stdout()
            .flush()
            .context("プロンプトのフラッシュに失敗しました")?;

        let mut line = String::new();
        let bytes = stdin
            .lock()
            .read_line(&mut line)
            .context("入力の読み込みに失敗しました")?;

        if bytes == 0 {
            println!("入力が終了したためゲームを終了します。");
            return Ok(());
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let mut ctx = Context::new(world, &mut session);
        if let Err(error) = registry.execute_input(&mut ctx, trimmed) {
            println!("エラー: {error:#}");
        }
    }
}

fn print_intro(world: &WorldState) {
    println!("貿易関税シミュレーターへようこそ。");
    println!(
        "あなたは {} の指導者として {} 年間の通商政策を担います。",
        world.player().name(),
        TERM_YEARS
    );
    println!("貿易相手国: {} ヶ国", world.partners().len());
    println!("コマンド例: overview / partners / tariff 2 25 / next / history");
    println!("help で利用可能なコマンド一覧を表示します。");
}

pub(crate) fn print_help() {
    println!("利用可能なコマンド:");
    println!("  overview              主要経済指標と貿易収支を表示");
    println!("  partners              貿易相手国ごとの関税と貿易額を表示");
    println!("  history               年次推移を表示");
    println!("  tariff <相手> <税率%> 相手国への関税率を設定 (0〜50%)");
    println!("  next                  1年進める");
    println!("  export                現在のスナップショットを JSON で出力");
    println!("  log                   イベントログを表示");
    println!("  quit                  ゲームを終了");
}

pub(crate) fn print_overview(world: &WorldState) {
    let summary = world.player_summary();
    println!("=== {} の経済状況 ({}年目) ===", summary.name, summary.year);
    println!("国内総生産: {:.2} 十億ドル", summary.gdp);
    println!("失業率: {:.1}%", summary.unemployment);
    println!("インフレ率: {:.1}%", summary.inflation);
    println!("外貨準備: {:.2} 十億ドル", summary.foreign_reserves);
    println!("総輸出: {:.2} 十億ドル", summary.total_exports);
    println!("総輸入: {:.2} 十億ドル", summary.total_imports);
    println!("貿易収支: {:+.2} 十億ドル", summary.trade_balance);
}

pub(crate) fn print_partners(world: &WorldState) {
    let summary = world.player_summary();
    println!(
        "ID | {:<16} | {:>6} | {:>9} | {:>9} | {:>9}",
        "相手国", "関税", "輸出", "輸入", "収支"
    );
    for (idx, row) in summary.partners.iter().enumerate() {
        println!(
            "{:>2} | {:<16} | {:>5.1}% | {:>8.2}B | {:>8.2}B | {:>+8.2}B",
            idx + 1,
            row.partner,
            row.tariff * 100.0,
            row.exports,
            row.imports,
            row.balance
        );
    }
}

pub(crate) fn print_history(snapshot: &EntitySnapshot) {
    println!(
        "{:>4} | {:>10} | {:>6} | {:>6} | {:>9}",
        "年", "GDP", "失業", "物価", "貿易収支"
    );
    for point in snapshot.history.points() {
        println!(
            "{:>4} | {:>10.2} | {:>5.1}% | {:>5.1}% | {:>+9.2}",
            point.year, point.gdp, point.unemployment, point.inflation, point.trade_balance
        );
    }
}

pub(crate) fn print_evaluation(evaluation: &TermEvaluation) {
    println!("{} 年間の任期を終えました！", TERM_YEARS);
    println!("GDP 成長率: {:.2}%", evaluation.gdp_growth_pct);
    println!("失業率 変化: {:+.1}%", evaluation.unemployment_change);
    println!("インフレ率 変化: {:+.1}%", evaluation.inflation_change);
    println!("最終スコア: {}/{}", evaluation.score, MAX_SCORE);
    println!("{}", evaluation.verdict());
}

pub(crate) fn resolve_partner_name(world: &WorldState, token: &str) -> Result<String> {
    world
        .find_partner_index(token)
        .map(|idx| world.partners()[idx].name().to_string())
        .ok_or_else(|| {
            anyhow!(
                "相手国を特定できませんでした: {} (番号か完全な国名を入力してください)",
                token
            )
        })
}

/// Parses a percentage and converts it to the fraction the core stores.
pub(crate) fn parse_tariff_percent(token: &str) -> Result<f64> {
    let percent: f64 = token
        .trim_end_matches('%')
        .parse()
        .map_err(|_| anyhow!("税率は数値で指定してください: {}", token))?;
    if !percent.is_finite() || !(0.0..=MAX_TARIFF_PERCENT).contains(&percent) {
        bail!(
            "税率は 0〜{:.0}% の範囲で指定してください: {}",
            MAX_TARIFF_PERCENT,
            token
        );
    }
    Ok(percent / 100.0)
}
