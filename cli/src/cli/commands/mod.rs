use std::collections::HashMap;
use std::process;

use anyhow::{Result, anyhow, bail};
use tracing::info;
use tradesim_core::WorldState;

use super::{
    Session, parse_tariff_percent, print_evaluation, print_help, print_history, print_overview,
    print_partners, resolve_partner_name,
};
use crate::score::{TERM_YEARS, TermEvaluation};

pub struct Context<'a> {
    world: &'a mut WorldState,
    session: &'a mut Session,
}

impl<'a> Context<'a> {
    pub fn new(world: &'a mut WorldState, session: &'a mut Session) -> Self {
        Self { world, session }
    }

    pub fn world(&self) -> &WorldState {
        &*self.world
    }

    pub fn world_mut(&mut self) -> &mut WorldState {
        &mut *self.world
    }

    pub fn session(&self) -> &Session {
        &*self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut *self.session
    }
}

pub struct Args<'a> {
    tokens: Vec<&'a str>,
    index: usize,
}

impl<'a> Args<'a> {
    pub fn new(tokens: Vec<&'a str>) -> Self {
        Self { tokens, index: 0 }
    }

    pub fn next(&mut self) -> Option<&'a str> {
        let value = self.tokens.get(self.index).copied()?;
        self.index += 1;
        Some(value)
    }

    pub fn next_required(&mut self, message: &str) -> Result<&'a str> {
        self.next().ok_or_else(|| anyhow!(message.to_owned()))
    }
}

pub trait Command {
    fn name() -> &'static str;
    fn execute(ctx: &mut Context<'_>, args: Args<'_>) -> Result<()>;
}

type CommandFn = for<'a> fn(&mut Context<'a>, Args<'a>) -> Result<()>;

pub struct CommandRegistry {
    handlers: HashMap<&'static str, CommandFn>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    pub fn register<C: Command>(&mut self) {
        let name = C::name();
        if self.handlers.insert(name, C::execute).is_some() {
            panic!("重複したコマンド登録です: {name}");
        }
    }

    pub fn dispatch<'a>(&self, command: &str, ctx: &mut Context<'a>, args: Args<'a>) -> Result<()> {
        if let Some(handler) = self.handlers.get(command) {
            handler(ctx, args)
        } else {
            bail!("未対応のコマンドです: {command}. help で一覧を確認してください。");
        }
    }

    pub fn execute_input<'a>(&self, ctx: &mut Context<'a>, input: &'a str) -> Result<()> {
        let mut parts = input.split_whitespace();
        let Some(head) = parts.next() else {
            return Err(anyhow!("コマンドが指定されていません。"));
        };
        let command_name = head.to_ascii_lowercase();
        let args = Args::new(parts.collect());
        self.dispatch(command_name.as_str(), ctx, args)
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        let mut registry = Self::new();
        registry.register::<HelpCommand>();
        registry.register::<HelpAliasCommand>();
        registry.register::<OverviewCommand>();
        registry.register::<OverviewAliasCommand>();
        registry.register::<PartnersCommand>();
        registry.register::<HistoryCommand>();
        registry.register::<TariffCommand>();
        registry.register::<NextCommand>();
        registry.register::<AdvanceCommand>();
        registry.register::<ExportCommand>();
        registry.register::<LogCommand>();
        registry.register::<QuitCommand>();
        registry.register::<ExitCommand>();
        registry
    }
}

pub struct HelpCommand;

impl Command for HelpCommand {
    fn name() -> &'static str {
        "help"
    }

    fn execute(_ctx: &mut Context<'_>, _args: Args<'_>) -> Result<()> {
        print_help();
        Ok(())
    }
}

pub struct HelpAliasCommand;

impl Command for HelpAliasCommand {
    fn name() -> &'static str {
        "?"
    }

    fn execute(ctx: &mut Context<'_>, args: Args<'_>) -> Result<()> {
        HelpCommand::execute(ctx, args)
    }
}

pub struct OverviewCommand;

impl Command for OverviewCommand {
    fn name() -> &'static str {
        "overview"
    }

    fn execute(ctx: &mut Context<'_>, _args: Args<'_>) -> Result<()> {
        print_overview(ctx.world());
        Ok(())
    }
}

pub struct OverviewAliasCommand;

impl Command for OverviewAliasCommand {
    fn name() -> &'static str {
        "ov"
    }

    fn execute(ctx: &mut Context<'_>, args: Args<'_>) -> Result<()> {
        OverviewCommand::execute(ctx, args)
    }
}

pub struct PartnersCommand;

impl Command for PartnersCommand {
    fn name() -> &'static str {
        "partners"
    }

    fn execute(ctx: &mut Context<'_>, _args: Args<'_>) -> Result<()> {
        print_partners(ctx.world());
        Ok(())
    }
}

pub struct HistoryCommand;

impl Command for HistoryCommand {
    fn name() -> &'static str {
        "history"
    }

    fn execute(ctx: &mut Context<'_>, _args: Args<'_>) -> Result<()> {
        print_history(&ctx.world().player_snapshot());
        Ok(())
    }
}

pub struct TariffCommand;

impl Command for TariffCommand {
    fn name() -> &'static str {
        "tariff"
    }

    fn execute(ctx: &mut Context<'_>, mut args: Args<'_>) -> Result<()> {
        let partner_token = args.next_required("関税を設定する相手国を指定してください。")?;
        let rate_token = args.next_required("税率(%)を指定してください。")?;
        let partner = resolve_partner_name(ctx.world(), partner_token)?;
        let rate = parse_tariff_percent(rate_token)?;
        if !ctx.world_mut().set_tariff(&partner, rate) {
            bail!("{} とは貿易関係がありません。", partner);
        }
        info!(partner = %partner, rate, "tariff updated");
        let year = ctx.world().year();
        ctx.session_mut().log_event(
            year,
            format!("{} への関税を {:.1}% に調整しました", partner, rate * 100.0),
        );
        Ok(())
    }
}

pub struct NextCommand;

impl Command for NextCommand {
    fn name() -> &'static str {
        "next"
    }

    fn execute(ctx: &mut Context<'_>, _args: Args<'_>) -> Result<()> {
        if ctx.session().is_finished() {
            println!("ゲームは終了しています。再開するにはプログラムを再起動してください。");
            return Ok(());
        }

        let event = ctx.world_mut().advance_year()?;
        let year = ctx.world().year();
        if let Some(event) = event {
            ctx.session_mut().log_event(year, event.message());
        }

        if year > TERM_YEARS {
            let evaluation = TermEvaluation::from_snapshot(&ctx.world().player_snapshot());
            print_evaluation(&evaluation);
            ctx.session_mut()
                .log_event(year, "ゲーム終了 - 結果を確認してください");
            ctx.session_mut().finish();
        } else {
            ctx.session_mut()
                .log_event(year, "年次経済レポートを更新しました");
        }
        Ok(())
    }
}

pub struct AdvanceCommand;

impl Command for AdvanceCommand {
    fn name() -> &'static str {
        "advance"
    }

    fn execute(ctx: &mut Context<'_>, args: Args<'_>) -> Result<()> {
        NextCommand::execute(ctx, args)
    }
}

pub struct ExportCommand;

impl Command for ExportCommand {
    fn name() -> &'static str {
        "export"
    }

    fn execute(ctx: &mut Context<'_>, mut args: Args<'_>) -> Result<()> {
        let snapshot = match args.next() {
            Some(token) => {
                let name = resolve_partner_name(ctx.world(), token)?;
                ctx.world()
                    .snapshot_of(&name)
                    .ok_or_else(|| anyhow!("相手国が見つかりません: {}", name))?
            }
            None => ctx.world().player_snapshot(),
        };
        println!("{}", snapshot.to_json_pretty()?);
        Ok(())
    }
}

pub struct LogCommand;

impl Command for LogCommand {
    fn name() -> &'static str {
        "log"
    }

    fn execute(ctx: &mut Context<'_>, _args: Args<'_>) -> Result<()> {
        let entries = ctx.session().entries();
        if entries.is_empty() {
            println!("記録されたイベントはありません。");
        }
        for entry in entries {
            println!("{entry}");
        }
        Ok(())
    }
}

pub struct QuitCommand;

impl Command for QuitCommand {
    fn name() -> &'static str {
        "quit"
    }

    fn execute(_ctx: &mut Context<'_>, _args: Args<'_>) -> Result<()> {
        println!("シミュレーションを終了します。");
        process::exit(0);
    }
}

pub struct ExitCommand;

impl Command for ExitCommand {
    fn name() -> &'static str {
        "exit"
    }

    fn execute(ctx: &mut Context<'_>, args: Args<'_>) -> Result<()> {
        QuitCommand::execute(ctx, args)
    }
}

#[cfg(test)]
mod tests {
    use tradesim_core::{WorldBuilder, WorldDefinition};

    use super::*;

    fn sample_world() -> WorldState {
        WorldBuilder::new(WorldDefinition::default())
            .with_seed(17)
            .build()
            .unwrap()
    }

    #[test]
    fn tariff_command_updates_player_and_logs() {
        let registry = CommandRegistry::default();
        let mut world = sample_world();
        let mut session = Session::default();
        let mut ctx = Context::new(&mut world, &mut session);
        registry.execute_input(&mut ctx, "tariff 1 30").unwrap();

        let partner = world.partners()[0].name().to_string();
        assert_eq!(world.player().tariff_toward(&partner), Some(0.3));
        assert_eq!(session.entries().len(), 1);
        assert!(session.entries()[0].contains(&partner));
    }

    #[test]
    fn tariff_command_rejects_out_of_range_rate() {
        let registry = CommandRegistry::default();
        let mut world = sample_world();
        let mut session = Session::default();
        let before = world.player_snapshot();
        let mut ctx = Context::new(&mut world, &mut session);
        assert!(registry.execute_input(&mut ctx, "tariff 1 80").is_err());
        assert!(registry.execute_input(&mut ctx, "tariff").is_err());
        assert_eq!(world.player_snapshot(), before);
    }

    #[test]
    fn term_ends_after_fifth_year() {
        let registry = CommandRegistry::default();
        let mut world = sample_world();
        let mut session = Session::default();
        let mut ctx = Context::new(&mut world, &mut session);
        let mut calls = 0;
        while !ctx.session().is_finished() {
            registry.execute_input(&mut ctx, "next").unwrap();
            calls += 1;
            assert!(calls < 100);
        }
        let final_year = ctx.world().year();
        registry.execute_input(&mut ctx, "advance").unwrap();
        assert_eq!(ctx.world().year(), final_year);
        assert_eq!(final_year, TERM_YEARS + 1);
        assert!(session.entries().last().unwrap().contains("ゲーム終了"));
    }

    #[test]
    fn retaliation_year_logs_warning_without_advancing() {
        let registry = CommandRegistry::default();
        let mut world = sample_world();
        let mut session = Session::default();
        let partners: Vec<String> = world
            .partners()
            .iter()
            .map(|partner| partner.name().to_string())
            .collect();
        let tariff_inputs: Vec<String> = (1..=partners.len())
            .map(|idx| format!("tariff {idx} 50"))
            .collect();
        let mut ctx = Context::new(&mut world, &mut session);
        for input in &tariff_inputs {
            registry.execute_input(&mut ctx, input).unwrap();
        }

        let mut retaliations = 0;
        let mut calls = 0;
        while !ctx.session().is_finished() {
            let year_before = ctx.world().year();
            let logged_before = ctx.session().entries().len();
            registry.execute_input(&mut ctx, "next").unwrap();
            calls += 1;
            assert!(calls < 200);

            let year = ctx.world().year();
            let snapshot = ctx.world().player_snapshot();
            assert_eq!(snapshot.history.len(), year as usize);
            if year != year_before {
                assert_eq!(year, year_before + 1);
                continue;
            }

            retaliations += 1;
            let new_entries = &ctx.session().entries()[logged_before..];
            let warning = new_entries
                .iter()
                .find(|entry| entry.contains("警告"))
                .expect("retaliation year logs a warning");
            assert!(warning.starts_with(&format!("{year}年目: ")));
            assert!(partners.iter().any(|name| warning.contains(name.as_str())));
            assert!(!ctx.session().is_finished());
        }

        assert!(retaliations > 0);
        assert_eq!(ctx.world().year(), TERM_YEARS + 1);
    }

    #[test]
    fn unknown_command_is_an_error() {
        let registry = CommandRegistry::default();
        let mut world = sample_world();
        let mut session = Session::default();
        let mut ctx = Context::new(&mut world, &mut session);
        assert!(registry.execute_input(&mut ctx, "launch").is_err());
        assert!(registry.execute_input(&mut ctx, "   ").is_err());
        assert!(registry.execute_input(&mut ctx, "OV").is_ok());
    }
}
