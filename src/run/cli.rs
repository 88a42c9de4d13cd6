use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::path::Path;

use wealthtrack::config::Settings;
use wealthtrack::engine::{self, Comparison, PayoffError, PayoffReport, PortfolioCatchUp, Strategy};
use wealthtrack::input;
use wealthtrack::models::{DebtAccount, Portfolio};

use super::format::{format_amount, truncate};

pub(crate) fn as_cli(args: &[String], settings: &Settings) -> Result<()> {
    let Some(command) = args.get(1) else {
        print_usage();
        return Ok(());
    };
    let rest = &args[2..];
    match command.as_str() {
        "catch-up" | "c" => cli_catch_up(rest, settings),
        "payoff" | "p" => cli_payoff(rest, settings),
        "upcoming" | "u" => cli_upcoming(rest, settings),
        "summary" | "s" => cli_summary(rest, settings),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("wealthtrack {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("WealthTrack — recurring postings and debt payoff planning");
    println!();
    println!("Usage: wealthtrack <command>");
    println!();
    println!("Commands:");
    println!("  catch-up                      Apply recurring payments and contributions that are due");
    println!("    --dry-run                   Show what would be applied without saving");
    println!("  payoff --budget <amount>      Compare snowball and avalanche payoff plans");
    println!("    --strategy <name>           Run only snowball or avalanche");
    println!("    --debts <file.csv>          Use debts from a CSV instead of the state file");
    println!("  upcoming                      List scheduled postings coming up");
    println!("    --days <n>                  Horizon in days (default: 30)");
    println!("  summary                       Print liabilities, savings and a focus suggestion");
    println!("  --help, -h                    Show this help");
    println!("  --version, -V                 Show version");
    println!();
    println!("All commands accept --as-of <YYYY-MM-DD> to use a date other than today.");
    println!("State file: $WEALTHTRACK_STATE (default: platform data directory)");
}

// ── Argument helpers ─────────────────────────────────────────

fn flag<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == name)
        .map(|w| w[1].as_str())
}

fn has_switch(args: &[String], name: &str) -> bool {
    args.iter().any(|a| a == name)
}

fn as_of(args: &[String]) -> Result<NaiveDate> {
    match flag(args, "--as-of") {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .with_context(|| format!("Invalid --as-of date '{raw}', expected YYYY-MM-DD")),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

/// The state file with everything due by `today` already applied.
fn current_portfolio(settings: &Settings, today: NaiveDate) -> Result<PortfolioCatchUp> {
    let portfolio = input::load(&settings.state_path)?;
    Ok(engine::catch_up(&portfolio, today))
}

// ── catch-up ─────────────────────────────────────────────────

fn cli_catch_up(args: &[String], settings: &Settings) -> Result<()> {
    let today = as_of(args)?;
    let dry_run = has_switch(args, "--dry-run");
    let result = current_portfolio(settings, today)?;

    if result.posted.is_empty() {
        println!("Nothing due as of {today}");
        return Ok(());
    }

    println!("{:<10}  {:<8} {:<24} {:>14}", "Date", "Type", "Account", "Amount");
    println!("{}", "─".repeat(60));
    for posted in &result.posted {
        println!(
            "{:<10}  {:<8} {:<24} {:>14}",
            posted.date.to_string(),
            posted.kind.as_str(),
            truncate(&posted.account_name, 24),
            format_amount(posted.amount),
        );
    }

    let count = result.posted.len();
    if dry_run {
        println!("Dry run: {count} postings not saved");
    } else {
        input::save(&settings.state_path, &result.portfolio)?;
        println!(
            "Applied {count} postings to {}",
            settings.state_path.display()
        );
    }
    Ok(())
}

// ── payoff ───────────────────────────────────────────────────

fn cli_payoff(args: &[String], settings: &Settings) -> Result<()> {
    let raw_budget = flag(args, "--budget")
        .context("Usage: wealthtrack payoff --budget <amount> [--strategy <name>] [--debts <file.csv>]")?;
    let budget = input::coerce::parse_amount(raw_budget)
        .with_context(|| format!("Invalid budget: {raw_budget}"))?;
    let today = as_of(args)?;

    let debts = match flag(args, "--debts") {
        Some(path) => input::read_debts(Path::new(&input::expand_home(path)))?,
        None => current_portfolio(settings, today)?.portfolio.debts,
    };
    if debts.iter().all(DebtAccount::is_paid_off) {
        println!("No outstanding debts");
        return Ok(());
    }

    match flag(args, "--strategy") {
        Some(raw) => {
            let strategy = Strategy::parse(raw)
                .with_context(|| format!("Unknown strategy '{raw}' (use snowball or avalanche)"))?;
            match engine::simulate(&debts, budget, strategy, today) {
                Ok(report) => print_report(&report, &debts),
                Err(e) => print_failure(strategy, &e),
            }
        }
        None => print_comparison(&engine::compare(&debts, budget, today), &debts),
    }
    Ok(())
}

fn debt_name<'a>(debts: &'a [DebtAccount], id: &'a str) -> &'a str {
    debts
        .iter()
        .find(|d| d.id == id)
        .map(|d| d.name.as_str())
        .unwrap_or(id)
}

fn print_failure(strategy: Strategy, error: &PayoffError) {
    println!("{strategy}: {error}");
}

fn print_report(report: &PayoffReport, debts: &[DebtAccount]) {
    println!("Strategy:        {}", report.strategy);
    println!(
        "Debt-free in:    {} months ({})",
        report.months, report.payoff_date
    );
    println!("Total interest:  {}", format_amount(report.total_interest));

    if !report.payoffs.is_empty() {
        println!();
        println!("Payoff order:");
        for payoff in &report.payoffs {
            println!(
                "  month {:>4}  {}",
                payoff.month,
                debt_name(debts, &payoff.debt_id)
            );
        }
    }

    if !report.snapshots.is_empty() {
        println!();
        println!("Balance trajectory:");
        let last = report.snapshots.len() - 1;
        for (i, snapshot) in report.snapshots.iter().enumerate() {
            if snapshot.month % 6 == 0 || i == last {
                println!(
                    "  M{:<5} {:>16}",
                    snapshot.month,
                    format_amount(snapshot.total_balance)
                );
            }
        }
    }
}

fn print_comparison(comparison: &Comparison, debts: &[DebtAccount]) {
    println!("{:<16} {:>18} {:>18}", "", "Snowball", "Avalanche");
    println!("{}", "─".repeat(54));

    let column = |strategy: Strategy| -> [String; 4] {
        match comparison.get(strategy) {
            Ok(report) => [
                report.months.to_string(),
                report.payoff_date.to_string(),
                format_amount(report.total_interest),
                report
                    .payoffs
                    .first()
                    .map(|p| truncate(debt_name(debts, &p.debt_id), 18))
                    .unwrap_or_default(),
            ],
            Err(_) => std::array::from_fn(|_| "—".to_string()),
        }
    };
    let snowball = column(Strategy::Snowball);
    let avalanche = column(Strategy::Avalanche);
    let labels = ["Months", "Debt-free by", "Total interest", "First cleared"];
    for (i, label) in labels.iter().enumerate() {
        println!("{label:<16} {:>18} {:>18}", snowball[i], avalanche[i]);
    }

    for strategy in Strategy::all() {
        if let Err(e) = comparison.get(*strategy) {
            println!();
            print_failure(*strategy, e);
        }
    }

    if let (Some(interest), Some(months)) = (comparison.interest_saved(), comparison.months_saved())
    {
        println!();
        println!(
            "Avalanche saves {} in interest and {months} months",
            format_amount(interest)
        );
    }
}

// ── upcoming ─────────────────────────────────────────────────

fn cli_upcoming(args: &[String], settings: &Settings) -> Result<()> {
    let today = as_of(args)?;
    let days = match flag(args, "--days") {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("Invalid --days value: {raw}"))?,
        None => settings.reminder_days,
    };
    let portfolio = current_portfolio(settings, today)?.portfolio;
    let reminders = engine::upcoming(&portfolio, today, days);

    if reminders.is_empty() {
        println!("No scheduled items in the next {days} days");
        return Ok(());
    }
    println!("Upcoming ({days} days): {} due", reminders.len());
    for reminder in &reminders {
        println!(
            "  {:<10}  {:<8} {:<24} {:>14}",
            reminder.date.to_string(),
            reminder.kind.as_str(),
            truncate(&reminder.account_name, 24),
            format_amount(reminder.amount),
        );
    }
    Ok(())
}

// ── summary ──────────────────────────────────────────────────

fn cli_summary(args: &[String], settings: &Settings) -> Result<()> {
    let today = as_of(args)?;
    let result = current_portfolio(settings, today)?;
    print_summary(&result.portfolio, today);
    if !result.posted.is_empty() {
        println!();
        println!(
            "{} recurring postings are due but not saved yet; run `wealthtrack catch-up`",
            result.posted.len()
        );
    }
    Ok(())
}

fn print_summary(portfolio: &Portfolio, today: NaiveDate) {
    let liabilities = portfolio.liabilities();
    let savings = portfolio.savings_total();

    println!("WealthTrack — {today}");
    println!("{}", "─".repeat(40));
    println!("  Liabilities:  {}", format_amount(liabilities));
    println!("  Savings:      {}", format_amount(savings));
    println!("  Net:          {}", format_amount(savings.value() - liabilities.value()));
    println!(
        "  Accounts:     {} debts, {} savings goals",
        portfolio.debts.len(),
        portfolio.savings.len()
    );

    match portfolio.focus_suggestion() {
        Some(debt) => println!(
            "  Focus:        {} next ({}% APR)",
            debt.name, debt.apr
        ),
        None => println!("  Focus:        add a debt to get suggestions"),
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
