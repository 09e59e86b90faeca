// src/cli.rs
use std::{
    env,
    error::Error,
    fs,
    io::{self, BufRead},
    path::PathBuf,
};

use crate::config::consts::DESCRIPTIONS_DIR;
use crate::config::options::{Command, PropSelector};
use crate::core::dom::Fragment;
use crate::core::policy::AllowPolicy;
use crate::progress::Progress;
use crate::{lint, rules, scrape, store};

pub fn run() -> Result<(), Box<dyn Error>> {
    let cmd = parse_cli()?;
    dispatch(cmd)
}

fn parse_cli() -> Result<Command, Box<dyn Error>> {
    let mut args = env::args().skip(1);

    let first = match args.next() {
        Some(a) => a,
        None => {
            eprintln!(include_str!("cli_help.txt"));
            std::process::exit(0);
        }
    };

    match first.as_str() {
        "scrape" => {
            let names: Vec<String> = args.collect();
            let props = if names.is_empty() {
                PropSelector::All
            } else {
                PropSelector::Named(names)
            };
            Ok(Command::Scrape { props })
        }
        "lint" => {
            let mut dir = PathBuf::from(DESCRIPTIONS_DIR);
            while let Some(a) = args.next() {
                match a.as_str() {
                    "--dir" => dir = PathBuf::from(args.next().ok_or("Missing value for --dir")?),
                    other => return Err(format!("Unknown arg: {}", other).into()),
                }
            }
            Ok(Command::Lint { dir })
        }
        "lint-wiki" => {
            let names: Vec<String> = args.collect();
            if names.is_empty() {
                return Err("lint-wiki needs property names (or - for stdin)".into());
            }
            Ok(Command::LintWiki { props: names })
        }
        "aggregate" => {
            let mut out = None;
            while let Some(a) = args.next() {
                match a.as_str() {
                    "-o" | "--out" => {
                        out = Some(PathBuf::from(args.next().ok_or("Missing output path")?))
                    }
                    other => return Err(format!("Unknown arg: {}", other).into()),
                }
            }
            Ok(Command::Aggregate { out })
        }
        "self-test" => Ok(Command::SelfTest),
        "-h" | "--help" => {
            eprintln!(include_str!("cli_help.txt"));
            std::process::exit(0);
        }
        other => Err(format!("Unknown command: {}", other).into()),
    }
}

fn dispatch(cmd: Command) -> Result<(), Box<dyn Error>> {
    let policy = AllowPolicy::default();
    match cmd {
        Command::Scrape { props } => cmd_scrape(&props, &policy),
        Command::Lint { dir } => cmd_lint(&dir, &policy),
        Command::LintWiki { props } => cmd_lint_wiki(&props, &policy),
        Command::Aggregate { out } => cmd_aggregate(out),
        Command::SelfTest => cmd_self_test(&policy),
    }
}

/* ---------------- Progress sink ---------------- */

struct CliProgress {
    total: usize,
    done: usize,
}

impl CliProgress {
    fn new() -> Self {
        CliProgress { total: 0, done: 0 }
    }
}

impl Progress for CliProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
    }
    fn log(&mut self, msg: &str) {
        eprintln!("{msg}");
    }
    fn item_done(&mut self, name: &str) {
        self.done += 1;
        println!("[{}/{}] {name}", self.done, self.total);
    }
    fn item_failed(&mut self, name: &str) {
        self.done += 1;
        eprintln!("[{}/{}] {name} FAILED", self.done, self.total);
    }
}

/* ---------------- Commands ---------------- */

fn cmd_scrape(selector: &PropSelector, policy: &AllowPolicy) -> Result<(), Box<dyn Error>> {
    let mut progress = CliProgress::new();
    let summary = scrape::scrape_properties(selector, policy, Some(&mut progress))?;

    println!("Wrote {} description(s).", summary.written.len());
    if !summary.failed.is_empty() {
        return Err(format!(
            "{} properties failed: {}",
            summary.failed.len(),
            summary.failed.join(", ")
        )
        .into());
    }
    Ok(())
}

fn cmd_lint(dir: &std::path::Path, policy: &AllowPolicy) -> Result<(), Box<dyn Error>> {
    let report = lint::lint_directory(dir, policy)?;

    for msg in &report.messages {
        eprintln!("{msg}");
    }
    println!("\nChecked {} descriptions.", report.checked());
    println!("{} descriptions passed all checks.", report.passed());

    let failures = report.failures();
    if !failures.is_empty() {
        println!("{} descriptions failed one or more checks:", failures.len());
        for identifier in &failures {
            println!("  {identifier}");
        }
        return Err("one or more descriptions failed lint".into());
    }
    Ok(())
}

fn cmd_lint_wiki(names: &[String], policy: &AllowPolicy) -> Result<(), Box<dyn Error>> {
    let mut failed = false;

    // "-" items read a fragment from stdin; the rest fetch live wiki content
    let stdin_items: Vec<&String> = names.iter().filter(|n| n.as_str() == "-").collect();
    let fetch_names: Vec<String> = names.iter().filter(|n| n.as_str() != "-").cloned().collect();

    for _ in stdin_items {
        let markup = read_stdin_lines()?;
        let outcome = lint::check_wiki_fragment("-", "no URL", &markup, policy);
        report_wiki_outcome(&outcome, &mut failed);
    }

    if !fetch_names.is_empty() {
        let mut progress = CliProgress::new();
        let report = lint::lint_wiki(&fetch_names, policy, Some(&mut progress))?;
        for msg in &report.messages {
            eprintln!("{msg}");
        }
        if !report.all_passed() {
            failed = true;
        }
    }

    if failed {
        return Err("one or more properties failed lint".into());
    }
    Ok(())
}

fn report_wiki_outcome(outcome: &lint::RecordOutcome, failed: &mut bool) {
    for msg in &outcome.messages {
        eprintln!("{msg}");
    }
    if !outcome.result.success {
        *failed = true;
    }
}

fn cmd_aggregate(out: Option<PathBuf>) -> Result<(), Box<dyn Error>> {
    let merged = store::aggregate(&PathBuf::from(DESCRIPTIONS_DIR))?;
    let text = store::to_canonical_json(&merged)?;
    match out {
        Some(path) => fs::write(path, text)?,
        None => print!("{text}"),
    }
    Ok(())
}

/// Check every rule against its own examples: good must pass with zero
/// diagnostics, bad must fail with at least one.
fn cmd_self_test(policy: &AllowPolicy) -> Result<(), Box<dyn Error>> {
    let mut failed = 0usize;

    for rule in rules::content_rules() {
        let good = (rule.check)(&Fragment::parse(rule.good), policy);
        let bad = (rule.check)(&Fragment::parse(rule.bad), policy);
        let ok = good.passes && good.errors.is_empty() && !bad.passes && !bad.errors.is_empty();
        report_self_test(rule.name, ok, &mut failed);
    }
    for rule in rules::source_rules() {
        let good = (rule.check)(rule.good);
        let bad = (rule.check)(rule.bad);
        let ok = good.passes && good.errors.is_empty() && !bad.passes && !bad.errors.is_empty();
        report_self_test(rule.name, ok, &mut failed);
    }

    if failed > 0 {
        Err(format!("{failed} rule self-test(s) failed").into())
    } else {
        println!("All rule self-tests passed.");
        Ok(())
    }
}

fn report_self_test(name: &str, ok: bool, failed: &mut usize) {
    if ok {
        println!("ok   {name}");
    } else {
        println!("FAIL {name}");
        *failed += 1;
    }
}

fn read_stdin_lines() -> Result<String, Box<dyn Error>> {
    let stdin = io::stdin();
    let mut lines = Vec::new();
    for line in stdin.lock().lines() {
        lines.push(line?);
    }
    Ok(lines.join("\n"))
}
