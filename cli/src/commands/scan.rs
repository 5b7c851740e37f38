use std::fs;
use std::future::{self, Future};
use std::path::Path;
use std::process;
use std::time::Instant;

use anyhow::{Context, bail};
use colored::*;
use portaudit_common::config::Config;
use portaudit_common::network::target::Target;
use portaudit_core::{HostResult, NetworkScanResult, ScanOptions, ScanReport, Scanner};
use tracing::warn;

use super::ScanArgs;
use crate::mprint;
use crate::terminal::{colors, format, print, spinner};

/// Exit status of a scan cut short with Ctrl-C.
pub const INTERRUPTED_EXIT_CODE: i32 = 130;

pub async fn scan(args: ScanArgs, cfg: &Config) -> anyhow::Result<()> {
    if args.network && !args.target.is_network() {
        bail!("'{}' is not a network in CIDR notation", args.target);
    }

    let options = ScanOptions {
        ports: args.ports.unwrap_or_default(),
        timeout: args.timeout,
        max_parallel_hosts: args.parallel.map(usize::from),
    };

    if cfg.quiet == 0 {
        print::aligned_line("Target", args.target.to_string());
        print::aligned_line("Ports", options.ports.to_string().color(colors::PORT));
        print::aligned_line("Timeout", format!("{:?}", options.timeout));
        if let Some(limit) = options.max_parallel_hosts {
            print::aligned_line("Parallel", format!("{limit} hosts"));
        }
    }

    if cfg.quiet < 2 {
        spinner::start(describe(&args.target, &options));
    }

    let start = Instant::now();
    let scanner = Scanner::new();
    let Some(report) = until_interrupted(scanner.scan_target(&args.target, &options), ctrl_c()).await
    else {
        spinner::finish();
        warn!("Scan interrupted by user");
        process::exit(INTERRUPTED_EXIT_CODE);
    };
    spinner::finish();
    let report = report?;

    if cfg.json {
        let json = serde_json::to_string_pretty(&report).context("serializing scan results")?;
        mprint!(&json);
    } else {
        render(&report, cfg);
        summary(&report, start, cfg);
    }

    if let Some(path) = &args.output {
        save_report(path, &report)?;
        if !cfg.json {
            print::print_status(format!("Results saved to {}", path.display().to_string().color(colors::ACCENT)));
        }
    }

    Ok(())
}

/// Resolves once Ctrl-C is pressed. Never resolves if the handler cannot be installed.
async fn ctrl_c() {
    if tokio::signal::ctrl_c().await.is_err() {
        future::pending::<()>().await;
    }
}

/// Runs `work` unless `interrupt` finishes first, in which case `None` is returned.
async fn until_interrupted<F, I>(work: F, interrupt: I) -> Option<F::Output>
where
    F: Future,
    I: Future<Output = ()>,
{
    tokio::select! {
        output = work => Some(output),
        () = interrupt => None,
    }
}

fn describe(target: &Target, options: &ScanOptions) -> String {
    match target {
        Target::Network { network } => format!(
            "Scanning {} ports on every host of {}...",
            options.ports.len(),
            format!("{}/{}", network.network(), network.prefix()).bold()
        ),
        _ => format!(
            "Scanning {} ports on {}...",
            options.ports.len(),
            target.to_string().bold()
        ),
    }
}

fn render(report: &ScanReport, cfg: &Config) {
    match report {
        ScanReport::Host(result) => render_host(0, result, cfg),
        ScanReport::Network(result) => render_network(result, cfg),
    }
}

fn render_host(idx: usize, result: &HostResult, cfg: &Config) {
    print::tree_head(idx, &result.host);
    print::as_tree_one_level(format::host_details(result));

    let Some(report) = result.report() else {
        return;
    };
    print::tree_list("Open ports", &format::open_port_lines(report));
    if cfg.quiet == 0 {
        let findings: Vec<String> = report.vulnerabilities.iter().map(format::finding_line).collect();
        print::tree_list("Findings", &findings);
        print::tree_list("Recommendations", &report.security_analysis.recommendations);
    }
}

// Hosts without a single open port are left out of the tree, the summary still counts them.
fn render_network(result: &NetworkScanResult, cfg: &Config) {
    let mut shown = 0;
    for host in &result.hosts {
        let failed = host.report().is_none();
        let responsive = host.report().is_some_and(|r| !r.open_ports.is_empty());
        if responsive || (failed && cfg.quiet == 0) {
            render_host(shown, host, cfg);
            shown += 1;
        }
    }
    if result.responsive_hosts().next().is_none() && cfg.quiet == 0 {
        print::no_results();
    }
}

fn summary(report: &ScanReport, start: Instant, cfg: &Config) {
    if cfg.quiet > 0 {
        return;
    }

    let elapsed = format!("{:.2}s", start.elapsed().as_secs_f64()).color(colors::ACCENT);
    print::fat_separator();
    let line = match report {
        ScanReport::Host(result) => {
            let open = result.report().map_or(0, |r| r.open_ports.len());
            format!(
                "Host scan of {} complete: {} open ports in {}",
                result.host.bold(),
                open.to_string().color(colors::PRIMARY).bold(),
                elapsed
            )
        }
        ScanReport::Network(result) => format!(
            "Network scan of {} complete: {} of {} hosts with open ports in {}",
            result.network.bold(),
            result.responsive_hosts().count().to_string().color(colors::PRIMARY).bold(),
            result.len(),
            elapsed
        ),
    };
    print::centerln(&line);
    print::end_of_program();
}

/// Writes the pretty-printed JSON of `report` to `path`, replacing any file.
pub fn save_report(path: &Path, report: &ScanReport) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(report).context("serializing scan results")?;
    fs::write(path, json + "\n").with_context(|| format!("writing results to {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;

    fn failed_report() -> ScanReport {
        ScanReport::Host(HostResult::failed("nowhere.invalid", Local::now(), "Host resolution failed"))
    }

    #[test]
    fn saved_report_is_valid_json() {
        let path = std::env::temp_dir().join(format!("portaudit-save-{}.json", std::process::id()));
        save_report(&path, &failed_report()).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(value["host"], "nowhere.invalid");
        assert_eq!(value["error"], "Host resolution failed");

        fs::remove_file(path).unwrap();
    }

    #[test]
    fn save_into_missing_directory_fails_with_path() {
        let path = std::env::temp_dir().join("portaudit-missing-dir").join("out.json");
        let err = save_report(&path, &failed_report()).unwrap_err();
        assert!(err.to_string().contains("out.json"));
    }

    #[tokio::test]
    async fn interrupt_cancels_unfinished_work() {
        let outcome = until_interrupted(future::pending::<()>(), future::ready(())).await;
        assert!(outcome.is_none());
    }

    #[tokio::test]
    async fn finished_work_is_returned_without_interrupt() {
        let outcome = until_interrupted(future::ready(7), future::pending::<()>()).await;
        assert_eq!(outcome, Some(7));
    }

    #[test]
    fn spinner_text_names_the_target() {
        let options = ScanOptions::default();
        let host: Target = "127.0.0.1".parse().unwrap();
        let network: Target = "10.0.0.0/24".parse().unwrap();

        assert!(describe(&host, &options).contains("127.0.0.1"));
        assert!(describe(&network, &options).contains("10.0.0.0/24"));
        assert!(describe(&network, &options).contains("14 ports"));
    }
}
