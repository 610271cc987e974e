//! Human-readable run and scan reports.

use std::path::Path;

use demux_engine::{PassReport, RunOutcome, RunReport, ScanReport, ScanVerdict};

/// Print a finished run
pub fn print_run_report(report: &RunReport, output: &Path, status_file: &str) {
    println!("\n╔══════════════════════════════════════════════════════════════╗");
    println!("║                    Demultiplex Summary                       ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    let outcome = match report.outcome {
        RunOutcome::Success => "success",
        RunOutcome::RecoveredSuccess => "recovered",
    };
    println!("📊 Overview");
    println!("   ├─ Outcome: {}", outcome);
    println!("   ├─ Output: {}", output.display());
    println!("   └─ Status: {}", report.status().body());

    print_pass("First pass", &report.first_pass);
    if let Some(ref recovery) = report.recovery_pass {
        print_pass("Recovery pass", recovery);
    }

    println!("\n   Status written to {}", output.join(status_file).display());
    println!();
}

/// Print a scan result
pub fn print_scan_report(report: &ScanReport, input: &Path) {
    println!("\n╔══════════════════════════════════════════════════════════════╗");
    println!("║                        Stream Scan                           ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    let verdict = match report.verdict {
        ScanVerdict::Complete => "complete".to_string(),
        ScanVerdict::Recoverable { stop_sequence } => {
            format!("incomplete, recoverable up to seq {stop_sequence}")
        }
        ScanVerdict::Unrecoverable => "incomplete, no checkpoint to recover to".to_string(),
    };
    println!("📊 {}", input.display());
    println!("   └─ Verdict: {}", verdict);

    print_pass("Pass", &report.pass);

    println!("\n{}", report.pass.payload_stats.summary());
}

fn print_pass(title: &str, pass: &PassReport) {
    println!("\n📈 {}", title);
    println!("   ├─ End: {}", pass.end.as_str());
    println!("   ├─ Records: {}", pass.records);
    println!("   ├─ Payload bytes: {}", pass.payload_bytes);
    println!("   ├─ Bytes consumed: {}", pass.bytes_consumed);
    println!("   ├─ Sequence gaps: {}", pass.gaps);
    println!("   ├─ Sequence regressions: {}", pass.regressions);
    if let Some(stop) = pass.stop_sequence {
        println!("   ├─ Stop sequence: {}", stop);
    }
    match pass.last_checkpoint_sequence {
        Some(seq) => println!("   ├─ Last checkpoint: seq {}", seq),
        None => println!("   ├─ Last checkpoint: none"),
    }
    println!(
        "   ├─ Staging buffer: {} bytes ({} grows)",
        pass.staging_capacity, pass.staging_grows
    );
    println!("   └─ Records per kind:");
    for (kind, count) in &pass.records_per_kind {
        println!("        kind {:>3}: {}", kind, count);
    }
}
