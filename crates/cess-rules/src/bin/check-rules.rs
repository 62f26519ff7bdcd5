//! # Rule File Checker
//!
//! Validates a rule file and reports every ambiguous rule group.
//!
//! ## Usage
//! ```bash
//! # Check ./cess_rules.json
//! cargo run -p cess-rules --bin check-rules
//!
//! # Check another file
//! cargo run -p cess-rules --bin check-rules -- --rules ./data/cess_rules.json
//!
//! # Also try resolving some HSN codes
//! cargo run -p cess-rules --bin check-rules -- --hsn 24022010 --hsn 27011100
//! ```
//!
//! Exits non-zero when the file fails to load or any conflict exists, so it
//! can gate a deployment.

use std::env;
use std::process::ExitCode;

use anyhow::Context;
use cess_core::types::HsnCode;
use cess_rules::load_rule_table;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args: Vec<String> = env::args().collect();

    let mut rules_path = String::from("cess_rules.json");
    let mut probes: Vec<String> = Vec::new();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--rules" | "-r" => {
                if i + 1 < args.len() {
                    rules_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--hsn" => {
                if i + 1 < args.len() {
                    probes.push(args[i + 1].clone());
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Cess Engine Rule Checker");
                println!();
                println!("Usage: check-rules [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -r, --rules <PATH>   Rule file path (default: ./cess_rules.json)");
                println!("      --hsn <CODE>     Resolve an HSN code against the file (repeatable)");
                println!("  -h, --help           Show this help message");
                return Ok(ExitCode::SUCCESS);
            }
            other => {
                eprintln!("Ignoring unknown argument '{}'", other);
            }
        }
        i += 1;
    }

    println!("Rule file: {}", rules_path);

    let table = load_rule_table(&rules_path)
        .with_context(|| format!("rule file {} is not usable", rules_path))?;

    println!("✓ {} cess rules", table.cess_rule_count());
    println!("✓ {} GST slabs", table.gst_slab_count());

    for code in &probes {
        let hsn = match HsnCode::parse(code.as_str()) {
            Ok(hsn) => hsn,
            Err(e) => {
                println!("  {}: {}", code, e);
                continue;
            }
        };
        match table.resolve_cess(&hsn, None) {
            Ok(rule) => println!("  {}: cess rule {} ({:?})", hsn, rule.hsn_pattern(), rule.rate()),
            Err(e) => println!("  {}: {}", hsn, e),
        }
        match table.resolve_gst(&hsn) {
            Ok(slab) => println!("  {}: GST slab {} at {}", hsn, slab.hsn_pattern, slab.rate),
            Err(e) => println!("  {}: {}", hsn, e),
        }
    }

    let conflicts = table.conflicts();
    if conflicts.is_empty() {
        println!("✓ No ambiguous rules");
        return Ok(ExitCode::SUCCESS);
    }

    println!("⚠ {} ambiguous rule groups:", conflicts.len());
    for conflict in &conflicts {
        println!(
            "  {} pattern {} (state {}): {} active rules",
            conflict.schedule,
            conflict.pattern,
            conflict.state.as_ref().map(|s| s.as_str()).unwrap_or("any"),
            conflict.count
        );
    }

    Ok(ExitCode::FAILURE)
}
