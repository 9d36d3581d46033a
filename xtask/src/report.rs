//! Decode an exported record blob and print the crash report.
//!
//! The blob is the byte image `export_pending` handed to its sink, pulled
//! off the device's storage. Layout is feature-dependent: this tool builds
//! the core with `hardware,os`, matching the shipped firmware
//! configuration. A blob from a differently configured build will decode
//! as `Truncated` or as garbage fields — compare `software_version` first
//! when in doubt.

use anyhow::{bail, Context, Result};
use blackbox::record::{DumpRecord, FaultKind};
use blackbox::report::write_report;
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct ReportJson {
    fault_kind: String,
    file: String,
    line: u32,
    aux_code: u32,
    software_version: u32,
    backtrace: Vec<String>,
    task_backtraces: Vec<Vec<String>>,
}

pub fn run(path: &Path, json: bool) -> Result<()> {
    let blob = std::fs::read(path)
        .with_context(|| format!("Failed to read record blob {}", path.display()))?;

    let record = match DumpRecord::decode(&blob) {
        Ok(record) => record,
        Err(err) => bail!(
            "{} does not decode as a crash record ({err:?}); \
             was the firmware built with the same features as this tool?",
            path.display()
        ),
    };

    if json {
        let json_report = to_json(&record);
        println!("{}", serde_json::to_string_pretty(&json_report)?);
    } else {
        let mut text = String::new();
        write_report(&record, &mut text)?;
        print!("{text}");
    }
    Ok(())
}

fn to_json(record: &DumpRecord) -> ReportJson {
    let fault_kind = match FaultKind::from_raw(record.fault_kind) {
        Some(FaultKind::HardwareException) => "Hardware Exception",
        Some(FaultKind::SoftwareAssertion) => "Software Assertion",
        None => "Unknown",
    };
    ReportJson {
        fault_kind: fault_kind.to_string(),
        file: record.file_name_str().to_string(),
        line: record.line_number,
        aux_code: record.aux_code,
        software_version: record.software_version,
        backtrace: record
            .backtrace()
            .iter()
            .map(|addr| format!("{addr:#010x}"))
            .collect(),
        task_backtraces: record
            .task_backtraces
            .iter()
            .filter(|row| row.iter().any(|&addr| addr != 0))
            .map(|row| {
                row.iter()
                    .take_while(|&&addr| addr != 0)
                    .map(|addr| format!("{addr:#010x}"))
                    .collect()
            })
            .collect(),
    }
}
