//! Allocate PUA codepoints for a list of variation records
//!
//! Reads a JSON array of records, either
//! `{"base_codepoint": 33883, "selector_index": 2, "glyph_id": "mj000001"}` or
//! `{"ivs": "845B_E0102", "glyph_id": "MJ000001"}`, runs one staged
//! allocation and prints the JSON mapping document.
//!
//! Usage:
//!   cargo run --release --bin ivs_allocate -- records.json
//!   cargo run --release --bin ivs_allocate -- --report < records.json
//!   cargo run --release --bin ivs_allocate -- --js --output ivsMapping.js records.json
//!
//! Options:
//!   --report       print the allocation summary instead of the mapping
//!   --report-json  print the allocation report as JSON
//!   --js           print the JavaScript mapping module
//!   --strict       reject duplicate records
//!   --compatible   skip selector groups outside the priority table
//!   --output PATH  write to PATH instead of stdout

use ivs_oxide::{
    javascript_module, AllocatorConfig, MappingDocument, StagedAllocator, VariationRecord,
};
use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Mapping,
    Summary,
    ReportJson,
    JavaScript,
}

struct AllocateConfig {
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    format: OutputFormat,
    allocator: AllocatorConfig,
}

impl AllocateConfig {
    fn from_args() -> Self {
        let args: Vec<String> = std::env::args().collect();
        let mut input = None;
        let mut output = None;
        let mut format = OutputFormat::Mapping;
        let mut allocator = AllocatorConfig::default();

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--report" => {
                    format = OutputFormat::Summary;
                },
                "--report-json" => {
                    format = OutputFormat::ReportJson;
                },
                "--js" => {
                    format = OutputFormat::JavaScript;
                },
                "--strict" => {
                    allocator = AllocatorConfig::strict();
                },
                "--compatible" => {
                    allocator = AllocatorConfig::compatible();
                },
                "--output" | "-o" => {
                    i += 1;
                    if i < args.len() {
                        output = Some(PathBuf::from(&args[i]));
                    }
                },
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                },
                arg if arg.starts_with('-') => {
                    eprintln!("Unknown option: {}", arg);
                },
                path => {
                    input = Some(PathBuf::from(path));
                },
            }
            i += 1;
        }

        Self {
            input,
            output,
            format,
            allocator,
        }
    }
}

fn print_usage() {
    println!("Usage: ivs_allocate [--report | --report-json | --js] [--strict | --compatible]");
    println!("                    [--output PATH] [RECORDS.json]");
    println!();
    println!("Reads records from RECORDS.json, or stdin if no path is given.");
}

fn read_records(input: Option<&PathBuf>) -> Result<Vec<VariationRecord>, Box<dyn std::error::Error>> {
    let text = match input {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        },
    };
    Ok(serde_json::from_str(&text)?)
}

fn run(config: &AllocateConfig) -> Result<(), Box<dyn std::error::Error>> {
    let start = Instant::now();
    let records = read_records(config.input.as_ref())?;
    log::info!("Read {} records", records.len());

    let allocation = StagedAllocator::new(config.allocator)?.allocate(records)?;
    log::info!(
        "Allocated {} sequences in {:.2}ms",
        allocation.len(),
        start.elapsed().as_secs_f64() * 1000.0
    );

    let rendered = match config.format {
        OutputFormat::Mapping => MappingDocument::from_allocation(&allocation).to_json_string()?,
        OutputFormat::Summary => allocation.report().summary(),
        OutputFormat::ReportJson => allocation.report().to_json()?,
        OutputFormat::JavaScript => javascript_module(&allocation),
    };

    match &config.output {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            writeln!(writer, "{}", rendered.trim_end())?;
            writer.flush()?;
            eprintln!("Wrote {}", path.display());
        },
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            writeln!(handle, "{}", rendered.trim_end())?;
        },
    }
    Ok(())
}

fn main() {
    env_logger::init();
    let config = AllocateConfig::from_args();

    if let Err(e) = run(&config) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
