use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{ensure, Context, Result};
use clap::{Parser, ValueEnum};
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use dnacodec::huffman::Merge;
use dnacodec::nucleotide;
use dnacodec::{
    arithmetic_decode, arithmetic_encode, build_models_with, huffman_decode, huffman_encode,
    CompressionReport, HuffmanCodeTable, HuffmanConfig, Models, Nucleotide, SymbolInterval,
};

/// Compress a DNA sequence with Huffman and arithmetic coding and compare
/// the results.
#[derive(Parser, Debug)]
#[command(name = "dnacodec")]
#[command(version, about = "Huffman and arithmetic coding of DNA sequences", long_about = None)]
struct Args {
    /// Sequence of A, C, G, T (read from stdin when omitted)
    sequence: Option<String>,

    /// Read the sequence from a file
    #[arg(short, long, conflicts_with = "sequence")]
    input: Option<PathBuf>,

    /// Coder(s) to run
    #[arg(short, long, value_enum, default_value_t = CodecChoice::Both)]
    codec: CodecChoice,

    /// Assign Huffman codes to bases that never occur
    #[arg(long)]
    include_unseen: bool,

    /// Digits printed for probabilities and the arithmetic value
    #[arg(long, default_value = "6")]
    precision: usize,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum CodecChoice {
    Huffman,
    Arithmetic,
    Both,
}

impl CodecChoice {
    fn huffman(self) -> bool {
        matches!(self, CodecChoice::Huffman | CodecChoice::Both)
    }

    fn arithmetic(self) -> bool {
        matches!(self, CodecChoice::Arithmetic | CodecChoice::Both)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Serialize)]
struct HuffmanRun<'a> {
    merges: &'a [Merge],
    codes: &'a HuffmanCodeTable,
    encoded: String,
    decoded: String,
}

#[derive(Serialize)]
struct ArithmeticRun {
    intervals: Vec<SymbolInterval>,
    value: f64,
    length: usize,
    decoded: String,
}

#[derive(Serialize)]
struct Outcome<'a> {
    sequence: String,
    frequencies: BTreeMap<Nucleotide, u64>,
    huffman: Option<HuffmanRun<'a>>,
    arithmetic: Option<ArithmeticRun>,
    #[serde(skip_serializing_if = "Option::is_none")]
    arithmetic_error: Option<String>,
    report: CompressionReport,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&args.log_level).context("invalid log level")?,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let raw = read_sequence(&args)?;
    let config = HuffmanConfig {
        include_unseen: args.include_unseen,
    };
    let models = build_models_with(&raw, config).context("failed to build models")?;
    info!("analyzed {} bases", models.sequence.len());

    let outcome = run(&models, args.codec)?;
    match args.format {
        Format::Text => print_text(&outcome, args.precision),
        Format::Json => println!("{}", serde_json::to_string_pretty(&outcome)?),
    }
    Ok(())
}

fn read_sequence(args: &Args) -> Result<String> {
    let raw = match (&args.sequence, &args.input) {
        (Some(s), _) => s.clone(),
        (None, Some(path)) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        (None, None) => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            buf
        }
    };
    Ok(raw.trim().to_string())
}

fn run(models: &Models, codec: CodecChoice) -> Result<Outcome<'_>> {
    let huffman = if codec.huffman() {
        let encoded = huffman_encode(&models.sequence, &models.huffman_codes)?;
        let decoded = huffman_decode(&encoded, &models.huffman_codes)?;
        ensure!(
            decoded == models.sequence,
            "huffman round-trip produced a different sequence"
        );
        Some(HuffmanRun {
            merges: models.huffman_tree.merges(),
            codes: &models.huffman_codes,
            encoded,
            decoded: nucleotide::to_string(&decoded),
        })
    } else {
        None
    };

    // With both coders selected, an arithmetic failure is reported next to
    // the Huffman result instead of discarding it.
    let (arithmetic, arithmetic_error) = if codec.arithmetic() {
        match run_arithmetic(models) {
            Ok(run) => (Some(run), None),
            Err(e) if codec == CodecChoice::Both => {
                warn!("arithmetic coding skipped: {:#}", e);
                (None, Some(format!("{:#}", e)))
            }
            Err(e) => return Err(e),
        }
    } else {
        (None, None)
    };

    Ok(Outcome {
        sequence: nucleotide::to_string(&models.sequence),
        frequencies: models.frequencies.iter().collect(),
        huffman,
        arithmetic,
        arithmetic_error,
        report: models.report(),
    })
}

fn run_arithmetic(models: &Models) -> Result<ArithmeticRun> {
    let model = models.arithmetic().context("arithmetic coding")?;
    let code = arithmetic_encode(&models.sequence, model).context("arithmetic coding")?;
    let decoded = arithmetic_decode(code.value, code.length, model)?;
    ensure!(
        decoded == models.sequence,
        "arithmetic round-trip produced a different sequence"
    );
    Ok(ArithmeticRun {
        intervals: model.iter().copied().collect(),
        value: code.value,
        length: code.length,
        decoded: nucleotide::to_string(&decoded),
    })
}

fn print_text(outcome: &Outcome<'_>, precision: usize) {
    println!("Compression:\n");
    println!("Nucleotide Frequencies:");
    for (n, count) in &outcome.frequencies {
        println!("{} = {}", n, count);
    }

    if let Some(h) = &outcome.huffman {
        println!();
        for m in h.merges {
            println!("Combined {} and {} into {} = {}", m.left, m.right, m.label, m.count);
        }
        println!("\nHuffman Codes for Nucleotides:");
        for (n, code) in h.codes.iter() {
            println!("{} = {}", n, code);
        }
        println!("\nHuffman Encoded DNA Sequence: {}", h.encoded);
    }

    if let Some(a) = &outcome.arithmetic {
        println!("\nArithmetic Coding Probabilities and Intervals:");
        for iv in &a.intervals {
            println!(
                "{} = {:.p$} Interval: [{:.p$}, {:.p$})",
                iv.symbol,
                iv.probability,
                iv.low,
                iv.high,
                p = precision
            );
        }
        println!("\nArithmetic Encoded Value: {:.p$}", a.value, p = precision);
    }
    if let Some(err) = &outcome.arithmetic_error {
        println!("\nArithmetic Coding Failed: {}", err);
    }

    println!("\n------------------------------------\n");
    println!("Decompression:\n");
    if let Some(h) = &outcome.huffman {
        println!("Huffman Decoded DNA Sequence: {}", h.decoded);
    }
    if let Some(a) = &outcome.arithmetic {
        println!("Arithmetic Decoded DNA Sequence: {}", a.decoded);
    }

    let r = &outcome.report;
    println!("\nSize Comparison:\n");
    println!("Raw (8 bits/base):    {} bits", r.raw_bits);
    println!("Packed (2 bits/base): {} bits", r.packed_bits);
    println!("Entropy:              {:.3} bits/base", r.entropy);
    if outcome.huffman.is_some() {
        println!(
            "Huffman:              {} bits ({:.3} bits/base, ratio {:.2})",
            r.huffman_bits,
            r.huffman_bits_per_symbol(),
            r.huffman_ratio()
        );
    }
    if outcome.arithmetic.is_some() {
        println!(
            "Arithmetic:           {} bits ({:.3} bits/base, ratio {:.2})",
            r.arithmetic_bits,
            r.arithmetic_bits_per_symbol(),
            r.arithmetic_ratio()
        );
    }
}
