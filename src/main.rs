//! Ostia CLI: EVM bytecode disassembler and decompiler.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use ostia::decompiler::{decompile_bytecode, DecompilerConfig, OutputFormat};
use std::io::{IsTerminal, Read};
use std::path::PathBuf;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Pseudo-code listing, one function per basic block.
    Decompile,
    /// Instruction listing grouped by basic block.
    Disassemble,
    /// Decompiled program as JSON.
    Json,
}

impl From<Mode> for OutputFormat {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Decompile => OutputFormat::Text,
            Mode::Disassemble => OutputFormat::Asm,
            Mode::Json => OutputFormat::Json,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "ostia", version, about = "EVM bytecode disassembler and decompiler")]
struct Cli {
    /// Bytecode as a hex string (with or without 0x prefix).
    #[arg(value_name = "BYTECODE")]
    bytecode: Option<String>,

    /// Read bytecode from a file instead.
    #[arg(short = 'f', long)]
    file: Option<PathBuf>,

    /// What to produce.
    #[arg(short = 'm', long, value_enum, default_value = "decompile")]
    mode: Mode,

    /// Write the output to a file instead of stdout.
    #[arg(long, value_name = "PATH")]
    out: Option<PathBuf>,

    /// Disable coloured output.
    #[arg(long)]
    no_color: bool,

    /// Skip the peephole optimizer.
    #[arg(long)]
    no_optimize: bool,

    /// Print version and exit.
    #[arg(long)]
    version_info: bool,
}

fn read_input(cli: &Cli) -> Result<String> {
    let raw = if let Some(ref path) = cli.file {
        std::fs::read_to_string(path)
            .with_context(|| format!("cannot read {}", path.display()))?
    } else if let Some(ref code) = cli.bytecode {
        code.clone()
    } else if std::io::stdin().is_terminal() {
        anyhow::bail!("no bytecode provided: pass it as an argument, via -f, or pipe to stdin");
    } else {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("cannot read stdin")?;
        buf
    };
    Ok(raw.trim().to_string())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    if cli.version_info {
        println!("ostia {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let hex_code = read_input(&cli)?;

    // Colour only makes sense on a terminal.
    let color = !cli.no_color && cli.out.is_none() && std::io::stdout().is_terminal();
    let config = DecompilerConfig {
        format: cli.mode.into(),
        color,
        optimize: !cli.no_optimize,
    };

    let result = decompile_bytecode(&hex_code, &config)?;

    match cli.out {
        Some(path) => std::fs::write(&path, format!("{}\n", result.text))
            .with_context(|| format!("cannot write {}", path.display()))?,
        None => println!("{}", result.text),
    }

    Ok(())
}
