//! `pmwc`: the command-line entry point. Parses the `clap`-derived
//! argument surface from spec.md §6, wires it into
//! [`pmw_core::run_pipeline`], and prints the debug dump or the
//! diagnostic list. Pagination and page-backend output remain external
//! collaborators (spec.md §1 Non-goals) so this binary stops once the
//! IR has been built.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;

use pmw_core::config::ResourceConfig;
use pmw_core::context::ParserContext;
use pmw_core::debug::dump_movements;
use pmw_core::transpose::validate_transpose_value;

/// A music-notation typesetter's source-language front end.
#[derive(Parser, Debug)]
#[command(name = "pmwc", author, version, about, long_about = None)]
struct Args {
    /// Input source file; reads from stdin when omitted.
    input_file: Option<PathBuf>,

    /// Output file (unused by this core; pagination/output are external).
    #[arg(short = 'o', value_name = "FILE")]
    output: Option<PathBuf>,

    /// Stave selection list, e.g. "1,2,4-6".
    #[arg(short = 's', value_name = "STAVELIST")]
    stave_list: Option<String>,

    /// Page selection list.
    #[arg(short = 'p', value_name = "PAGELIST")]
    page_list: Option<String>,

    /// Output format name (handled by the external backend).
    #[arg(short = 'f', value_name = "FORMAT")]
    format: Option<String>,

    /// Transposition in semitones.
    #[arg(short = 't', value_name = "SEMITONES")]
    transpose: Option<i32>,

    /// Emit PostScript (external backend selector, accepted for CLI parity).
    #[arg(long = "ps")]
    ps: bool,

    /// Emit PDF (external backend selector, accepted for CLI parity).
    #[arg(long = "pdf")]
    pdf: bool,

    /// Emit EPS (external backend selector, accepted for CLI parity).
    #[arg(long = "eps")]
    eps: bool,

    /// Write a MIDI file (external writer, accepted for CLI parity).
    #[arg(long = "midi", value_name = "FILE")]
    midi: Option<PathBuf>,

    /// MIDI bar range (external writer option).
    #[arg(long = "mb", value_name = "RANGE")]
    midi_bars: Option<String>,

    /// MIDI max-volume setting (external writer option).
    #[arg(long = "mm", value_name = "N")]
    midi_max_volume: Option<u32>,

    /// Suppress repeat expansion in MIDI output (external writer option).
    #[arg(long = "norepeats")]
    no_repeats: bool,

    /// Debug selector toggles, e.g. "+lexer" or "-geometry".
    #[arg(short = 'd', value_name = "±SEL")]
    debug_select: Vec<String>,

    /// Debug bar/dot/stave filter "M,S,B".
    #[arg(long = "dbd", value_name = "M,S,B")]
    debug_bar_dot_stave: Option<String>,

    /// Debug text-placement bar.
    #[arg(long = "dtp", value_name = "BAR")]
    debug_text_placement: Option<u32>,

    /// Extra font/resource search path.
    #[arg(short = 'F', value_name = "PATH")]
    font_path: Option<PathBuf>,

    /// MIDI font-path override.
    #[arg(long = "MF", value_name = "PATH")]
    midi_font_path: Option<PathBuf>,

    /// MIDI program-map path.
    #[arg(long = "MP", value_name = "PATH")]
    midi_program_path: Option<PathBuf>,

    /// MIDI voice-map path.
    #[arg(long = "MV", value_name = "PATH")]
    midi_voice_path: Option<PathBuf>,

    /// Shaping-module resource path.
    #[arg(long = "SM", value_name = "PATH")]
    shaping_module_path: Option<PathBuf>,

    /// Hyphenation resource path.
    #[arg(short = 'H', value_name = "PATH")]
    hyphenation_path: Option<PathBuf>,

    /// Verbose progress output.
    #[arg(short = 'v')]
    verbose: bool,

    /// Print version and exit (clap's `--version` already covers this;
    /// kept for the original's `-V` spelling).
    #[arg(short = 'V')]
    version_short: bool,

    /// Convert to/from an external format ("b2pf" or "musicxml").
    #[arg(short = 'C', value_name = "b2pf|musicxml")]
    convert: Option<String>,

    /// Skip reading the `.pmwrc` resource file.
    #[arg(long = "norc")]
    no_rc: bool,

    /// Error-count threshold before further errors escalate to fatal.
    #[arg(long = "em", value_name = "N")]
    error_maximum: Option<u32>,

    /// Testing mode; an optional numeric seed selects deterministic output.
    #[arg(long = "testing", value_name = "N", num_args = 0..=1, default_missing_value = "0")]
    testing: Option<u32>,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    if !args.no_rc {
        if let Ok(text) = fs::read_to_string(".pmwrc") {
            match ResourceConfig::parse(&text) {
                Ok(cfg) => log::debug!("loaded {} .pmwrc entries", cfg.len()),
                Err(e) => eprintln!("{}", format!("warning: .pmwrc: {e}").yellow()),
            }
        }
    }

    let transpose_semitones = args.transpose.unwrap_or(0);
    let transpose_quarter_tones = transpose_semitones * 2;
    if let Err(msg) = validate_transpose_value(transpose_quarter_tones) {
        eprintln!("{}", format!("** fatal error: {msg}").red());
        return ExitCode::FAILURE;
    }

    let source = match &args.input_file {
        Some(path) => match fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("{}", format!("** fatal error: cannot read {}: {e}", path.display()).red());
                return ExitCode::FAILURE;
            }
        },
        None => {
            use std::io::Read;
            let mut buf = String::new();
            if let Err(e) = std::io::stdin().read_to_string(&mut buf) {
                eprintln!("{}", format!("** fatal error: cannot read stdin: {e}").red());
                return ExitCode::FAILURE;
            }
            buf
        }
    };

    let mut ctx = ParserContext::with_transpose(transpose_quarter_tones);
    if let Some(max) = args.error_maximum {
        ctx.sink.set_error_maximum(max);
    }

    match pmw_core::run_pipeline(&source, &mut ctx) {
        Ok(movements) => {
            for diagnostic in ctx.sink.diagnostics() {
                eprintln!("{diagnostic}");
            }
            if args.verbose {
                eprintln!(
                    "{} {} movement(s), {} warning(s), {} error(s)",
                    "parsed".green(),
                    movements.len(),
                    ctx.sink.warning_count(),
                    ctx.sink.error_count(),
                );
            }
            if ctx.sink.suppress_output() {
                eprintln!("{}", "** no output produced (errors suppressed page generation)".red());
                return ExitCode::FAILURE;
            }
            if args.testing.is_some() {
                print!("{}", dump_movements(&movements));
            } else if let Some(output) = &args.output {
                if let Err(e) = fs::write(output, dump_movements(&movements)) {
                    eprintln!("{}", format!("** fatal error: cannot write {}: {e}", output.display()).red());
                    return ExitCode::FAILURE;
                }
            }
            ExitCode::SUCCESS
        }
        Err(abandoned) => {
            for diagnostic in ctx.sink.diagnostics() {
                eprintln!("{diagnostic}");
            }
            eprintln!("{}", abandoned.to_string().red());
            ExitCode::FAILURE
        }
    }
}
