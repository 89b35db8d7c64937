//! Control Layout CLI
//!
//! Usage:
//!   control-layout [OPTIONS] [FILE]
//!
//! Options:
//!   -c, --config <FILE>       Layout configuration (TOML format)
//!       --viewport <WxH>      Viewport size, e.g. 1024x768
//!   -f, --format <FORMAT>     Output format: svg or tree
//!   -n, --names               Caption controls with their names (svg)
//!       --lint                Report layout diagnostics on stderr
//!       --strict              Fail on constraint cycles and lint warnings
//!   -g, --grammar             Show scene language reference
//!   -v, --verbose...          More logging (repeat for more)
//!   -h, --help                Print help

use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

use clap::Parser;
use log::{debug, LevelFilter};

use control_layout::layout::lint;
use control_layout::{build_scene, dump, render_svg, LayoutConfig, OutputFormat, SvgConfig};

#[derive(Parser)]
#[command(name = "control-layout")]
#[command(about = "Edge-constraint layout for UI control trees")]
struct Cli {
    /// Input file (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// Layout configuration file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Viewport size as WIDTHxHEIGHT
    #[arg(long, value_parser = parse_viewport)]
    viewport: Option<(f64, f64)>,

    /// Output format
    #[arg(short, long, default_value = "svg", value_parser = ["svg", "tree"])]
    format: String,

    /// Caption controls with their names in SVG output
    #[arg(short, long)]
    names: bool,

    /// Report layout diagnostics on stderr
    #[arg(long)]
    lint: bool,

    /// Refuse constraint cycles and treat diagnostics as errors
    #[arg(long)]
    strict: bool,

    /// Show scene language reference
    #[arg(short, long)]
    grammar: bool,

    /// Increase logging verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn parse_viewport(value: &str) -> Result<(f64, f64), String> {
    let (w, h) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{}'", value))?;
    let w: f64 = w.trim().parse().map_err(|_| format!("invalid width '{}'", w))?;
    let h: f64 = h.trim().parse().map_err(|_| format!("invalid height '{}'", h))?;
    if w < 0.0 || h < 0.0 {
        return Err("viewport size cannot be negative".to_string());
    }
    Ok((w, h))
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    if cli.grammar {
        print_grammar();
        return;
    }

    // If no input file and stdin is a terminal (interactive), show intro help
    if cli.input.is_none() && io::stdin().is_terminal() {
        print_intro();
        return;
    }

    let mut config = match &cli.config {
        Some(path) => match LayoutConfig::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => LayoutConfig::default(),
    };
    if let Some((w, h)) = cli.viewport {
        config = config.with_viewport(w, h);
    }
    if cli.strict {
        config = config.with_cycle_check(true);
    }

    let (source, filename) = match &cli.input {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => (content, path.display().to_string()),
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => {
            let mut buffer = String::new();
            match io::stdin().read_to_string(&mut buffer) {
                Ok(_) => (buffer, "<stdin>".to_string()),
                Err(e) => {
                    eprintln!("Error reading from stdin: {}", e);
                    std::process::exit(1);
                }
            }
        }
    };

    let scene = match build_scene(&source, &config) {
        Ok(scene) => scene,
        Err(e) => {
            eprint!("{}", e.format(&source, &filename));
            std::process::exit(1);
        }
    };
    debug!("laid out {} controls", scene.tree().len());

    if cli.lint || cli.strict {
        let warnings = lint::check(scene.tree());
        for warning in &warnings {
            eprintln!("warning: {}", warning);
        }
        if cli.strict && !warnings.is_empty() {
            eprintln!("Error: {} layout warning(s) in strict mode", warnings.len());
            std::process::exit(1);
        }
    }

    let format = OutputFormat::from_name(&cli.format).unwrap_or_default();
    match format {
        OutputFormat::Svg => {
            let svg_config = SvgConfig::default().with_names(cli.names);
            print!("{}", render_svg(scene.tree(), &svg_config));
        }
        OutputFormat::Tree => print!("{}", dump(scene.tree())),
    }
}

fn print_intro() {
    println!(
        r#"Control Layout - edge-constraint layout for UI control trees

USAGE:
    control-layout [OPTIONS] [FILE]
    echo '<scene>' | control-layout

OPTIONS:
    -c, --config <FILE>    Layout configuration (TOML file)
    --viewport <WxH>       Viewport size (default 800x600)
    -f, --format <FMT>     svg (default) or tree
    -n, --names            Caption controls with their names
    --lint                 Report layout diagnostics
    --strict               Fail on cycles and diagnostics
    -g, --grammar          Show scene language reference
    -v                     More logging (repeatable)

QUICK START:
    echo 'button ok constrain ok.center = viewport.center' | control-layout -f tree

Run --grammar for the scene language reference."#
    );
}

fn print_grammar() {
    println!(
        r#"SCENE LANGUAGE
==============

CONTROLS
--------
control <name> [mod] {{ ... }}   Plain control
label <name> [mod]              Label
image <name> [mod]              Image
button <name> [mod]             Button
panel <name> [mod] {{ ... }}     Container, sized to its content by default
scroll <name> [mod] {{ ... }}    Scroll panel; children go into its content
window <name> [mod] {{ ... }}    Window with title, body and footer;
                                children go into the body
decor <type> <name> [mod]       Decoration of the enclosing control

MODIFIERS
---------
x, y, width, height, min_width, min_height    numbers
scale, scale_x, scale_y, origin_x, origin_y   numbers
visible, enabled, autosize, clamp             true / false
scroll_x, scroll_y                            content offset (scroll)
restrict                                      horizontal / vertical / unrestricted

CONSTRAINTS
-----------
constrain a.left = b.right - 5           Bind an edge to another edge
constrain a.center = viewport.center     Anchor on the viewport
constrain a.dock = b.dock + 4            Stretch on both axes
constrain a.top = b.top [category: init] Only in initialization passes

Edges: left right top bottom center_x center_y top_left top_center
       top_right bottom_left bottom_center bottom_right left_center
       right_center center horizontal vertical dock

A positive distance moves inward from right and bottom edges, and
rightward/downward from left, top and center edges."#
    );
}
