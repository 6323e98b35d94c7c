//! textimg - render styled text to an 800×400 PNG
//!
//! One-shot mode renders the style given on the command line and saves
//! `generated-text-image.png`. Interactive mode (`-I`) reads one command
//! per line from stdin; every command is one edit and one repaint.

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use std::fmt::Display;
use std::io::{BufRead, IsTerminal, Write};
use std::path::{Path, PathBuf};

use textimg::command::{descriptor_edits, flag_edit, Command, HELP};
use textimg::config::{self, Config};
use textimg::constants::DEFAULT_FONT_FAMILY;
use textimg::font::{FontUpload, FontconfigSource, LoadReport, NoSystemFonts, SystemFontSource};
use textimg::render::FontDescriptor;
use textimg::style::is_system_font;
use textimg::utils::Color;
use textimg::{Session, StyleEdit};

#[derive(Parser, Debug)]
#[command(name = "textimg", version, about = "Render styled text to an 800x400 PNG")]
struct Cli {
    /// Text to render
    text: Option<String>,

    /// Font size in pixels (12-120)
    #[arg(short, long)]
    size: Option<u32>,

    /// Font family (system name or uploaded font name)
    #[arg(short, long)]
    family: Option<String>,

    /// CSS font shorthand, e.g. "italic bold 64px Georgia"
    #[arg(long, conflicts_with_all = ["size", "family"])]
    font: Option<FontDescriptor>,

    /// Text color (#rgb or #rrggbb)
    #[arg(short, long)]
    color: Option<Color>,

    /// Background color (#rgb or #rrggbb)
    #[arg(long)]
    background: Option<Color>,

    #[arg(short, long)]
    bold: bool,

    #[arg(short, long)]
    italic: bool,

    #[arg(short, long)]
    underline: bool,

    /// Font file to upload (TTF, OTF, WOFF, WOFF2); repeatable
    #[arg(short = 'l', long = "load-font", value_name = "FILE")]
    load_font: Vec<PathBuf>,

    /// Directory for generated-text-image.png
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Config file (default: $TEXTIMG_CONFIG or ~/.config/textimg/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Read commands from stdin
    #[arg(short = 'I', long)]
    interactive: bool,

    /// Print selectable font families and exit
    #[arg(long)]
    list_fonts: bool,

    /// Write a default config file and exit
    #[arg(long)]
    init_config: bool,

    /// Overwrite an existing config file with --init-config
    #[arg(long, requires = "init_config")]
    force: bool,
}

/// Blocking user-facing notification
fn alert(msg: impl Display) {
    eprintln!("alert: {}", msg);
}

fn report_load(report: &LoadReport) {
    for name in &report.loaded {
        println!("Loaded font: {}", name);
    }
    for e in &report.errors {
        alert(e);
    }
}

/// Read files into uploads; unreadable files are alerted and skipped
fn read_uploads(paths: &[PathBuf]) -> Vec<FontUpload> {
    paths
        .iter()
        .filter_map(|p| match FontUpload::from_path(p) {
            Ok(u) => Some(u),
            Err(e) => {
                alert(e);
                None
            }
        })
        .collect()
}

fn system_fonts() -> Box<dyn SystemFontSource> {
    match FontconfigSource::new() {
        Ok(source) => Box::new(source),
        Err(e) => {
            warn!("System fonts unavailable: {}", e);
            Box::new(NoSystemFonts)
        }
    }
}

fn print_fonts(session: &Session) {
    let active = &session.style().font_family;
    let custom: Vec<&str> = session.registry().fonts().map(|f| f.name.as_str()).collect();
    for family in session.font_families() {
        let marker = if &family == active { '*' } else { ' ' };
        let kind = if custom.contains(&family.as_str()) {
            "custom"
        } else {
            "system"
        };
        println!("{} {} ({})", marker, family, kind);
    }
}

fn print_style(session: &Session) {
    let s = session.style();
    println!("text:       {:?}", s.text);
    println!("font:       {}", FontDescriptor::from_style(s));
    println!("underline:  {}", s.underline);
    println!("color:      {}", s.text_color);
    println!("background: {}", s.background_color);
}

fn export(session: &Session, dir: &Path) {
    match session.export(dir) {
        Ok(Some(path)) => println!("Saved {}", path.display()),
        Ok(None) => {}
        Err(e) => alert(format!("{:#}", e)),
    }
}

/// Handle one command; returns false on quit
fn handle_command(
    rt: &tokio::runtime::Runtime,
    session: &mut Session,
    command: Command,
    output_dir: &Path,
) -> bool {
    let result = match command {
        Command::Edit(edit) => session.apply(edit).map(|_| ()),
        Command::Font(desc) => session.batch(descriptor_edits(&desc)).map(|_| ()),
        Command::SetFlag(flag, switch) => {
            let edit = flag_edit(session.style(), flag, switch);
            session.apply(edit).map(|_| ())
        }
        Command::Load(paths) => {
            let uploads = read_uploads(&paths);
            let report = rt.block_on(session.load_fonts(uploads));
            report_load(&report);
            Ok(())
        }
        Command::Remove(name) => {
            if session.remove_font(&name).is_none() {
                alert(format!("No uploaded font named {}", name));
            }
            Ok(())
        }
        Command::ListFonts => {
            print_fonts(session);
            Ok(())
        }
        Command::Show => {
            print_style(session);
            Ok(())
        }
        Command::Export(dir) => {
            export(session, dir.as_deref().unwrap_or(output_dir));
            Ok(())
        }
        Command::Help => {
            println!("{}", HELP);
            Ok(())
        }
        Command::Quit => return false,
    };
    if let Err(e) = result {
        alert(e);
    }
    true
}

fn run_interactive(rt: &tokio::runtime::Runtime, session: &mut Session, output_dir: &Path) -> Result<()> {
    let stdin = std::io::stdin();
    let prompt = stdin.is_terminal();
    if prompt {
        println!("textimg interactive mode, \"help\" lists commands");
    }
    let mut lines = stdin.lock().lines();
    loop {
        if prompt {
            print!("> ");
            std::io::stdout().flush()?;
        }
        let Some(line) = lines.next() else {
            break;
        };
        let line = line.context("Failed to read command")?;
        if line.trim().is_empty() {
            continue;
        }
        match line.parse::<Command>() {
            Ok(command) => {
                if !handle_command(rt, session, command, output_dir) {
                    break;
                }
            }
            Err(e) => alert(e),
        }
    }
    info!("Session ended after {} repaints", session.repaint_count());
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    if cli.init_config {
        let path = match cli.config.clone().or_else(config::default_config_path) {
            Some(p) => p,
            None => anyhow::bail!("Config directory not found"),
        };
        let path = Config::write_default_config(&path, cli.force)?;
        println!("Config file generated: {}", path.display());
        return Ok(());
    }

    let cfg = match &cli.config {
        Some(path) => Config::load_from_file(path)?,
        None => Config::load(),
    };

    // Config first, command line on top
    let mut style = cfg.style.to_style_state();
    if let Some(text) = cli.text {
        style.text = text;
    }
    if let Some(px) = cli.size {
        style.font_size_px = textimg::style::clamp_font_size(px);
    }
    if let Some(family) = cli.family {
        style.font_family = family;
    }
    if let Some(desc) = &cli.font {
        style.italic = desc.italic;
        style.bold = desc.bold;
        style.font_size_px = textimg::style::clamp_font_size(desc.size_px);
        style.font_family = desc.family.clone();
    }
    if let Some(c) = cli.color {
        style.text_color = c;
    }
    if let Some(c) = cli.background {
        style.background_color = c;
    }
    style.bold |= cli.bold;
    style.italic |= cli.italic;
    style.underline |= cli.underline;

    // Custom families only become selectable after their fonts load
    let requested_family = std::mem::replace(&mut style.font_family, DEFAULT_FONT_FAMILY.to_string());
    if is_system_font(&requested_family) {
        style.font_family = requested_family.clone();
    }

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")?;

    let mut session = Session::new(style, system_fonts());

    let mut font_paths = cfg.preload_paths();
    font_paths.extend(cli.load_font);
    if !font_paths.is_empty() {
        let uploads = read_uploads(&font_paths);
        let report = rt.block_on(session.load_fonts(uploads));
        report_load(&report);
    }

    if session.style().font_family != requested_family {
        if let Err(e) = session.apply(StyleEdit::FontFamily(requested_family)) {
            alert(e);
        }
    }

    if cli.list_fonts {
        print_fonts(&session);
        return Ok(());
    }

    let output_dir = cli.output_dir.unwrap_or_else(|| cfg.output_dir());

    if cli.interactive {
        return run_interactive(&rt, &mut session, &output_dir);
    }

    match session.export(&output_dir)? {
        Some(path) => println!("Saved {}", path.display()),
        None => warn!("Nothing rendered, no image written"),
    }
    Ok(())
}
