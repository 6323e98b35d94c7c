//! Interactive commands
//!
//! One line of input is one user event: a style edit, a font load or
//! removal, or an export request.

use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

use crate::constants::{BACKGROUND_COLOR_PRESETS, TEXT_COLOR_PRESETS};
use crate::render::descriptor::{DescriptorError, FontDescriptor};
use crate::style::{StyleEdit, StyleError, StyleState};
use crate::utils::color::Color;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command: {0} (try \"help\")")]
    Unknown(String),
    #[error("{0} needs an argument")]
    MissingArgument(&'static str),
    #[error("invalid number: {0}")]
    InvalidNumber(String),
    #[error("expected on, off or toggle, got {0}")]
    InvalidSwitch(String),
    #[error("preset target must be \"text\" or \"background\", got {0}")]
    InvalidPresetTarget(String),
    #[error("unterminated quote in: {0}")]
    UnterminatedQuote(String),
    #[error(transparent)]
    Style(#[from] StyleError),
    #[error(transparent)]
    Descriptor(#[from] DescriptorError),
}

/// Boolean style flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flag {
    Bold,
    Italic,
    Underline,
}

/// Requested state for a flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Switch {
    On,
    Off,
    Toggle,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Single-field edit
    Edit(StyleEdit),
    /// `font <shorthand>`: several fields, one repaint
    Font(FontDescriptor),
    SetFlag(Flag, Switch),
    Load(Vec<PathBuf>),
    Remove(String),
    ListFonts,
    Show,
    Export(Option<PathBuf>),
    Help,
    Quit,
}

pub const HELP: &str = "\
Commands:
  text <string>                 set the text
  size <12-120>                 set the font size in px
  family <name>                 select a system or uploaded font
  font <shorthand>              e.g. \"italic bold 64px Georgia\"
  color <#hex>                  text color
  background <#hex>             background color
  preset text|background <n>    pick a preset swatch (0-9)
  bold|italic|underline [on|off|toggle]
  load <file>...                upload TTF/OTF/WOFF/WOFF2 fonts (quote
                                paths with spaces)
  remove <name>                 remove an uploaded font
  fonts                         list selectable fonts
  show                          print the current style
  export [dir]                  save generated-text-image.png
  help | quit";

fn parse_switch(arg: Option<&str>) -> Result<Switch, CommandError> {
    match arg.map(|a| a.to_ascii_lowercase()).as_deref() {
        None | Some("toggle") => Ok(Switch::Toggle),
        Some("on") | Some("true") | Some("1") => Ok(Switch::On),
        Some("off") | Some("false") | Some("0") => Ok(Switch::Off),
        Some(_) => Err(CommandError::InvalidSwitch(arg.unwrap_or_default().to_string())),
    }
}

fn preset(palette: &[&str], kind: &'static str, index: &str) -> Result<Color, CommandError> {
    let i: usize = index
        .parse()
        .map_err(|_| CommandError::InvalidNumber(index.to_string()))?;
    let hex = palette
        .get(i)
        .ok_or(StyleError::UnknownPreset { kind, index: i })?;
    Ok(hex.parse()?)
}

/// Split on whitespace, keeping single- or double-quoted runs together
fn split_args(input: &str) -> Result<Vec<String>, CommandError> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_arg = false;
    let mut quote: Option<char> = None;
    for c in input.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                in_arg = true;
            }
            None if c.is_whitespace() => {
                if in_arg {
                    args.push(std::mem::take(&mut current));
                    in_arg = false;
                }
            }
            None => {
                current.push(c);
                in_arg = true;
            }
        }
    }
    if quote.is_some() {
        return Err(CommandError::UnterminatedQuote(input.to_string()));
    }
    if in_arg {
        args.push(current);
    }
    Ok(args)
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((v, r)) => (v, r.trim()),
            None => (line, ""),
        };
        let arg = (!rest.is_empty()).then_some(rest);
        let need = |name: &'static str| arg.ok_or(CommandError::MissingArgument(name));

        let cmd = match verb.to_ascii_lowercase().as_str() {
            // Text may be intentionally empty
            "text" => Command::Edit(StyleEdit::Text(rest.to_string())),
            "size" => {
                let v = need("size")?;
                let px = v
                    .trim_end_matches("px")
                    .parse::<u32>()
                    .map_err(|_| CommandError::InvalidNumber(v.to_string()))?;
                Command::Edit(StyleEdit::FontSize(px))
            }
            "family" => Command::Edit(StyleEdit::FontFamily(need("family")?.to_string())),
            "font" => Command::Font(need("font")?.parse()?),
            "color" => Command::Edit(StyleEdit::TextColor(need("color")?.parse()?)),
            "background" | "bg" => {
                Command::Edit(StyleEdit::BackgroundColor(need("background")?.parse()?))
            }
            "preset" => {
                let (target, index) = need("preset")?
                    .split_once(char::is_whitespace)
                    .ok_or(CommandError::MissingArgument("preset"))?;
                let index = index.trim();
                match target {
                    "text" => Command::Edit(StyleEdit::TextColor(preset(
                        &TEXT_COLOR_PRESETS,
                        "text",
                        index,
                    )?)),
                    "background" | "bg" => Command::Edit(StyleEdit::BackgroundColor(preset(
                        &BACKGROUND_COLOR_PRESETS,
                        "background",
                        index,
                    )?)),
                    other => return Err(CommandError::InvalidPresetTarget(other.to_string())),
                }
            }
            "bold" => Command::SetFlag(Flag::Bold, parse_switch(arg)?),
            "italic" => Command::SetFlag(Flag::Italic, parse_switch(arg)?),
            "underline" => Command::SetFlag(Flag::Underline, parse_switch(arg)?),
            "load" => Command::Load(
                split_args(need("load")?)?
                    .into_iter()
                    .map(PathBuf::from)
                    .collect(),
            ),
            "remove" | "rm" => Command::Remove(need("remove")?.to_string()),
            "fonts" => Command::ListFonts,
            "show" => Command::Show,
            "export" | "download" => Command::Export(arg.map(PathBuf::from)),
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            _ => return Err(CommandError::Unknown(verb.to_string())),
        };
        Ok(cmd)
    }
}

/// Resolve a flag switch against the current state
pub fn flag_edit(style: &StyleState, flag: Flag, switch: Switch) -> StyleEdit {
    let current = match flag {
        Flag::Bold => style.bold,
        Flag::Italic => style.italic,
        Flag::Underline => style.underline,
    };
    let value = match switch {
        Switch::On => true,
        Switch::Off => false,
        Switch::Toggle => !current,
    };
    match flag {
        Flag::Bold => StyleEdit::Bold(value),
        Flag::Italic => StyleEdit::Italic(value),
        Flag::Underline => StyleEdit::Underline(value),
    }
}

/// Edits equivalent to a font shorthand
pub fn descriptor_edits(desc: &FontDescriptor) -> Vec<StyleEdit> {
    vec![
        StyleEdit::Italic(desc.italic),
        StyleEdit::Bold(desc.bold),
        StyleEdit::FontSize(desc.size_px),
        StyleEdit::FontFamily(desc.family.clone()),
    ]
}
