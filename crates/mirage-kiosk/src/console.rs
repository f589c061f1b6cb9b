//! Line-driven operator console.
//!
//! Each line becomes one session event. The console reads the latest
//! snapshot only to resolve list positions ("style 2", "delete 1") into ids.

use std::borrow::Cow::{self, Borrowed, Owned};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context as _, Result, bail};
use colored::Colorize;
use mirage_application::{KioskHandle, SessionSnapshot};
use mirage_core::image::EncodedImage;
use mirage_core::session::SessionEvent;
use mirage_core::style::{Category, SubjectAttribute, catalog};
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};

use crate::render;

const COMMANDS: &[(&str, &str)] = &[
    ("start", "Touch the attract screen"),
    ("tap", "Register activity without doing anything"),
    ("category", "Choose adult, child or couple"),
    ("style", "Choose a style by number or id, optionally with female|male"),
    ("attr", "Set the subject attribute (female|male)"),
    ("shutter", "Take the photo"),
    ("flip", "Switch between front and rear camera"),
    ("capture", "Use an image file or a data: URL as the photo"),
    ("styles", "Back to style selection from the camera"),
    ("retake", "Discard the portrait and take another photo"),
    ("another", "Keep the photo and choose another style"),
    ("share", "Create a download link"),
    ("save", "Save the portrait on this device"),
    ("return", "Leave the download screen"),
    ("back", "Back to the welcome screen"),
    ("restart", "Start over"),
    ("gallery", "Open the gallery"),
    ("export", "Save a gallery portrait on this device"),
    ("delete", "Delete a gallery portrait"),
    ("close", "Close the gallery"),
    ("connect", "Reload generation credentials"),
    ("status", "Show the current screen again"),
    ("help", "List commands"),
    ("quit", "Stop the kiosk"),
];

#[derive(Debug)]
pub enum Command {
    Event(SessionEvent),
    CaptureFile(PathBuf),
    Status,
    Help,
    Quit,
}

/// Turns one console line into a command.
pub fn parse_command(line: &str, snapshot: &SessionSnapshot) -> Result<Command, String> {
    let mut words = line.split_whitespace();
    let Some(name) = words.next() else {
        return Ok(Command::Event(SessionEvent::ActivityDetected));
    };
    let args: Vec<&str> = words.collect();

    let event = match name {
        "quit" | "exit" => return Ok(Command::Quit),
        "help" | "?" => return Ok(Command::Help),
        "status" => return Ok(Command::Status),
        "capture" => {
            let source = args.first().ok_or("Usage: capture <image file|data URL>")?;
            if source.starts_with("data:") {
                let image = EncodedImage::from_data_url(source).map_err(|e| e.to_string())?;
                SessionEvent::PhotoCaptured(image)
            } else {
                return Ok(Command::CaptureFile(PathBuf::from(*source)));
            }
        }
        "start" => SessionEvent::Start,
        "tap" => SessionEvent::ActivityDetected,
        "category" => {
            let arg = args.first().ok_or("Usage: category <adult|child|couple>")?;
            let category =
                Category::from_str(arg).map_err(|_| format!("Unknown category '{arg}'"))?;
            SessionEvent::CategoryChosen(category)
        }
        "style" => {
            let arg = args.first().ok_or("Usage: style <n|id> [female|male]")?;
            let style_id = resolve_style(arg, snapshot)?;
            let attribute = args.get(1).map(|a| parse_attribute(a)).transpose()?;
            SessionEvent::StyleChosen {
                style_id,
                attribute,
            }
        }
        "attr" => {
            let arg = args.first().ok_or("Usage: attr <female|male>")?;
            SessionEvent::SetSubjectAttribute(parse_attribute(arg)?)
        }
        "shutter" | "snap" => SessionEvent::Shutter,
        "flip" => SessionEvent::FlipCamera,
        "styles" => SessionEvent::BackToStyles,
        "retake" => SessionEvent::Retake,
        "another" => SessionEvent::ChooseAnotherStyle,
        "share" => SessionEvent::RequestShareLink,
        "save" => SessionEvent::SaveLocally,
        "return" => SessionEvent::ReturnFromPublish,
        "back" => SessionEvent::Back,
        "restart" => SessionEvent::StartOver,
        "gallery" => SessionEvent::OpenGallery,
        "close" => SessionEvent::CloseGallery,
        "export" => {
            let arg = args.first().ok_or("Usage: export <n|id>")?;
            SessionEvent::ExportGalleryItem(resolve_gallery_item(arg, snapshot))
        }
        "delete" => {
            let arg = args.first().ok_or("Usage: delete <n|id>")?;
            SessionEvent::DeleteGalleryItem(resolve_gallery_item(arg, snapshot))
        }
        "connect" => SessionEvent::SelectCredentials,
        other => return Err(format!("Unknown command '{other}'. Type 'help' for a list.")),
    };
    Ok(Command::Event(event))
}

fn parse_attribute(arg: &str) -> Result<SubjectAttribute, String> {
    SubjectAttribute::from_str(arg).map_err(|_| format!("Unknown subject attribute '{arg}'"))
}

/// Accepts a 1-based position in the current category's catalog or a style id.
fn resolve_style(arg: &str, snapshot: &SessionSnapshot) -> Result<String, String> {
    let Ok(position) = arg.parse::<usize>() else {
        return Ok(arg.to_string());
    };
    let category = snapshot
        .session
        .category
        .ok_or("Choose a category first")?;
    position
        .checked_sub(1)
        .and_then(|i| catalog::styles_for(category).get(i))
        .map(|style| style.id.clone())
        .ok_or_else(|| format!("No style number {position} for {category}"))
}

/// Positions refer to the gallery as last shown; anything else is an id.
fn resolve_gallery_item(arg: &str, snapshot: &SessionSnapshot) -> String {
    arg.parse::<usize>()
        .ok()
        .and_then(|position| position.checked_sub(1))
        .and_then(|i| snapshot.gallery.get(i))
        .map(|item| item.id.clone())
        .unwrap_or_else(|| arg.to_string())
}

fn load_image(path: &Path) -> Result<EncodedImage> {
    let mime = mime_guess::from_path(path)
        .first()
        .filter(|mime| mime.type_() == mime_guess::mime::IMAGE);
    let Some(mime) = mime else {
        bail!("{} is not an image file", path.display());
    };
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    if bytes.is_empty() {
        bail!("{} is empty", path.display());
    }
    Ok(EncodedImage::new(mime.essence_str(), bytes))
}

fn print_help() {
    for (name, description) in COMMANDS {
        println!("  {:<10} {}", name.bright_cyan(), description.bright_black());
    }
}

/// Completion and hints for command names.
struct ConsoleHelper;

impl Helper for ConsoleHelper {}

impl Completer for ConsoleHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];
        if line.contains(' ') {
            return Ok((0, vec![]));
        }
        let candidates = COMMANDS
            .iter()
            .filter(|(name, _)| name.starts_with(line))
            .map(|(name, _)| Pair {
                display: name.to_string(),
                replacement: name.to_string(),
            })
            .collect();
        Ok((0, candidates))
    }
}

impl Highlighter for ConsoleHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        let known = line
            .split_whitespace()
            .next()
            .is_some_and(|word| COMMANDS.iter().any(|(name, _)| *name == word));
        if known {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }
}

impl Hinter for ConsoleHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];
        if line.is_empty() || line.contains(' ') {
            return None;
        }
        COMMANDS
            .iter()
            .find(|(name, _)| name.starts_with(line) && name.len() > line.len())
            .map(|(name, _)| name[line.len()..].to_string())
    }
}

impl Validator for ConsoleHelper {}

/// Reads commands until `quit` or end of input. Blocks the calling thread.
pub fn run(handle: KioskHandle) -> Result<()> {
    let mut rl = Editor::new()?;
    rl.set_helper(Some(ConsoleHelper));

    println!("{}", "=== MIRAGE kiosk console ===".bright_magenta().bold());
    println!("{}", "Type 'help' for commands, 'quit' to stop.".bright_black());

    loop {
        match rl.readline("mirage> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if !trimmed.is_empty() {
                    let _ = rl.add_history_entry(trimmed);
                }

                let event = match parse_command(trimmed, &handle.snapshot()) {
                    Ok(Command::Quit) => {
                        println!("{}", "Goodbye!".bright_green());
                        break;
                    }
                    Ok(Command::Help) => {
                        print_help();
                        continue;
                    }
                    Ok(Command::Status) => {
                        render::print_screen(&render::screen(&handle.snapshot()));
                        continue;
                    }
                    Ok(Command::CaptureFile(path)) => match load_image(&path) {
                        Ok(image) => SessionEvent::PhotoCaptured(image),
                        Err(e) => {
                            println!("{}", format!("{e:#}").red());
                            SessionEvent::ActivityDetected
                        }
                    },
                    Ok(Command::Event(event)) => event,
                    Err(message) => {
                        println!("{}", message.yellow());
                        SessionEvent::ActivityDetected
                    }
                };

                if !handle.send(event) {
                    println!("{}", "Kiosk controller stopped.".red());
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => return Err(err.into()),
        }
    }

    Ok(())
}
