//! Text rendering of the session for the operator console.

use chrono::Local;
use colored::Colorize;
use mirage_application::SessionSnapshot;
use mirage_core::session::{Mode, PublishStatus};
use mirage_core::style::catalog;
use qrcode::QrCode;
use qrcode::render::unicode::Dense1x2;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

/// What one screen shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Screen {
    pub title: String,
    pub body: Vec<String>,
    pub notice: Option<String>,
    pub alert: Option<String>,
    /// Commands that make sense on this screen.
    pub hint: String,
}

pub fn screen(snapshot: &SessionSnapshot) -> Screen {
    let session = &snapshot.session;
    let style = session.style_name().unwrap_or("portrait");
    let mut screen = Screen {
        notice: session.notice.clone(),
        ..Screen::default()
    };

    match session.mode {
        Mode::Idle => {
            screen.title = "MIRAGE - touch to start".to_string();
            screen.body.push(format!(
                "Cycling {} preview looks",
                catalog::attract_previews().count()
            ));
            screen.hint = "start".to_string();
        }
        Mode::Welcome => {
            screen.title = "Welcome".to_string();
            screen
                .body
                .push("Who is in the picture? adult, child or couple".to_string());
            screen
                .body
                .push(format!("{} portraits created so far", snapshot.usage_count));
            screen.hint = "category <adult|child|couple>, gallery".to_string();
        }
        Mode::CredentialSelection => {
            screen.title = "Generation credentials needed".to_string();
            screen.body.push(
                "The image service turned the current key away (quota, permission or rate limit)."
                    .to_string(),
            );
            screen
                .body
                .push("Update the generation key, then connect again.".to_string());
            screen.hint = "connect, restart".to_string();
        }
        Mode::StyleSelection => {
            let category = session.category;
            screen.title = match category {
                Some(category) => format!("Choose a {category} style"),
                None => "Choose a style".to_string(),
            };
            if let Some(category) = category {
                for (i, preset) in catalog::styles_for(category).iter().enumerate() {
                    screen.body.push(format!(
                        "  {}. {} - {} [{}]",
                        i + 1,
                        preset.name,
                        preset.description,
                        preset.id
                    ));
                }
                if category.requires_subject_attribute() {
                    screen
                        .body
                        .push(format!("Subject: {}", session.subject_attribute));
                }
            }
            screen.hint = "style <n|id> [female|male], attr <female|male>, back".to_string();
        }
        Mode::Capture => {
            screen.title = format!("Capture - {style}");
            let state = if snapshot.camera_live { "live" } else { "offline" };
            screen
                .body
                .push(format!("Camera: {} ({state})", snapshot.facing));
            if session
                .category
                .is_some_and(|category| category.requires_subject_attribute())
            {
                screen
                    .body
                    .push(format!("Subject: {}", session.subject_attribute));
            }
            screen.alert = session.last_error.clone();
            screen.hint = "shutter, flip, capture <file>, attr <female|male>, styles, restart"
                .to_string();
        }
        Mode::Generating => {
            screen.title = "Creating your portrait".to_string();
            screen.body.push(format!("Style: {style}"));
            screen.hint = "restart".to_string();
        }
        Mode::Result => {
            screen.title = format!("Your {style} portrait is ready");
            if let Some(image) = &session.generated_image {
                screen
                    .body
                    .push(format!("{}, {} bytes", image.mime_type(), image.len()));
            }
            screen.hint = "share, retake, another, restart".to_string();
        }
        Mode::Publish => {
            screen.title = "Take it home".to_string();
            if let Some(view) = &session.publish {
                match &view.status {
                    PublishStatus::Uploading => {
                        screen.body.push("Creating download link...".to_string());
                    }
                    PublishStatus::Ready { url } => {
                        screen.body.extend(qr_lines(url));
                        screen.body.push(format!("Scan or open: {url}"));
                    }
                    PublishStatus::Failed(error) => {
                        screen.alert = Some(error.message.clone());
                        screen.body.push(error.guidance().to_string());
                    }
                }
                if let Some(path) = &view.saved_to {
                    screen
                        .body
                        .push(format!("Saved on this device: {}", path.display()));
                }
                if let Some(message) = &view.save_error {
                    screen.alert = Some(message.clone());
                }
            }
            screen.hint = "save, return, restart".to_string();
        }
        Mode::Gallery => {
            screen.title = format!("Gallery - {} portraits", snapshot.gallery.len());
            if snapshot.gallery.is_empty() {
                screen.body.push("No portraits yet.".to_string());
            }
            for (i, item) in snapshot.gallery.iter().enumerate() {
                screen.body.push(format!(
                    "  {}. {} ({}) [{}]",
                    i + 1,
                    item.style_name,
                    item.created_at
                        .with_timezone(&Local)
                        .format("%Y-%m-%d %H:%M"),
                    item.id
                ));
            }
            screen.hint = "export <n|id>, delete <n|id>, close".to_string();
        }
    }

    screen
}

/// The download link as a scannable block, two modules per character row.
fn qr_lines(url: &str) -> Vec<String> {
    match QrCode::new(url.as_bytes()) {
        Ok(code) => code
            .render::<Dense1x2>()
            .dark_color(Dense1x2::Light)
            .light_color(Dense1x2::Dark)
            .build()
            .lines()
            .map(str::to_string)
            .collect(),
        Err(e) => {
            tracing::warn!(error = %e, "Could not encode download link as QR code");
            Vec::new()
        }
    }
}

pub fn print_screen(screen: &Screen) {
    println!();
    println!("{}", screen.title.bright_magenta().bold());
    for line in &screen.body {
        println!("{line}");
    }
    if let Some(notice) = &screen.notice {
        println!("{}", notice.green());
    }
    if let Some(alert) = &screen.alert {
        println!("{}", alert.red());
    }
    println!("{}", screen.hint.bright_black());
}

/// Prints the screen whenever it changes, until shutdown.
pub async fn follow(mut snapshots: watch::Receiver<SessionSnapshot>, shutdown: CancellationToken) {
    let mut shown: Option<Screen> = None;
    loop {
        let current = screen(&snapshots.borrow_and_update());
        if shown.as_ref() != Some(&current) {
            print_screen(&current);
            shown = Some(current);
        }

        tokio::select! {
            _ = shutdown.cancelled() => break,
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
            }
        }
    }
}
