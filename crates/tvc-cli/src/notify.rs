//! # Notify Subcommand
//!
//! Emits the rendered notifications for a human to review and send. Nothing
//! is dispatched from here; messages are printed or written one file per
//! operator.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;

use tvc_engine::Notification;

use crate::input::{execute, InputArgs};
use crate::write_output;

/// Arguments for the notify subcommand.
#[derive(Args, Debug)]
pub struct NotifyArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Write one `<operator-id>.txt` per notification into this directory.
    #[arg(long)]
    pub out_dir: Option<PathBuf>,
}

/// File name for an operator's message. Characters outside
/// `[A-Za-z0-9._-]` become `_`.
pub fn message_file_name(operator_id: &str) -> String {
    let stem: String = operator_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("{}.txt", stem.trim_start_matches('.'))
}

/// Plain-text rendering of one message with its headers.
pub fn format_message(note: &Notification) -> String {
    let mut out = String::new();
    if let Some(contact) = &note.contact {
        out.push_str(&format!("To: {contact}\n"));
    }
    out.push_str(&format!("Subject: {}\n", note.subject));
    out.push_str(&format!("Urgency: {}\n\n", note.urgency));
    out.push_str(&note.body);
    out
}

/// Execute the notify subcommand.
pub fn run_notify(args: &NotifyArgs, config: Option<&Path>) -> Result<u8> {
    let run = execute(&args.input, config)?;

    if !run.manual_review.is_empty() {
        let ids: Vec<&str> = run
            .manual_review
            .iter()
            .map(|r| r.operator_id.as_str())
            .collect();
        eprintln!(
            "{} operator(s) on unknown versions need manual follow-up: {}",
            ids.len(),
            ids.join(", ")
        );
    }

    match &args.out_dir {
        Some(dir) => {
            for note in &run.notifications {
                let path = dir.join(message_file_name(&note.operator_id));
                write_output(&path, &format_message(note))?;
                tracing::info!(
                    operator = %note.operator_id,
                    path = %path.display(),
                    "wrote notification"
                );
            }
            eprintln!(
                "Wrote {} notification(s) to {}",
                run.notifications.len(),
                dir.display()
            );
        }
        None => {
            for (i, note) in run.notifications.iter().enumerate() {
                if i > 0 {
                    println!("----------------------------------------");
                }
                print!("{}", format_message(note));
            }
        }
    }

    Ok(0)
}
