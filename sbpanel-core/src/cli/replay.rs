use crate::event::LogFormat;
use crate::ingest::Ingestor;
use crate::source::read_log;
use crate::state::{PanelView, ServerState, ServerStatus, StateStore};
use chrono::{Local, NaiveDateTime};
use owo_colors::OwoColorize;
use std::fmt::Write;
use std::path::Path;

const STAMP: &str = "%Y-%m-%d %H:%M:%S";

pub fn replay(log: &Path, format: LogFormat, json: bool) -> anyhow::Result<()> {
    let store = replay_file(log, format)?;
    let view = store.view(Local::now().naive_local());

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print!("{}", render_text(&view));
    }

    Ok(())
}

/// Rebuild state from a whole log without probing or saving.
pub fn replay_file(log: &Path, format: LogFormat) -> anyhow::Result<StateStore> {
    let lines = read_log(log)?;
    let mut ingestor = Ingestor::new(format, ServerState::default());
    let applied = ingestor.replay(&lines);

    tracing::debug!(lines = lines.len(), applied, "replayed log");
    Ok(ingestor.into_store())
}

pub fn render_text(view: &PanelView) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_view(&mut out, view);
    out
}

fn write_view(out: &mut String, view: &PanelView) -> std::fmt::Result {
    let status = match view.status {
        ServerStatus::Online => view.status.green().bold().to_string(),
        ServerStatus::Offline => view.status.red().bold().to_string(),
        ServerStatus::Unknown => view.status.yellow().to_string(),
    };
    write!(out, "{} {status}", "Server:".bold())?;
    if let Some(age) = &view.status_age {
        write!(out, " (for {age})")?;
    }
    writeln!(out)?;
    writeln!(out, "{} {}", "Version:".bold(), view.version)?;
    match view.port {
        Some(port) => writeln!(out, "{} {port}", "Port:".bold())?,
        None => writeln!(out, "{} unknown", "Port:".bold())?,
    }
    writeln!(out, "{} {}", "Last launch:".bold(), stamp(view.last_launch))?;

    writeln!(out)?;
    writeln!(out, "{} ({})", "Online players".bold(), view.online_players.len())?;
    for p in &view.online_players {
        writeln!(
            out,
            "  {:<20} connected {}{}",
            p.name.green(),
            stamp(p.connected_at),
            ago(&p.online_for)
        )?;
    }

    writeln!(out)?;
    writeln!(out, "{} ({})", "Offline players".bold(), view.offline_players.len())?;
    for p in &view.offline_players {
        writeln!(
            out,
            "  {:<20} last seen {}{}",
            p.name.dimmed(),
            stamp(p.last_seen),
            ago(&p.offline_for)
        )?;
    }

    writeln!(out)?;
    writeln!(out, "{} ({})", "Active worlds".bold(), view.active_worlds.len())?;
    for w in &view.active_worlds {
        writeln!(
            out,
            "  {:<20} loaded {}{}",
            w.coords.cyan(),
            stamp(w.loaded_at),
            ago(&w.active_for)
        )?;
    }

    writeln!(out)?;
    writeln!(out, "{} ({})", "Chat".bold(), view.chat.len())?;
    for c in &view.chat {
        writeln!(out, "  [{}] <{}> {}", stamp(c.time), c.name.bold(), c.text)?;
    }

    Ok(())
}

fn stamp(t: Option<NaiveDateTime>) -> String {
    t.map(|t| t.format(STAMP).to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn ago(age: &Option<String>) -> String {
    age.as_ref()
        .map(|a| format!(" ({a} ago)"))
        .unwrap_or_default()
}
