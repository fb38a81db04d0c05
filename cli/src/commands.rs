use std::io::Write;
use std::path::PathBuf;

use lucky_draw_core::WinnerEntry;
use lucky_draw_core::context::{AppConfig, AppConfigExt};

use crate::CliContext;

pub async fn load(path: &str, ctx: &CliContext) -> Result<(), String> {
    ctx.draw.load_participants(PathBuf::from(path)).await
}

pub async fn start(ctx: &CliContext) -> Result<(), String> {
    ctx.draw.start_draw().await
}

pub async fn stop(ctx: &CliContext) -> Result<(), String> {
    ctx.draw.stop_draw().await
}

pub async fn next(ctx: &CliContext) -> Result<(), String> {
    ctx.draw.next_round().await
}

pub async fn show_status(ctx: &CliContext) -> Result<(), String> {
    let snapshot = ctx.draw.snapshot().await?;
    let mut out = std::io::stdout().lock();

    writeln!(out, "State:        {}", snapshot.state).map_err(|e| e.to_string())?;
    writeln!(out, "Remaining:    {}", snapshot.pool.len()).map_err(|e| e.to_string())?;
    writeln!(out, "Winners:      {}", snapshot.winners.len()).map_err(|e| e.to_string())?;
    writeln!(out, "Loaded total: {}", snapshot.initial_count).map_err(|e| e.to_string())?;
    if snapshot.loading {
        writeln!(out, "(participant file loading)").map_err(|e| e.to_string())?;
    }
    Ok(())
}

pub async fn show_winners(ctx: &CliContext) -> Result<(), String> {
    let snapshot = ctx.draw.snapshot().await?;
    let mut out = std::io::stdout().lock();

    if snapshot.winners.is_empty() {
        writeln!(out, "No winners yet").map_err(|e| e.to_string())?;
        return Ok(());
    }

    for record in snapshot.winners.into_iter().rev() {
        let line = WinnerEntry::from(record).list_line().replace('\n', " | ");
        writeln!(out, "{}", line).map_err(|e| e.to_string())?;
    }
    Ok(())
}

pub fn show_config(ctx: &CliContext) -> Result<(), String> {
    let config = &ctx.config;
    let mut out = std::io::stdout().lock();

    let location = match AppConfig::config_path() {
        Ok(path) => path.display().to_string(),
        Err(e) => format!("unavailable ({})", e),
    };
    writeln!(out, "Config file:   {}", location).map_err(|e| e.to_string())?;
    writeln!(out, "Winners file:  {}", config.winners_file.display()).map_err(|e| e.to_string())?;
    writeln!(out, "Clear winners: {}", config.clear_winners_on_start).map_err(|e| e.to_string())?;
    writeln!(out, "Stop delay:    {} ms", config.draw.stop_delay_ms).map_err(|e| e.to_string())?;
    writeln!(
        out,
        "Music:         {} ({}, volume {})",
        if config.audio.enabled { "on" } else { "off" },
        config.audio.background_track.display(),
        config.audio.background_volume
    )
    .map_err(|e| e.to_string())?;
    writeln!(
        out,
        "Announcement:  {} ({}, {})",
        if config.announcement.enabled { "on" } else { "off" },
        config.announcement.speech_program,
        config.announcement.locale
    )
    .map_err(|e| e.to_string())?;
    Ok(())
}

pub fn exit() -> Result<(), String> {
    let mut out = std::io::stdout();
    writeln!(out, "quitting...").map_err(|e| e.to_string())?;
    out.flush().map_err(|e| e.to_string())
}
