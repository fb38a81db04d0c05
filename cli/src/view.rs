//! Terminal rendering of draw view updates

use std::io::Write;

use lucky_draw_core::{Controls, ViewReceiver, ViewUpdate};
use tokio::task::JoinHandle;

/// What a single update puts on the terminal
#[derive(Debug, PartialEq, Eq)]
pub enum Output {
    /// Overwrites the current line (animation frames)
    Frame(String),
    Lines(Vec<String>),
    Nothing,
}

pub fn render(update: &ViewUpdate) -> Output {
    match update {
        ViewUpdate::History(entries) if entries.is_empty() => Output::Nothing,
        ViewUpdate::History(entries) => {
            let mut lines = vec![format!("Previous winners ({}):", entries.len())];
            lines.extend(entries.iter().rev().map(|e| e.list_line()));
            Output::Lines(lines)
        }
        ViewUpdate::Loading => Output::Lines(vec!["Loading participants...".into()]),
        ViewUpdate::LoadFinished { loaded, error: None } => {
            Output::Lines(vec![format!("Loaded {} participants", loaded)])
        }
        ViewUpdate::LoadFinished {
            error: Some(error), ..
        } => Output::Lines(vec![format!("Could not load participants: {}", error)]),
        ViewUpdate::Name(name) => Output::Frame(name.replace('\n', " ")),
        ViewUpdate::Winner(record) => Output::Lines(vec![format!(
            "*** {} ***",
            record.participant.display_text().replace('\n', " | ")
        )]),
        ViewUpdate::WinnerListed(line) => Output::Lines(vec![line.replace('\n', " | ")]),
        ViewUpdate::PoolSize(n) => Output::Lines(vec![format!("Participants remaining: {}", n)]),
        ViewUpdate::Reset(text) => Output::Lines(vec![text.clone()]),
        ViewUpdate::Controls(controls) => Output::Lines(vec![available(controls)]),
        ViewUpdate::Warning(text) => Output::Lines(vec![format!("warning: {}", text)]),
        ViewUpdate::Error(text) => Output::Lines(vec![format!("error: {}", text)]),
    }
}

fn available(controls: &Controls) -> String {
    let names: Vec<&str> = [
        (controls.load, "load <path>"),
        (controls.start, "start"),
        (controls.stop, "stop"),
        (controls.next, "next"),
    ]
    .into_iter()
    .filter_map(|(enabled, name)| enabled.then_some(name))
    .collect();

    if names.is_empty() {
        "(please wait)".to_string()
    } else {
        format!("[{}]", names.join("] ["))
    }
}

/// Print updates until the controller drops its sender
pub fn spawn_renderer(mut rx: ViewReceiver) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut in_frame = false;
        while let Some(update) = rx.recv().await {
            let mut out = std::io::stdout().lock();
            let result = match render(&update) {
                Output::Frame(name) => {
                    in_frame = true;
                    write!(out, "\r\x1b[2K  {}", name)
                }
                Output::Lines(lines) => {
                    let mut result = Ok(());
                    if std::mem::take(&mut in_frame) {
                        result = writeln!(out);
                    }
                    for line in lines {
                        result = result.and_then(|()| writeln!(out, "{}", line));
                    }
                    result
                }
                Output::Nothing => Ok(()),
            };
            if let Err(e) = result.and_then(|()| out.flush()) {
                tracing::warn!(error = %e, "Failed to write to terminal");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use lucky_draw_core::{Participant, WinnerEntry, WinnerRecord};

    #[test]
    fn test_frames_are_single_line() {
        assert_eq!(
            render(&ViewUpdate::Name("Alice".into())),
            Output::Frame("Alice".into())
        );
    }

    #[test]
    fn test_winner_is_flattened() {
        let record = WinnerRecord::now(
            Participant::new(3, "Alice")
                .with_group("G1")
                .with_department("Sales"),
        );
        assert_eq!(
            render(&ViewUpdate::Winner(record)),
            Output::Lines(vec!["*** Alice | G1 - Sales ***".into()])
        );
    }

    #[test]
    fn test_history_lists_newest_first() {
        let update = ViewUpdate::History(vec![
            WinnerEntry::Legacy("first".into()),
            WinnerEntry::Legacy("second".into()),
        ]);
        assert_eq!(
            render(&update),
            Output::Lines(vec![
                "Previous winners (2):".into(),
                "🏆 second".into(),
                "🏆 first".into(),
            ])
        );
        assert_eq!(render(&ViewUpdate::History(Vec::new())), Output::Nothing);
    }

    #[test]
    fn test_controls_show_enabled_commands() {
        let controls = Controls {
            load: true,
            start: true,
            ..Controls::default()
        };
        assert_eq!(
            render(&ViewUpdate::Controls(controls)),
            Output::Lines(vec!["[load <path>] [start]".into()])
        );
        assert_eq!(
            render(&ViewUpdate::Controls(Controls::default())),
            Output::Lines(vec!["(please wait)".into()])
        );
    }

    #[test]
    fn test_load_failure_carries_reason() {
        let update = ViewUpdate::LoadFinished {
            loaded: 0,
            error: Some("required column 'name' not found".into()),
        };
        assert_eq!(
            render(&update),
            Output::Lines(vec![
                "Could not load participants: required column 'name' not found".into()
            ])
        );
    }
}
