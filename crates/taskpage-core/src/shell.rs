use std::io::{self, BufRead, IsTerminal, Write};

use anyhow::{Context, anyhow};
use tracing::{debug, info};

use crate::app::{App, Intent};
use crate::render::Renderer;
use crate::task::Status;
use crate::view::{SortField, StatusFilter};

pub fn known_command_names() -> Vec<&'static str> {
    vec![
        "add", "edit", "desc", "status", "save", "cancel", "delete", "sort", "filter", "page",
        "list", "export", "help", "quit", "exit",
    ]
}

/// Expands a unique prefix to its full command name, exactly like the
/// usual taskwarrior abbreviations: "del" resolves, "s" is ambiguous.
pub fn expand_command_abbrev<'a>(token: &'a str, known: &[&'a str]) -> Option<&'a str> {
    if known.contains(&token) {
        return Some(token);
    }

    let mut matches = known.iter().copied().filter(|name| name.starts_with(token));
    let first = matches.next()?;
    if matches.next().is_some() {
        None
    } else {
        Some(first)
    }
}

#[derive(Debug, Clone)]
enum Action {
    Intent(Intent),
    List,
    Export,
    Help,
    Quit,
    Nothing,
}

/// One intent per line: a command word (abbreviations allowed) plus its
/// arguments. Parsing never touches application state.
fn parse_action(line: &str) -> anyhow::Result<Action> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let Some((&head, args)) = tokens.split_first() else {
        return Ok(Action::Nothing);
    };

    let known = known_command_names();
    let command = expand_command_abbrev(head, &known)
        .ok_or_else(|| anyhow!("unknown or ambiguous command: {head} (try 'help')"))?;

    let rest = || args.join(" ");
    let single_id = |what: &str| -> anyhow::Result<u64> {
        let [raw] = args else {
            return Err(anyhow!("{what} takes exactly one task id"));
        };
        raw.parse::<u64>()
            .map_err(|_| anyhow!("not a task id: {raw}"))
    };

    let action = match command {
        "add" => {
            if args.is_empty() {
                return Err(anyhow!("add requires a description"));
            }
            Action::Intent(Intent::Create(rest()))
        }
        "edit" => Action::Intent(Intent::OpenEdit(single_id("edit")?)),
        "desc" => {
            if args.is_empty() {
                return Err(anyhow!("desc requires the new description"));
            }
            Action::Intent(Intent::EditDescription(rest()))
        }
        "status" => {
            let raw = rest();
            let status = Status::parse(&raw)
                .ok_or_else(|| anyhow!("not a status: {raw} (not-started, in-progress, finished)"))?;
            Action::Intent(Intent::EditStatus(status))
        }
        "save" => Action::Intent(Intent::SaveEdit),
        "cancel" => Action::Intent(Intent::CancelEdit),
        "delete" => Action::Intent(Intent::Delete(single_id("delete")?)),
        "sort" => {
            let raw = rest();
            let field = SortField::parse(&raw)
                .ok_or_else(|| anyhow!("not a sort field: {raw} (description, status)"))?;
            Action::Intent(Intent::SetSort(field))
        }
        "filter" => {
            let raw = rest();
            let filter = StatusFilter::parse(&raw)
                .ok_or_else(|| anyhow!("not a filter: {raw} (all or a status)"))?;
            Action::Intent(Intent::SetFilter(filter))
        }
        "page" => {
            let [raw] = args else {
                return Err(anyhow!("page takes exactly one number"));
            };
            let n = raw
                .parse::<usize>()
                .map_err(|_| anyhow!("not a page number: {raw}"))?;
            if n == 0 {
                return Err(anyhow!("pages start at 1"));
            }
            Action::Intent(Intent::SetPage(n))
        }
        "list" => Action::List,
        "export" => Action::Export,
        "help" => Action::Help,
        "quit" | "exit" => Action::Quit,
        _ => return Err(anyhow!("unknown command: {command}")),
    };

    Ok(action)
}

fn feedback(intent: &Intent, result: Option<&crate::task::Task>) -> Option<String> {
    match (intent, result) {
        (Intent::Create(_), Some(task)) => Some(format!("Created task {}.", task.id)),
        (Intent::SaveEdit, Some(task)) => Some(format!("Saved task {}.", task.id)),
        (Intent::Delete(_), Some(task)) => Some(format!("Deleted task {}.", task.id)),
        (Intent::CancelEdit, _) => Some("Edit cancelled.".to_string()),
        _ => None,
    }
}

/// Runs the session loop: read a line, map it to an intent, apply it,
/// re-derive and re-render. Recoverable errors are reported and the loop
/// continues; EOF or `quit` ends the session.
#[tracing::instrument(skip(app, renderer))]
pub fn run_shell(app: &mut App, renderer: &mut Renderer) -> anyhow::Result<()> {
    let interactive = io::stdin().is_terminal();

    renderer.print_view(&app.view_model(), app.controls())?;

    let stdin = io::stdin();
    loop {
        if interactive {
            print!("taskpage> ");
            io::stdout().flush().context("failed to flush prompt")?;
        }

        let mut line = String::new();
        let read = stdin
            .lock()
            .read_line(&mut line)
            .context("failed to read from stdin")?;
        if read == 0 {
            info!("stdin closed, ending session");
            break;
        }

        let action = match parse_action(&line) {
            Ok(action) => action,
            Err(err) => {
                println!("error: {err:#}");
                continue;
            }
        };

        debug!(?action, "shell action");
        match action {
            Action::Nothing => {}
            Action::Quit => break,
            Action::Help => print_help(),
            Action::Export => {
                let json = serde_json::to_string_pretty(&app.view_model())
                    .context("failed to serialize view model")?;
                println!("{json}");
            }
            Action::List => {
                renderer.print_view(&app.view_model(), app.controls())?;
            }
            Action::Intent(intent) => {
                match app.apply(intent.clone()) {
                    Ok(touched) => {
                        if let Some(msg) = feedback(&intent, touched.as_ref()) {
                            println!("{msg}");
                        }
                        renderer.print_view(&app.view_model(), app.controls())?;
                    }
                    Err(err) => {
                        println!("error: {err:#}");
                    }
                }
            }
        }
    }

    Ok(())
}

fn print_help() {
    println!(
        "\
commands (unique prefixes work):
  add <description>          create a task (status: Not Started)
  edit <id>                  open the edit session for a task
  desc <text>                stage a new description for the open session
  status <status>            stage a new status for the open session
  save                       commit the open session
  cancel                     discard the open session
  delete <id>                remove a task
  sort description|status    choose the sort field
  filter all|<status>        show only one status, or everything
  page <n>                   go to a page (clamped to the last page)
  list                       re-render the current page
  export                     print the view model as JSON
  help                       this text
  quit                       end the session

statuses: not-started, in-progress, finished"
    );
}
