//! Interactive terminal front-end over the root shell.

use std::{io::Write as _, sync::Arc};

use anyhow::Result;
use client_core::{ActiveView, FormMode, ManagementView, RecordStore, RootShell};
use shared::domain::DocenteId;
use tokio::io::{self, AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::debug;

use crate::render;

const HELP: &str = "commands: toggle | search <text> | add | edit <id> | delete <id> | help | quit";

struct Prompt {
    lines: Lines<BufReader<Stdin>>,
}

impl Prompt {
    fn new() -> Self {
        Self {
            lines: BufReader::new(io::stdin()).lines(),
        }
    }

    /// `None` once stdin is closed.
    async fn ask(&mut self, label: &str) -> Result<Option<String>> {
        print!("{label}");
        std::io::stdout().flush()?;
        Ok(self.lines.next_line().await?)
    }
}

pub async fn run(store: Arc<dyn RecordStore>) -> Result<()> {
    let mut shell = RootShell::mount(store).await;
    let mut prompt = Prompt::new();
    println!("{HELP}");

    loop {
        print_active(&shell);
        let Some(line) = prompt.ask("> ").await? else {
            break;
        };
        let line = line.trim();
        let (command, arg) = line.split_once(' ').unwrap_or((line, ""));
        let arg = arg.trim();
        debug!(command, "shell command");

        match command {
            "" => {}
            "help" => println!("{HELP}"),
            "quit" | "exit" => break,
            "toggle" => shell.toggle().await,
            "search" => {
                let accepted = match shell.active_mut() {
                    ActiveView::Listing(view) => view.set_search(arg),
                    ActiveView::Management(view) => view.set_search(arg),
                };
                if !accepted {
                    println!("nothing to search");
                }
            }
            "add" | "edit" | "delete" => {
                let ActiveView::Management(view) = shell.active_mut() else {
                    println!("'{command}' needs the management view; use 'toggle'");
                    continue;
                };
                if !manage(view, &mut prompt, command, arg).await? {
                    break;
                }
            }
            other => println!("unknown command '{other}'; {HELP}"),
        }
    }

    Ok(())
}

fn print_active(shell: &RootShell) {
    let rendered = match shell.active() {
        ActiveView::Listing(view) => render::screen("Docentes", view.state(), &view.visible()),
        ActiveView::Management(view) => {
            render::screen("Manage docentes", view.state(), &view.visible())
        }
    };
    println!("{rendered}");
    println!("[{}]", shell.toggle_label());
}

/// Returns false when stdin closed mid-form.
async fn manage(
    view: &mut ManagementView,
    prompt: &mut Prompt,
    command: &str,
    arg: &str,
) -> Result<bool> {
    match command {
        "add" => {
            if !view.open_create() {
                println!("the list is not loaded");
                return Ok(true);
            }
        }
        "edit" => {
            let Some(id) = parse_id(arg) else {
                println!("usage: edit <id>");
                return Ok(true);
            };
            if !view.open_edit(id) {
                println!("docente {id} is not in the list");
                return Ok(true);
            }
        }
        _ => {
            let Some(id) = parse_id(arg) else {
                println!("usage: delete <id>");
                return Ok(true);
            };
            let _ = view.delete(id).await;
            print_alert(view);
            return Ok(true);
        }
    }

    if !fill_form(view, prompt).await? {
        view.cancel_form();
        return Ok(false);
    }
    let _ = view.submit().await;
    print_alert(view);
    Ok(true)
}

async fn fill_form(view: &mut ManagementView, prompt: &mut Prompt) -> Result<bool> {
    let Some(form) = view.form_mut() else {
        return Ok(true);
    };
    println!("{}", render::form_header(form));
    let editing = matches!(form.mode, FormMode::Edit(_));

    for (label, field) in [
        ("Name", &mut form.name),
        ("Regime (hours)", &mut form.regime),
        ("Order", &mut form.order),
    ] {
        let question = if editing {
            format!("{label} [{field}]: ")
        } else {
            format!("{label}: ")
        };
        let Some(answer) = prompt.ask(&question).await? else {
            return Ok(false);
        };
        if !(editing && answer.is_empty()) {
            *field = answer;
        }
    }
    Ok(true)
}

fn parse_id(arg: &str) -> Option<DocenteId> {
    arg.trim().trim_start_matches('#').parse().ok().map(DocenteId)
}

fn print_alert(view: &mut ManagementView) {
    if let Some(alert) = view.take_alert() {
        println!("{}", render::alert(&alert));
    }
}
