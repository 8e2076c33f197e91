//! Subcommand handlers. Results go to stdout; logs go to stderr.

use std::future::Future;

use anyhow::Context;
use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::info;

use scombz_core::config::ScombzConfig;
use scombz_core::message::HostSender;
use scombz_core::types::LoginData;
use scombz_login::{save_credentials, stored_credentials, AutoSubmit, LoginSubmitter, SubmitOutcome};
use scombz_store::Store;
use scombz_tasks::{add_original_task, HideOutcome, NowTicker, OriginalTaskDraft, TaskList, TaskRow, EMPTY_MESSAGE};
use scombz_timetable::{scrape_timetable, sync_timetable};

use crate::cli::{
    LoginCommand, SettingsCommand, StoreCommand, TasksCommand, TimetableCommand,
};

pub fn timetable(store: &Store, cmd: TimetableCommand) -> anyhow::Result<()> {
    match cmd {
        TimetableCommand::Scrape { html, save } => {
            let page = std::fs::read_to_string(&html)
                .with_context(|| format!("reading {}", html.display()))?;
            let timetable = if save {
                sync_timetable(store, &page)?
            } else {
                scrape_timetable(&page)?
            };
            println!("{}", serde_json::to_string_pretty(&timetable)?);
        }
    }
    Ok(())
}

pub async fn tasks(store: &Store, config: &ScombzConfig, cmd: TasksCommand) -> anyhow::Result<()> {
    match cmd {
        TasksCommand::List { page, all } => {
            let now = Utc::now();
            let mut list = TaskList::load(store, &config.tasks, now)?;
            if all {
                print_rows(&list.all_rows(now));
            } else {
                list.set_page(page);
                print_list(&list, now);
            }
        }
        TasksCommand::Hide { id } => {
            let mut list = TaskList::load(store, &config.tasks, Utc::now())?;
            match list.hide(store, &id)? {
                HideOutcome::Hidden => println!("hidden: {id}"),
                HideOutcome::AlreadyHidden => println!("already hidden: {id}"),
                HideOutcome::NotFound => println!("no such task: {id}"),
            }
        }
        TasksCommand::ToggleMode => {
            let mut list = TaskList::load(store, &config.tasks, Utc::now())?;
            let mode = list.toggle_deadline_mode(store)?;
            println!("deadline mode: {mode}");
        }
        TasksCommand::Add(add) => {
            let draft = OriginalTaskDraft {
                title: add.title,
                course: add.course,
                deadline: add.deadline,
                link: add.link,
            };
            let task = add_original_task(store, draft, config.tasks.offset())?;
            println!("{}", task.id);
        }
        TasksCommand::Watch => watch_tasks(store, config).await?,
    }
    Ok(())
}

async fn watch_tasks(store: &Store, config: &ScombzConfig) -> anyhow::Result<()> {
    let mut list = TaskList::load(store, &config.tasks, Utc::now())?;
    let (now_tx, now_rx) = watch::channel(Utc::now());
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let ticker = tokio::spawn(NowTicker::from_config(&config.tasks).run(now_tx, shutdown_rx));

    let ctrl_c = async {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("received Ctrl+C, stopping watch");
        }
    };
    watch_until(&mut list, now_rx, ctrl_c, print_list).await;

    let _ = shutdown_tx.send(true);
    ticker.await?;
    Ok(())
}

/// Render the list on every published tick until `stop` resolves or the
/// ticker goes away. `stop` is polled across iterations, so a signal that
/// arrives mid-render is not lost.
async fn watch_until<F>(
    list: &mut TaskList,
    mut now_rx: watch::Receiver<DateTime<Utc>>,
    stop: F,
    mut render: impl FnMut(&TaskList, DateTime<Utc>),
) where
    F: Future<Output = ()>,
{
    tokio::pin!(stop);
    loop {
        tokio::select! {
            changed = now_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let now = *now_rx.borrow_and_update();
                list.refresh(now);
                render(&*list, now);
            }
            _ = &mut stop => break,
        }
    }
}

fn print_list(list: &TaskList, now: DateTime<Utc>) {
    if let Some(label) = list.last_update_label() {
        println!("last updated {label}");
    }
    if list.is_empty() {
        println!("{EMPTY_MESSAGE}");
        return;
    }
    print_rows(&list.rows(now));
    if list.needs_pagination() {
        println!(
            "{}  (page {}/{})",
            list.range_label(),
            list.current_page() + 1,
            list.page_count()
        );
    }
}

fn print_rows(rows: &[TaskRow]) {
    if rows.is_empty() {
        println!("{EMPTY_MESSAGE}");
        return;
    }
    for row in rows {
        let marker = match row.urgency {
            Some(u) if u.is_emphasised() => "!",
            _ => " ",
        };
        println!(
            "{marker} {:<16} {:<24} {}  [{}]",
            row.deadline_label, row.course, row.title, row.id
        );
    }
}

struct StdoutSubmitter;

impl LoginSubmitter for StdoutSubmitter {
    fn submit(&mut self, login: &LoginData) {
        println!("submitting login for {}", login.username);
    }
}

pub async fn login(store: &Store, config: &ScombzConfig, cmd: LoginCommand) -> anyhow::Result<()> {
    match cmd {
        LoginCommand::Save { username, password } => {
            let login = save_credentials(store, &username, &password)?;
            println!("saved credentials for {}", login.username);
        }
        LoginCommand::Submit => {
            let Some(login) = stored_credentials(store)? else {
                println!("no saved credentials");
                return Ok(());
            };
            let auto = AutoSubmit::from_config(&config.login);
            let cancel = auto.cancel_token();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    cancel.cancel();
                }
            });
            match auto.run(&login, &mut StdoutSubmitter).await {
                SubmitOutcome::Submitted => {}
                SubmitOutcome::Cancelled => println!("cancelled"),
            }
        }
    }
    Ok(())
}

pub fn store(store: &Store, cmd: StoreCommand) -> anyhow::Result<()> {
    match cmd {
        StoreCommand::Import { json } => {
            let raw = std::fs::read_to_string(&json)
                .with_context(|| format!("reading {}", json.display()))?;
            let blob: serde_json::Value = serde_json::from_str(&raw)?;
            let written = store.import_blob(&blob)?;
            println!("imported {written} fields");
        }
        StoreCommand::Export => {
            println!("{}", serde_json::to_string_pretty(&store.export_blob()?)?);
        }
    }
    Ok(())
}

/// The host end of the channel is this process: queue the message, then
/// print everything that was queued as JSON lines.
pub fn settings(cmd: SettingsCommand) -> anyhow::Result<()> {
    let (host, mut rx) = HostSender::channel(8);
    match cmd {
        SettingsCommand::Open => host.open_settings(),
    }
    drop(host);
    while let Ok(message) = rx.try_recv() {
        println!("{}", serde_json::to_string(&message)?);
    }
    Ok(())
}
