//! hubview CLI - prints hub collections as tables.
//!
//! # Architecture
//!
//! The CLI wires [`hubview_config`] (settings), [`hubview_client`] (HTTP), and
//! [`hubview_engine`] (list state and polling) together:
//!
//! ```text
//! main() -> HubConfig::resolve() -> HubClient -> view.load() -> render
//!                                                   |
//!                                        --watch: ListSession + snapshots
//! ```
//!
//! `--watch` on registries keeps the session alive and reprints whenever a
//! silent poll lands, until no sync is pending or Ctrl-C.

mod args;
mod render;

use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Result, bail};
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use hubview_client::HubClient;
use hubview_config::HubConfig;
use hubview_engine::lists::{
    NAMESPACE_LIST, NamespaceListView, REGISTRY_LIST, RegistryList, USER_LIST, UserListView,
};
use hubview_engine::{
    FetchMode, ListSession, MemoryLocation, RegistryListView, RolePicker, SessionHandle,
    UserDetailState, UserDetailView, ViewError,
};
use hubview_types::{
    AlertList, CapabilitySet, ClientSettings, ListSettings, ParamPatch, ParamState,
    RegistryRemote, Viewer,
};

use crate::args::{Cli, Command};

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let (log_file, init_warnings) = open_log_file();

    if let Some((log_path, file)) = log_file {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .with(env_filter)
            .init();

        tracing::info!(path = %log_path.display(), "Logging initialized");
        for warning in init_warnings {
            tracing::warn!("{warning}");
        }
        return;
    }

    // Tables go to stdout; without a log file, stay quiet rather than mix in.
    tracing_subscriber::registry().with(env_filter).init();
}

fn open_log_file() -> (Option<(PathBuf, std::fs::File)>, Vec<String>) {
    let mut warnings = Vec::new();

    for candidate in log_file_candidates() {
        if let Some(parent) = candidate.parent()
            && let Err(e) = fs::create_dir_all(parent)
        {
            warnings.push(format!(
                "Failed to create log dir {}: {e}",
                parent.display()
            ));
            continue;
        }

        match OpenOptions::new()
            .create(true)
            .append(true)
            .open(&candidate)
        {
            Ok(file) => return (Some((candidate, file)), warnings),
            Err(e) => {
                warnings.push(format!(
                    "Failed to open log file {}: {e}",
                    candidate.display()
                ));
            }
        }
    }

    (None, warnings)
}

fn log_file_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    // Primary: next to the config file (~/.hubview/logs/hubview.log)
    if let Some(config_path) = hubview_config::config_path()
        && let Some(config_dir) = config_path.parent()
    {
        candidates.push(config_dir.join("logs").join("hubview.log"));
    }

    candidates.push(PathBuf::from(".hubview").join("logs").join("hubview.log"));

    candidates
}

/// The CLI acts with whatever the token allows; the server has the final say.
fn viewer_for(settings: &ClientSettings) -> Viewer {
    if settings.token().is_some() {
        Viewer::user("api-token", CapabilitySet::all())
    } else {
        Viewer::anonymous()
    }
}

fn patch_from_query(query: &str, recognized: &[&str]) -> ParamPatch {
    ParamState::parse(query, recognized)
        .iter()
        .fold(ParamPatch::new(), |patch, (key, value)| {
            patch.set(key, value.clone())
        })
}

async fn list_registries(
    client: &HubClient,
    viewer: Viewer,
    settings: &ListSettings,
    query: String,
) -> Result<()> {
    let mut view = RegistryListView::open(
        client,
        MemoryLocation::new(query),
        viewer,
        settings,
        AlertList::new(),
    )?;
    view.load().await?;
    println!("{}", render::registry_snapshot(&view.list().snapshot()));
    Ok(())
}

async fn print_until_settled(handle: &SessionHandle<RegistryRemote>) {
    let mut snapshots = handle.watch();
    let mut printed: Option<Vec<RegistryRemote>> = None;

    while snapshots.changed().await.is_ok() {
        let snapshot = snapshots.borrow_and_update().clone();
        if snapshot.loading || snapshot.closed {
            continue;
        }
        if printed.as_ref() != Some(&snapshot.items) || snapshot.last_error.is_some() {
            println!("{}\n", render::registry_snapshot(&snapshot));
            printed = Some(snapshot.items);
        }
        if !snapshot.polling {
            break;
        }
    }
}

async fn watch_registries(
    client: &HubClient,
    viewer: &Viewer,
    settings: &ListSettings,
    query: String,
) -> Result<()> {
    if viewer.is_anonymous() {
        return Err(ViewError::Unauthorized.into());
    }
    let view = RegistryList::new(
        client.registries(),
        MemoryLocation::new(query),
        &REGISTRY_LIST,
        settings,
    );
    let (session, handle) = ListSession::new(view);

    let control = async {
        tokio::select! {
            () = print_until_settled(&handle) => {}
            result = tokio::signal::ctrl_c() => {
                if let Err(err) = result {
                    tracing::warn!("Failed to listen for Ctrl-C: {err}");
                }
            }
        }
        handle.close();
    };

    let (_view, ()) = tokio::join!(session.run(), control);
    Ok(())
}

async fn list_users(client: &HubClient, settings: &ListSettings, query: String) -> Result<()> {
    let mut view = UserListView::new(client.users(), MemoryLocation::new(query), &USER_LIST, settings);
    view.refresh(FetchMode::Loud).await?;
    match render::empty_message(view.empty_state(), "No users yet.") {
        Some(message) => println!("{message}"),
        None => print!("{}", render::user_table(view.items()).render()),
    }
    println!(
        "{}",
        render::page_footer(view.params().page(), view.params().page_size(), view.page().total_count)
    );
    Ok(())
}

async fn list_namespaces(client: &HubClient, settings: &ListSettings, query: String) -> Result<()> {
    let mut view = NamespaceListView::new(
        client.namespaces(),
        MemoryLocation::new(query),
        &NAMESPACE_LIST,
        settings,
    );
    view.refresh(FetchMode::Loud).await?;
    match render::empty_message(view.empty_state(), "No namespaces yet.") {
        Some(message) => println!("{message}"),
        None => print!("{}", render::namespace_table(view.items()).render()),
    }
    println!(
        "{}",
        render::page_footer(view.params().page(), view.params().page_size(), view.page().total_count)
    );
    Ok(())
}

async fn list_roles(client: &HubClient, settings: &ListSettings, query: &str) -> Result<()> {
    let mut picker = RolePicker::new(client, Vec::<String>::new(), Vec::new(), settings);
    let patch = patch_from_query(query, hubview_engine::lists::ROLE_LIST.recognized);
    if patch.is_empty() {
        picker.load().await?;
    } else {
        picker.set_params(&patch).await?;
    }

    match render::empty_message(picker.empty_state(), "No assignable roles.") {
        Some(message) => println!("{message}"),
        None => {
            let rows = picker.rows();
            let table = render::role_table(rows.iter().map(|r| (r.role, r.selected, r.disabled)));
            print!("{}", table.render());
        }
    }
    let list = picker.list();
    println!(
        "{}",
        render::page_footer(list.params().page(), list.params().page_size(), list.page().total_count)
    );
    Ok(())
}

async fn show_user(client: &HubClient, viewer: Viewer, id: &str) -> Result<()> {
    let view = UserDetailView::open(client, viewer, id, AlertList::new()).await;
    match view.state() {
        UserDetailState::Unauthorized => Err(ViewError::Unauthorized.into()),
        UserDetailState::Redirect(route) => bail!("user {id} not found ({})", route.path()),
        UserDetailState::Loaded(user) => {
            println!("Username:   {}", user.username);
            println!("First name: {}", user.first_name);
            println!("Last name:  {}", user.last_name);
            println!("Email:      {}", user.email);
            let groups: Vec<&str> = user.groups.iter().map(|g| g.name.as_str()).collect();
            println!("Groups:     {}", groups.join(", "));
            if user.is_superuser {
                println!("Superuser:  yes");
            }
            Ok(())
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_tracing();

    let args = Cli::parse();

    let config = HubConfig::load()?.unwrap_or_default();
    let (client_settings, list_settings) = config.resolve(args.url.as_deref())?;
    let client = HubClient::new(&client_settings)?;
    let viewer = viewer_for(&client_settings);
    tracing::info!(base_url = %client.base_url(), command = ?args.command, "starting");

    match args.command {
        Command::Registries { query, watch: false } => {
            list_registries(&client, viewer, &list_settings, query).await
        }
        Command::Registries { query, watch: true } => {
            watch_registries(&client, &viewer, &list_settings, query).await
        }
        Command::Users { query } => list_users(&client, &list_settings, query).await,
        Command::Roles { query } => list_roles(&client, &list_settings, &query).await,
        Command::Namespaces { query } => list_namespaces(&client, &list_settings, query).await,
        Command::User { id } => show_user(&client, viewer, &id).await,
    }
}
