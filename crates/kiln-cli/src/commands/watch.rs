//! Watch mode.
//!
//! Builds once, then every change under a watched source directory spawns a
//! fresh run of each matching category task. Runs are never awaited here and
//! never cancel each other. With `--sync`, changes under the build root are
//! also pushed to browsers through the reload hub.

use std::path::Path;
use std::sync::Arc;

use kiln_config::{PathTable, Project};
use kiln_pipeline::{Pipeline, TaskGraph, TaskName};
use tokio::signal;
use tokio::task::JoinHandle;

use crate::dev::{FileChange, FileWatcher, ReloadHub, ReloadServer, SharedHub, SyncConfig};
use crate::error::{Result, ResultExt};
use crate::ui;

pub async fn execute(project: Project, graph: &TaskGraph, name: &str) -> Result<()> {
    let sync = project.mode.is_sync();
    let build_root = project.build_root().to_path_buf();
    let sync_config = if sync {
        Some(SyncConfig::for_project(&project)?)
    } else {
        None
    };

    let hub: SharedHub = Arc::new(ReloadHub::new(build_root.clone()));
    let mut pipeline = Pipeline::new(project);
    if sync {
        pipeline = pipeline.with_notifier(hub.clone());
    }

    let summary = pipeline.run(graph, name).await?;
    if let Err(e) = super::run::report(&summary) {
        // Keep watching; the next change gets another chance.
        ui::error(&e.to_string());
    }

    let mut roots = pipeline.project().paths.watch_roots();
    if sync {
        tokio::fs::create_dir_all(&build_root)
            .await
            .with_path(&build_root)?;
        roots.push(build_root.clone());
    }
    let (watcher, mut changes) = FileWatcher::new(roots)?;
    for root in watcher.roots() {
        ui::info(&format!("Watching {}", root.display()));
    }

    let mut server: Option<JoinHandle<()>> = match sync_config {
        Some(config) => {
            let server = ReloadServer::new(config, hub.clone());
            Some(tokio::spawn(async move {
                if let Err(e) = server.start().await {
                    ui::error(&e.to_string());
                }
            }))
        }
        None => None,
    };

    ui::info("Press Ctrl+C to stop");

    loop {
        tokio::select! {
            Some(change) = changes.recv() => {
                handle_change(&change, &pipeline, sync.then_some(&hub));
            }
            _ = signal::ctrl_c() => {
                ui::info("Stopping watch");
                break;
            }
            _ = server_exit(&mut server) => {
                ui::warning("Live reload server stopped unexpectedly");
                break;
            }
        }
    }

    Ok(())
}

/// Spawn the tasks a change maps to, or push it to browsers if it is output.
fn handle_change(change: &FileChange, pipeline: &Pipeline, hub: Option<&SharedHub>) {
    let path = change.path();
    let project = pipeline.project();

    if path.starts_with(project.build_root()) {
        if let Some(hub) = hub {
            hub.reload(&[path.to_path_buf()]);
        }
        return;
    }

    let tasks = tasks_for_change(&project.paths, path);
    if tasks.is_empty() {
        tracing::debug!("no task watches {}", path.display());
        return;
    }

    for task in tasks {
        tracing::info!("{} changed, running {task}", relative(project.root(), path));
        let pipeline = pipeline.clone();
        tokio::spawn(async move {
            let outcome = pipeline.run_task(task).await;
            if let Err(e) = &outcome.result {
                ui::error(&format!("{task}: {e}"));
            }
        });
    }
}

/// Category tasks whose watch glob matches `path`.
pub(crate) fn tasks_for_change(paths: &PathTable, path: &Path) -> Vec<TaskName> {
    paths
        .categories_for(path)
        .into_iter()
        .map(TaskName::for_category)
        .collect()
}

/// Resolves when the server task ends; never, without a server.
async fn server_exit(server: &mut Option<JoinHandle<()>>) {
    match server {
        Some(handle) => {
            let _ = handle.await;
        }
        None => std::future::pending().await,
    }
}

fn relative(root: &Path, path: &Path) -> String {
    path.strip_prefix(root).unwrap_or(path).display().to_string()
}
