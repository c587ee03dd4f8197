use std::path::{Path, PathBuf};

use kiln_config::Project;

use crate::error::Result;
use crate::fileset::{self, SourceFile};
use crate::graph::TaskName;
use crate::output;
use crate::report::TaskReport;
use crate::transform::{CompiledStyle, CssOptions, compile_scss, process_css};

/// Compile every non-partial stylesheet.
///
/// Development builds stay readable and get a `.css.map` next to each
/// output; production builds are minified. A stylesheet that fails to
/// compile is logged and produces no output.
pub async fn run(project: &Project) -> Result<TaskReport> {
    let spec = &project.paths.styles;
    let mode = project.mode;
    let options = CssOptions::new(&project.styles.browsers, mode.is_prod(), mode.is_dev())?;
    let source_root = project.root().join(spec.source_base());
    let mut report = TaskReport::default();

    for file in fileset::discover(project.root(), spec).await? {
        if is_partial(&file) {
            continue;
        }

        let load_paths = load_paths(&file, &source_root);
        let path = file.path.clone();
        let opts = options.clone();
        let compiled = tokio::task::spawn_blocking(move || -> Result<CompiledStyle> {
            let css = compile_scss(&path, &load_paths)?;
            process_css(&path, &css, &opts)
        })
        .await?;

        let style = match compiled {
            Ok(style) => style,
            Err(err) if err.is_recoverable() => {
                report.swallow(TaskName::Styles, err);
                continue;
            }
            Err(err) => return Err(err),
        };

        let relative = output::with_extension(&file.relative, "css");
        let css = match &style.map {
            Some(_) => format!("{}\n/*# sourceMappingURL={} */\n", style.css, map_name(&relative)),
            None => style.css,
        };
        report.wrote(output::write(&spec.dest, &relative, css).await?);

        if let Some(map) = style.map {
            let map_path = relative.with_file_name(map_name(&relative));
            report.wrote(output::write(&spec.dest, &map_path, map).await?);
        }
    }

    Ok(report)
}

fn is_partial(file: &SourceFile) -> bool {
    file.path
        .file_name()
        .is_some_and(|name| name.to_string_lossy().starts_with('_'))
}

fn load_paths(file: &SourceFile, source_root: &Path) -> Vec<PathBuf> {
    let mut paths = Vec::with_capacity(2);
    if let Some(dir) = file.path.parent() {
        paths.push(dir.to_path_buf());
    }
    if paths.first().is_none_or(|dir| dir != source_root) {
        paths.push(source_root.to_path_buf());
    }
    paths
}

fn map_name(css: &Path) -> String {
    let name = css
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    format!("{name}.map")
}
