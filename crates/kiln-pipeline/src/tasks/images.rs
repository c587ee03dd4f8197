use kiln_config::Project;

use crate::error::{IoResultExt, Result};
use crate::fileset;
use crate::graph::TaskName;
use crate::output;
use crate::report::TaskReport;
use crate::transform::{ImageKind, ImageSettings, optimize};

/// Optimize JPEG and PNG files in production; copy everything else.
///
/// An image the codecs cannot read is logged and copied as is.
pub async fn run(project: &Project) -> Result<TaskReport> {
    let spec = &project.paths.images;
    let settings = ImageSettings {
        jpeg_quality: project.images.jpeg_quality,
        png_level: project.images.png_level,
    };
    let mut report = TaskReport::default();

    for file in fileset::discover(project.root(), spec).await? {
        if project.mode.is_dev() || ImageKind::from_path(&file.path) == ImageKind::Other {
            report.wrote(output::copy(&file.path, &spec.dest, &file.relative).await?);
            continue;
        }

        let original = tokio::fs::read(&file.path).await.at(&file.path)?;
        let path = file.path.clone();
        let input = original.clone();
        let optimized =
            tokio::task::spawn_blocking(move || optimize(&path, &input, settings)).await?;

        let bytes = match optimized {
            Ok(bytes) => {
                tracing::debug!(
                    "[img] {}: {} -> {} bytes",
                    file.relative.display(),
                    original.len(),
                    bytes.len()
                );
                bytes
            }
            Err(err) if err.is_recoverable() => {
                report.swallow(TaskName::Img, err);
                original
            }
            Err(err) => return Err(err),
        };
        report.wrote(output::write(&spec.dest, &file.relative, bytes).await?);
    }

    Ok(report)
}
