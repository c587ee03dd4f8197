//! SCSS compilation and CSS post-processing.
//!
//! [`compile_scss`] hands the file to grass. [`process_css`] then runs the
//! lightningcss stages in a fixed order: parse, group media queries, prefix
//! for the configured browsers, print (minified in production, with a source
//! map in development).

use std::path::{Path, PathBuf};

use lightningcss::{
    printer::PrinterOptions,
    rules::{CssRule, media::MediaRule},
    stylesheet::{MinifyOptions, ParserOptions, StyleSheet},
    targets::{Browsers, Targets},
    traits::ToCss,
};
use parcel_sourcemap::SourceMap;

use crate::error::{Result, TaskError};

/// Output of the CSS stages for one stylesheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledStyle {
    pub css: String,
    /// Source map JSON, development only
    pub map: Option<String>,
}

/// Settings shared by every stylesheet in one task run.
#[derive(Debug, Clone)]
pub struct CssOptions {
    pub targets: Targets,
    pub minify: bool,
    pub source_map: bool,
}

impl CssOptions {
    /// Resolve browserslist queries into lightningcss targets.
    pub fn new(browsers: &[String], minify: bool, source_map: bool) -> Result<Self> {
        let browsers = Browsers::from_browserslist(browsers.iter().map(String::as_str))
            .map_err(|e| TaskError::Compile {
                file: PathBuf::from("styles.browsers"),
                message: e.to_string(),
            })?;
        Ok(Self {
            targets: Targets {
                browsers,
                ..Targets::default()
            },
            minify,
            source_map,
        })
    }
}

/// Compile one SCSS entry file to expanded CSS.
pub fn compile_scss(file: &Path, load_paths: &[PathBuf]) -> Result<String> {
    let options = load_paths
        .iter()
        .fold(grass::Options::default(), |options, dir| options.load_path(dir))
        .style(grass::OutputStyle::Expanded);

    grass::from_path(file, &options).map_err(|e| TaskError::Compile {
        file: file.to_path_buf(),
        message: e.to_string(),
    })
}

/// Group media queries, prefix, optionally minify and map a compiled sheet.
///
/// `file` names the original source in diagnostics and in the source map.
///
/// Prefixing only happens inside lightningcss's `minify` pass, so development
/// output is restructured too: longhands fold into shorthands and rules with
/// identical declarations merge. Only the printing stays readable. The source
/// map therefore maps the printed sheet onto the grass output (embedded as
/// `sourcesContent` under the `.scss` name), with few mappings where rules
/// were merged, and not onto the original SCSS lines.
pub fn process_css(file: &Path, css: &str, options: &CssOptions) -> Result<CompiledStyle> {
    let compile_err = |message: String| TaskError::Compile {
        file: file.to_path_buf(),
        message,
    };
    let filename = file.to_string_lossy().to_string();

    let mut stylesheet = StyleSheet::parse(
        css,
        ParserOptions {
            filename: filename.clone(),
            ..Default::default()
        },
    )
    .map_err(|e| compile_err(e.to_string()))?;

    group_media_queries(&mut stylesheet.rules.0);

    stylesheet
        .minify(MinifyOptions {
            targets: options.targets,
            ..Default::default()
        })
        .map_err(|e| compile_err(e.to_string()))?;

    let mut source_map = if options.source_map {
        let mut map = SourceMap::new("/");
        let name = file
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or(filename);
        let index = map.add_source(&name);
        map.set_source_content(index as usize, css)
            .map_err(|e| compile_err(e.to_string()))?;
        Some(map)
    } else {
        None
    };

    let printed = stylesheet
        .to_css(PrinterOptions {
            minify: options.minify,
            targets: options.targets,
            source_map: source_map.as_mut(),
            ..Default::default()
        })
        .map_err(|e| compile_err(e.to_string()))?;

    let map = match source_map.as_mut() {
        Some(map) => Some(source_map_json(map).map_err(compile_err)?),
        None => None,
    };

    Ok(CompiledStyle {
        css: printed.code,
        map,
    })
}

/// Merge top-level `@media` blocks with identical queries and move them to
/// the end of the sheet, in order of first appearance.
fn group_media_queries(rules: &mut Vec<CssRule<'_>>) {
    let mut kept = Vec::with_capacity(rules.len());
    let mut groups: Vec<(String, MediaRule<'_>)> = Vec::new();

    for rule in rules.drain(..) {
        let CssRule::Media(media) = rule else {
            kept.push(rule);
            continue;
        };
        let Ok(key) = media.query.to_css_string(PrinterOptions::default()) else {
            kept.push(CssRule::Media(media));
            continue;
        };
        match groups.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, group)) => group.rules.0.extend(media.rules.0),
            None => groups.push((key, media)),
        }
    }

    kept.extend(groups.into_iter().map(|(_, media)| CssRule::Media(media)));
    *rules = kept;
}

fn source_map_json(map: &mut SourceMap) -> std::result::Result<String, String> {
    let mut mappings = Vec::new();
    map.write_vlq(&mut mappings).map_err(|e| e.to_string())?;
    let json = serde_json::json!({
        "version": 3,
        "sources": map.get_sources(),
        "sourcesContent": map.get_sources_content(),
        "names": map.get_names(),
        "mappings": String::from_utf8_lossy(&mappings),
    });
    Ok(json.to_string())
}
