//! Shared fixture builders for pipeline integration tests.
#![allow(dead_code)]

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use kiln_config::{KilnConfig, ModeFlags, Project};
use kiln_pipeline::Pipeline;
use tempfile::TempDir;

pub fn write(root: &Path, rel: &str, contents: impl AsRef<[u8]>) -> PathBuf {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, contents).unwrap();
    path
}

pub fn png_bytes() -> Vec<u8> {
    let img = image::RgbImage::from_fn(16, 16, |x, y| image::Rgb([x as u8 * 16, y as u8 * 16, 0]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}

/// A small site: one stylesheet plus a partial, one page with a partial,
/// one font, one image and the three default scripts.
pub fn site() -> TempDir {
    let temp = TempDir::new().unwrap();
    let root = temp.path();

    write(root, "src/scss/_vars.scss", "$accent: #336699;\n");
    write(
        root,
        "src/scss/main.scss",
        "@use 'vars';\n\
         .nav { color: vars.$accent; }\n\
         @media (max-width: 600px) { .nav { display: none; } }\n\
         .footer { margin: 0 auto; }\n\
         @media (max-width: 600px) { .footer { padding: 0; } }\n",
    );

    write(root, "src/partials/header.html", "<header>@@title</header>");
    write(
        root,
        "src/index.html",
        "<!doctype html>\n<html>\n<head><title>Site</title></head>\n<body>\n  <!-- header -->\n  @@include('partials/header.html', {\"title\": \"Welcome\"})\n  <main>\n    <p>Hello</p>\n  </main>\n</body>\n</html>\n",
    );

    write(root, "src/fonts/inter.woff", b"wOFF\0\x01\0\0fontdata");
    write(root, "src/images/logo.png", png_bytes());

    write(root, "src/javascript/index.js", "var order = [];\norder.push('index');\n");
    write(root, "src/javascript/burger.js", "order.push('burger');\n");
    write(root, "src/javascript/animation.js", "order.push('animation');\n");

    temp
}

pub fn pipeline(root: &Path, mode: ModeFlags) -> Pipeline {
    Pipeline::new(Project::resolve(root, KilnConfig::default(), mode).unwrap())
}

/// Every file under `dir`, relative and sorted.
pub fn tree(dir: &Path) -> Vec<String> {
    let mut files: Vec<String> = walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            e.path()
                .strip_prefix(dir)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect();
    files.sort();
    files
}
