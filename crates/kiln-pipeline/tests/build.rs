mod common;

use kiln_config::ModeFlags;
use kiln_pipeline::{TaskGraph, TaskName};

use common::{pipeline, site, tree, write};

#[tokio::test]
async fn build_produces_one_file_per_category() {
    let temp = site();
    let summary = pipeline(temp.path(), ModeFlags::default())
        .run(&TaskGraph::standard(), "build")
        .await
        .unwrap();

    assert!(summary.is_success(), "{:?}", summary.outcomes);
    assert_eq!(summary.swallowed_count(), 0);
    assert_eq!(
        tree(&temp.path().join("build")),
        vec![
            "fonts/inter.woff",
            "images/logo.png",
            "index.html",
            "scripts/index.js",
            "styles/main.css",
        ]
    );
}

#[tokio::test]
async fn build_removes_stale_output_first() {
    let temp = site();
    write(temp.path(), "build/styles/old.css", ".old{}");
    write(temp.path(), "build/leftover/page.html", "<p>");

    pipeline(temp.path(), ModeFlags::default())
        .run(&TaskGraph::standard(), "build")
        .await
        .unwrap();

    let files = tree(&temp.path().join("build"));
    assert!(!files.iter().any(|f| f.contains("old.css")));
    assert!(!files.iter().any(|f| f.starts_with("leftover")));
    assert!(temp.path().join("build/styles/main.css").is_file());
}

#[tokio::test]
async fn html_includes_are_inlined_and_minified() {
    let temp = site();
    let outcome = pipeline(temp.path(), ModeFlags::default())
        .run_task(TaskName::Html)
        .await;
    assert!(outcome.is_ok());

    let html = std::fs::read_to_string(temp.path().join("build/index.html")).unwrap();
    assert!(html.contains("<header>Welcome</header>"));
    assert!(!html.contains("@@include"));
    assert!(!html.contains("<!-- header -->"));
    assert!(!html.contains("\n  "));
}

#[tokio::test]
async fn broken_page_is_skipped_and_others_written() {
    let temp = site();
    write(temp.path(), "src/about.html", "@@include('partials/missing.html')");

    let outcome = pipeline(temp.path(), ModeFlags::default())
        .run_task(TaskName::Html)
        .await;

    let report = outcome.result.unwrap();
    assert_eq!(report.swallowed.len(), 1);
    assert!(temp.path().join("build/index.html").is_file());
    assert!(!temp.path().join("build/about.html").exists());
}

#[tokio::test]
async fn fonts_are_copied_verbatim() {
    let temp = site();
    pipeline(temp.path(), ModeFlags::default())
        .run_task(TaskName::Fonts)
        .await
        .result
        .unwrap();

    assert_eq!(
        std::fs::read(temp.path().join("build/fonts/inter.woff")).unwrap(),
        std::fs::read(temp.path().join("src/fonts/inter.woff")).unwrap()
    );
}

#[tokio::test]
async fn dev_images_are_copied_unchanged() {
    let temp = site();
    pipeline(temp.path(), ModeFlags::new(true, false))
        .run_task(TaskName::Img)
        .await
        .result
        .unwrap();

    assert_eq!(
        std::fs::read(temp.path().join("build/images/logo.png")).unwrap(),
        std::fs::read(temp.path().join("src/images/logo.png")).unwrap()
    );
}

#[tokio::test]
async fn undecodable_image_is_copied_verbatim_in_production() {
    let temp = site();
    write(temp.path(), "src/images/nested/broken.jpg", b"not really a jpeg");

    let report = pipeline(temp.path(), ModeFlags::default())
        .run_task(TaskName::Img)
        .await
        .result
        .unwrap();

    assert_eq!(report.swallowed.len(), 1);
    assert_eq!(
        std::fs::read(temp.path().join("build/images/nested/broken.jpg")).unwrap(),
        b"not really a jpeg"
    );
    let optimized = std::fs::read(temp.path().join("build/images/logo.png")).unwrap();
    assert!(image::load_from_memory(&optimized).is_ok());
}

#[tokio::test]
async fn clean_is_idempotent() {
    let temp = site();
    let pipeline = pipeline(temp.path(), ModeFlags::default());
    let graph = TaskGraph::standard();

    assert!(pipeline.run(&graph, "clean").await.unwrap().is_success());
    pipeline.run(&graph, "build").await.unwrap();
    assert!(pipeline.run(&graph, "clean").await.unwrap().is_success());
    assert!(pipeline.run(&graph, "clean").await.unwrap().is_success());

    let build = temp.path().join("build");
    assert!(build.is_dir());
    assert!(tree(&build).is_empty());
}
