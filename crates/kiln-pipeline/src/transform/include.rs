//! `@@include('partial.html', {"title": "Home"})` resolution.
//!
//! Paths are relative to the file containing the directive. Included files
//! may include others; the optional JSON object supplies `@@name` variables
//! (dotted names reach into nested objects) to the included file only.
//! Unknown variables are left in place.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde_json::{Map, Value};

use crate::error::{Result, TaskError};

static INCLUDE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)@@include\(\s*['"]([^'"]+)['"]\s*(?:,\s*(\{[^)]*\}))?\s*\)"#)
        .expect("include pattern is valid")
});

static VARIABLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@@([A-Za-z_]\w*(?:\.\w+)*)").expect("variable pattern is valid"));

/// Read `path` and inline every include, recursively.
pub fn resolve_file(path: &Path) -> Result<String> {
    let source = std::fs::read_to_string(path).map_err(|e| TaskError::io(path, e))?;
    let mut stack = vec![canonical(path)];
    expand(path, &source, &mut stack)
}

fn expand(path: &Path, source: &str, stack: &mut Vec<PathBuf>) -> Result<String> {
    let dir = path.parent().unwrap_or(Path::new(""));
    let mut out = String::with_capacity(source.len());
    let mut last = 0;

    for caps in INCLUDE_RE.captures_iter(source) {
        let whole = caps.get(0).map_or(0..0, |m| m.range());
        out.push_str(&source[last..whole.start]);
        last = whole.end;

        let target = dir.join(&caps[1]);
        let context = match caps.get(2) {
            Some(raw) => parse_context(path, raw.as_str())?,
            None => Map::new(),
        };

        let key = canonical(&target);
        if stack.contains(&key) {
            return Err(TaskError::Include {
                file: path.to_path_buf(),
                message: format!("include cycle through {}", target.display()),
            });
        }

        let partial = std::fs::read_to_string(&target).map_err(|e| TaskError::Include {
            file: path.to_path_buf(),
            message: format!("cannot read {}: {e}", target.display()),
        })?;
        let partial = substitute(&partial, &context);

        stack.push(key);
        let expanded = expand(&target, &partial, stack)?;
        stack.pop();

        out.push_str(&expanded);
    }

    out.push_str(&source[last..]);
    Ok(out)
}

fn parse_context(path: &Path, raw: &str) -> Result<Map<String, Value>> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(TaskError::Include {
            file: path.to_path_buf(),
            message: "include context must be a JSON object".to_string(),
        }),
        Err(e) => Err(TaskError::Include {
            file: path.to_path_buf(),
            message: format!("invalid include context {raw}: {e}"),
        }),
    }
}

fn substitute(text: &str, context: &Map<String, Value>) -> String {
    if context.is_empty() {
        return text.to_string();
    }
    VARIABLE_RE
        .replace_all(text, |caps: &Captures<'_>| {
            let name = &caps[1];
            if name == "include" {
                return caps[0].to_string();
            }
            match lookup(context, name) {
                Some(Value::String(s)) => s.clone(),
                Some(Value::Null) => String::new(),
                Some(other) => other.to_string(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

fn lookup<'a>(context: &'a Map<String, Value>, name: &str) -> Option<&'a Value> {
    let mut parts = name.split('.');
    let mut current = context.get(parts.next()?)?;
    for part in parts {
        current = current.get(part)?;
    }
    Some(current)
}

fn canonical(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, contents: &str) -> PathBuf {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn inlines_partials_relative_to_including_file() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "partials/header.html", "<header>@@include('nav.html')</header>");
        write(temp.path(), "partials/nav.html", "<nav>menu</nav>");
        let page = write(
            temp.path(),
            "index.html",
            "<body>@@include('partials/header.html')<main></main></body>",
        );

        let html = resolve_file(&page).unwrap();
        assert_eq!(
            html,
            "<body><header><nav>menu</nav></header><main></main></body>"
        );
    }

    #[test]
    fn substitutes_context_variables() {
        let temp = TempDir::new().unwrap();
        write(
            temp.path(),
            "head.html",
            "<title>@@title | @@site.name</title><meta content=\"@@missing\">",
        );
        let page = write(
            temp.path(),
            "index.html",
            r#"@@include("head.html", {"title": "Home", "site": {"name": "Kiln"}})"#,
        );

        let html = resolve_file(&page).unwrap();
        assert_eq!(
            html,
            "<title>Home | Kiln</title><meta content=\"@@missing\">"
        );
    }

    #[test]
    fn top_level_variables_are_untouched() {
        let temp = TempDir::new().unwrap();
        let page = write(temp.path(), "index.html", "<p>@@title</p>");
        assert_eq!(resolve_file(&page).unwrap(), "<p>@@title</p>");
    }

    #[test]
    fn missing_partial_is_an_include_error() {
        let temp = TempDir::new().unwrap();
        let page = write(temp.path(), "index.html", "@@include('nope.html')");
        let err = resolve_file(&page).unwrap_err();
        assert!(matches!(err, TaskError::Include { .. }));
        assert!(err.is_recoverable());
    }

    #[test]
    fn detects_cycles() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "a.html", "@@include('b.html')");
        write(temp.path(), "b.html", "@@include('a.html')");
        let page = write(temp.path(), "index.html", "@@include('a.html')");

        let err = resolve_file(&page).unwrap_err();
        assert!(err.to_string().contains("cycle"));
    }

    #[test]
    fn rejects_malformed_context() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "p.html", "x");
        let page = write(temp.path(), "index.html", "@@include('p.html', {title: Home})");
        assert!(matches!(
            resolve_file(&page).unwrap_err(),
            TaskError::Include { .. }
        ));
    }

    #[test]
    fn same_partial_twice_is_not_a_cycle() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "hr.html", "<hr>");
        let page = write(temp.path(), "index.html", "@@include('hr.html')@@include('hr.html')");
        assert_eq!(resolve_file(&page).unwrap(), "<hr><hr>");
    }
}
