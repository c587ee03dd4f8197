use clap::{Args, Subcommand};

/// Available tasks
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Empty the build directory
    Clean(TaskArgs),

    /// Inline @@include partials and minify HTML pages
    Html(TaskArgs),

    /// Compile SCSS, group media queries, add vendor prefixes
    ///
    /// Production output is minified; --dev keeps it readable and writes a
    /// source map next to each stylesheet.
    Styles(TaskArgs),

    /// Copy fonts into the build directory
    Fonts(TaskArgs),

    /// Optimize images (JPEG and PNG in production, copied with --dev)
    Img(TaskArgs),

    /// Concatenate the configured scripts in order and minify the bundle
    Js(TaskArgs),

    /// Clean, then run every asset task concurrently
    Build(TaskArgs),

    /// Build once, then rebuild whatever changes
    ///
    /// With --sync, also serves the build directory and reloads connected
    /// browsers whenever output changes.
    Watch(TaskArgs),
}

impl Command {
    /// Name of the task graph record this command runs.
    pub fn task_name(&self) -> &'static str {
        match self {
            Command::Clean(_) => "clean",
            Command::Html(_) => "html",
            Command::Styles(_) => "styles",
            Command::Fonts(_) => "fonts",
            Command::Img(_) => "img",
            Command::Js(_) => "js",
            Command::Build(_) => "build",
            Command::Watch(_) => "watch",
        }
    }

    pub fn args(&self) -> &TaskArgs {
        match self {
            Command::Clean(args)
            | Command::Html(args)
            | Command::Styles(args)
            | Command::Fonts(args)
            | Command::Img(args)
            | Command::Js(args)
            | Command::Build(args)
            | Command::Watch(args) => args,
        }
    }
}

/// Arguments shared by every task.
///
/// Unrecognized trailing arguments are accepted and ignored, apart from a
/// literal `--dev` or `--sync` among them.
#[derive(Args, Debug, Clone, Default)]
pub struct TaskArgs {
    #[arg(
        hide = true,
        num_args = 0..,
        trailing_var_arg = true,
        allow_hyphen_values = true,
        value_name = "ARGS"
    )]
    pub extra: Vec<String>,
}
