use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Args, Debug, Clone, Default)]
pub struct ProjectConfigOpts {
    #[arg(
        help = "Directory to pack (default: current dir).",
        value_name = "PATH"
    )]
    pub project_root: Option<PathBuf>,

    #[arg(
        short = 'c',
        long,
        help = "Path or name of the TOML config file (default: <PATH>/xpack.toml, then the global config).",
        value_name = "CONFIG",
        conflicts_with = "no_config",
        help_heading = "Project Setup"
    )]
    pub config: Option<String>,

    #[arg(
        long,
        help = "Disable loading any TOML config file.",
        conflicts_with = "config",
        help_heading = "Project Setup"
    )]
    pub no_config: bool,

    #[arg(
        long,
        help = "Specify the project name (overrides config/dir name).",
        value_name = "NAME",
        help_heading = "Project Setup"
    )]
    pub project_name: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct FilterOpts {
    #[arg(
        short = 'i',
        long,
        value_delimiter = ',',
        value_name = "GLOB",
        help = "Only pack files matching these patterns (comma separated or repeated).",
        help_heading = "Filtering"
    )]
    pub include: Vec<String>,

    #[arg(
        short = 'e',
        long,
        value_delimiter = ',',
        value_name = "GLOB",
        help = "Skip files matching these patterns (added to the configured excludes).",
        help_heading = "Filtering"
    )]
    pub exclude: Vec<String>,

    #[arg(long, help = "Ignore .gitignore and .ignore files.", help_heading = "Filtering")]
    pub no_gitignore: bool,

    #[arg(
        long,
        help = "Do not apply the built-in ignore patterns (lock files, build output, binaries).",
        help_heading = "Filtering"
    )]
    pub no_default_patterns: bool,
}

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Pack a repository into a single AI-friendly document.",
    long_about = "xpack walks a project directory, filters and orders its files, screens them \nfor secrets and renders everything (directory tree plus file contents) into one \nplain text, markdown or XML document.",
    help_template = "{about-section}\nUsage: {usage}\n\n{all-args}{after-help}",
    after_help = "EXAMPLES:\n  xpack pack --style markdown\n  xpack pack ../service -o service.xml --style xml\n  xpack tree --include 'src/**'\n  xpack init",
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[arg(short, long, action = clap::ArgAction::Count, global = true, help = "Increase message verbosity (-v, -vv, -vvv).")]
    pub verbose: u8,

    #[arg(
        short,
        long,
        global = true,
        help = "Silence informational messages and warnings."
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    #[command(visible_alias = "p", about = "Pack the project into a single document.")]
    Pack(PackArgs),

    #[command(visible_alias = "t", about = "Print the directory tree of the files that would be packed.")]
    Tree(TreeArgs),

    #[command(
        visible_alias = "d",
        about = "Show effective configuration and planned file inclusions."
    )]
    Debug(DebugArgs),

    #[command(about = "Write a default configuration file.")]
    Init(InitArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct PackArgs {
    #[clap(flatten)]
    pub project_config: ProjectConfigOpts,
    #[clap(flatten)]
    pub filters: FilterOpts,

    #[arg(
        short = 's',
        long,
        value_name = "STYLE",
        value_parser = ["plain", "markdown", "xml"],
        help = "Document style.",
        help_heading = "Output Control"
    )]
    pub style: Option<String>,

    #[arg(
        short = 'o',
        long,
        value_name = "FILE",
        help = "Output file (default: xpack-output.<ext> in the project root).",
        conflicts_with = "stdout",
        help_heading = "Output Control"
    )]
    pub output: Option<PathBuf>,

    #[arg(
        long,
        help = "Write the document to standard output instead of a file.",
        conflicts_with = "output",
        help_heading = "Output Control"
    )]
    pub stdout: bool,

    #[arg(long, help = "Text placed in the document header.", value_name = "TEXT", help_heading = "Output Control")]
    pub header: Option<String>,

    #[arg(
        long,
        value_name = "FILE",
        help = "File whose contents are appended as instructions.",
        help_heading = "Output Control"
    )]
    pub instruction_file: Option<PathBuf>,

    #[arg(
        long,
        value_name = "N",
        help = "Only include the contents of the first N files (0 = all).",
        help_heading = "Output Control"
    )]
    pub top_files_len: Option<usize>,

    #[arg(long, help = "Omit the directory structure section.", help_heading = "Output Control")]
    pub no_tree: bool,

    #[arg(long, help = "Omit the file summary section.", help_heading = "Output Control")]
    pub no_summary: bool,

    #[arg(long, help = "Strip comments from supported languages.", help_heading = "Content")]
    pub remove_comments: bool,

    #[arg(long, help = "Drop blank lines from every file.", help_heading = "Content")]
    pub remove_empty_lines: bool,

    #[arg(long, help = "Prefix each line with its line number.", help_heading = "Content")]
    pub line_numbers: bool,

    #[arg(long, help = "Skip the secret scan.", help_heading = "Security")]
    pub no_security_check: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct TreeArgs {
    #[clap(flatten)]
    pub project_config: ProjectConfigOpts,
    #[clap(flatten)]
    pub filters: FilterOpts,
}

#[derive(Args, Debug, Clone, Default)]
pub struct DebugArgs {
    #[clap(flatten)]
    pub project_config: ProjectConfigOpts,
    #[clap(flatten)]
    pub filters: FilterOpts,
}

#[derive(Args, Debug, Clone, Default)]
pub struct InitArgs {
    #[arg(help = "Directory to write xpack.toml into (default: current dir).", value_name = "PATH")]
    pub project_root: Option<PathBuf>,

    #[arg(long, help = "Write the global config file instead of a project one.")]
    pub global: bool,

    #[arg(short, long, help = "Overwrite an existing config file.")]
    pub force: bool,
}
