use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

use crate::core::filter::FilterOptions;
use crate::core::render::Terminator;

/// Flags spelled with a single dash in find(1) style.
const FIND_STYLE_FLAGS: &[&str] = &[
    "name", "iname", "type", "maxdepth", "mindepth", "size", "empty", "print0",
];

/// Long flags whose next argument is a value, even when it starts with `-`.
const VALUE_FLAGS: &[&str] = &[
    "--name",
    "--iname",
    "--type",
    "--maxdepth",
    "--mindepth",
    "--size",
    "--exclude",
    "--exclude-dir",
];

#[derive(Parser, Debug)]
#[command(name = "findlike")]
#[command(about = "Search directory trees for entries matching find-style filters", long_about = None)]
pub struct Cli {
    /// Root paths to search (defaults to the current directory)
    pub paths: Vec<PathBuf>,

    /// Glob pattern matched against base names
    #[arg(long, value_name = "PATTERN", conflicts_with = "iname", allow_hyphen_values = true)]
    pub name: Option<String>,

    /// Case-insensitive glob pattern matched against base names
    #[arg(long, value_name = "PATTERN", allow_hyphen_values = true)]
    pub iname: Option<String>,

    /// Entry type: f=file, d=directory, l=symlink (comma-separated for several)
    #[arg(long = "type", value_name = "TYPE", allow_hyphen_values = true)]
    pub types: Option<String>,

    /// Descend at most N levels (0 means roots only)
    #[arg(long, value_name = "N")]
    pub maxdepth: Option<usize>,

    /// Don't report entries shallower than N
    #[arg(long, value_name = "N")]
    pub mindepth: Option<usize>,

    /// File size, e.g. 10k, +1m, -512. Units: b, k, m, g, t
    #[arg(long, value_name = "[+|-]N[UNIT]", allow_hyphen_values = true)]
    pub size: Option<String>,

    /// Match empty files and directories
    #[arg(long)]
    pub empty: bool,

    /// Follow symlinks to directories
    #[arg(long)]
    pub follow: bool,

    /// Skip names starting with '.'
    #[arg(long)]
    pub ignore_hidden: bool,

    /// Never report names matching PATTERN (repeatable)
    #[arg(long, value_name = "PATTERN", allow_hyphen_values = true)]
    pub exclude: Vec<String>,

    /// Never descend into directories matching PATTERN (repeatable)
    #[arg(long, value_name = "PATTERN", allow_hyphen_values = true)]
    pub exclude_dir: Vec<String>,

    /// Separate output paths with NUL instead of newline
    #[arg(long)]
    pub print0: bool,

    /// Suppress error messages
    #[arg(short, long)]
    pub quiet: bool,

    /// Log traversal decisions to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Parse find-style arguments such as `-name '*.rs' -maxdepth 2`.
    pub fn parse_find_style<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Self::try_parse_from(normalize_args(args))
    }

    pub fn filter_options(&self) -> FilterOptions {
        FilterOptions {
            name: self.name.clone(),
            iname: self.iname.clone(),
            types: self.types.clone(),
            min_depth: self.mindepth,
            max_depth: self.maxdepth,
            size: self.size.clone(),
            empty: self.empty,
            ignore_hidden: self.ignore_hidden,
            exclude: self.exclude.clone(),
            exclude_dir: self.exclude_dir.clone(),
            follow_symlinks: self.follow,
        }
    }

    pub fn terminator(&self) -> Terminator {
        if self.print0 {
            Terminator::Nul
        } else {
            Terminator::Newline
        }
    }
}

/// Rewrite single-dash long flags (`-name`) to the double-dash form clap
/// expects. Values and anything after `--` are left alone.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut normalized = Vec::new();
    let mut expect_value = false;
    let mut positional_only = false;

    for arg in args.into_iter().map(Into::into) {
        if expect_value || positional_only {
            expect_value = false;
            normalized.push(arg);
            continue;
        }

        let flag = arg
            .to_str()
            .and_then(|s| s.strip_prefix('-'))
            .filter(|word| FIND_STYLE_FLAGS.contains(word))
            .map(str::to_owned);

        match flag {
            Some(word) => {
                expect_value = !matches!(word.as_str(), "empty" | "print0");
                normalized.push(OsString::from(format!("--{word}")));
            }
            None => {
                if arg == "--" {
                    positional_only = true;
                }
                expect_value = arg.to_str().is_some_and(|s| VALUE_FLAGS.contains(&s));
                normalized.push(arg);
            }
        }
    }

    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::parse_find_style(std::iter::once("findlike").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn single_dash_words_become_long_flags() {
        let args = normalize_args(["findlike", "-name", "*.py", "-empty", "src"]);
        assert_eq!(args, vec!["findlike", "--name", "*.py", "--empty", "src"]);
    }

    #[test]
    fn values_are_never_rewritten() {
        let args = normalize_args(["findlike", "-name", "-name", "-size", "-size"]);
        assert_eq!(args, vec!["findlike", "--name", "-name", "--size", "-size"]);

        let args = normalize_args(["findlike", "--", "-name"]);
        assert_eq!(args, vec!["findlike", "--", "-name"]);

        let args = normalize_args(["findlike", "--exclude", "-empty", "--exclude-dir", "-type"]);
        assert_eq!(args, vec!["findlike", "--exclude", "-empty", "--exclude-dir", "-type"]);
    }

    #[test]
    fn patterns_starting_with_a_dash_are_values() {
        let cli = parse(&["-name", "-x", "--exclude", "-empty", "--exclude-dir", "-cache"]);
        assert_eq!(cli.name.as_deref(), Some("-x"));
        assert_eq!(cli.exclude, vec!["-empty"]);
        assert_eq!(cli.exclude_dir, vec!["-cache"]);
        assert!(!cli.empty);

        let cli = parse(&["--iname", "-X*"]);
        assert_eq!(cli.iname.as_deref(), Some("-X*"));
    }

    #[test]
    fn parses_a_full_find_style_command_line() {
        let cli = parse(&[
            "src",
            "tests",
            "-type",
            "f",
            "-name",
            "*.py",
            "-maxdepth",
            "3",
            "-mindepth",
            "1",
            "-size",
            "-1k",
            "--exclude",
            "*_test.py",
            "--exclude",
            "conftest.py",
            "--exclude-dir",
            ".venv",
            "--follow",
            "--ignore-hidden",
            "-print0",
        ]);

        assert_eq!(cli.paths, vec![PathBuf::from("src"), PathBuf::from("tests")]);
        assert_eq!(cli.terminator(), Terminator::Nul);

        let options = cli.filter_options();
        assert_eq!(options.types.as_deref(), Some("f"));
        assert_eq!(options.name.as_deref(), Some("*.py"));
        assert_eq!(options.max_depth, Some(3));
        assert_eq!(options.min_depth, Some(1));
        assert_eq!(options.size.as_deref(), Some("-1k"));
        assert_eq!(options.exclude, vec!["*_test.py", "conftest.py"]);
        assert_eq!(options.exclude_dir, vec![".venv"]);
        assert!(options.follow_symlinks);
        assert!(options.ignore_hidden);
    }

    #[test]
    fn defaults_to_no_paths_and_newlines() {
        let cli = parse(&[]);
        assert!(cli.paths.is_empty());
        assert_eq!(cli.terminator(), Terminator::Newline);
        assert!(!cli.quiet);
    }

    #[test]
    fn name_and_iname_conflict() {
        let err = Cli::parse_find_style(["findlike", "-name", "a", "-iname", "b"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }
}
