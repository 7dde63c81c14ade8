//! Command-line argument parsing.
//!
//! Usage:
//!   rexxfn [-f[<file>]] [-c<cmd>] [-kqdh] [<script>]

use std::path::PathBuf;

use directories::{BaseDirs, ProjectDirs};

use crate::policy::ErrorPolicy;

// ── Public types ──────────────────────────────────────────────────────────────

/// Parsed command-line arguments.
#[derive(Debug, Default)]
pub struct CliArgs {
    /// Config-file specification.
    pub config: ConfigFile,
    /// Single command to run instead of a script (`-c<cmd>`).
    pub command: Option<String>,
    /// Degrade file errors to sentinels instead of exiting (`-k`).
    pub keep_going: bool,
    /// Suppress diagnostic lines (`-q`).
    pub quiet: bool,
    /// Debug tracing on stderr (`-d`).
    pub debug: bool,
    /// Print usage and exit (`-h`).
    pub help: bool,
    /// Command file to run; stdin when absent or `-`.
    pub script: Option<PathBuf>,
}

/// How to choose the user config file.
#[derive(Debug, Default)]
pub enum ConfigFile {
    /// Search `~/.rexxfnrc`, `<config dir>/rexxfnrc`, `./.rexxfnrc` (default).
    #[default]
    Search,
    /// `-f` with no file argument: skip user config.
    Skip,
    /// `-f<file>`: load this specific file.
    Explicit(PathBuf),
}

impl CliArgs {
    /// Apply `-k` and `-q` on top of whatever the config file chose.
    pub fn apply(&self, mut policy: ErrorPolicy) -> ErrorPolicy {
        if self.keep_going {
            policy.terminate_on_error = false;
        }
        if self.quiet {
            policy.verbose = false;
        }
        policy
    }
}

pub const USAGE: &str = "Usage: rexxfn [-f[<file>]] [-c<cmd>] [-kqdh] [<script>]";

// ── Parsing ───────────────────────────────────────────────────────────────────

/// Read the process arguments; `Err` carries a message for the usage line.
pub fn parse_args() -> Result<CliArgs, String> {
    let argv: Vec<String> = std::env::args().skip(1).collect();
    parse_argv(&argv)
}

/// Parse an argument list without the program name.
///
/// Single-letter flags may be bundled (`-kq`).  `-f` and `-c` take the rest
/// of their word as the value; only `-c` also accepts the next word.
pub fn parse_argv(argv: &[String]) -> Result<CliArgs, String> {
    let mut args = CliArgs::default();
    let mut rest: Vec<&str> = Vec::new();
    let mut words = argv.iter().map(String::as_str);

    while let Some(word) = words.next() {
        let flags = match word.strip_prefix('-') {
            Some("-") => {
                rest.extend(words.by_ref());
                break;
            }
            Some(flags) if !flags.is_empty() => flags,
            _ => {
                rest.push(word);
                continue;
            }
        };

        for (at, flag) in flags.char_indices() {
            let tail = &flags[at + flag.len_utf8()..];
            match flag {
                'k' => args.keep_going = true,
                'q' => args.quiet = true,
                'd' => args.debug = true,
                'h' => args.help = true,
                'f' => {
                    // A bare -f followed by a word leaves that word as the
                    // script, not the rc file.
                    args.config = if tail.is_empty() {
                        ConfigFile::Skip
                    } else {
                        ConfigFile::Explicit(PathBuf::from(tail))
                    };
                    break;
                }
                'c' => {
                    let cmd = if !tail.is_empty() {
                        tail
                    } else {
                        words.next().ok_or("-c needs a command to run")?
                    };
                    args.command = Some(cmd.to_owned());
                    break;
                }
                other => return Err(format!("unknown option: -{other}")),
            }
        }
    }

    args.script = match rest.as_slice() {
        [] | ["-"] => None,
        [path] => Some(PathBuf::from(path)),
        more => return Err(format!("expected at most one script file, got {}", more.len())),
    };
    if args.command.is_some() && args.script.is_some() {
        return Err("-c cannot be combined with a script file".to_owned());
    }

    Ok(args)
}

// ── Path helpers ──────────────────────────────────────────────────────────────

/// Candidate rc-file locations, in search order.
pub fn config_candidates() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(base) = BaseDirs::new() {
        paths.push(base.home_dir().join(".rexxfnrc"));
    }
    if let Some(proj) = ProjectDirs::from("", "", "rexxfn") {
        paths.push(proj.config_dir().join("rexxfnrc"));
    }
    paths.push(PathBuf::from("./.rexxfnrc"));
    paths
}

/// The first rc file from [`config_candidates`] that exists.
pub fn find_user_config() -> Option<PathBuf> {
    config_candidates().into_iter().find(|p| p.is_file())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
