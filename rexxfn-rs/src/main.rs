use std::fs::File;
use std::io::{self, BufReader};

use rexxfn::cli::{self, ConfigFile, USAGE};
use rexxfn::config::Config;
use rexxfn::logging;
use rexxfn::script;
use rexxfn::{ErrorPolicy, Session};

fn main() {
    let args = match cli::parse_args() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("rexxfn: {e}");
            eprintln!("{USAGE}");
            std::process::exit(1);
        }
    };
    if args.help {
        println!("{USAGE}");
        return;
    }

    if let Err(e) = logging::init_tracing(args.debug) {
        eprintln!("rexxfn: warning: {e}");
    }

    // ── Load user config ──────────────────────────────────────────────────────
    let rc = match &args.config {
        ConfigFile::Skip => None,
        ConfigFile::Explicit(path) => Some(path.clone()),
        ConfigFile::Search => cli::find_user_config(),
    };
    let mut policy = ErrorPolicy::default();
    if let Some(path) = rc {
        match Config::load_file(&path) {
            Ok((cfg, errors)) => {
                for e in errors {
                    eprintln!("rexxfn: warning: {}: {e}", path.display());
                }
                policy = cfg.policy;
            }
            Err(e) => eprintln!("rexxfn: warning: {}: {e}", path.display()),
        }
    }
    let mut session = Session::new(args.apply(policy));
    tracing::debug!(policy = ?session.policy(), "session policy");
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut err = io::stderr();

    // ── Run -c<cmd>, a script file, or stdin ──────────────────────────────────
    let result = if let Some(cmd) = &args.command {
        script::run(&mut session, cmd.as_bytes(), &mut out, &mut err, None)
    } else if let Some(path) = &args.script {
        match File::open(path) {
            Ok(f) => script::run(&mut session, BufReader::new(f), &mut out, &mut err, None),
            Err(e) => {
                eprintln!("rexxfn: {}: {e}", path.display());
                std::process::exit(1);
            }
        }
    } else {
        let is_tty = unsafe {
            libc::isatty(libc::STDIN_FILENO) != 0 && libc::isatty(libc::STDOUT_FILENO) != 0
        };
        let prompt = is_tty.then_some("rexxfn> ");
        script::run(&mut session, io::stdin().lock(), &mut out, &mut err, prompt)
    };

    match result {
        Ok(summary) => {
            if let Some(halt) = summary.halt {
                tracing::debug!(%halt, "halted");
            }
            std::process::exit(summary.exit_code());
        }
        Err(e) => {
            eprintln!("rexxfn: {e}");
            std::process::exit(1);
        }
    }
}
