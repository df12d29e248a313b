use anyhow::{Result, bail};
use std::path::PathBuf;

pub const USAGE: &str = "\
Usage: zon-report [--strict] [--degrade] [--config <path>] <command>

Commands:
  render <input> [-o <out.html>]   Render one document (stdout if no output)
  check <input>                    Validate a document and list every problem
  build <input-dir> [<out-dir>]    Render a directory into a static site
  browse <input-dir>               Browse a directory of documents";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Render {
        input: PathBuf,
        output: Option<PathBuf>,
    },
    Check {
        input: PathBuf,
    },
    Build {
        input_dir: PathBuf,
        out_dir: Option<PathBuf>,
    },
    Browse {
        input_dir: PathBuf,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cli {
    pub strict: bool,
    pub degrade: bool,
    pub config: Option<PathBuf>,
    pub command: Command,
}

/// Parse arguments, excluding the program name.
pub fn parse<I, S>(args: I) -> Result<Cli>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut strict = false;
    let mut degrade = false;
    let mut config = None;
    let mut output = None;
    let mut positional = Vec::new();

    let mut args = args.into_iter().map(Into::into);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--strict" => strict = true,
            "--degrade" => degrade = true,
            "--config" => match args.next() {
                Some(path) => config = Some(PathBuf::from(path)),
                None => bail!("--config needs a path"),
            },
            "-o" | "--output" => match args.next() {
                Some(path) => output = Some(PathBuf::from(path)),
                None => bail!("{arg} needs a path"),
            },
            flag if flag.starts_with('-') && flag != "-" => bail!("unknown option `{flag}`"),
            _ => positional.push(arg),
        }
    }

    let mut positional = positional.into_iter();
    let Some(name) = positional.next() else {
        bail!("no command given");
    };
    let first = positional.next().map(PathBuf::from);
    let second = positional.next().map(PathBuf::from);
    if let Some(extra) = positional.next() {
        bail!("unexpected argument `{extra}`");
    }

    let command = match (name.as_str(), first) {
        ("render", Some(input)) if second.is_none() => Command::Render { input, output: output.clone() },
        ("check", Some(input)) if second.is_none() => Command::Check { input },
        ("build", Some(input_dir)) => Command::Build {
            input_dir,
            out_dir: second,
        },
        ("browse", Some(input_dir)) if second.is_none() => Command::Browse { input_dir },
        ("render" | "check" | "build" | "browse", None) => bail!("`{name}` needs an input path"),
        ("render" | "check" | "browse", Some(_)) => bail!("too many arguments for `{name}`"),
        (other, _) => bail!("unknown command `{other}`"),
    };

    if output.is_some() && !matches!(command, Command::Render { .. }) {
        bail!("-o is only valid for `render`");
    }

    Ok(Cli {
        strict,
        degrade,
        config,
        command,
    })
}
