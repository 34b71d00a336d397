//! Command line argument handling.

use std::path::PathBuf;

/// Parsed command line options.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Args {
    pub version: bool,
    pub verbose: bool,
    pub state: Option<PathBuf>,
}

/// Parse arguments, ignoring anything unrecognized.
pub fn parse<I, S>(args: I) -> Args
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut parsed = Args::default();
    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--version" | "-V" => parsed.version = true,
            "--verbose" | "-v" => parsed.verbose = true,
            "--state" | "-s" => match iter.next() {
                Some(path) => parsed.state = Some(PathBuf::from(path.as_ref())),
                None => eprintln!("--state requires a path"),
            },
            other => {
                if other.starts_with('-') {
                    eprintln!("ignoring unknown flag: {other}");
                }
            }
        }
    }
    parsed
}

pub fn version() -> String {
    format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = parse(Vec::<String>::new());
        assert_eq!(args, Args::default());
    }

    #[test]
    fn test_version_flags() {
        assert!(parse(["--version"]).version);
        assert!(parse(["-V"]).version);
        assert!(!parse(["-V"]).verbose);
    }

    #[test]
    fn test_verbose_flags() {
        assert!(parse(["--verbose"]).verbose);
        assert!(parse(["-v"]).verbose);
    }

    #[test]
    fn test_state_takes_a_path() {
        let args = parse(["--state", "/tmp/purr.state", "-v"]);
        assert_eq!(args.state, Some(PathBuf::from("/tmp/purr.state")));
        assert!(args.verbose);
    }

    #[test]
    fn test_state_without_path() {
        let args = parse(["--state"]);
        assert_eq!(args.state, None);
    }

    #[test]
    fn test_unknown_flags_are_ignored() {
        let args = parse(["--what", "-V", "positional"]);
        assert!(args.version);
        assert!(!args.verbose);
    }

    #[test]
    fn test_version_string() {
        let v = version();
        assert!(v.starts_with("purr "));
    }
}
