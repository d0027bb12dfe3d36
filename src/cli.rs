use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// Ingest AppStream/AppData metadata documents and print the resulting
/// package records.
#[derive(Parser, Debug)]
#[command(name = "appdata", version)]
pub struct Args {
    /// Config file (toml, yaml or json)
    #[arg(short, long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Resolve metadata and desktop entry paths below this root
    #[arg(long, value_name = "DIR", global = true)]
    pub root: Option<PathBuf>,

    /// Never fill in names or summaries from desktop entries
    #[arg(long, global = true)]
    pub no_desktop: bool,

    /// Link documents to records whose file lists install them
    #[arg(long, global = true)]
    pub search_filelist: bool,

    /// Print records as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// More logging (repeatable)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Ingest individual documents (`-` reads standard input)
    File {
        #[arg(required = true, value_name = "PATH")]
        paths: Vec<PathBuf>,
    },
    /// Ingest every *.appdata.xml / *.metainfo.xml in a directory
    Dir {
        /// Defaults to the configured metadata directory
        dir: Option<PathBuf>,
    },
}

impl Args {
    /// Default log filter when `RUST_LOG` is unset.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(&["appdata", "dir"], "warn")]
    #[case(&["appdata", "-v", "dir"], "info")]
    #[case(&["appdata", "dir", "-vv"], "debug")]
    #[case(&["appdata", "-vvvv", "dir"], "trace")]
    fn test_log_filter(#[case] argv: &[&str], #[case] expected: &str) {
        let args = Args::try_parse_from(argv).unwrap();
        assert_eq!(args.log_filter(), expected);
    }

    #[test]
    fn test_file_requires_paths() {
        assert!(Args::try_parse_from(["appdata", "file"]).is_err());
        let args = Args::try_parse_from(["appdata", "--json", "file", "a.xml", "-"]).unwrap();
        assert!(args.json);
        match args.command {
            Command::File { paths } => assert_eq!(paths, vec![PathBuf::from("a.xml"), PathBuf::from("-")]),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
