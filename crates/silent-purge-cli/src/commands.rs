use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use std::ffi::OsString;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "silent-purge", version)]
#[command(about = "Delete media files whose audio is silent or unreadable", long_about = None)]
#[command(args_override_self = true)]
pub struct Cli {
    /// Report silent files without deleting them
    #[arg(short = 'd', long = "dry-run")]
    pub dry_run: bool,

    /// Directory to scan recursively; the measurement store is kept here too
    pub root_path: PathBuf,
}

impl Cli {
    /// Parse `[-d] <root_path>`, rejecting options that follow the root.
    pub fn try_parse_ordered<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
        let cli = Self::try_parse_from(&args)?;
        if args.last().map(PathBuf::from).as_ref() != Some(&cli.root_path) {
            return Err(Self::command().error(
                ErrorKind::ArgumentConflict,
                "options must come before <ROOT_PATH>",
            ));
        }
        Ok(cli)
    }

    pub fn parse_ordered() -> Self {
        Self::try_parse_ordered(std::env::args_os()).unwrap_or_else(|e| e.exit())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_only() {
        let cli = Cli::try_parse_from(["silent-purge", "/media"]).unwrap();
        assert!(!cli.dry_run);
        assert_eq!(cli.root_path, PathBuf::from("/media"));
    }

    #[test]
    fn test_dry_run_flag() {
        let cli = Cli::try_parse_from(["silent-purge", "-d", "/media"]).unwrap();
        assert!(cli.dry_run);

        let repeated = Cli::try_parse_from(["silent-purge", "-d", "-d", "/media"]).unwrap();
        assert!(repeated.dry_run);
    }

    #[test]
    fn test_usage_errors() {
        assert!(Cli::try_parse_from(["silent-purge"]).is_err());
        assert!(Cli::try_parse_from(["silent-purge", "-x", "/media"]).is_err());
        assert!(Cli::try_parse_from(["silent-purge", "/a", "/b"]).is_err());
    }

    #[test]
    fn test_root_must_come_last() {
        let cli = Cli::try_parse_ordered(["silent-purge", "-d", "/media"]).unwrap();
        assert!(cli.dry_run);
        assert!(Cli::try_parse_ordered(["silent-purge", "/media"]).is_ok());

        let err = Cli::try_parse_ordered(["silent-purge", "/media", "-d"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
        assert!(Cli::try_parse_ordered(["silent-purge", "/media", "--dry-run"]).is_err());
    }
}
