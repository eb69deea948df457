use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// Single-user task queue.
/// Storage defaults to ~/.taskq, or a directory passed via --dir or TASKQ_DIR.
#[derive(Parser)]
#[command(name = "tq", version, about = "Priority-driven task queue")]
pub struct Cli {
    /// Directory holding tasks.json and archived_tasks.json.
    #[arg(long, global = true)]
    pub dir: Option<PathBuf>,

    /// Opens the interactive menu when omitted.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn archive_days(args: &[&str]) -> Result<Option<i64>, clap::Error> {
        let cli = Cli::try_parse_from(args)?;
        match cli.command {
            Some(Commands::Archive { days }) => Ok(days),
            _ => panic!("expected the archive subcommand"),
        }
    }

    #[test]
    fn test_archive_days_within_range() {
        assert_eq!(archive_days(&["tq", "archive"]).unwrap(), None);
        assert_eq!(archive_days(&["tq", "archive", "--days", "14"]).unwrap(), Some(14));
        assert_eq!(archive_days(&["tq", "archive", "--days", "0"]).unwrap(), Some(0));
    }

    #[test]
    fn test_archive_days_out_of_range_is_rejected() {
        assert!(archive_days(&["tq", "archive", "--days", "36501"]).is_err());
        assert!(archive_days(&["tq", "archive", "--days", "200000000000000"]).is_err());
        assert!(archive_days(&["tq", "archive", "--days=-1"]).is_err());
    }

    #[test]
    fn test_no_subcommand_leaves_menu_default() {
        let cli = Cli::try_parse_from(["tq", "--dir", "/tmp/tq"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.dir, Some(PathBuf::from("/tmp/tq")));
    }
}
