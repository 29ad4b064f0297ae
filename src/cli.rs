//! CLI argument parsing with clap.

use clap::Parser;
use std::path::PathBuf;
use url::Url;

use crate::error::SynoblockError;

#[derive(Parser, Debug)]
#[command(name = "synoblock")]
#[command(author, version, about = "Feed the Synology auto-block database from IP blocklists")]
pub struct Cli {
    /// Local list files separated by a space (eg. /home/user/list.txt custom.txt)
    #[arg(short = 'f', long = "in-file", num_args = 1.., value_name = "FILE")]
    pub in_file: Vec<PathBuf>,

    /// External list URLs separated by a space
    /// (eg. https://example.com/list.txt https://example.com/all.txt)
    #[arg(short = 'u', long = "in-url", num_args = 1.., value_name = "URL")]
    pub in_url: Vec<Url>,

    /// Expire time in days. Default 0: no expiration
    #[arg(short = 'e', long = "expire-in-day", default_value_t = 0, value_name = "DAYS")]
    pub expire_in_day: u32,

    /// Remove expired deny entries
    #[arg(long)]
    pub remove_expired: bool,

    /// Folder to store a backup of the database
    #[arg(short = 'b', long = "backup-to", value_name = "DIR")]
    pub backup_to: Option<PathBuf>,

    /// Clear ALL deny entries in the database before filling
    #[arg(long)]
    pub clear_db: bool,

    /// Perform a run without any modification
    #[arg(long)]
    pub dry_run: bool,

    /// Increase output verbosity
    #[arg(short, long)]
    pub verbose: bool,

    /// Path of the Synology auto-block database
    #[arg(long, default_value = "/etc/synoautoblock.db", value_name = "PATH")]
    pub database: PathBuf,
}

impl Cli {
    /// Cross-flag validation, performed before any network or database I/O.
    pub fn validate(&self) -> Result<(), SynoblockError> {
        if self.in_file.is_empty() && self.in_url.is_empty() {
            return Err(SynoblockError::Config(
                "at least one source list is mandatory (file or url)".to_string(),
            ));
        }
        if self.clear_db && self.backup_to.is_none() {
            return Err(SynoblockError::Config(
                "a backup folder must be set to clear the database".to_string(),
            ));
        }
        if let Some(dir) = &self.backup_to {
            if !dir.is_dir() {
                return Err(SynoblockError::Config(format!(
                    "\"{}\" is not a valid folder",
                    dir.display()
                )));
            }
        }
        Ok(())
    }

    /// Dry runs always report what they would have done.
    pub fn effective_verbose(&self) -> bool {
        self.verbose || self.dry_run
    }
}
