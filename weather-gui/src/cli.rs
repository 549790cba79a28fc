use std::path::PathBuf;

use clap::Parser;

/// Command-line options for the desktop app.
#[derive(Debug, Parser)]
#[command(name = "mysky", version, about = "Desktop weather viewer")]
pub struct Cli {
    /// Location to show on startup, e.g. "Paris" or "48.85,2.35".
    #[arg(long, value_name = "QUERY")]
    pub city: Option<String>,

    /// Read settings from this file instead of the default config path.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// More logging; repeat for more detail.
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Log filter used when `RUST_LOG` is not set.
    pub fn log_level(&self) -> &'static str {
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

    #[test]
    fn no_flags_launches_with_defaults() {
        let cli = Cli::try_parse_from(["mysky"]).unwrap();

        assert!(cli.city.is_none());
        assert!(cli.config.is_none());
        assert_eq!(cli.log_level(), "warn");
    }

    #[test]
    fn parses_all_flags() {
        let cli = Cli::try_parse_from([
            "mysky",
            "--city",
            "48.85,2.35",
            "--config",
            "/tmp/mysky.toml",
            "-vv",
        ])
        .unwrap();

        assert_eq!(cli.city.as_deref(), Some("48.85,2.35"));
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/mysky.toml")));
        assert_eq!(cli.log_level(), "debug");
    }

    #[test]
    fn verbosity_caps_at_trace() {
        let cli = Cli::try_parse_from(["mysky", "-vvvvv"]).unwrap();
        assert_eq!(cli.log_level(), "trace");
    }

    #[test]
    fn rejects_unknown_flags() {
        assert!(Cli::try_parse_from(["mysky", "--provider", "x"]).is_err());
    }
}
