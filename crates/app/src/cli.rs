use clap::Parser;
use std::path::PathBuf;

/// Convert a CSV bank export into an OFX statement document
#[derive(Parser, Debug)]
#[command(name = "csv2ofx")]
#[command(about = "Convert a CSV bank export into an OFX statement document", long_about = None)]
pub struct Cli {
    /// Full path to a settings.json file
    #[arg(short, long, value_name = "FILE")]
    pub settings: Option<PathBuf>,

    /// Full path to the output .ofx file
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Full path to the .csv file the transactions are read from
    #[arg(short, long, value_name = "FILE")]
    pub csv: Option<PathBuf>,

    /// Full path to an .ofx template file
    #[arg(short, long, value_name = "FILE")]
    pub template: Option<PathBuf>,

    /// Encoding of the output .ofx file
    #[arg(short, long, value_name = "ENCODING")]
    pub encoding: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_flags_means_all_defaults() {
        let cli = Cli::try_parse_from(["csv2ofx"]).unwrap();
        assert!(cli.settings.is_none());
        assert!(cli.output.is_none());
        assert!(cli.csv.is_none());
        assert!(cli.template.is_none());
        assert!(cli.encoding.is_none());
    }

    #[test]
    fn long_flags_parse() {
        let cli = Cli::try_parse_from([
            "csv2ofx",
            "--settings",
            "my/settings.json",
            "--output",
            "out.ofx",
            "--csv",
            "in.csv",
            "--template",
            "tpl.ofx",
            "--encoding",
            "latin1",
        ])
        .unwrap();
        assert_eq!(cli.settings.as_deref(), Some(std::path::Path::new("my/settings.json")));
        assert_eq!(cli.output.as_deref(), Some(std::path::Path::new("out.ofx")));
        assert_eq!(cli.csv.as_deref(), Some(std::path::Path::new("in.csv")));
        assert_eq!(cli.template.as_deref(), Some(std::path::Path::new("tpl.ofx")));
        assert_eq!(cli.encoding.as_deref(), Some("latin1"));
    }

    #[test]
    fn short_flags_parse() {
        let cli =
            Cli::try_parse_from(["csv2ofx", "-s", "s.json", "-o", "r.ofx", "-c", "x.csv"]).unwrap();
        assert!(cli.settings.is_some());
        assert!(cli.output.is_some());
        assert!(cli.csv.is_some());
    }

    #[test]
    fn unknown_flag_is_rejected() {
        assert!(Cli::try_parse_from(["csv2ofx", "--frobnicate"]).is_err());
    }
}
