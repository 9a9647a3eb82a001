// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(name = "ncstate")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(arg_required_else_help = true)]
#[command(about = "NC State brand helpers and campus service clients")]
pub struct Cli {
    /// JSON configuration file (defaults to $NCSTATE_CONFIG, then built-in endpoints)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the brand palette
    Colors {
        /// Only one level (primary, secondary, support)
        #[arg(long)]
        level: Option<String>,
    },
    /// Show one palette colour, e.g. `primary-red`
    Color { key: String },
    /// WCAG contrast between two colours (palette keys or hex)
    Contrast {
        foreground: String,
        background: String,
        /// Text size in points
        #[arg(long, default_value_t = 12.0)]
        size: f64,
        #[arg(long)]
        bold: bool,
    },
    /// Palette pairs meeting a WCAG level
    Accessible {
        #[arg(long, default_value_t = 12.0)]
        size: f64,
        #[arg(long)]
        bold: bool,
        #[arg(long, value_enum, default_value_t = Level::Aa)]
        level: Level,
    },
    /// Print the brand bar markup
    Bar {
        #[arg(long, default_value = "")]
        site_url: String,
        /// red, black, red_on_white, or black_on_white
        #[arg(long, default_value = "red")]
        color: String,
        #[arg(long)]
        no_center: bool,
    },
    /// Print the standard quick links
    Quicklinks,
    /// Print the toolkit version, or compare a version against it
    Version {
        #[arg(long)]
        compare: Option<String>,
    },
    /// Render a wordmark logo
    Logo {
        #[arg(long, default_value = "NC STATE ")]
        bold: String,
        #[arg(long, default_value = "UNIVERSITY")]
        normal: String,
        #[command(flatten)]
        image: ImageArgs,
    },
    /// Render a text image (`*bold*` markup, `\n` for new lines)
    Text {
        text: String,
        #[command(flatten)]
        image: ImageArgs,
    },
    /// University Dining
    Dining {
        #[command(subcommand)]
        action: DiningAction,
        #[arg(long, global = true)]
        xml: bool,
    },
    /// Organization Unit Codes
    Ouc {
        #[command(subcommand)]
        action: OucAction,
        #[arg(long, global = true)]
        xml: bool,
    },
    /// Campus LDAP directory
    Directory {
        #[command(subcommand)]
        action: DirectoryAction,
        /// Bind DN; leave empty for an anonymous bind
        #[arg(long, global = true, default_value = "")]
        bind_dn: String,
        #[arg(long, global = true, default_value = "")]
        password: String,
        /// Attributes to return (repeatable); all when omitted
        #[arg(long = "field", global = true)]
        fields: Vec<String>,
    },
    /// Remedy ticketing
    Remedy {
        #[command(subcommand)]
        action: RemedyAction,
        #[arg(long, global = true, default_value = "")]
        user: String,
        #[arg(long, global = true, default_value = "")]
        password: String,
    },
    /// Write the effective configuration as JSON
    Config { path: PathBuf },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Level {
    Aa,
    Aaa,
}

#[derive(Debug, clap::Args)]
pub struct ImageArgs {
    /// Render locally instead of calling the remote service
    #[arg(long)]
    pub local: bool,
    /// Directory holding the brand fonts (local rendering)
    #[arg(long, default_value = "")]
    pub fonts: String,
    #[arg(long)]
    pub width: Option<u32>,
    #[arg(long)]
    pub height: Option<u32>,
    #[arg(long)]
    pub transparent: bool,
    /// png, gif, or jpeg
    #[arg(long, default_value = "png")]
    pub format: String,
    /// Output file
    #[arg(short, long)]
    pub out: PathBuf,
}

#[derive(Debug, Subcommand)]
pub enum DiningAction {
    Menu {
        location: String,
        #[arg(long)]
        meal: Option<String>,
        /// today, tomorrow, or YYYY-M-D
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        diet: Option<String>,
    },
    Hours {
        location: String,
        #[arg(long)]
        date: Option<String>,
    },
    Locations {
        #[arg(long = "type")]
        location_type: Option<String>,
    },
    Types,
}

#[derive(Debug, Subcommand)]
pub enum OucAction {
    Get { code: String },
    All {
        #[arg(long)]
        order: Option<String>,
    },
    Search { term: String },
}

#[derive(Debug, Subcommand)]
pub enum DirectoryAction {
    /// Look up by Unity ID
    User {
        unity_id: String,
        #[arg(long, default_value = "people")]
        context: String,
    },
    /// Look up by campus ID (authenticated bind only)
    CampusId {
        campus_id: String,
        #[arg(long, default_value = "people")]
        context: String,
    },
    Buildings,
    Units,
}

#[derive(Debug, Subcommand)]
pub enum RemedyAction {
    /// Fetch a call by id
    Call { call_id: String },
    /// Calls matching a qualification
    Calls {
        qualification: String,
        #[arg(long)]
        start: Option<u32>,
        #[arg(long)]
        max: Option<u32>,
    },
    /// Create a call from `field=value` pairs
    Create {
        #[arg(value_parser = parse_field)]
        fields: Vec<(String, String)>,
    },
    /// Most-viewed published solutions
    TopSolutions {
        #[arg(long)]
        max: Option<u32>,
    },
    /// Fetch a solution by id
    Solution { solution_id: String },
    /// Check a Remedy login
    Validate { login: String, secret: String },
}

fn parse_field(value: &str) -> Result<(String, String), String> {
    value
        .split_once('=')
        .map(|(k, v)| (k.to_owned(), v.to_owned()))
        .ok_or_else(|| format!("expected field=value, got '{value}'"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_contrast() {
        let cli = Cli::parse_from(["ncstate", "contrast", "primary-red", "#FFFFFF", "--size", "18"]);
        match cli.command {
            Command::Contrast { foreground, size, bold, .. } => {
                assert_eq!(foreground, "primary-red");
                assert!((size - 18.0).abs() < f64::EPSILON);
                assert!(!bold);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn remedy_fields_are_pairs() {
        let cli = Cli::parse_from(["ncstate", "remedy", "create", "impact=1", "status=Open"]);
        match cli.command {
            Command::Remedy { action: RemedyAction::Create { fields }, .. } => {
                assert_eq!(fields[0], ("impact".to_owned(), "1".to_owned()));
            }
            other => panic!("unexpected command {other:?}"),
        }
        assert!(Cli::try_parse_from(["ncstate", "remedy", "create", "impact"]).is_err());
    }
}
