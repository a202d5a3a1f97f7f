//! Command-line argument parsing for gadget-advisor
//!
//! Provides clap-based CLI with subcommands and verbosity control.

use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

/// gadget-advisor - product lookups, price tracking and tech news from the terminal
#[derive(Parser, Debug)]
#[command(name = "gadget-advisor")]
#[command(version)]
#[command(about = "Look up gadgets, compare them, track prices and read tech news", long_about = None)]
pub struct Args {
    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbosity level: -q (quiet), default (normal), -v (verbose), -vv (very verbose)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Look up one product
    Search {
        /// Product name, e.g. "iPhone 15 128GB"
        #[arg(value_name = "QUERY", required = true, num_args = 1..)]
        query: Vec<String>,
    },

    /// Look up two products and compare them side by side
    Compare {
        /// Two product names (quote multi-word names)
        #[arg(value_name = "QUERY", required = true, num_args = 2)]
        queries: Vec<String>,
    },

    /// Summarize a news article
    Summarize(SummarizeArgs),

    /// Chat with the advisor bot
    Chat,

    /// Show technology headlines, or manage saved articles
    #[command(args_conflicts_with_subcommands = true)]
    News {
        #[command(subcommand)]
        action: Option<NewsCommand>,

        /// US headlines instead of Indian ones
        #[arg(long)]
        global: bool,

        /// Only show sale, deal and discount stories
        #[arg(long)]
        deals: bool,

        /// Only show stories mentioning one of these keywords
        #[arg(long, value_delimiter = ',')]
        keywords: Vec<String>,
    },

    /// Manage tracked prices
    Track {
        #[command(subcommand)]
        action: TrackCommand,
    },

    /// Display current configuration
    Config {
        /// Write the current configuration to the config file
        #[arg(long)]
        init: bool,
    },
}

#[derive(ClapArgs, Debug)]
pub struct SummarizeArgs {
    #[arg(long)]
    pub title: String,

    #[arg(long, default_value = "")]
    pub description: String,

    #[arg(long)]
    pub url: String,
}

#[derive(Subcommand, Debug)]
pub enum NewsCommand {
    /// Save a current headline for later, by its URL
    Save {
        url: String,
        /// Look the URL up in the US headlines
        #[arg(long)]
        global: bool,
    },
    /// List saved articles
    Saved,
    /// Remove a saved article by id
    Unsave { id: String },
}

#[derive(Subcommand, Debug)]
pub enum TrackCommand {
    /// Look up a product and start tracking its price
    Add {
        #[arg(value_name = "QUERY", required = true, num_args = 1..)]
        query: Vec<String>,
    },
    /// List tracked products
    List {
        /// Only the N biggest price drops
        #[arg(long, value_name = "N")]
        top: Option<usize>,
    },
    /// Stop tracking a product by title
    Remove { title: String },
    /// Look up every tracked product again and record new prices
    Refresh,
}

/// Verbosity level enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
    VeryVerbose,
    Trace,
}

impl Args {
    /// Get verbosity level based on flags
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                2 => Verbosity::VeryVerbose,
                _ => Verbosity::Trace,
            }
        }
    }
}

impl Verbosity {
    /// Default `tracing` filter for this level
    pub fn filter_directive(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "error",
            Verbosity::Normal => "warn",
            Verbosity::Verbose => "info",
            Verbosity::VeryVerbose => "debug",
            Verbosity::Trace => "trace",
        }
    }

    /// Check if should show progress spinners
    pub fn show_progress(&self) -> bool {
        !matches!(self, Verbosity::Quiet)
    }
}

/// Join multi-word positional input back into one query string
pub fn join_query(words: &[String]) -> String {
    words.join(" ")
}
