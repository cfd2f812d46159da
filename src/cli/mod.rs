use clap::Parser;
use std::num::NonZeroUsize;

use crate::runtime::ElementKind;

#[derive(Parser, Debug)]
#[command(name = "dynlist")]
#[command(version, about = "Build, reshape and query a typed dynamic array", long_about = None)]
pub struct Cli {
    /// Values to store, parsed as the selected element type
    #[arg(value_name = "VALUE", allow_hyphen_values = true)]
    pub values: Vec<String>,

    /// Element type of the array
    #[arg(short = 't', long = "type", value_enum, default_value_t = ElementKind::Int)]
    pub kind: ElementKind,

    /// Initial capacity
    #[arg(short, long, default_value = "1")]
    pub capacity: NonZeroUsize,

    /// Remove every occurrence of a value (repeatable)
    #[arg(long, value_name = "VALUE", allow_hyphen_values = true)]
    pub remove: Vec<String>,

    /// Drop repeated values, keeping first occurrences
    #[arg(short, long)]
    pub unique: bool,

    /// Sort in ascending order
    #[arg(short, long)]
    pub sort: bool,

    /// Reverse the element order (applied after sorting)
    #[arg(short, long)]
    pub reverse: bool,

    /// Report where a value occurs in the final array
    #[arg(short, long, value_name = "VALUE", allow_hyphen_values = true)]
    pub find: Option<String>,

    /// Walk through every array operation on built-in integers
    #[arg(long)]
    pub demo: bool,

    /// Set verbose level
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
