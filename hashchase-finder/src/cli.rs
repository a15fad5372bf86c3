use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct CliArgs {
    /// Settings file, extension optional
    #[arg(short, long, default_value = "config/config")]
    pub config: String,

    /// Target digest in hex (repeatable)
    #[arg(short = 'T', long = "target")]
    pub targets: Vec<String>,

    /// Maximum distance that still counts as a match
    #[arg(short, long)]
    pub tolerance: Option<usize>,

    /// Digest algorithm to search with (repeatable)
    #[arg(short, long = "algorithm")]
    pub algorithms: Vec<String>,

    /// Iterations per worker
    #[arg(short, long)]
    pub iterations: Option<usize>,

    /// Inputs are hex instead of text
    #[arg(long)]
    pub hex: bool,

    /// Also check this many random inputs
    #[arg(short, long, default_value_t = 0)]
    pub random: u64,

    /// Length of each random input in bytes
    #[arg(long, default_value_t = 16)]
    pub random_len: usize,

    /// Print one JSON object per match
    #[arg(long)]
    pub json: bool,

    /// List the available digest algorithms and exit
    #[arg(long)]
    pub list_algorithms: bool,

    /// Inputs to check
    pub inputs: Vec<String>,
}
