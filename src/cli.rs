use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "lendprobe")]
#[command(version, about = "Security and validation probe suite for loan-application APIs")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    Boundary {
        #[arg(short, long, default_value = "http://localhost:3000")]
        url: String,

        #[arg(short, long, default_value = "reports")]
        output: String,

        #[arg(short, long, default_value = "30")]
        timeout: u64,
    },

    PasswordReset {
        #[arg(short, long, default_value = "http://localhost:3000")]
        url: String,

        #[arg(short, long, default_value = "reports")]
        output: String,

        #[arg(short, long, default_value = "5")]
        timeout: u64,
    },

    RateLimit {
        #[arg(short, long, default_value = "http://localhost:3000")]
        url: String,

        #[arg(short, long, default_value = "reports")]
        output: String,

        #[arg(short, long, default_value = "5")]
        timeout: u64,

        #[arg(long, default_value = "15")]
        attempts: usize,

        #[arg(short, long, default_value = "10")]
        concurrency: usize,
    },

    SensitiveData {
        #[arg(short, long, default_value = "http://localhost:3000")]
        url: String,

        #[arg(short, long, default_value = "reports")]
        output: String,

        #[arg(short, long, default_value = "10")]
        timeout: u64,
    },

    SpecialChars {
        #[arg(short, long, default_value = "http://localhost:3000")]
        url: String,

        #[arg(short, long, default_value = "reports")]
        output: String,

        #[arg(short, long, default_value = "30")]
        timeout: u64,

        #[arg(short, long, default_value = "5")]
        concurrency: usize,
    },
}
