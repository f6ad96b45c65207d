use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(about = "Serve the fuel price adjustment calendar")]
pub struct Arguments {
    /// the port to listen on
    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,
    /// the schedule document
    #[arg(long, env = "OPC_SCHEDULE", default_value = "tzrq.json")]
    pub schedule: PathBuf,
    /// the directory with the subscription and admin pages
    #[arg(long, env = "OPC_PUBLIC_DIR", default_value = "public")]
    pub public_dir: PathBuf,
    /// how many of the nearest adjustments show the expected trend
    #[arg(long, env = "OPC_DETAILED_EVENTS", default_value_t = 1)]
    pub detailed_events: usize,
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn test_arguments() {
        let args = Arguments::parse_from(["opc_server", "--port", "8008", "--detailed-events", "2"]);
        assert_eq!(args.port, 8008);
        assert_eq!(args.detailed_events, 2);
        assert_eq!(args.public_dir, PathBuf::from("public"));
    }
}
