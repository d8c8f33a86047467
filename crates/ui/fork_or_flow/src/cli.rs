use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "fork-or-flow", version, about = "Fork or Flow community client")]
pub struct Cli {
    /// Tick rate, i.e. number of ticks per second (overrides the settings file)
    #[arg(short, long, value_name = "HZ", value_parser = parse_rate)]
    pub tick_rate: Option<f64>,

    /// Frame rate, i.e. number of frames per second (overrides the settings file)
    #[arg(short, long, value_name = "FPS", value_parser = parse_rate)]
    pub frame_rate: Option<f64>,

    #[command(subcommand)]
    pub cmd: Option<Cmd>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cmd {
    /// Run the interactive client (default)
    Run,
    /// Print the effective keymap and exit
    Keys,
    /// Print the embedded mock data as JSON and exit
    Data,
}

/// Rates are per second and must be finite and above zero.
fn parse_rate(value: &str) -> Result<f64, String> {
    let rate: f64 = value
        .parse()
        .map_err(|_| format!("`{value}` is not a number"))?;
    if rate.is_finite() && rate > 0.0 {
        Ok(rate)
    } else {
        Err(format!("`{value}` must be greater than zero"))
    }
}

impl Cli {
    pub fn cmd_or_default(&self) -> Cmd {
        self.cmd.unwrap_or(Cmd::Run)
    }
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
    fn run_is_the_default_command() {
        let cli = Cli::parse_from(["fork-or-flow"]);
        assert_eq!(cli.cmd_or_default(), Cmd::Run);
        assert_eq!(cli.tick_rate, None);
    }

    #[test]
    fn zero_negative_and_non_finite_rates_are_rejected() {
        for bad in ["0", "-4", "NaN", "inf", "fast"] {
            assert!(
                Cli::try_parse_from(["fork-or-flow", "--tick-rate", bad]).is_err(),
                "tick rate {bad}"
            );
            assert!(
                Cli::try_parse_from(["fork-or-flow", "--frame-rate", bad]).is_err(),
                "frame rate {bad}"
            );
        }
        let cli = Cli::parse_from(["fork-or-flow", "-t", "0.5"]);
        assert_eq!(cli.tick_rate, Some(0.5));
    }

    #[test]
    fn rates_and_subcommand_parse() {
        let cli = Cli::parse_from(["fork-or-flow", "--frame-rate", "60", "keys"]);
        assert_eq!(cli.frame_rate, Some(60.0));
        assert_eq!(cli.cmd_or_default(), Cmd::Keys);
    }
}
