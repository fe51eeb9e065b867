//! CLI surface for the device token binary.

use clap::Parser;

/// Interactive Keycloak device authorization flow.
#[derive(Parser, Debug)]
#[command(
    name = "kc-device-token",
    version,
    about = "Obtain a Keycloak access token via the device authorization grant"
)]
pub struct Cli {
    /// Print the full token response as indented JSON instead of the bare
    /// access token
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_defaults_to_bare_token_output() {
        let cli = Cli::try_parse_from(["kc-device-token"]).unwrap();
        assert!(!cli.json);
    }

    #[test]
    fn parse_json_flag() {
        let cli = Cli::try_parse_from(["kc-device-token", "--json"]).unwrap();
        assert!(cli.json);
    }

    #[test]
    fn parse_unknown_flag_is_error() {
        assert!(Cli::try_parse_from(["kc-device-token", "--jsn"]).is_err());
    }

    #[test]
    fn parse_positional_argument_is_error() {
        assert!(Cli::try_parse_from(["kc-device-token", "extra"]).is_err());
    }
}
