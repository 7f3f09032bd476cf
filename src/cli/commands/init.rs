//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "vehicle-lookup.toml")]
    pub output: String,

    /// Include every setting with comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing vehicle lookup configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. Create a .env file with your portal credentials:");
                println!("     - VEHICLE_LOOKUP_PORTAL_USERNAME");
                println!("     - VEHICLE_LOOKUP_PORTAL_PASSWORD");
                println!("  3. Validate configuration: vehicle-lookup validate-config");
                println!("  4. Start the service: vehicle-lookup serve");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(5)
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# Vehicle Lookup Configuration

[application]
log_level = "info"

[server]
host = "0.0.0.0"
port = 8000

[portal]
username = "${VEHICLE_LOOKUP_PORTAL_USERNAME}"
password = "${VEHICLE_LOOKUP_PORTAL_PASSWORD}"

[lookup]
merge_mode = "itemized"  # itemized | merged

[cache]
ttl_seconds = 3600
max_entries = 5000
"#
        .to_string()
    }

    /// Generate configuration with every setting documented
    fn generate_config_with_examples() -> String {
        r#"# Vehicle Lookup Configuration
# Unified vehicle data API over a credentialed portal and a public booking widget
#
# Environment variables:
#   ${NAME} placeholders are substituted at load time; a missing variable is an error.
#   VEHICLE_LOOKUP_<SECTION>_<KEY> overrides any value below,
#   e.g. VEHICLE_LOOKUP_SERVER_PORT=9000 or VEHICLE_LOOKUP_CACHE_TTL_SECONDS=600.

[application]
name = "Unified Vehicle Data API"
log_level = "info"  # trace | debug | info | warn | error

[server]
host = "0.0.0.0"
port = 8000
cors_enabled = true
# Seconds in-flight requests get after SIGINT/SIGTERM
shutdown_grace_seconds = 10

[portal]
base_url = "https://e3technical.haynespro.com/"
# Defaults used when a request does not supply credentials.
# Without them the portal contributes nothing.
username = "${VEHICLE_LOOKUP_PORTAL_USERNAME}"
password = "${VEHICLE_LOOKUP_PORTAL_PASSWORD}"
timeout_seconds = 8
user_agent = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36"

[portal.form]
login_action = "./Login.aspx"
username_field = "ctl00$MainContentPlaceHolder$Username"
password_field = "ctl00$MainContentPlaceHolder$Password"
welcome_marker = "Welcome to e3 technical"
search_form_selector = "form#aspnetForm"
search_field = "ctl00$SearchContentPlaceHolder$Search$SearchKey"
search_event_target = "ctl00$SearchContentPlaceHolder$Search$SearchVehicle"
result_marker = "Vehicle Registration Mark (Current)"
data_container_id = "ctl00_MainContentPlaceHolder_VehicleDataContainer"

[widget]
# {vrm} is replaced with the canonical registration mark
url_template = "https://bookmygarage.com/garage-detail/sussexautocareltd/rh12lw/book/?ref=sussexautocare.co.uk&vrm={vrm}&referrer=widget"
marker = "VrmDetails"
timeout_seconds = 10

[lookup]
# Upper bound for one fan-out; must exceed both source timeouts
budget_seconds = 15
merge_mode = "itemized"  # itemized | merged

[cache]
ttl_seconds = 3600
max_entries = 5000

[logging]
local_enabled = false
local_path = "./logs"
local_rotation = "daily"  # daily | hourly | never
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServiceConfig;

    #[test]
    fn test_init_args_defaults() {
        let args = InitArgs {
            output: "vehicle-lookup.toml".to_string(),
            with_examples: false,
            force: false,
        };
        assert_eq!(args.output, "vehicle-lookup.toml");
    }

    #[test]
    fn test_generated_configs_parse() {
        // placeholders stay literal here; substitution happens in the loader
        for content in [
            InitArgs::generate_minimal_config(),
            InitArgs::generate_config_with_examples(),
        ] {
            let config: ServiceConfig = toml::from_str(&content).unwrap();
            assert!(config.validate().is_ok());
            assert_eq!(config.cache.max_entries, 5000);
        }
    }

    #[tokio::test]
    async fn test_init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("vehicle-lookup.toml");
        fs::write(&output, "# existing").unwrap();

        let args = InitArgs {
            output: output.to_string_lossy().into_owned(),
            with_examples: false,
            force: false,
        };
        assert_eq!(args.execute().await.unwrap(), 2);
        assert_eq!(fs::read_to_string(&output).unwrap(), "# existing");
    }

    #[tokio::test]
    async fn test_init_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("vehicle-lookup.toml");

        let args = InitArgs {
            output: output.to_string_lossy().into_owned(),
            with_examples: true,
            force: false,
        };
        assert_eq!(args.execute().await.unwrap(), 0);
        assert!(fs::read_to_string(&output).unwrap().contains("[widget]"));
    }
}
