use aws_config::{BehaviorVersion, Region, SdkConfig};
use clap::Parser;
use std::{env, path::PathBuf};

/// Centralized application configuration.
/// Combines environment variables and CLI arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// Metadata table; checked per invocation, not at startup.
    pub table_name: Option<String>,
    pub region: Option<String>,
    pub endpoint_url: Option<String>,
}

/// Command-line + environment configuration.
#[derive(Parser, Debug)]
#[command(author, version, about = "Records S3 object metadata into DynamoDB")]
pub struct Args {
    /// Metadata table name (overrides DYNAMODB_TABLE_NAME)
    #[arg(long)]
    pub table_name: Option<String>,

    /// AWS region (overrides AWS_REGION)
    #[arg(long)]
    pub region: Option<String>,

    /// Endpoint override for a local AWS emulator (overrides AWS_ENDPOINT_URL)
    #[arg(long)]
    pub endpoint_url: Option<String>,

    /// Process a single S3 event from this JSON file, print the response and exit
    #[arg(long)]
    pub event: Option<PathBuf>,
}

impl AppConfig {
    /// Parse environment variables + CLI args into AppConfig and the
    /// optional local event file.
    pub fn from_env_and_args() -> (Self, Option<PathBuf>) {
        // Parse CLI once
        let args = Args::parse();
        Self::merge(args, |name| env::var(name).ok())
    }

    /// Flags win over environment variables; empty values count as unset.
    fn merge(args: Args, env_var: impl Fn(&str) -> Option<String>) -> (Self, Option<PathBuf>) {
        let pick = |flag: Option<String>, name: &str| {
            flag.or_else(|| env_var(name))
                .filter(|value| !value.trim().is_empty())
        };

        let cfg = Self {
            table_name: pick(args.table_name, "DYNAMODB_TABLE_NAME"),
            region: pick(args.region, "AWS_REGION"),
            endpoint_url: pick(args.endpoint_url, "AWS_ENDPOINT_URL"),
        };

        (cfg, args.event)
    }

    /// Shared SDK configuration built from the default credential chain.
    pub async fn aws_sdk_config(&self) -> SdkConfig {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = &self.region {
            loader = loader.region(Region::new(region.clone()));
        }
        if let Some(endpoint_url) = &self.endpoint_url {
            loader = loader.endpoint_url(endpoint_url);
        }
        loader.load().await
    }

    pub fn s3_client(&self, sdk_config: &SdkConfig) -> aws_sdk_s3::Client {
        // Emulators generally serve buckets by path, not by virtual host.
        let s3_config = aws_sdk_s3::config::Builder::from(sdk_config)
            .force_path_style(self.endpoint_url.is_some())
            .build();
        aws_sdk_s3::Client::from_conf(s3_config)
    }

    pub fn dynamodb_client(&self, sdk_config: &SdkConfig) -> aws_sdk_dynamodb::Client {
        aws_sdk_dynamodb::Client::new(sdk_config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn merge(argv: &[&str], env: &[(&str, &str)]) -> (AppConfig, Option<PathBuf>) {
        let args = Args::try_parse_from(argv.iter().copied()).unwrap();
        let env: HashMap<String, String> = env
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::merge(args, |name| env.get(name).cloned())
    }

    #[test]
    fn reads_environment() {
        let (cfg, event) = merge(
            &["recorder"],
            &[
                ("DYNAMODB_TABLE_NAME", "S3ObjectMetadata"),
                ("AWS_REGION", "us-east-1"),
            ],
        );
        assert_eq!(
            cfg,
            AppConfig {
                table_name: Some("S3ObjectMetadata".into()),
                region: Some("us-east-1".into()),
                endpoint_url: None,
            }
        );
        assert_eq!(event, None);
    }

    #[test]
    fn flags_override_environment() {
        let (cfg, event) = merge(
            &[
                "recorder",
                "--table-name",
                "local-table",
                "--endpoint-url",
                "http://localhost:4566",
                "--event",
                "event.json",
            ],
            &[("DYNAMODB_TABLE_NAME", "S3ObjectMetadata")],
        );
        assert_eq!(cfg.table_name.as_deref(), Some("local-table"));
        assert_eq!(cfg.endpoint_url.as_deref(), Some("http://localhost:4566"));
        assert_eq!(event, Some(PathBuf::from("event.json")));
    }

    #[test]
    fn blank_table_name_is_unset() {
        let (cfg, _) = merge(&["recorder"], &[("DYNAMODB_TABLE_NAME", "  ")]);
        assert_eq!(cfg.table_name, None);
    }

    #[test]
    fn nothing_configured() {
        let (cfg, _) = merge(&["recorder"], &[]);
        assert_eq!(cfg, AppConfig::default());
    }
}
