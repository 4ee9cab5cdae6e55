use anyhow::Context;
use handlers::recorder::Recorder;
use lambda_runtime::{Error, LambdaEvent, run, service_fn};
use models::response::HandlerResponse;
use services::{metadata_table::DynamoMetadataTable, object_metadata::S3MetadataSource};
use std::{path::Path, sync::Arc};
use tracing_subscriber::EnvFilter;

mod config;
mod errors;
mod handlers;
mod models;
mod services;

type AwsRecorder = Recorder<S3MetadataSource, DynamoMetadataTable>;

#[tokio::main]
async fn main() -> Result<(), Error> {
    // --- Logging setup ---
    init_tracing();

    // --- Parse config + local event flag ---
    let (cfg, event_file) = config::AppConfig::from_env_and_args();

    tracing::info!("Starting object-metadata-recorder with config: {:?}", cfg);

    // --- Clients are built once per cold start and shared by invocations ---
    let sdk_config = cfg.aws_sdk_config().await;
    let recorder: Arc<AwsRecorder> = Arc::new(Recorder::new(
        S3MetadataSource::new(cfg.s3_client(&sdk_config)),
        DynamoMetadataTable::new(cfg.dynamodb_client(&sdk_config)),
        cfg.table_name.clone(),
    ));

    // --- Handle local invocation mode ---
    if let Some(path) = event_file {
        let response = invoke_local(&recorder, &path).await?;
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(()); // exit after one invocation
    }

    let func = service_fn(move |event: LambdaEvent<serde_json::Value>| {
        let recorder = recorder.clone();
        async move { Ok::<HandlerResponse, Error>(recorder.handle(event.payload).await) }
    });

    run(func).await
}

/// JSON lines inside Lambda, human-readable output everywhere else.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if std::env::var_os("AWS_LAMBDA_FUNCTION_NAME").is_some() {
        tracing_subscriber::fmt()
            .with_ansi(false)
            .with_env_filter(filter)
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .flatten_event(true)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

/// Run the recorder once against an event read from disk.
async fn invoke_local(recorder: &AwsRecorder, path: &Path) -> anyhow::Result<HandlerResponse> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading event file `{}`", path.display()))?;
    let payload: serde_json::Value = serde_json::from_str(&raw)
        .with_context(|| format!("parsing event file `{}`", path.display()))?;

    tracing::debug!("Invoking recorder with event from {}", path.display());
    Ok(recorder.handle(payload).await)
}
