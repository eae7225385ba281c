use anyhow::Result;

use payhook::{app, config::Config, telemetry};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::load()?;
    telemetry::init(config.log_json)?;

    app::serve(config).await
}
