use anyhow::Result;
use clap::Parser;
use conductor_base::codec::WireMessageCodec;
use conductor_base::logging::{load_logging_config_from_env, tracing_init};
use conductor_base::{CODEC_CONFIG, VALIDATION_CONFIG};
use dotenvy::dotenv;
use taskdef_tool::Args;

fn main() -> Result<()> {
    dotenv().ok();

    let conf = load_logging_config_from_env().unwrap_or_default();
    tracing_init(conf)?;

    let args = Args::parse();
    let codec = WireMessageCodec::new(CODEC_CONFIG.clone());
    match taskdef_tool::run(&args.command, &codec, &VALIDATION_CONFIG) {
        Ok(out) => {
            println!("{}", out);
            Ok(())
        }
        Err(e) => {
            tracing::error!("{} failed: {:?}", conductor_base::APP_NAME, e);
            Err(e)
        }
    }
}
