mod args;
mod simulate;

use args::Args;
use async_ctrlc::CtrlC;
use bodycap_core::logging::enable_tracing;
use bodycap_zed::BodyTracker;
use clap::Parser;
use std::error::Error;
use tracing::info;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    if args.tracing {
        enable_tracing(args.debug);
    }

    let config = args.resolve()?;
    if args.print_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    let tracker: Box<dyn BodyTracker> = if args.simulate {
        info!("recording a simulated subject");
        Box::new(simulate::tracker())
    } else {
        camera()?
    };

    let ctrlc = CtrlC::new()?;
    let summary = bodycap_recorder::run(tracker, &config, ctrlc).await?;
    println!(
        "Wrote {} samples over {} ticks to {}",
        summary.samples,
        summary.ticks,
        config.output.display()
    );

    Ok(())
}

#[cfg(feature = "zed_camera")]
fn camera() -> Result<Box<dyn BodyTracker>, Box<dyn Error>> {
    Ok(Box::new(bodycap_zed::Zed::new()))
}

#[cfg(not(feature = "zed_camera"))]
fn camera() -> Result<Box<dyn BodyTracker>, Box<dyn Error>> {
    Err("built without the zed_camera feature; pass --simulate to record a synthetic subject".into())
}
