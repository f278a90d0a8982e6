use anyhow::Context;
use bridge::bridge::{bridge_bind_address, FeedBridge};
use chrono::Utc;
use clap::Parser;
use generator::motion::MotionGenerator;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use workflow::config::SimulatorConfig;
use workflow::runner::Runner;

mod bridge;
mod generator;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Airchase chase simulator and replay driver")]
struct Args {
    /// Replay generated messages through the dashboard core and print a summary
    #[arg(long, default_value_t = false)]
    offline: bool,
    /// Load the simulator config from YAML
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, default_value = "pace_vehicle")]
    vehicle: String,
    /// Position publish rate in Hz
    #[arg(long, default_value_t = 10.0)]
    rate: f64,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Messages replayed in offline mode
    #[arg(long, default_value_t = 600)]
    steps: usize,
    /// Append the offline summary to this file
    #[arg(long)]
    report: Option<PathBuf>,
    /// Publish live messages over HTTP until Ctrl+C
    #[arg(long, default_value_t = false)]
    serve: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = if let Some(path) = args.config {
        SimulatorConfig::load(path)?
    } else {
        let config = SimulatorConfig::from_args(args.vehicle, args.rate, args.seed, args.steps);
        config.validate()?;
        config
    };

    if args.offline {
        let result = Runner::new(config.clone()).execute()?;

        println!("Offline replay -> {}", result.summary());
        for (output, text) in &result.final_texts {
            println!("  {output:?}: {text}");
        }

        if let Some(report_path) = args.report {
            if let Some(parent) = report_path.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&report_path)
                .with_context(|| format!("opening report {}", report_path.display()))?;
            writeln!(file, "{}", result.summary())?;
        }
    }

    if args.serve {
        serve(&config)?;
    }

    Ok(())
}

/// Publishes a fresh fused message every period until Ctrl+C.
fn serve(config: &SimulatorConfig) -> anyhow::Result<()> {
    let bridge = FeedBridge::new(&config.vehicle, config.rate_hz);
    let mut generator = MotionGenerator::new(config.to_motion_config());
    let period = config
        .publish_period()
        .context("rate_hz gives no usable publish period")?;

    let runtime = TokioBuilder::new_multi_thread()
        .enable_all()
        .build()
        .context("creating runtime for the HTTP bridge")?;

    runtime.block_on(async {
        let server = tokio::spawn(warp::serve(bridge.routes()).run(bridge_bind_address()));
        bridge.publish_status(&format!(
            "serving /fused/{} on {} at {:.1} Hz (Ctrl+C to stop)",
            config.vehicle,
            bridge_bind_address(),
            config.rate_hz
        ));

        let mut interval = tokio::time::interval(period);
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    bridge.publish(generator.step(Utc::now()));
                }
                res = signal::ctrl_c() => {
                    res.context("awaiting Ctrl+C to exit")?;
                    break;
                }
            }
        }

        server.abort();
        bridge.publish_status(&format!("stopped after {} messages", generator.steps()));
        Ok::<(), anyhow::Error>(())
    })
}
