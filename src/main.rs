// src/main.rs
mod config;
mod drivers;
mod engine;
mod gui;
mod types;
use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::fs::File;

use config::{AppConfig, Cli, SourceConfig};
use drivers::{
    LineReader, LineSource, SampleStateMachine, SerialSession, SimulatedSource, TelemetryPipeline,
};

/// Rows per simulated encryption run before the `Time to encrypt` summary.
const SIMULATED_ROWS_PER_RUN: usize = 200;

// 打开数据源；串口打不开属于致命错误
fn open_source(source: &SourceConfig) -> Result<Box<dyn LineSource>> {
    let opened: Box<dyn LineSource> = match source {
        SourceConfig::Serial {
            port,
            baud,
            timeout,
        } => Box::new(SerialSession::connect(port, *baud, *timeout)?),
        SourceConfig::Replay(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open replay file {}", path.display()))?;
            Box::new(LineReader::new(file))
        }
        SourceConfig::Simulated { seed } => {
            Box::new(SimulatedSource::new(*seed, SIMULATED_ROWS_PER_RUN))
        }
    };
    Ok(opened)
}

// 入口函数
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let config = AppConfig::from(Cli::parse());

    let source = open_source(&config.source)?;
    let machine = SampleStateMachine::new(config.capacity)?;
    let pipeline = TelemetryPipeline::new(source, machine).with_echo(config.verbose);
    log::info!(
        "reading {} every {:?}, buffer {:?}",
        config.source.describe(),
        config.poll_interval,
        config.capacity
    );

    if config.headless {
        engine::run_headless(pipeline, &config);
        Ok(())
    } else {
        gui::run(pipeline, &config).map_err(|err| anyhow!("window failed: {err}"))
    }
}
