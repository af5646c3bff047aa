mod hid;

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use efm8_bootloader::LightProgrammer;
use hid::HidTransport;
use light_format::LightConfig;
use log::info;

/// Configure the light patterns of a USB-connected light through its factory
/// bootloader.
#[derive(Parser, Debug)]
#[command(name = "lightcfg", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Download the current configuration and write it to a JSON file.
    Export { file: PathBuf },
    /// Read a JSON configuration file and push it to the device.
    Import { file: PathBuf },
    /// Dump the raw pattern memory to a text file (for debugging).
    Dump { file: PathBuf },
}

fn open_programmer() -> Result<LightProgrammer<HidTransport>> {
    Ok(LightProgrammer::new(HidTransport::open()?))
}

fn export(file: &Path) -> Result<()> {
    let config = open_programmer()?.download()?;
    let json = serde_json::to_string_pretty(&config)?;
    fs::write(file, json).with_context(|| format!("write {}", file.display()))?;
    info!("exported {} mode(s) to {}", config.modes.len(), file.display());
    Ok(())
}

fn import(file: &Path) -> Result<()> {
    let json =
        fs::read_to_string(file).with_context(|| format!("read {}", file.display()))?;
    let config: LightConfig =
        serde_json::from_str(&json).with_context(|| format!("parse {}", file.display()))?;

    open_programmer()?.upload(&config)?;
    info!("imported {} mode(s) from {}", config.modes.len(), file.display());
    Ok(())
}

fn dump(file: &Path) -> Result<()> {
    let pairs = open_programmer()?.dump_memory()?;

    let mut out = fs::File::create(file).with_context(|| format!("create {}", file.display()))?;
    for (address, value) in pairs {
        writeln!(out, "0x{address:04X}: 0x{value:02X} ({value})")?;
    }
    info!("dumped pattern memory to {}", file.display());
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.cmd {
        Cmd::Export { file } => export(&file),
        Cmd::Import { file } => import(&file),
        Cmd::Dump { file } => dump(&file),
    }
}
