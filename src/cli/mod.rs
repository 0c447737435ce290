pub mod devices;

use std::{error::Error, path::PathBuf, time::Duration};

use clap::{Parser, Subcommand};
use devices::handle_devices;

use crate::input::manager::ManagerOptions;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub cmd: Option<Commands>,

    /// Directory to load device configs from. May be given multiple times;
    /// replaces the default search path.
    #[arg(long = "devices-dir", global = true)]
    pub devices_dirs: Vec<PathBuf>,

    /// Seconds to wait between device scans
    #[arg(long, global = true)]
    pub scan_interval: Option<u64>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the driver (default)
    Run,
    /// List present input devices and the device config each one would use
    Devices {
        /// Only show devices that have a device config
        #[arg(long)]
        configured: bool,
    },
}

impl Args {
    /// Build the manager options from the command line, falling back to the
    /// defaults for anything not given.
    pub fn manager_options(&self) -> ManagerOptions {
        let mut options = ManagerOptions::default();
        if !self.devices_dirs.is_empty() {
            options.config_paths = self.devices_dirs.clone();
        }
        if let Some(seconds) = self.scan_interval {
            options.scan_interval = Duration::from_secs(seconds);
        }
        options
    }
}

/// Run the given command. Returns without doing anything for [Commands::Run],
/// which is handled by the caller.
pub fn main_cli(args: Args) -> Result<(), Box<dyn Error>> {
    let Some(cmd) = args.cmd.clone() else {
        return Ok(());
    };

    match cmd {
        Commands::Run => (),
        Commands::Devices { configured } => {
            handle_devices(&args.manager_options().config_paths, configured)?
        }
    }

    Ok(())
}
