mod command;

use std::{io::stderr, path::PathBuf, process::exit};

use clap::Parser;
use slog::{debug, error, Level, Logger};
use superblocks::{Device, FieldValue, FsKind, SuperblockError};

use command::{ext_mkfs_command, ext_tune_command, xfs_mkfs_command};

#[derive(Parser)]
#[command(about = "derive the mkfs commands that would recreate a filesystem")]
struct Cli {
    device: PathBuf,

    #[arg(short, long, help="the filesystem type on the device", default_value_t = String::from("auto"))]
    fstype: String,

    #[arg(long, help = "print the decoded superblock fields instead of commands")]
    show_fields: bool,

    #[arg(long, help = "the mkfs binary to put in the synthesized command", default_value_t = String::from("mkfs"))]
    mkfs: String,

    #[arg(short, long, help = "log debug information")]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    let level = if cli.verbose { Level::Debug } else { Level::Info };
    let logger = common::obs::assemble_logger(stderr(), level);

    let device = Device::new(&cli.device);
    let devname = cli.device.display().to_string();

    let kind = if cli.fstype == "auto" {
        match device.probe() {
            Ok(Some(kind)) => kind,
            Ok(None) => {
                error!(logger, "unknown filesystem type"; "device" => devname.clone());
                exit(1);
            }
            Err(err) => {
                error!(logger, "failed to probe device"; "device" => devname.clone(), "error" => err.to_string());
                exit(1);
            }
        }
    } else {
        match cli.fstype.parse() {
            Ok(kind) => kind,
            Err(err) => {
                error!(logger, "{}", err);
                exit(1);
            }
        }
    };

    debug!(logger, "decoding superblock"; "device" => devname.clone(), "type" => kind.to_string());

    if kind.is_ext() {
        let superblock = unwrap_decode(&logger, &devname, device.read_ext());

        if cli.show_fields {
            print!("{}", render_fields(kind, superblock.fields()));
        } else {
            println!("{}", ext_mkfs_command(&cli.mkfs, &devname, kind, &superblock));
            println!("{}", ext_tune_command("tune2fs", &devname, &superblock));
        }
    } else {
        let superblock = unwrap_decode(&logger, &devname, device.read_xfs());

        if cli.show_fields {
            print!("{}", render_fields(kind, superblock.fields()));
        } else {
            println!("{}", xfs_mkfs_command(&cli.mkfs, &devname, &superblock));
        }
    }
}

fn unwrap_decode<T>(logger: &Logger, devname: &str, result: Result<T, SuperblockError>) -> T {
    match result {
        Ok(superblock) => superblock,
        Err(err) => {
            error!(logger, "failed to read superblock"; "device" => devname.to_string(), "error" => err.to_string());
            exit(1);
        }
    }
}

/// Renders the decoded record as key=value lines, with the filesystem type tag
/// merged in ahead of the decoded fields.
fn render_fields(kind: FsKind, fields: Vec<(&'static str, FieldValue)>) -> String {
    let mut out = format!("type={}\n", kind);
    for (name, value) in fields {
        out.push_str(&format!("{}={}\n", name, value));
    }
    out
}
