use std::{env, io, path::PathBuf};

use lab::LabConfig;

const DEFAULT_OUT_DIR: &str = "out";

fn usage() -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidInput,
        "usage: lab <image> <request.json> [out_dir]",
    )
}

fn main() -> io::Result<()> {
    env_logger::init();

    let mut args = env::args().skip(1);
    let image_path = PathBuf::from(args.next().ok_or_else(usage)?);
    let request_path = PathBuf::from(args.next().ok_or_else(usage)?);
    let out_dir = PathBuf::from(args.next().unwrap_or_else(|| DEFAULT_OUT_DIR.to_string()));

    let config = LabConfig::from_env()?;
    lab::run(&config, &image_path, &request_path, &out_dir)?;

    Ok(())
}
