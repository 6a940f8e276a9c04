use std::path::PathBuf;

use clap::{value_parser, Arg, Command};

pub const DEFAULT_OUTPUT_FOLDER: &str = "./FMA_47s";

pub fn build_cli() -> Command {
    Command::new(env!("CARGO_PKG_NAME"))
        .author(env!("CARGO_PKG_AUTHORS"))
        .about("Slice a folder of stereo WAV files into fixed-length 44.1 kHz MP3 segments")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new("input_folder")
                .long("input_folder")
                .value_name("PATH")
                .help("The audio folder path")
                .required(true)
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("output_folder")
                .long("output_folder")
                .value_name("PATH")
                .help("Output path for the sliced audio")
                .default_value(DEFAULT_OUTPUT_FOLDER)
                .value_parser(value_parser!(PathBuf)),
        )
}
