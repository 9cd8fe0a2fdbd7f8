// build.rs

use clap::{Arg, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

fn build_cli() -> Command {
    Command::new("splitset")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Splitset Contributors")
        .about("Serialize generated package splits into an archive with a table of contents")
        .subcommand_required(false)
        .subcommand(
            Command::new("build")
                .about("Serialize a build plan into an archive directory")
                .arg(Arg::new("plan").required(true).help("Path to the JSON build plan"))
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .default_value("out")
                        .help("Output archive directory"),
                )
                .arg(
                    Arg::new("mode")
                        .short('m')
                        .long("mode")
                        .default_value("default")
                        .value_parser([
                            "default",
                            "universal",
                            "system",
                            "persistent",
                            "instant",
                            "archive",
                        ])
                        .help("Build mode"),
                )
                .arg(
                    Arg::new("first_variant_number")
                        .long("first-variant-number")
                        .default_value("0")
                        .help("Number given to the first variant"),
                )
                .arg(
                    Arg::new("workers")
                        .short('w')
                        .long("workers")
                        .help("Worker threads (default: available parallelism)"),
                )
                .arg(
                    Arg::new("verbose")
                        .short('v')
                        .long("verbose")
                        .action(clap::ArgAction::SetTrue)
                        .help("Log every written artifact"),
                ),
        )
        .subcommand(
            Command::new("inspect")
                .about("Summarize the table of contents of an archive directory")
                .arg(Arg::new("archive").required(true).help("Archive directory")),
        )
        .subcommand(
            Command::new("completions")
                .about("Generate shell completion scripts")
                .arg(
                    Arg::new("shell")
                        .required(true)
                        .value_parser(["bash", "elvish", "fish", "powershell", "zsh"])
                        .help("Shell type"),
                ),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Create man directory
    let out_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap());
    let man_dir = out_dir.join("man");
    fs::create_dir_all(&man_dir).expect("Failed to create man directory");

    // Generate main man page
    let cmd = build_cli();
    let man = Man::new(cmd);
    let mut buffer = Vec::new();
    man.render(&mut buffer)
        .expect("Failed to render man page");

    let man_path = man_dir.join("splitset.1");
    fs::write(&man_path, buffer).expect("Failed to write man page");

    println!("cargo:warning=Man page generated at {}", man_path.display());
}
