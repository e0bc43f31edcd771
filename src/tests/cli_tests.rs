//! Command-line parsing tests.

use crate::{Args, OutputMode};
use cycle_ring_lib::config::DEFAULT_CONFIG_PATH;

fn parse(args: &[&str]) -> anyhow::Result<Args> {
    Args::parse(args.iter().map(|arg| arg.to_string()))
}

#[test]
fn defaults_to_svg_with_default_config() {
    let args = parse(&[]).unwrap();
    assert_eq!(args.mode, OutputMode::Svg);
    assert_eq!(args.config_path, DEFAULT_CONFIG_PATH);
    assert!(!args.save_config);
}

#[test]
fn stdout_selects_ascii_preview() {
    assert_eq!(parse(&["--stdout"]).unwrap().mode, OutputMode::Ascii);
    assert_eq!(parse(&["--json"]).unwrap().mode, OutputMode::Json);
}

#[test]
fn config_path_and_save_flag() {
    let args = parse(&["--config", "/tmp/ring.toml", "--save-config"]).unwrap();
    assert_eq!(args.config_path, "/tmp/ring.toml");
    assert!(args.save_config);
}

#[test]
fn rejects_missing_path_and_unknown_flags() {
    assert!(parse(&["--config"]).is_err());

    let err = parse(&["--frobnicate"]).unwrap_err();
    assert!(err.to_string().contains("--frobnicate"));
}
