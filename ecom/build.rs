use common::yaml_include::load_yaml_with_includes;
use std::{error::Error, fs, path::PathBuf};

// Assembles config/$SHIELD_ENV.yaml (with its includes) into
// <target>/<profile>/config/total_config.yaml.
fn main() -> Result<(), Box<dyn Error>> {
    println!("cargo:rerun-if-changed=config");
    println!("cargo:rerun-if-env-changed=SHIELD_ENV");

    let env = std::env::var("SHIELD_ENV").unwrap_or_else(|_| "dev".to_string());
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "debug".to_string());
    let out_dir = PathBuf::from(std::env::var("OUT_DIR")?);

    let target_dir = out_dir
        .ancestors()
        .find(|p| p.ends_with("target"))
        .ok_or("could not locate the target directory from OUT_DIR")?
        .join(profile);

    let source = PathBuf::from(std::env::var("CARGO_MANIFEST_DIR")?)
        .join("config")
        .join(format!("{env}.yaml"));
    let config_yaml = load_yaml_with_includes(&source)?;

    let mut out_str = String::new();
    yaml_rust2::YamlEmitter::new(&mut out_str).dump(&config_yaml)?;

    let total_config_dir = target_dir.join("config");
    fs::create_dir_all(&total_config_dir)?;
    fs::write(total_config_dir.join("total_config.yaml"), out_str)?;

    Ok(())
}
