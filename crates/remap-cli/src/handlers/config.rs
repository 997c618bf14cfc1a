//! Configuration command handlers

use crate::cli::{ConfigAction, ConfigArgs, ConfigFormat, ConfigInitArgs, ConfigShowArgs};
use crate::config::{Config, ConfigBuilder};
use crate::error::{Error, Result};
use crate::output::OutputWriter;
use std::path::Path;

/// Handle the config command
pub fn handle_config(args: ConfigArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    match args.action {
        ConfigAction::Show(show_args) => handle_config_show(show_args, config, output),
        ConfigAction::Init(init_args) => handle_config_init(init_args, output),
    }
}

/// Handle config show subcommand
fn handle_config_show(args: ConfigShowArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    // The extension only selects the serializer
    let format_path = match args.format {
        ConfigFormat::Toml => Path::new("config.toml"),
        ConfigFormat::Json => Path::new("config.json"),
        ConfigFormat::Yaml => Path::new("config.yaml"),
    };

    let content = config.to_string_for(format_path)?;
    output.write(&content)?;
    if !content.ends_with('\n') {
        output.writeln("")?;
    }
    Ok(())
}

/// Handle config init subcommand
fn handle_config_init(args: ConfigInitArgs, output: &mut OutputWriter) -> Result<()> {
    if args.path.exists() && !args.force {
        return Err(Error::config(format!(
            "{} already exists; use --force to overwrite it",
            args.path.display()
        )));
    }

    let mut builder = ConfigBuilder::new();
    if let Some(key) = args.collection_key {
        builder = builder.collection_key(key);
    }
    if let Some(key) = args.output_key {
        builder = builder.output_key(key);
    }
    if let Some(chunk_size) = args.chunk_size {
        builder = builder.chunk_size(chunk_size);
    }

    let config = builder.build();
    config.validate()?;
    config.save(&args.path)?;
    output.success(&format!("✓ Created config at {}", args.path.display()))?;
    output.info("Edit it to customize batch keys, stream limits, and logging.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;
    use crate::output::capture;
    use tempfile::TempDir;

    #[test]
    fn test_show_yaml() {
        let config = ConfigBuilder::new().collection_key("rows").output_key("mapped").build();
        let (mut output, buffer) = capture::writer(OutputFormat::Human);

        handle_config(
            ConfigArgs {
                action: ConfigAction::Show(ConfigShowArgs {
                    format: ConfigFormat::Yaml,
                }),
            },
            &config,
            &mut output,
        )
        .unwrap();

        let shown: Config = serde_yaml::from_str(&buffer.contents()).unwrap();
        assert_eq!(shown, config);
    }

    #[test]
    fn test_show_toml() {
        let (mut output, buffer) = capture::writer(OutputFormat::Human);
        handle_config_show(
            ConfigShowArgs {
                format: ConfigFormat::Toml,
            },
            &Config::default(),
            &mut output,
        )
        .unwrap();

        let text = buffer.contents();
        assert!(text.contains("[engine.batch]"));
        assert!(text.contains("collection_key = \"applicantDetails\""));
    }

    fn init_args(path: &Path) -> ConfigInitArgs {
        ConfigInitArgs {
            path: path.to_path_buf(),
            collection_key: None,
            output_key: None,
            chunk_size: None,
            force: false,
        }
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("remap.json");
        let (mut output, buffer) = capture::writer(OutputFormat::Human);

        handle_config_init(init_args(&path), &mut output).unwrap();
        assert_eq!(Config::from_file(&path).unwrap(), Config::default());
        assert!(buffer.contents().contains("Created config"));

        let err = handle_config_init(init_args(&path), &mut output).unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let mut forced = init_args(&path);
        forced.force = true;
        handle_config_init(forced, &mut output).unwrap();
    }

    #[test]
    fn test_init_with_overrides() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("remap.toml");
        let (mut output, _buffer) = capture::writer(OutputFormat::Human);

        let mut args = init_args(&path);
        args.collection_key = Some("rows".to_string());
        args.chunk_size = Some(512);
        handle_config_init(args, &mut output).unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.engine.batch.collection_key, "rows");
        assert_eq!(config.engine.batch.output_key, "applicants");
        assert_eq!(config.engine.stream.chunk_size, 512);
    }

    #[test]
    fn test_init_rejects_invalid_values() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("remap.yaml");
        let (mut output, _buffer) = capture::writer(OutputFormat::Human);

        let mut args = init_args(&path);
        args.chunk_size = Some(0);
        assert!(handle_config_init(args, &mut output).is_err());
        assert!(!path.exists());
    }
}
