use herald_logger::{LogSettings, Logger};

#[test]
fn console_settings_install_without_file_writer() -> Result<(), Box<dyn std::error::Error>> {
    let settings = LogSettings {
        level: "debug".to_owned(),
        filter: Some("herald_logger=trace".to_owned()),
        ..LogSettings::default()
    };
    assert!(settings.directory.is_none());

    let logger = Logger::from_settings("console-settings", &settings)?;
    tracing::debug!(target: "herald_logger", "console only");

    assert!(logger.guard().is_none(), "console output needs no background writer");
    Ok(())
}
