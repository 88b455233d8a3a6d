use anyhow::Result;
use clap_serde_derive::ClapSerde;
use serde::Deserialize;

#[derive(ClapSerde, Deserialize, Debug)]
pub struct Config {
    /// The address the job endpoint binds to
    #[arg(short, long, env, default_value = "0.0.0.0")]
    pub(crate) address: String,

    /// The port the job endpoint binds to
    #[arg(short, long, env, default_value = "8000")]
    pub(crate) port: u16,
}

impl Config {
    pub fn from_toml(path: &str) -> Result<Self> {
        let str = std::fs::read_to_string(path)?;
        let config = toml::from_str(&str)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::Config;

    #[test]
    fn reads_config_from_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "address = \"127.0.0.1\"\nport = 9000").unwrap();

        let config = Config::from_toml(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.address, "127.0.0.1");
        assert_eq!(config.port, 9000);
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(Config::from_toml("does-not-exist.toml").is_err());
    }
}
