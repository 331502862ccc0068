use crate::config::CONFIG_FILE_NAME;
use anyhow::Result;
use std::fs;
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# apidrift configuration

[compare]
algorithms = ["dbscan", "tfidf"]
# jobs = 4

[params.dbscan]
eps = 0.5
min_samples = 2

[params.minmaxscaler]
feature_range = [0.0, 1.0]

[params.tfidf]
max_features = 500
stop_words = "english"
"#;

pub fn init_config(dir: &Path, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!("Configuration file already exists. Use --force to overwrite.");
    }

    fs::write(&config_path, DEFAULT_CONFIG)?;
    println!("Created {} configuration file", CONFIG_FILE_NAME);

    Ok(())
}
