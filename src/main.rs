mod run;

use anyhow::Result;
use wealthtrack::config::Settings;

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let settings = Settings::from_env()?;
    run::init_tracing(&settings);
    run::as_cli(&args, &settings)
}
