use anyhow::Result;
use vergen::{vergen, Config};

fn main() -> Result<()> {
    // trigger recompilation when a new migration is added
    println!("cargo:rerun-if-changed=migrations");

    let mut config = Config::default();
    // Builds from a source archive have no git metadata to embed.
    *config.git_mut().skip_if_error_mut() = true;

    vergen(config)
}
