#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    use std::process::ExitCode;

    use clap::Parser;
    use framebridge_generator::cli::FramebridgeCli;
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match run(FramebridgeCli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn run(cli: framebridge_generator::cli::FramebridgeCli) -> anyhow::Result<()> {
    use anyhow::Context;
    use framebridge_generator::{Settings, generate};

    let settings = match &cli.settings {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Unable to read settings from {}", path.display()))?;
            Settings::from_json(&json)
                .with_context(|| format!("Unable to load settings from {}", path.display()))?
        }
        None => Settings::default(),
    }
    .overlay(cli.flag_settings());

    let generated = generate(&settings)?;

    if let Some(directory) = &cli.out_dir {
        let written = generated
            .write_to(directory)
            .with_context(|| format!("Unable to write snippets to {}", directory.display()))?;
        for path in written {
            println!("{}", path.display());
        }
    } else if cli.json {
        println!("{}", serde_json::to_string_pretty(&generated)?);
    } else {
        println!("<!-- Host page: {} -->", generated.config.embed_id);
        println!("{}", generated.host_snippet);
        println!();
        println!("<!-- Embedded page: {} -->", generated.config.embed_id);
        println!("{}", generated.embedded_snippet);
    }

    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {}
