use anyhow::Result;
use clap::Parser;
use manifest_gen::config::Cli;
use manifest_gen::RenderConfig;
use utils::version;

/// Sets up global panic hooks.
fn setup_global_hooks() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        default_hook(panic_info);
        tracing::error!("Thread panicked: {}", panic_info);
    }));
}

fn main() -> Result<()> {
    setup_global_hooks();

    let cli = Cli::parse();
    utils::logging::init();

    tracing::debug!("nvidia-device-plugin-yml {}", &**version::VERSION);

    let config = RenderConfig::new(&cli.generate);
    let stdout = std::io::stdout();
    manifest_gen::write_manifest(&config, stdout.lock())
        .map_err(|e| anyhow::anyhow!("{e:?}"))?;

    Ok(())
}
