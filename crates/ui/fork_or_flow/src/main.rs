use app::AppBuilder;
use clap::Parser;
use color_eyre::{eyre::eyre, Result};

use fork_or_flow::{
    cli::{Cli, Cmd},
    config::{build_settings_store, keymap_report},
    core::app::App,
    data::Catalog,
    errors,
};

#[tokio::main]
async fn main() -> Result<()> {
    errors::init()?;
    let cli = Cli::parse();

    let context = AppBuilder::<App>::new(env!("CARGO_PKG_VERSION"))
        .map_err(|err| eyre!("failed to initialize: {err}"))?
        .build();

    match cli.cmd_or_default() {
        Cmd::Run => {
            let mut app = App::new(context, &cli)?;
            app.run().await?;
        }
        Cmd::Keys => {
            let store = build_settings_store(&context.path_context().settings_file(None))?;
            print!("{}", keymap_report(&store)?);
        }
        Cmd::Data => {
            println!("{}", Catalog::embedded()?.to_pretty_json()?);
        }
    }
    Ok(())
}
