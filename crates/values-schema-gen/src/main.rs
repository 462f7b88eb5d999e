use clap::Parser;
use tracing_subscriber::EnvFilter;
use values_schema_gen::ui::{Cli, Colors, colors, commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  let cli = Cli::parse();

  let level = if cli.quiet {
    "error"
  } else if cli.verbose {
    "debug"
  } else {
    "warn"
  };
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
    .with_writer(std::io::stderr)
    .init();

  let colors = Colors::new(colors::colors_enabled(cli.color), colors::detect_theme(cli.theme));
  let config = commands::GenerateConfig {
    inputs: cli.inputs,
    output: cli.output,
    draft: cli.draft,
    indent: cli.indent,
    title: cli.title,
    description: cli.description,
    id: cli.id,
    annotators: cli.annotators,
    strict: cli.strict,
    quiet: cli.quiet,
  };
  commands::generate_schema(config, &colors).await?;

  Ok(())
}
