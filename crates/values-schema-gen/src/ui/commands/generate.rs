use std::{
  path::{Path, PathBuf},
  time::{SystemTime, UNIX_EPOCH},
};

use crossterm::style::Stylize;
use fmmap::tokio::{AsyncMmapFile, AsyncMmapFileExt};
use serde::Serialize;

use crate::{
  annotate,
  error::{Error, Result},
  generator::Generator,
  schema::Schema,
  ui::{Colors, colors::Role},
};

/// CLI-facing configuration: binds the flag values and yields a configured
/// [`Generator`]. Unknown annotator names and unsupported drafts are
/// rejected here, before any input is read.
pub struct GenerateConfig {
  pub inputs: Vec<PathBuf>,
  pub output: PathBuf,
  pub draft: u32,
  pub indent: usize,
  pub title: Option<String>,
  pub description: Option<String>,
  pub id: Option<String>,
  pub annotators: Option<Vec<String>>,
  pub strict: bool,
  pub quiet: bool,
}

impl GenerateConfig {
  pub fn generator(&self) -> Result<Generator> {
    if self.draft != 7 {
      return Err(Error::InvalidOption(format!(
        "unsupported draft {}: only draft 7 is supported",
        self.draft
      )));
    }
    let annotators = match &self.annotators {
      Some(names) => annotate::annotators_by_name(names)?,
      None => annotate::default_annotators(),
    };
    Ok(
      Generator::builder()
        .annotators(annotators)
        .maybe_title(self.title.clone())
        .maybe_description(self.description.clone())
        .maybe_id(self.id.clone())
        .strict(self.strict)
        .build(),
    )
  }
}

fn format_timestamp() -> String {
  let secs = SystemTime::now()
    .duration_since(UNIX_EPOCH)
    .map(|elapsed| elapsed.as_secs())
    .unwrap_or_default();
  format!("[{:02}:{:02}:{:02}]", (secs / 3600) % 24, (secs / 60) % 60, secs % 60)
}

pub async fn generate_schema(config: GenerateConfig, colors: &Colors) -> anyhow::Result<()> {
  let generator = config.generator()?;

  let mut inputs = Vec::new();
  for path in &config.inputs {
    if !config.quiet {
      println!(
        "{} {}",
        format_timestamp().with(colors.role(Role::Timestamp)),
        format!("Reading values from: {}", path.display()).with(colors.role(Role::Status))
      );
    }
    inputs.push(read_input(path).await?);
  }

  let schema = generator.generate(&inputs)?;
  let json = render_json(&schema, config.indent)?;

  if config.output == Path::new("-") {
    println!("{json}");
  } else {
    tokio::fs::write(&config.output, format!("{json}\n"))
      .await
      .map_err(|source| Error::WriteOutput {
        path: config.output.clone(),
        source,
      })?;

    if !config.quiet {
      let properties = schema.as_object().map_or(0, |object| object.properties.len());
      println!(
        "            {:<25} {}",
        "Properties:".with(colors.role(Role::Label)),
        properties.to_string().with(colors.role(Role::Value))
      );
      println!(
        "{} {}",
        format_timestamp().with(colors.role(Role::Timestamp)),
        format!("Wrote schema to: {}", config.output.display()).with(colors.role(Role::Done))
      );
    }
  }

  Ok(())
}

async fn read_input(path: &Path) -> Result<Vec<u8>> {
  let file = AsyncMmapFile::open(path).await.map_err(|err| Error::ReadInput {
    path: path.to_path_buf(),
    source: std::io::Error::other(err),
  })?;
  Ok(file.as_slice().to_vec())
}

fn render_json(schema: &Schema, indent: usize) -> anyhow::Result<String> {
  if indent == 0 {
    return Ok(serde_json::to_string(schema)?);
  }
  let indent_bytes = vec![b' '; indent];
  let formatter = serde_json::ser::PrettyFormatter::with_indent(&indent_bytes);
  let mut buffer = Vec::new();
  let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
  schema.serialize(&mut serializer)?;
  Ok(String::from_utf8(buffer)?)
}
