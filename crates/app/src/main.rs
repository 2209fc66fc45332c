use anyhow::Context;
use clap::Parser;

mod cli;
mod encoding;
mod settings;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let args = cli::Cli::parse();
    let effective = settings::resolve(&args)?;

    tracing::info!(
        "Converting {} with template {}",
        effective.csv_file.display(),
        effective.template_file.display()
    );

    let template_text = std::fs::read_to_string(&effective.template_file)
        .with_context(|| format!("reading template {}", effective.template_file.display()))?;
    let csv_file = std::fs::File::open(&effective.csv_file)
        .with_context(|| format!("opening CSV {}", effective.csv_file.display()))?;

    let output = csv2ofx_export::export_statement(&effective.statement, &template_text, csv_file)?;

    let bytes = encoding::encode(&output, &effective.encoding)
        .with_context(|| format!("unsupported output encoding {}", effective.encoding))?;

    // Read-phase failures abort the run; a write failure is only reported.
    match std::fs::write(&effective.output_file, &bytes) {
        Ok(()) => {
            tracing::info!("Statement written to {}", effective.output_file.display());
            println!("The {} file was saved!", effective.output_file.display());
        }
        Err(e) => {
            tracing::error!(
                "Failed to write {}: {}",
                effective.output_file.display(),
                e
            );
        }
    }

    Ok(())
}
