//! The upload pipeline
//!
//! Orchestrates one run: resolve settings, fetch and index object templates,
//! resolve the destination event (existing or freshly created), load records
//! from the CSV files, then build and submit one object per record in order.
//!
//! Execution is strictly sequential and stops at the first fatal error.
//! There are no retries and no rollback; re-running after a mid-run failure
//! may create duplicates on the MISP side for rows that already went through.

use crate::api::{MispClient, TemplateIndex};
use crate::config::{FileConfig, Settings};
use crate::definitions::DefinitionStore;
use crate::error::{CliError, Result};
use crate::object::MispObject;
use crate::records::load_records;
use crate::Cli;
use colored::Colorize;
use tracing::{debug, info};

/// Run the upload pipeline
pub async fn run(cli: &Cli) -> Result<()> {
    let file_config = FileConfig::load(&cli.config)?;
    let settings = Settings::resolve(cli, &file_config)?;

    let client = MispClient::new(
        settings.misp_url.clone(),
        &settings.misp_key,
        settings.validate_cert,
    )?;

    // Templates first; nothing else is worth doing if the server is
    // unreachable or the key is wrong.
    let templates = client.object_templates().await?;
    let index = TemplateIndex::new(&templates);
    info!(count = templates.len(), "Loaded object templates");

    let target_event = resolve_target_event(cli, &settings, &client).await?;

    let records = load_records(
        &cli.csv,
        settings.delimiter,
        settings.quote,
        settings.strict_csv,
    )?;
    info!(count = records.len(), "Loaded object records");

    let store = DefinitionStore::new(settings.custom_objects_path.clone());

    for record in &records {
        let definition = store.lookup(&record.kind)?;
        let object = MispObject::from_record(record, &definition)?;

        debug!(object = %serde_json::to_string(&object)?, "Processing object");

        if cli.dryrun {
            println!("{}", serde_json::to_string_pretty(&object)?);
            continue;
        }

        let template_id = index
            .resolve(&record.kind)
            .ok_or_else(|| CliError::unknown_template(&record.kind, index.names()))?;

        let Some(event_id) = target_event.as_deref() else {
            // Unreachable in practice: outside dry-run the event is always
            // resolved before the loop starts.
            return Err(CliError::config(
                "no destination event to submit objects to",
            ));
        };

        client.add_object(event_id, template_id, &object).await?;
        println!("{} Added '{}' object", "✓".green(), record.kind);
    }

    if cli.dryrun {
        println!(
            "\n{} Dry run: {} object(s) built, nothing submitted",
            "✓".green().bold(),
            records.len()
        );
    } else {
        println!(
            "\n{} {} object(s) submitted",
            "✓".green().bold(),
            records.len()
        );
    }

    Ok(())
}

/// Resolve the event the objects go to.
///
/// `-e` targets an existing event as-is. `-i` creates a new one, except in
/// dry-run where no remote call is made and no event id is needed.
async fn resolve_target_event(
    cli: &Cli,
    settings: &Settings,
    client: &MispClient,
) -> Result<Option<String>> {
    if let Some(event) = &cli.event {
        return Ok(Some(event.clone()));
    }

    if cli.dryrun {
        return Ok(None);
    }

    let Some(info_title) = cli.info.as_deref() else {
        // clap's arg group guarantees one of -e/-i is present.
        return Err(CliError::config("either --event or --info is required"));
    };

    let distribution = settings.default_distribution;
    if let Some(level) = distribution {
        debug!(distribution = level, "Setting distribution level for the new event");
    }

    let uuid = client.add_event(info_title, distribution).await?;
    info!(event = %uuid, "New event created");
    println!("{} New event created: {}", "✓".green(), uuid);

    Ok(Some(uuid))
}
