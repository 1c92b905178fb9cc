//! List read-only userstores.

use clap::Args;
use storegate_userstore::{
    resolve_read_only_userstores_with_primary, ReadOnlyResolution, UserstoreDirectory,
};

use crate::config::StoregateConfig;
use crate::error::CliResult;

#[derive(Args, Debug)]
pub struct ReadOnlyArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Resolve the read-only set against `directory`.
pub async fn run<D: UserstoreDirectory + ?Sized>(
    directory: &D,
    primary_userstore: &str,
) -> CliResult<ReadOnlyResolution> {
    Ok(resolve_read_only_userstores_with_primary(directory, None, primary_userstore).await?)
}

/// The `--json` rendering of a resolution.
pub fn to_json(resolution: &ReadOnlyResolution) -> CliResult<String> {
    Ok(serde_json::to_string_pretty(resolution)?)
}

pub async fn execute(args: ReadOnlyArgs, config: &StoregateConfig) -> CliResult<()> {
    let directory = super::build_directory(config)?;
    let resolution = run(&directory, &config.primary_userstore).await?;

    if args.json {
        println!("{}", to_json(&resolution)?);
    } else {
        print_resolution(&resolution);
    }
    Ok(())
}

fn print_resolution(resolution: &ReadOnlyResolution) {
    match resolution.complete_set() {
        Some(set) => {
            println!("Read-only userstores");
            for domain in set.iter() {
                println!("  {domain}");
            }
        }
        None => {
            println!("Read-only userstores (incomplete)");
            for domain in resolution.userstores.iter() {
                println!("  {domain}");
            }
            println!();
            println!("Could not classify:");
            for failure in &resolution.failures {
                println!("  {} ({})", failure.userstore_name, failure.error);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storegate_userstore::{
        InMemoryUserstoreDirectory, UserstoreListItem, UserstoreProperty, PRIMARY_USERSTORE,
        READONLY_USER_STORE,
    };

    #[tokio::test]
    async fn test_json_reports_failures() {
        let dir = InMemoryUserstoreDirectory::new();
        dir.add_userstore(
            UserstoreListItem::named("CUSTOM"),
            vec![UserstoreProperty::new(READONLY_USER_STORE, "true")],
        )
        .await;
        dir.add_userstore(UserstoreListItem::named("FLAKY"), vec![]).await;
        dir.fail_properties("FLAKY", "timeout").await;

        let resolution = run(&dir, PRIMARY_USERSTORE).await.unwrap();
        let json = to_json(&resolution).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["userstores"], serde_json::json!(["CUSTOM", "PRIMARY"]));
        assert_eq!(value["failures"][0]["userstore_name"], "FLAKY");
        assert_eq!(value["failures"][0]["error"], "directory unavailable: timeout");
    }
}
