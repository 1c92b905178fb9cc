//! Evaluate the permission gate for a resource.

use clap::Args;
use storegate_access::{
    load_permission, FeatureRegistry, Operation, PermissionDecision, PermissionRequest,
};
use storegate_userstore::UserstoreDirectory;

use crate::config::StoregateConfig;
use crate::error::{CliError, CliResult};

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Qualified resource name, e.g. CUSTOM/alice
    #[arg(long, short = 'r')]
    pub resource: String,

    /// Feature key in the deployment configuration
    #[arg(long, short = 'f', default_value = "users")]
    pub feature: String,

    /// Operation to gate: create, read, update or delete
    #[arg(long, short = 'o', default_value = "update")]
    pub operation: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Load the gate inputs and return the decision.
pub async fn run<D, R>(
    directory: &D,
    registry: &R,
    args: &CheckArgs,
    primary_userstore: &str,
) -> CliResult<PermissionDecision>
where
    D: UserstoreDirectory + ?Sized,
    R: FeatureRegistry + ?Sized,
{
    let operation: Operation = args.operation.parse().map_err(CliError::Validation)?;
    let request = PermissionRequest::new(&args.feature, &args.resource)
        .with_operation(operation)
        .with_primary_userstore(primary_userstore);
    let gate = load_permission(directory, registry, request).await;

    gate.decision()
        .cloned()
        .ok_or_else(|| CliError::Validation("permission gate did not settle".to_string()))
}

/// The `--json` rendering of a decision.
pub fn to_json(decision: &PermissionDecision) -> CliResult<String> {
    Ok(serde_json::to_string_pretty(decision)?)
}

pub async fn execute(args: CheckArgs, config: &StoregateConfig) -> CliResult<()> {
    let directory = super::build_directory(config)?;
    let registry = super::build_registry(config)?;
    let decision = run(&directory, &registry, &args, &config.primary_userstore).await?;

    if args.json {
        println!("{}", to_json(&decision)?);
    } else {
        print_decision(&args, &decision);
    }
    Ok(())
}

fn print_decision(args: &CheckArgs, decision: &PermissionDecision) {
    println!();
    println!("Permission Decision");
    println!("{}", "━".repeat(45));
    println!("Resource:    {}", args.resource);
    println!("Feature:     {}", args.feature);
    println!("Operation:   {}", decision.operation.as_str());
    if decision.is_read_only {
        println!("Decision:    ✗ READ-ONLY");
        for reason in &decision.reasons {
            println!("  - {reason}");
        }
    } else {
        println!("Decision:    ✓ EDITABLE");
    }
    println!("Decision ID: {}", decision.decision_id);
    println!();
}
