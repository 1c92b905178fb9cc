//! Show how a qualified name resolves to a userstore domain.

use clap::Args;
use serde::Serialize;
use storegate_userstore::{ResourceLocation, PRIMARY_USERSTORE};

use crate::error::CliResult;

#[derive(Args, Debug)]
pub struct DomainArgs {
    /// Qualified resource name, e.g. CUSTOM/alice
    pub name: String,

    /// Name of the primary userstore
    #[arg(long, default_value = PRIMARY_USERSTORE)]
    pub primary_userstore: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainOutput {
    pub domain: String,
    pub local_name: String,
    pub primary: bool,
}

pub fn run(args: &DomainArgs) -> DomainOutput {
    let location = ResourceLocation::parse_with_primary(&args.name, &args.primary_userstore);
    DomainOutput {
        primary: location.domain.eq_ignore_ascii_case(&args.primary_userstore),
        domain: location.domain,
        local_name: location.local_name,
    }
}

pub fn execute(args: DomainArgs) -> CliResult<()> {
    let output = run(&args);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("Domain:     {}", output.domain);
        println!("Local name: {}", output.local_name);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(name: &str, primary: &str) -> DomainArgs {
        DomainArgs {
            name: name.to_string(),
            primary_userstore: primary.to_string(),
            json: true,
        }
    }

    #[test]
    fn test_qualified_name() {
        let output = run(&args("CUSTOM/alice", PRIMARY_USERSTORE));
        assert_eq!(
            output,
            DomainOutput {
                domain: "CUSTOM".to_string(),
                local_name: "alice".to_string(),
                primary: false,
            }
        );
    }

    #[test]
    fn test_unqualified_name_uses_primary() {
        let output = run(&args("alice", "DEFAULT"));
        assert_eq!(output.domain, "DEFAULT");
        assert!(output.primary);

        let value = serde_json::to_value(&output).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"domain": "DEFAULT", "local_name": "alice", "primary": true})
        );
    }
}
