//! Searches the policies protecting one resource and logs them.
//!
//! Usage: `policy-access <config.json> <resource-uuid> [ACTION]`

use std::path::Path;

use policy_access::config::RestConfig;
use policy_access::lifecycle::{setup_tracing, PolicyAccessSystem};
use policy_access::model::ActionType;
use tracing::{error, info, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (config_path, resource_id) = match args.as_slice() {
        [config_path, resource_id, ..] => (config_path, resource_id),
        _ => return Err("usage: policy-access <config.json> <resource-uuid> [ACTION]".to_string()),
    };
    let action = match args.get(2) {
        Some(name) => Some(
            serde_json::from_value::<ActionType>(serde_json::Value::String(name.to_uppercase()))
                .map_err(|_| format!("unknown action: {name}"))?,
        ),
        None => None,
    };

    let config = RestConfig::load(Path::new(config_path)).map_err(|e| e.to_string())?;
    let system = PolicyAccessSystem::new(&config).map_err(|e| e.to_string())?;

    let span = tracing::info_span!("policy_search", %resource_id);
    let result = async {
        info!("Searching policies");
        system
            .policies
            .search_by_resource(resource_id, action)
            .await
            .completed()
            .await
    }
    .instrument(span)
    .await;

    match (result.payload, result.error_message) {
        (Some(page), _) => {
            info!(total = page.total_elements(), "Search completed");
            for policy in page.iter() {
                info!(
                    id = %policy.id,
                    action = %policy.action,
                    policy_type = ?policy.policy_type,
                    start = ?policy.start_date,
                    end = ?policy.end_date,
                    "Policy"
                );
            }
        }
        (None, message) => {
            error!(status = ?result.status_code, error = ?message, "Search failed")
        }
    }

    system.shutdown().await?;
    Ok(())
}
