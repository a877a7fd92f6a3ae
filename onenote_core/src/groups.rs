use serde_json::Value;
use tracing::debug;

use crate::error::ConnectorError;
use crate::graph::GraphClient;
use crate::pagination::fetch_all;
use crate::selection::{pick_by_name_or_id, PickOptions, Selection};

/// Directory groups visible to the signed-in user, id and display name only.
pub async fn list_groups(client: &GraphClient) -> Result<Vec<Value>, ConnectorError> {
    fetch_all(client, "/groups?$select=id,displayName").await
}

/// Groups that actually contain OneNote notebooks. Each group's notebooks
/// endpoint is probed once; groups without notebooks, without the OneNote
/// service, or without access are skipped. The kept records carry a
/// `notebookCount`.
pub async fn list_groups_with_notebooks(
    client: &GraphClient,
) -> Result<Vec<Value>, ConnectorError> {
    let groups = list_groups(client).await?;
    let mut matching = Vec::new();
    for mut group in groups {
        let id = match group.get("id").and_then(Value::as_str) {
            Some(id) => id.to_string(),
            None => continue,
        };
        match client
            .get_json(&format!("/groups/{}/onenote/notebooks", id))
            .await
        {
            Ok(listing) => {
                let count = listing
                    .get("value")
                    .and_then(Value::as_array)
                    .map(|notebooks| notebooks.len())
                    .unwrap_or(0);
                if count > 0 {
                    if let Some(record) = group.as_object_mut() {
                        record.insert("notebookCount".to_string(), Value::from(count));
                    }
                    matching.push(group);
                }
            }
            Err(e) => {
                debug!(group = %id, error = %e, "onenote probe failed, skipping group");
            }
        }
    }
    Ok(matching)
}

/// Resolve a group by id-or-name for group-scoped commands.
pub async fn resolve_group(client: &GraphClient, query: &str) -> Result<Value, ConnectorError> {
    let groups = list_groups(client).await?;
    match pick_by_name_or_id(&groups, Some(query), PickOptions::default()) {
        Selection::Selected(group) => Ok(group),
        Selection::Ambiguous(matches) => Err(ConnectorError::InvalidInput(format!(
            "Group query matched {} groups; use the group id instead.",
            matches.len()
        ))),
        Selection::None => Err(ConnectorError::NotFound("Group not found.".to_string())),
    }
}
