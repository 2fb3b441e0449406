use crate::types::{AgentInfo, AgentKind};
use axum::Json;

/// List the personas a chat request may ask for by name.
pub async fn list_agents() -> Json<Vec<AgentInfo>> {
    Json(
        AgentKind::all()
            .iter()
            .map(|kind| AgentInfo {
                name: kind.as_str().to_string(),
                display_name: format!("{} Agent", kind.display_name()),
                description: kind.description().to_string(),
            })
            .collect(),
    )
}
