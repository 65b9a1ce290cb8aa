//! Page context for assistant requests.
//!
//! Chat requests carry a JSON-encoded snapshot of where the user is and what
//! they are looking at. Deriving it is a pure function of the current
//! [`Location`] and the already-loaded view data: no hidden reads, same
//! inputs, same JSON.

use serde::Serialize;

use crate::api::types::{ResourceSummary, TopicDetail};
use crate::pages::Location;

/// View data the context can draw from. Fields are whatever the app has
/// already fetched for the open page; nothing here triggers a request.
#[derive(Debug, Default, Clone, Copy)]
pub struct PageView<'a> {
    pub track: Option<&'a str>,
    pub topic: Option<&'a TopicDetail>,
    pub resource: Option<&'a ResourceSummary>,
}

/// Context payload, serialized into the `context` field of chat requests.
///
/// The base fields are always present (null when unknown); the page-specific
/// fields are only emitted on their page, mirroring how the platform builds
/// this object.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageContext {
    pub page: String,
    pub user_track: Option<String>,
    pub current_topic: Option<u64>,
    pub current_resource: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drug_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drug_class: Option<String>,
}

impl PageContext {
    /// Build the context for the current location.
    pub fn derive(location: &Location, view: &PageView) -> PageContext {
        let mut context = PageContext {
            page: location.path(),
            user_track: view.track.map(str::to_string),
            current_topic: view.topic.map(|t| t.id),
            current_resource: view.resource.map(|r| r.id),
            topic_title: None,
            module_name: None,
            resource_title: None,
            resource_type: None,
            drug_name: None,
            drug_class: None,
        };

        match location {
            Location::Topic { .. } => {
                if let Some(topic) = view.topic {
                    context.topic_title = Some(topic.title.clone());
                    context.module_name = topic.module_name.clone();
                }
            }
            Location::Resource { .. } => {
                if let Some(resource) = view.resource {
                    context.resource_title = Some(resource.title.clone());
                    context.resource_type = resource.resource_type.clone();
                }
            }
            Location::Drug { name } => {
                // The desk has no drug view; the name still rides along so
                // the assistant knows what page the link pointed at.
                context.drug_name = Some(name.clone());
            }
            _ => {}
        }

        context
    }

    /// JSON-encode for the wire. A context is plain strings and numbers, so
    /// encoding cannot realistically fail; the empty object is the fallback.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}
