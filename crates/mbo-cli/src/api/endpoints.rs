//! MISP endpoint URL builders

/// Build the object template listing URL
pub fn object_templates_url(base_url: &str) -> String {
    format!("{}/objectTemplates", base_url.trim_end_matches('/'))
}

/// Build the event creation URL
pub fn add_event_url(base_url: &str) -> String {
    format!("{}/events/add", base_url.trim_end_matches('/'))
}

/// Build the object submission URL for an event and template
pub fn add_object_url(base_url: &str, event_id: &str, template_id: &str) -> String {
    format!(
        "{}/objects/add/{}/{}",
        base_url.trim_end_matches('/'),
        event_id,
        template_id
    )
}
