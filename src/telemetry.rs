//! Engagement event records.
//!
//! Builders produce the exact name/attribute pairs forwarded to the
//! analytics sink. Delivery is fire-and-forget; these records carry no
//! retry or batching state.

/// One analytics event: a name plus a small set of string attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRecord {
    pub name: &'static str,
    pub params: Vec<(&'static str, String)>,
}

/// Platform attribute derived from a social link's URL. Matched in a fixed
/// order; anything unrecognized is lumped into `Other`.
pub fn platform_label(href: &str) -> &'static str {
    if href.contains("instagram") {
        "Instagram"
    } else if href.contains("linkedin") {
        "LinkedIn"
    } else if href.contains("github") {
        "GitHub"
    } else {
        "Other"
    }
}

pub fn contact_form_submitted() -> EventRecord {
    EventRecord {
        name: "contact_form_submitted",
        params: vec![
            ("event_category", "form".to_owned()),
            ("event_label", "Contact form submitted".to_owned()),
            ("form_id", "contact-form".to_owned()),
        ],
    }
}

pub fn social_link_clicked(href: &str) -> EventRecord {
    EventRecord {
        name: "social_link_clicked",
        params: vec![
            ("event_category", "social".to_owned()),
            ("event_label", href.to_owned()),
            ("platform", platform_label(href).to_owned()),
        ],
    }
}

pub fn certificate_viewed(href: &str, certificate_name: Option<String>) -> EventRecord {
    EventRecord {
        name: "certificate_viewed",
        params: vec![
            ("event_category", "certificates".to_owned()),
            ("event_label", href.to_owned()),
            (
                "certificate_name",
                certificate_name.unwrap_or_else(|| "Unknown Certificate".to_owned()),
            ),
        ],
    }
}

pub fn resume_downloaded(file_name: Option<String>) -> EventRecord {
    EventRecord {
        name: "resume_downloaded",
        params: vec![
            ("event_category", "resume".to_owned()),
            ("event_label", "Resume downloaded".to_owned()),
            (
                "file_name",
                file_name.unwrap_or_else(|| "resume.pdf".to_owned()),
            ),
        ],
    }
}

/// Custom link record, pushed to the tag manager's data layer rather than
/// the event function.
pub fn custom_link_clicked(link_text: &str, link_url: &str) -> EventRecord {
    EventRecord {
        name: "custom_link_click",
        params: vec![
            ("link_text", link_text.to_owned()),
            ("link_url", link_url.to_owned()),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn github_links_are_classified_as_github() {
        assert_eq!(platform_label("https://github.com/someone"), "GitHub");
    }

    #[test]
    fn unknown_hosts_fall_back_to_other() {
        assert_eq!(platform_label("https://mastodon.social/@someone"), "Other");
    }

    #[test]
    fn classification_order_prefers_instagram() {
        // A pathological URL mentioning several platforms resolves in match
        // order, not by host.
        assert_eq!(
            platform_label("https://instagram.com/github"),
            "Instagram"
        );
    }

    #[test]
    fn certificate_name_defaults_when_missing() {
        let record = certificate_viewed("https://example.com/cert", None);
        let name = record
            .params
            .iter()
            .find(|(k, _)| *k == "certificate_name")
            .map(|(_, v)| v.as_str());
        assert_eq!(name, Some("Unknown Certificate"));
    }

    #[test]
    fn resume_file_name_defaults() {
        let record = resume_downloaded(None);
        assert!(record
            .params
            .iter()
            .any(|(k, v)| *k == "file_name" && v == "resume.pdf"));
    }
}
