use partner_review::config::{parse_timeout_secs, BackendConfig, ConfigError};
use partner_review::workflows::channel_partner::{
    FormField, NoticeLevel, Notifier, PartnerId, ReviewNotice, SectionStatus,
};

/// Prints reviewer notices: successes to stdout, failures to stderr.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: ReviewNotice) {
        match notice.level {
            NoticeLevel::Success => println!("{}", notice.message),
            NoticeLevel::Failure => match notice.detail {
                Some(detail) => eprintln!("{} ({detail})", notice.message),
                None => eprintln!("{}", notice.message),
            },
        }
    }
}

/// Only the two review outcomes can be requested; pending is reached by toggling.
pub(crate) fn parse_review_status(raw: &str) -> Result<SectionStatus, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "approved" | "approve" => Ok(SectionStatus::Approved),
        "rejected" | "reject" => Ok(SectionStatus::Rejected),
        _ => Err(format!(
            "failed to parse '{raw}' as a review status (expected approved or rejected)"
        )),
    }
}

pub(crate) fn parse_timeout(raw: &str) -> Result<u64, String> {
    parse_timeout_secs(raw).map_err(|err| err.to_string())
}

/// Matches a decision against the selectable values, returning the canonical spelling.
pub(crate) fn canonical_decision(raw: &str) -> Option<&'static str> {
    let trimmed = raw.trim();
    FormField::FinalDecision
        .options()
        .iter()
        .copied()
        .find(|option| option.eq_ignore_ascii_case(trimmed))
}

pub(crate) fn resolve_partner(
    flag: Option<String>,
    configured: Option<PartnerId>,
) -> Result<PartnerId, ConfigError> {
    flag.map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty())
        .map(PartnerId)
        .or(configured)
        .ok_or(ConfigError::MissingPartnerId)
}

/// Applies command-line overrides on top of the loaded backend settings.
pub(crate) fn override_backend(
    backend: BackendConfig,
    base_url: Option<String>,
    timeout_secs: Option<u64>,
) -> Result<BackendConfig, ConfigError> {
    if base_url.is_none() && timeout_secs.is_none() {
        return Ok(backend);
    }

    let timeout = timeout_secs
        .map(std::time::Duration::from_secs)
        .unwrap_or(backend.request_timeout);
    BackendConfig::new(base_url.unwrap_or(backend.base_url), timeout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn review_status_accepts_both_outcomes_only() {
        assert_eq!(parse_review_status("Approved"), Ok(SectionStatus::Approved));
        assert_eq!(parse_review_status(" reject "), Ok(SectionStatus::Rejected));
        assert!(parse_review_status("pending").is_err());
    }

    #[test]
    fn decisions_are_normalized_to_the_selectable_values() {
        assert_eq!(canonical_decision("rejected"), Some("Rejected"));
        assert_eq!(canonical_decision("Pending"), Some("Pending"));
        assert_eq!(canonical_decision("maybe"), None);
    }

    #[test]
    fn partner_flag_wins_over_configuration() {
        let configured = Some(PartnerId::from(5));
        assert_eq!(
            resolve_partner(Some("42".to_string()), configured.clone()).expect("flag"),
            PartnerId::from(42)
        );
        assert_eq!(
            resolve_partner(Some("  ".to_string()), configured).expect("config"),
            PartnerId::from(5)
        );
        assert!(matches!(
            resolve_partner(None, None),
            Err(ConfigError::MissingPartnerId)
        ));
    }

    #[test]
    fn backend_overrides_are_validated() {
        let backend = BackendConfig::default();
        let overridden = override_backend(
            backend.clone(),
            Some("https://partners.example.com/api/".to_string()),
            Some(3),
        )
        .expect("valid override");
        assert_eq!(overridden.base_url, "https://partners.example.com/api");
        assert_eq!(overridden.request_timeout, Duration::from_secs(3));

        assert!(override_backend(backend, Some("ftp://nope".to_string()), None).is_err());
        assert!(parse_timeout("0").is_err());
    }
}
