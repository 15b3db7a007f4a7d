use thiserror::Error;

use crate::config::SectionSlot;

#[derive(Debug, Error)]
pub enum FragmentError {
    #[error("no placeholder element with id `{0}`")]
    MissingPlaceholder(String),
    #[error("HTTP {status} fetching {path}")]
    Status { path: String, status: u16 },
    #[error("fetching {path}: {message}")]
    Transport { path: String, message: String },
}

impl FragmentError {
    /// Map a response status to an error for non-2xx codes.
    pub fn check_status(path: &str, status: u16) -> Result<(), FragmentError> {
        if (200..300).contains(&status) {
            Ok(())
        } else {
            Err(FragmentError::Status {
                path: path.to_string(),
                status,
            })
        }
    }
}

/// Which section fragments made it onto the page.
///
/// Failures are recorded, never propagated: a page with an empty
/// placeholder is still usable.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub loaded: Vec<String>,
    pub failed: Vec<(String, String)>,
}

impl LoadReport {
    pub fn record<E: std::fmt::Display>(&mut self, slot: &SectionSlot, result: Result<(), E>) {
        match result {
            Ok(()) => self.loaded.push(slot.placeholder.clone()),
            Err(e) => self.failed.push((slot.placeholder.clone(), e.to_string())),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(id: &str) -> SectionSlot {
        SectionSlot {
            placeholder: id.into(),
            path: format!("./sections/{id}.html"),
        }
    }

    #[test]
    fn non_success_status_is_an_error() {
        assert!(FragmentError::check_status("a.html", 200).is_ok());
        assert!(FragmentError::check_status("a.html", 204).is_ok());
        let err = FragmentError::check_status("a.html", 404);
        assert!(matches!(err, Err(FragmentError::Status { status: 404, .. })));
    }

    #[test]
    fn report_keeps_going_after_failure() {
        let mut report = LoadReport::default();
        report.record(
            &slot("navigation"),
            Err(FragmentError::MissingPlaceholder("navigation".into())),
        );
        report.record::<FragmentError>(&slot("hero"), Ok(()));
        assert_eq!(report.loaded, vec!["hero".to_string()]);
        assert_eq!(report.failed.len(), 1);
        assert!(report.failed[0].1.contains("navigation"));
        assert!(!report.is_complete());
    }
}
