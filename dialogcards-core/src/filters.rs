use crate::Dialog;

/// Drops dialogs that would render an empty side.
pub fn filter_valid_dialogs(dialogs: &[Dialog]) -> Vec<Dialog> {
    dialogs.iter().filter(|d| d.is_valid()).cloned().collect()
}

pub fn all_without_text(dialogs: &[Dialog]) -> bool {
    dialogs.iter().all(|d| !d.has_text())
}
