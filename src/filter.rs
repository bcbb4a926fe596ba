use crate::settings::Settings;

// Comma-separated folder list -> trimmed, non-empty entries
fn folder_list(raw: &str) -> Vec<&str> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

// Plain text prefix test. "Note" matches "Notes/x.md" as well; the "/"
// form is checked first but the bare prefix wins either way.
fn matches_folder(path: &str, folder: &str) -> bool {
    path.starts_with(&format!("{}/", folder)) || path.starts_with(folder)
}

/// Whether edits to the document at `path` should be counted.
pub fn is_allowed(path: &str, settings: &Settings) -> bool {
    let include = folder_list(&settings.include_folders);
    let exclude = folder_list(&settings.exclude_folders);

    if !include.is_empty() && !include.iter().any(|f| matches_folder(path, f)) {
        return false;
    }

    if exclude.iter().any(|f| matches_folder(path, f)) {
        return false;
    }

    true
}
