//! Video identifiers and commenter-name cleanup.

/// Pulls the video id out of a watch or short URL. Other input is returned trimmed.
pub fn extract_video_id(input: &str) -> String {
    let input = input.trim();
    if let Some((_, rest)) = input.split_once("youtube.com/watch?v=") {
        return rest.split('&').next().unwrap_or_default().to_string();
    }
    if let Some((_, rest)) = input.split_once("youtu.be/") {
        return rest.split('?').next().unwrap_or_default().to_string();
    }
    input.to_string()
}

/// Turns a bare video id into a watch URL; URLs are kept as given.
pub fn video_url(input: &str) -> String {
    let input = input.trim();
    if input.contains("youtube.com") || input.contains("youtu.be") {
        input.to_string()
    } else {
        format!("https://www.youtube.com/watch?v={input}")
    }
}

/// Display name for the commenter at `index` (0-based) in page order.
pub fn commenter_name(raw: Option<&str>, index: usize) -> String {
    let name = raw
        .map(str::trim)
        .map(|n| match n.rsplit_once('@') {
            Some((_, handle)) => handle.trim(),
            None => n,
        })
        .unwrap_or_default();

    if name.is_empty() {
        format!("Unknown commenter #{}", index + 1)
    } else {
        name.to_string()
    }
}
