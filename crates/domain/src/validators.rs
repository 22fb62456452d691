/// Longest accepted refresh interval: one year.
pub const MAX_UPDATE_INTERVAL_HOURS: u32 = 24 * 365;

pub fn validate_update_interval(hours: u32) -> Result<(), String> {
    if hours > MAX_UPDATE_INTERVAL_HOURS {
        return Err(format!(
            "Update interval cannot exceed {} hours",
            MAX_UPDATE_INTERVAL_HOURS
        ));
    }
    Ok(())
}

pub fn validate_filter_name(name: &str) -> Result<(), String> {
    if name.len() > 200 {
        return Err("Filter name cannot exceed 200 characters".to_string());
    }
    if name.contains('\n') || name.contains('\r') {
        return Err("Filter name cannot contain line breaks".to_string());
    }
    Ok(())
}

pub fn validate_url(url: &str) -> Result<(), String> {
    if url.is_empty() {
        return Err("URL cannot be empty".to_string());
    }
    if url.len() > 2048 {
        return Err("URL cannot exceed 2048 characters".to_string());
    }
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err("URL must start with http:// or https://".to_string());
    }
    if url.chars().any(char::is_whitespace) {
        return Err("URL cannot contain whitespace".to_string());
    }
    Ok(())
}
