pub mod result_ext;

/// Placeholder shown when a tag attribute is missing
pub const NOT_AVAILABLE: &str = "N/A";

/// Returns the string, or `N/A` if it is empty
pub fn or_not_available(value: impl Into<String>) -> String {
    let value = value.into();
    if value.is_empty() {
        return NOT_AVAILABLE.to_string();
    }

    value
}
