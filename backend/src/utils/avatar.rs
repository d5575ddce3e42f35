//! Default profile picture for newly registered accounts.

const AVATAR_SERVICE_URL: &str = "https://ui-avatars.com/api/";

/// Generated-initials avatar URL for a display name.
pub fn default_avatar_url(name: &str) -> String {
    format!(
        "{}?name={}&background=random",
        AVATAR_SERVICE_URL,
        urlencoding::encode(name)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_avatar_url() {
        assert_eq!(
            default_avatar_url("Alice"),
            "https://ui-avatars.com/api/?name=Alice&background=random"
        );
    }

    #[test]
    fn test_default_avatar_url_encodes_name() {
        let url = default_avatar_url("Jean Luc & Co");
        assert_eq!(
            url,
            "https://ui-avatars.com/api/?name=Jean%20Luc%20%26%20Co&background=random"
        );
    }
}
