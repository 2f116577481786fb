/// Decides whether a requested display name is acceptable
pub trait UsernameValidator: Send + Sync {
    fn validate(&self, username: &str) -> bool;
}

/// Any `Fn(&str) -> bool` works as a validator
impl<F> UsernameValidator for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn validate(&self, username: &str) -> bool {
        self(username)
    }
}

/// Printable ASCII without whitespace, bounded length
pub struct PatternUsernameValidator {
    max_len: usize,
}

impl PatternUsernameValidator {
    pub fn new(max_len: usize) -> Self {
        Self { max_len }
    }
}

impl Default for PatternUsernameValidator {
    fn default() -> Self {
        Self::new(20)
    }
}

impl UsernameValidator for PatternUsernameValidator {
    fn validate(&self, username: &str) -> bool {
        !username.is_empty()
            && username.len() <= self.max_len
            && username
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c.is_ascii_punctuation())
    }
}
