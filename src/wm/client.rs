use serde::{Deserialize, Serialize};
use std::fmt;

/// Virtual screen index (0-based)
pub type ScreenId = usize;

/// Stable client identity (the managed X11 window ID)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(pub u32);

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:x}", self.0)
    }
}

/// Window Manager client state
/// Represents a window being managed by the WM
#[derive(Debug, Clone)]
pub struct Client {
    /// Window identity
    pub id: ClientId,

    /// Screen the client lives on
    pub screen: ScreenId,

    /// Never eligible for automatic focus
    pub skip: bool,

    /// Window title
    pub title: String,
}

impl Client {
    pub fn new(id: ClientId, screen: ScreenId) -> Self {
        Self {
            id,
            screen,
            skip: false,
            title: String::new(),
        }
    }

    pub fn with_skip(mut self, skip: bool) -> Self {
        self.skip = skip;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_id_displays_as_hex() {
        assert_eq!(ClientId(0x1a00003).to_string(), "0x1a00003");
    }

    #[test]
    fn test_client_builder() {
        let client = Client::new(ClientId(7), 1).with_skip(true).with_title("xterm");
        assert_eq!(client.screen, 1);
        assert!(client.skip);
        assert_eq!(client.title, "xterm");
    }
}
