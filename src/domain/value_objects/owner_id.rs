use serde::{Deserialize, Serialize};

/// The authenticated principal that documents and turns belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(i32);

impl OwnerId {
    pub fn new(id: i32) -> Result<Self, String> {
        if id <= 0 {
            return Err(format!("Owner id must be positive, got {}", id));
        }
        Ok(Self(id))
    }

    pub fn value(&self) -> i32 {
        self.0
    }
}

impl std::fmt::Display for OwnerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for OwnerId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s
            .trim()
            .parse::<i32>()
            .map_err(|e| format!("Invalid owner id '{}': {}", s, e))?;
        Self::new(id)
    }
}
