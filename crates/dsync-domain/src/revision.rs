use std::fmt;

use uuid::Uuid;

/// Generation marker stamped on every row written during one sync pass.
///
/// Rows of a tenant whose revision differs from the latest completed pass are
/// stale and get swept once the pass finishes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Revision(String);

impl Revision {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for Revision {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_revisions_are_unique() {
        assert_ne!(Revision::generate(), Revision::generate());
    }
}
