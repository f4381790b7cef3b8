//! Strongly-typed migration step name.

use crate::newtype_string::define_newtype_string;

define_newtype_string! {
    /// Stable identifier of a migration step, unique within a plan.
    ///
    /// Dependency declarations and report entries refer to steps by this name.
    pub struct StepName;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_new_rejects_empty() {
        assert!(StepName::try_new("").is_none());
        assert_eq!(StepName::try_new("create_users").unwrap(), "create_users");
    }

    #[test]
    fn test_deserialize_rejects_empty() {
        let err = serde_yaml::from_str::<StepName>("''").unwrap_err();
        assert!(err.to_string().contains("StepName cannot be empty"));
    }

    #[test]
    fn test_compares_with_str() {
        let name = StepName::new("seed_settings");
        assert_eq!(name, "seed_settings");
        assert_eq!(name.len(), "seed_settings".len());
    }
}
