//! Test data fixture.
//!
//! Base URL, credentials and the labels the scenarios expect, loaded once
//! per run from JSON or YAML and then shared read-only (`Arc<TestData>`)
//! with every scenario.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::result::{ProbeError, ProbeResult};

/// Sign-in credentials
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Account email
    pub email: String,
    /// Account password
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"********")
            .finish()
    }
}

impl Credentials {
    /// Copy with the password masked, for printing
    #[must_use]
    pub fn redacted(&self) -> Self {
        Self {
            email: self.email.clone(),
            password: "********".to_string(),
        }
    }
}

/// Labels the scenarios compare against
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExpectedLabels {
    /// Name of the first product in the grid
    pub favorite_product: String,
    /// Sidebar filter to apply
    pub filter_category: String,
    /// Free-text search term
    pub search_term: String,
    /// Category whose items trigger the bundle discount
    pub discount_category: String,
    /// Payment method option label
    pub payment_method_label: String,
    /// Payment method option value
    pub payment_method_value: String,
    /// Quantity shown for a freshly added product
    pub expected_quantity: String,
}

impl Default for ExpectedLabels {
    fn default() -> Self {
        Self {
            favorite_product: "Combination Pliers".to_string(),
            filter_category: "Hammer".to_string(),
            search_term: "Wood".to_string(),
            discount_category: "Rentals".to_string(),
            payment_method_label: "Cash on Delivery".to_string(),
            payment_method_value: "cash-on-delivery".to_string(),
            expected_quantity: "1".to_string(),
        }
    }
}

/// Everything a scenario needs to know about the storefront
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestData {
    /// Storefront home page
    pub home_page_url: String,
    /// Account used by authenticated scenarios
    pub login: Credentials,
    /// Labels to compare against
    #[serde(default)]
    pub expected_labels: ExpectedLabels,
}

impl Default for TestData {
    fn default() -> Self {
        Self {
            home_page_url: "https://practicesoftwaretesting.com/".to_string(),
            login: Credentials {
                email: "hello@gmail.com".to_string(),
                password: "@CorrectPassword123".to_string(),
            },
            expected_labels: ExpectedLabels::default(),
        }
    }
}

impl TestData {
    /// Load from a `.json`, `.yaml` or `.yml` file
    pub fn load(path: &Path) -> ProbeResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let data: Self = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => serde_json::from_str(&content)?,
            Some("yaml" | "yml") => serde_yaml_ng::from_str(&content)?,
            _ => {
                return Err(ProbeError::Fixture {
                    message: format!("unsupported fixture format: {}", path.display()),
                })
            }
        };
        data.validate()?;
        info!(path = %path.display(), url = %data.home_page_url, "loaded test data");
        Ok(data)
    }

    /// Check the fixture is usable
    pub fn validate(&self) -> ProbeResult<()> {
        if !(self.home_page_url.starts_with("http://") || self.home_page_url.starts_with("https://"))
        {
            return Err(ProbeError::Fixture {
                message: format!("homePageUrl must be http(s): {:?}", self.home_page_url),
            });
        }
        if self.login.email.trim().is_empty() || self.login.password.is_empty() {
            return Err(ProbeError::Fixture {
                message: "login.email and login.password are required".to_string(),
            });
        }
        if self.expected_labels.search_term.trim().is_empty() {
            return Err(ProbeError::Fixture {
                message: "expectedLabels.searchTerm must not be blank".to_string(),
            });
        }
        Ok(())
    }

    /// Absolute URL for a storefront route
    #[must_use]
    pub fn url(&self, route: &str) -> String {
        format!(
            "{}/{}",
            self.home_page_url.trim_end_matches('/'),
            route.trim_start_matches('/')
        )
    }

    /// Copy with the password masked, for printing
    #[must_use]
    pub fn redacted(&self) -> Self {
        Self {
            login: self.login.redacted(),
            ..self.clone()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_temp(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    mod load_tests {
        use super::*;

        #[test]
        fn test_load_json() {
            let file = write_temp(
                ".json",
                r#"{
                    "homePageUrl": "https://shop.test/",
                    "login": {"email": "a@b.c", "password": "pw"},
                    "expectedLabels": {"favoriteProduct": "Claw Hammer"}
                }"#,
            );
            let data = TestData::load(file.path()).unwrap();
            assert_eq!(data.home_page_url, "https://shop.test/");
            assert_eq!(data.expected_labels.favorite_product, "Claw Hammer");
            // unspecified labels keep their defaults
            assert_eq!(data.expected_labels.search_term, "Wood");
        }

        #[test]
        fn test_load_yaml() {
            let file = write_temp(
                ".yaml",
                "homePageUrl: https://shop.test\nlogin:\n  email: a@b.c\n  password: pw\n",
            );
            let data = TestData::load(file.path()).unwrap();
            assert_eq!(data.login.email, "a@b.c");
            assert_eq!(data.expected_labels, ExpectedLabels::default());
        }

        #[test]
        fn test_unknown_extension() {
            let file = write_temp(".toml", "x = 1");
            assert!(matches!(
                TestData::load(file.path()),
                Err(ProbeError::Fixture { .. })
            ));
        }

        #[test]
        fn test_malformed_json() {
            let file = write_temp(".json", "{");
            assert!(matches!(
                TestData::load(file.path()),
                Err(ProbeError::Json(_))
            ));
        }

        #[test]
        fn test_missing_file() {
            assert!(matches!(
                TestData::load(Path::new("/definitely/not/here.json")),
                Err(ProbeError::Io(_))
            ));
        }
    }

    mod validation_tests {
        use super::*;

        #[test]
        fn test_default_is_valid() {
            assert!(TestData::default().validate().is_ok());
        }

        #[test]
        fn test_bad_url() {
            let data = TestData {
                home_page_url: "shop.test".into(),
                ..TestData::default()
            };
            assert!(data.validate().is_err());
        }

        #[test]
        fn test_blank_email() {
            let mut data = TestData::default();
            data.login.email = " ".into();
            assert!(data.validate().is_err());
        }
    }

    mod helper_tests {
        use super::*;

        #[test]
        fn test_url_join() {
            let data = TestData::default();
            assert_eq!(
                data.url("/auth/login"),
                "https://practicesoftwaretesting.com/auth/login"
            );
        }

        #[test]
        fn test_password_never_printed() {
            let data = TestData::default();
            let debug = format!("{data:?}");
            assert!(!debug.contains("@CorrectPassword123"));
            assert!(debug.contains("hello@gmail.com"));
            assert_eq!(data.redacted().login.password, "********");
        }
    }
}
