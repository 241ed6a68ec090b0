use serde::{Deserialize, Serialize};

/// One canteen operator account. Passwords are kept as entered.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct College {
    pub college_name: String,
    pub password: String,
}

impl College {
    pub fn new(college_name: &str, password: &str) -> Self {
        College {
            college_name: college_name.to_string(),
            password: password.to_string(),
        }
    }

    pub fn is_named(&self, name: &str) -> bool {
        self.college_name.to_lowercase() == name.to_lowercase()
    }
}
