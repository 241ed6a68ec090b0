use serde::{Deserialize, Serialize};

use infra::ids::Entity;

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub student_id: String,
    pub name: String,
    /// Free text; not checked against the registered colleges.
    pub college: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferences: Option<String>,
}

impl Student {
    pub fn new(name: &str, college: &str) -> Self {
        Student {
            name: name.to_string(),
            college: college.to_string(),
            ..Default::default()
        }
    }
}

impl Entity for Student {
    const PREFIX: &'static str = "student";
}
