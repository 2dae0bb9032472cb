use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::common::id_or_string;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Supervisor,
    Employee,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Supervisor => "supervisor",
            Role::Employee => "employee",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "admin" => Ok(Role::Admin),
            "supervisor" => Ok(Role::Supervisor),
            "employee" => Ok(Role::Employee),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

/// A user record. Credential material and other attributes managed outside
/// this service are kept verbatim in `extra`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[serde(deserialize_with = "id_or_string")]
    pub id: i64,
    pub role: Role,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub is_approved: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Model {
    pub fn is_pending(&self) -> bool {
        self.role == Role::Employee && !self.is_approved
    }

    pub fn public_view(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            role: self.role,
            name: self.name.clone(),
            email: self.email.clone(),
            city: self.extra_str("city"),
            location: self.extra_str("location"),
            employee_cnic: self.extra_str("employeeCnic"),
            cnic_number: self.extra_str("cnicNumber"),
            is_approved: self.is_approved,
            created_at: self.created_at,
        }
    }

    fn extra_str(&self, key: &str) -> Option<String> {
        self.extra.get(key).and_then(Value::as_str).map(str::to_string)
    }
}

/// User fields safe to hand to administrators.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: i64,
    pub role: Role,
    pub name: String,
    pub email: String,
    pub city: Option<String>,
    pub location: Option<String>,
    pub employee_cnic: Option<String>,
    pub cnic_number: Option<String>,
    pub is_approved: bool,
    pub created_at: Option<DateTime<Utc>>,
}
