use serde::{Deserialize, Serialize};

/// One row of the revenue ledger, keyed by cost group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueRecord {
    #[serde(alias = "kostengruppe", alias = "costGroup")]
    pub cost_group: String,
    #[serde(alias = "umsatz")]
    pub revenue: f64,
    /// Contribution margin
    #[serde(default, alias = "db")]
    pub margin: f64,
}

/// A current staff member and the formal roles they hold
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffMember {
    pub name: String,
    #[serde(default)]
    pub unit: String,
    #[serde(default, alias = "rollen", deserialize_with = "role_list")]
    pub roles: Vec<String>,
}

impl StaffMember {
    pub fn holds_role(&self, role_name: &str) -> bool {
        self.roles
            .iter()
            .any(|r| r.eq_ignore_ascii_case(role_name.trim()))
    }
}

/// Roles arrive either as a list or as one comma-separated cell
fn role_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RoleList {
        Many(Vec<String>),
        Joined(String),
    }

    let roles = match RoleList::deserialize(deserializer)? {
        RoleList::Many(roles) => roles,
        RoleList::Joined(cell) => cell.split(',').map(str::to_string).collect(),
    };

    Ok(roles
        .into_iter()
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
        .collect())
}
