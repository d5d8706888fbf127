use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Organization {
    pub id: String,
    pub name: String,
}

/// `/auth/organisations` answers. Older gateway revisions returned a bare
/// list; current ones wrap each organisation in a membership record.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum OrganisationsResponse {
    Wrapped { data: Vec<MembershipEntry> },
    Bare(Vec<MembershipEntry>),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum MembershipEntry {
    Nested { organisation: Organization },
    Flat(Organization),
}

impl From<MembershipEntry> for Organization {
    fn from(entry: MembershipEntry) -> Self {
        match entry {
            MembershipEntry::Nested { organisation } => organisation,
            MembershipEntry::Flat(org) => org,
        }
    }
}

impl OrganisationsResponse {
    pub fn into_organizations(self) -> Vec<Organization> {
        let entries = match self {
            OrganisationsResponse::Wrapped { data } => data,
            OrganisationsResponse::Bare(entries) => entries,
        };
        entries.into_iter().map(Organization::from).collect()
    }
}

/// What the organization picker shows.
#[derive(Debug, Clone, Serialize, Default)]
pub struct OrganizationsView {
    pub active_org: Option<String>,
    pub organisations: Vec<Organization>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SwitchStatus {
    Switching,
    Success,
    Failed,
}

/// Result of one switch attempt, also kept in the session as the last
/// status message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SwitchReport {
    pub status: SwitchStatus,
    pub message: String,
    pub active_org: Option<String>,
}

impl SwitchReport {
    pub fn switching(organization_id: &str) -> Self {
        Self {
            status: SwitchStatus::Switching,
            message: format!("Switching to {}...", organization_id),
            active_org: None,
        }
    }

    pub fn success(active_org: String) -> Self {
        Self {
            status: SwitchStatus::Success,
            message: format!("Successfully switched to organization: {}", active_org),
            active_org: Some(active_org),
        }
    }

    pub fn failed(reason: impl std::fmt::Display) -> Self {
        Self {
            status: SwitchStatus::Failed,
            message: format!("Failed to switch organization: {}", reason),
            active_org: None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SwitchRequest {
    pub organization_id: String,
}
