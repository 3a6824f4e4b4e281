// src/types/models.rs
//! DTOs mirrored from the Bixo API. Field names follow the wire (camelCase).

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Capability group name -> skills, as produced by the API or by
/// [`crate::capabilities::derive_capabilities`].
pub type Capabilities = BTreeMap<String, Vec<String>>;

// ===== Wire Enums =====

#[derive(Deserialize)]
#[serde(untagged)]
enum WireRepr {
    Code(i64),
    Name(String),
}

fn normalize_variant(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Integer-coded enums. Serialized as their code; decoded from either the
/// code or the case-insensitive variant name.
macro_rules! wire_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident = $code:literal => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant = $code),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn code(self) -> u8 {
                self as u8
            }

            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }

            /// Lowercase variant name, as used by string-typed endpoints.
            pub fn slug(self) -> String {
                normalize_variant(self.variant_name())
            }

            pub fn from_code(code: i64) -> Option<Self> {
                match code {
                    $($code => Some($name::$variant),)+
                    _ => None,
                }
            }

            pub fn from_name(name: &str) -> Option<Self> {
                let wanted = normalize_variant(name);
                Self::ALL.iter().copied().find(|v| {
                    normalize_variant(v.variant_name()) == wanted
                        || normalize_variant(v.label()) == wanted
                })
            }

            fn variant_name(self) -> &'static str {
                match self {
                    $($name::$variant => stringify!($variant)),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                trimmed
                    .parse::<i64>()
                    .ok()
                    .and_then(Self::from_code)
                    .or_else(|| Self::from_name(trimmed))
                    .ok_or_else(|| {
                        let options: Vec<String> = Self::ALL.iter().map(|v| v.slug()).collect();
                        format!(
                            "unknown {} '{}', expected one of: {}",
                            stringify!($name),
                            trimmed,
                            options.join(", ")
                        )
                    })
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_u8(self.code())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let decoded = match WireRepr::deserialize(deserializer)? {
                    WireRepr::Code(code) => Self::from_code(code),
                    WireRepr::Name(name) => name.parse::<Self>().ok(),
                };
                decoded.ok_or_else(|| {
                    de::Error::custom(concat!("unrecognized ", stringify!($name), " value"))
                })
            }
        }
    };
}

wire_enum!(UserType {
    Candidate = 0 => "Candidate",
    Company = 1 => "Company",
    Admin = 2 => "Admin",
});

wire_enum!(RemotePreference {
    Remote = 0 => "Remote",
    Onsite = 1 => "On-site",
    Hybrid = 2 => "Hybrid",
    Flexible = 3 => "Flexible",
});

wire_enum!(Availability {
    Open = 0 => "Open to work",
    NotNow = 1 => "Not now",
    Passive = 2 => "Passive",
});

wire_enum!(SeniorityLevel {
    Junior = 0 => "Junior",
    Mid = 1 => "Mid",
    Senior = 2 => "Senior",
    Lead = 3 => "Lead",
    Principal = 4 => "Principal",
});

wire_enum!(SkillCategory {
    Language = 0 => "Language",
    Framework = 1 => "Framework",
    Tool = 2 => "Tool",
    Database = 3 => "Database",
    Cloud = 4 => "Cloud",
    Other = 5 => "Other",
});

wire_enum!(SubscriptionTier {
    Free = 0 => "Free",
    Starter = 1 => "Starter",
    Pro = 2 => "Pro",
});

wire_enum!(ShortlistStatus {
    Pending = 0 => "Pending",
    Processing = 1 => "Processing",
    Completed = 2 => "Completed",
    Cancelled = 3 => "Cancelled",
});

// ===== Locations =====

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub willing_to_relocate: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_text: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HiringLocation {
    #[serde(default)]
    pub is_remote: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_text: Option<String>,
}

impl HiringLocation {
    pub fn remote() -> Self {
        Self {
            is_remote: true,
            ..Self::default()
        }
    }

    /// "City, Country" from whichever parts are set.
    pub fn summary(&self) -> Option<String> {
        let parts: Vec<&str> = [self.city.as_deref(), self.country.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }
}

// ===== Auth =====

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user_id: String,
    pub email: String,
    pub user_type: UserType,
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candidate_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub user_type: UserType,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub last_active_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candidate_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_id: Option<String>,
}

// ===== Candidates =====

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateSkill {
    pub id: String,
    pub skill_name: String,
    #[serde(default)]
    pub confidence_score: f64,
    pub category: SkillCategory,
    #[serde(default)]
    pub is_verified: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateProfile {
    pub id: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub linked_in_url: Option<String>,
    pub cv_file_name: Option<String>,
    pub cv_download_url: Option<String>,
    pub desired_role: Option<String>,
    pub location_preference: Option<String>,
    pub location: Option<Location>,
    pub remote_preference: Option<RemotePreference>,
    pub location_display_text: Option<String>,
    pub availability: Availability,
    #[serde(default)]
    pub open_to_opportunities: bool,
    #[serde(default)]
    pub profile_visible: bool,
    pub seniority_estimate: Option<SeniorityLevel>,
    #[serde(default)]
    pub skills: Vec<CandidateSkill>,
    #[serde(default)]
    pub capabilities: Option<Capabilities>,
    #[serde(default)]
    pub recommendations_count: u32,
    #[serde(default)]
    pub profile_views_count: u32,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub last_active_at: String,
}

impl CandidateProfile {
    pub fn display_name(&self) -> String {
        full_name(self.first_name.as_deref(), self.last_name.as_deref())
            .unwrap_or_else(|| self.email.clone())
    }
}

/// Partial profile update; only the fields that are set are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linked_in_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desired_role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_preference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_preference: Option<RemotePreference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability: Option<Availability>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_to_opportunities: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_visible: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub message: Option<String>,
    pub data: Option<String>,
    #[serde(default)]
    pub is_read: bool,
    #[serde(default)]
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateRecommendation {
    pub id: String,
    #[serde(default)]
    pub recommender_name: String,
    pub recommender_email: Option<String>,
    pub recommender_role: Option<String>,
    pub recommender_company: Option<String>,
    pub relationship: Option<String>,
    pub content: Option<String>,
    #[serde(default)]
    pub is_submitted: bool,
    #[serde(default)]
    pub is_approved_by_candidate: bool,
    #[serde(default)]
    pub is_admin_approved: bool,
    #[serde(default)]
    pub is_rejected: bool,
    pub rejection_reason: Option<String>,
    pub submitted_at: Option<String>,
    #[serde(default)]
    pub created_at: String,
}

/// Where a recommendation sits in the review pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecommendationStage {
    Rejected,
    VisibleToCompanies,
    PendingAdminReview,
    NeedsApproval,
    AwaitingSubmission,
}

impl RecommendationStage {
    pub fn label(self) -> &'static str {
        match self {
            RecommendationStage::Rejected => "Rejected",
            RecommendationStage::VisibleToCompanies => "Visible to companies",
            RecommendationStage::PendingAdminReview => "Pending admin review",
            RecommendationStage::NeedsApproval => "Needs your approval",
            RecommendationStage::AwaitingSubmission => "Awaiting submission",
        }
    }
}

impl CandidateRecommendation {
    pub fn stage(&self) -> RecommendationStage {
        if self.is_rejected {
            RecommendationStage::Rejected
        } else if self.is_admin_approved {
            RecommendationStage::VisibleToCompanies
        } else if self.is_approved_by_candidate {
            RecommendationStage::PendingAdminReview
        } else if self.is_submitted {
            RecommendationStage::NeedsApproval
        } else {
            RecommendationStage::AwaitingSubmission
        }
    }
}

// ===== Public recommendation form =====

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommenderFormData {
    #[serde(default)]
    pub candidate_name: String,
    #[serde(default)]
    pub recommender_name: String,
    pub relationship: Option<String>,
    #[serde(default)]
    pub is_already_submitted: bool,
    pub submitted_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRecommendation {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommender_role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommender_company: Option<String>,
}

// ===== Companies =====

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyProfile {
    pub id: String,
    pub company_name: Option<String>,
    pub industry: Option<String>,
    pub company_size: Option<String>,
    pub website: Option<String>,
    pub logo_url: Option<String>,
    pub location: Option<Location>,
    pub subscription_tier: SubscriptionTier,
    pub subscription_expires_at: Option<String>,
    #[serde(default)]
    pub messages_remaining: i64,
    #[serde(default)]
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TalentCandidate {
    pub candidate_id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub desired_role: Option<String>,
    pub location_preference: Option<String>,
    pub location: Option<Location>,
    pub remote_preference: Option<RemotePreference>,
    pub location_display_text: Option<String>,
    pub availability: Availability,
    pub seniority_estimate: Option<SeniorityLevel>,
    #[serde(default)]
    pub top_skills: Vec<String>,
    #[serde(default)]
    pub recommendations_count: u32,
    #[serde(default)]
    pub last_active_at: String,
    #[serde(default)]
    pub match_score: f64,
    #[serde(default)]
    pub is_saved: bool,
}

impl TalentCandidate {
    pub fn display_name(&self) -> String {
        full_name(self.first_name.as_deref(), self.last_name.as_deref())
            .unwrap_or_else(|| "Anonymous candidate".to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TalentSearchResult {
    #[serde(default)]
    pub candidates: Vec<TalentCandidate>,
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub page_size: u32,
    #[serde(default)]
    pub total_pages: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageResponse {
    pub message_id: Option<String>,
    pub messages_remaining: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub from_user_id: String,
    #[serde(default)]
    pub from_user_name: String,
    pub to_user_id: String,
    #[serde(default)]
    pub to_user_name: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub is_read: bool,
    #[serde(default)]
    pub created_at: String,
}

/// One thread in a user's inbox.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub other_user_id: String,
    #[serde(default)]
    pub other_user_name: String,
    #[serde(default)]
    pub last_message: String,
    #[serde(default)]
    pub last_message_at: String,
    #[serde(default)]
    pub unread_count: u32,
}

// ===== Shortlists =====

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortlistRequest {
    pub id: String,
    pub role_title: String,
    #[serde(default)]
    pub tech_stack_required: Vec<String>,
    pub seniority_required: Option<SeniorityLevel>,
    pub location_preference: Option<String>,
    pub hiring_location: Option<HiringLocation>,
    #[serde(default)]
    pub remote_allowed: bool,
    pub additional_notes: Option<String>,
    pub status: ShortlistStatus,
    pub price_paid: Option<f64>,
    #[serde(default)]
    pub created_at: String,
    pub completed_at: Option<String>,
    #[serde(default)]
    pub candidates_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortlistCandidate {
    pub candidate_id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub desired_role: Option<String>,
    pub seniority_estimate: Option<SeniorityLevel>,
    pub availability: Availability,
    #[serde(default)]
    pub match_score: f64,
    pub match_reason: Option<String>,
    #[serde(default)]
    pub rank: u32,
    #[serde(default)]
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortlistDetail {
    pub id: String,
    pub role_title: String,
    #[serde(default)]
    pub tech_stack_required: Vec<String>,
    pub seniority_required: Option<SeniorityLevel>,
    pub location_preference: Option<String>,
    #[serde(default)]
    pub remote_allowed: bool,
    pub additional_notes: Option<String>,
    pub status: ShortlistStatus,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub candidates: Vec<ShortlistCandidate>,
}

/// Input for a new shortlist request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewShortlist {
    pub role_title: String,
    /// Comma-separated technologies as typed by the user.
    pub tech_stack: String,
    pub seniority: Option<SeniorityLevel>,
    pub hiring_location: HiringLocation,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedId {
    pub id: String,
}

// ===== Admin =====

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub page_size: u32,
    #[serde(default)]
    pub total_pages: u32,
}

impl<T> Default for Paginated<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total_count: 0,
            page: 0,
            page_size: 0,
            total_pages: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminCandidate {
    pub id: String,
    pub user_id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: String,
    pub desired_role: Option<String>,
    pub availability: Availability,
    pub seniority_estimate: Option<SeniorityLevel>,
    #[serde(default)]
    pub profile_visible: bool,
    #[serde(default)]
    pub skills_count: u32,
    #[serde(default)]
    pub profile_views_count: u32,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub last_active_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminCompany {
    pub id: String,
    pub user_id: String,
    #[serde(default)]
    pub company_name: String,
    pub email: String,
    pub industry: Option<String>,
    pub company_size: Option<String>,
    pub website: Option<String>,
    pub subscription_tier: SubscriptionTier,
    pub subscription_expires_at: Option<String>,
    #[serde(default)]
    pub messages_remaining: i64,
    #[serde(default)]
    pub shortlists_count: u32,
    #[serde(default)]
    pub saved_candidates_count: u32,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub last_active_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminShortlist {
    pub id: String,
    pub company_id: Option<String>,
    #[serde(default)]
    pub company_name: String,
    pub role_title: String,
    #[serde(default)]
    pub tech_stack_required: Vec<String>,
    pub seniority_required: Option<SeniorityLevel>,
    pub location_preference: Option<String>,
    pub hiring_location: Option<HiringLocation>,
    #[serde(default)]
    pub remote_allowed: bool,
    pub additional_notes: Option<String>,
    pub status: ShortlistStatus,
    pub price_paid: Option<f64>,
    #[serde(default)]
    pub candidates_count: u32,
    #[serde(default)]
    pub created_at: String,
    pub completed_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminRecommendation {
    pub id: String,
    pub candidate_id: String,
    #[serde(default)]
    pub candidate_name: String,
    #[serde(default)]
    pub recommender_name: String,
    pub recommender_email: Option<String>,
    pub recommender_role: Option<String>,
    pub recommender_company: Option<String>,
    pub relationship: Option<String>,
    #[serde(default)]
    pub content: String,
    pub submitted_at: Option<String>,
}

fn full_name(first: Option<&str>, last: Option<&str>) -> Option<String> {
    let name = [first, last]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}
