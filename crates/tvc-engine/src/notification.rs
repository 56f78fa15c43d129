//! # Notification Renderer
//!
//! Produces the subject and body of the message a human reviewer sends to an
//! operator who is behind. Output is templated and fully deterministic: the
//! same record, status, and ledger always yield the same bytes.
//!
//! Only operators with `needs_notification` get a message. Operators on an
//! unknown version never do; they are surfaced as [`ManualReview`] entries
//! so someone confirms what they are actually running.

use serde::{Deserialize, Serialize};

use tvc_core::{OperatorRecord, VersionLedger};

use crate::classifier::ComplianceStatus;
use crate::config::NotificationSettings;
use crate::urgency::Urgency;

const MISSING_RELEASE_NOTE: &str = "(no release notes recorded)";

/// A rendered outbound message, addressed for an external delivery channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Recipient record id.
    pub operator_id: String,
    /// Recipient display name.
    pub operator_name: String,
    /// Delivery address, when the roster has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    /// Tier that selected the message tone.
    pub urgency: Urgency,
    /// Subject line.
    pub subject: String,
    /// Plain-text body.
    pub body: String,
}

/// An operator whose version could not be classified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManualReview {
    /// Record id.
    pub operator_id: String,
    /// Display name.
    pub operator_name: String,
    /// Aggregation group.
    pub group: String,
    /// The version string the operator reported.
    pub reported_version: String,
}

impl ManualReview {
    /// A review entry for `record`, or `None` when its version is known.
    pub fn for_status(record: &OperatorRecord, status: &ComplianceStatus) -> Option<Self> {
        if !status.is_unknown_version() {
            return None;
        }
        Some(Self {
            operator_id: record.id.clone(),
            operator_name: record.name.clone(),
            group: record.group_label().to_string(),
            reported_version: status.reported_version.to_string(),
        })
    }
}

/// Subject template per tier. `{program}`, `{current}`, and `{behind}` are
/// substituted at render time.
fn subject_template(urgency: Urgency) -> Option<&'static str> {
    match urgency {
        Urgency::Critical => {
            Some("{program}: action required, you are {behind} content versions behind")
        }
        Urgency::High => Some("{program}: reminder, content version {current} is waiting for you"),
        Urgency::Medium => Some("{program}: new content available, version {current}"),
        Urgency::Low | Urgency::Ok | Urgency::Unknown => None,
    }
}

fn framing_sentence(urgency: Urgency, status: &ComplianceStatus, ledger: &VersionLedger) -> String {
    let reported = &status.reported_version;
    let current = ledger.current_version();
    let behind = status.versions_behind.unwrap_or(0);
    match urgency {
        Urgency::Critical => format!(
            "Our records show you are running version {reported}, which is {behind} releases \
             behind the current version {current}. Please update before your next session so \
             your participants get the current material."
        ),
        Urgency::High => format!(
            "Our records show you are still on version {reported}, and we have not seen activity \
             from you in {days} days. Version {current} is now the current release and the \
             update is quick.",
            days = status.days_since_active
        ),
        Urgency::Medium | Urgency::Low | Urgency::Ok | Urgency::Unknown => format!(
            "Version {current} of the training content is now available. You are currently on \
             version {reported}."
        ),
    }
}

fn personalization(activity_count: u32) -> Option<String> {
    match activity_count {
        0 => None,
        1 => Some(
            "Thank you for the session you have already run. Keeping your content current \
             makes the next one count even more."
                .to_string(),
        ),
        n => Some(format!(
            "Thank you for the {n} sessions you have already run. Keeping your content current \
             makes every one of them count."
        )),
    }
}

/// Render the message for one operator.
///
/// Returns `None` unless `status.needs_notification` is set. If a custom rule
/// table assigned a non-actionable tier to an operator who is behind, the
/// message uses the `MEDIUM` tone.
pub fn render_notification(
    record: &OperatorRecord,
    status: &ComplianceStatus,
    ledger: &VersionLedger,
    settings: &NotificationSettings,
) -> Option<Notification> {
    if !status.needs_notification {
        return None;
    }

    let tone = if status.urgency.is_actionable() {
        status.urgency
    } else {
        Urgency::Medium
    };
    let template = subject_template(tone)?;
    let subject = template
        .replace("{program}", &settings.program_name)
        .replace("{current}", ledger.current_version().as_str())
        .replace("{behind}", &status.versions_behind.unwrap_or(0).to_string());

    let mut body = String::new();
    body.push_str(&format!("Hi {},\n\n", record.first_name()));
    body.push_str(&framing_sentence(tone, status, ledger));
    body.push_str("\n\n");

    body.push_str(&format!("What's new since version {}:\n", status.reported_version));
    for version in &status.missed_versions {
        let note = ledger.release_note(version).unwrap_or(MISSING_RELEASE_NOTE);
        body.push_str(&format!("- {version}: {note}\n"));
    }
    body.push('\n');

    body.push_str(&format!(
        "Get the latest materials here: {}\n",
        settings.call_to_action_url
    ));

    if let Some(thanks) = personalization(record.activity_count) {
        body.push('\n');
        body.push_str(&thanks);
        body.push('\n');
    }

    body.push('\n');
    body.push_str(settings.sign_off.trim_end());
    body.push('\n');

    Some(Notification {
        operator_id: record.id.clone(),
        operator_name: record.name.clone(),
        contact: record.contact.clone(),
        urgency: status.urgency,
        subject,
        body,
    })
}
