//! Webhook payload builders
//!
//! Payloads carry only the fields the relay reads.

use relay_service::testing::{FIRST_ISSUE_NUMBER, HUB_BOT, HUB_ORG, HUB_REPO};
use serde_json::{json, Value};

pub const SOURCE_ORG: &str = "acme";
pub const SOURCE_REPO: &str = "widgets";
pub const SOURCE_ISSUE_ID: i64 = 5001;
pub const SOURCE_ISSUE_NUMBER: i64 = 7;
pub const HUB_ISSUE_ID: i64 = 8001;

fn repository(owner: &str, name: &str) -> Value {
    json!({ "name": name, "owner": { "login": owner } })
}

/// A source issue event authored by `author`
pub fn source_issue(action: &str, author: &str) -> Value {
    json!({
        "action": action,
        "issue": {
            "id": SOURCE_ISSUE_ID,
            "node_id": "I_src",
            "number": SOURCE_ISSUE_NUMBER,
            "title": "Bug",
            "body": "It broke",
            "user": { "login": author },
            "state": if action == "closed" { "closed" } else { "open" }
        },
        "repository": repository(SOURCE_ORG, SOURCE_REPO),
        "sender": { "login": author },
        "installation": { "id": 1 }
    })
}

/// A hub issue event on the mirror of the source issue, triggered by `sender`
pub fn hub_issue(action: &str, sender: &str) -> Value {
    json!({
        "action": action,
        "issue": {
            "id": HUB_ISSUE_ID,
            "number": FIRST_ISSUE_NUMBER,
            "title": "acme/widgets#7: Bug",
            "body": "@alice posted:\n\nIt broke",
            "user": { "login": HUB_BOT },
            "state": if action == "closed" { "closed" } else { "open" }
        },
        "repository": repository(HUB_ORG, HUB_REPO),
        "sender": { "login": sender }
    })
}

/// A hub `edited` event reporting the previous title
pub fn hub_title_edit(sender: &str, title_from: &str) -> Value {
    let mut payload = hub_issue("edited", sender);
    payload["issue"]["title"] = json!("Retitled on the hub");
    payload["changes"] = json!({ "title": { "from": title_from } });
    payload
}

/// A comment event on `issue`, which must be a payload from [`source_issue`] or [`hub_issue`]
pub fn comment_on(issue: &Value, action: &str, id: i64, author: &str, body: &str) -> Value {
    json!({
        "action": action,
        "issue": issue["issue"],
        "comment": {
            "id": id,
            "body": body,
            "user": { "login": author }
        },
        "repository": issue["repository"],
        "sender": { "login": author }
    })
}
