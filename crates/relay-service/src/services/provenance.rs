//! Provenance formatting for mirrored content

/// Title of a hub mirror: `org/repo#N: title`
pub fn mirror_title(org: &str, repo: &str, number: i64, title: &str) -> String {
    format!("{org}/{repo}#{number}: {title}")
}

/// Body carrying the original author: `@author posted:\n\nbody`
pub fn attributed_body(author: &str, body: &str) -> String {
    format!("@{author} posted:\n\n{body}")
}
