//! Target replica-count acquisition

use std::io::{self, Write};

use thiserror::Error;

/// The supplied replica count was not a base-10 integer.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid replica count '{input}': expected a base-10 integer")]
pub struct InvalidInput {
    pub input: String,
}

/// Parse the target replica count.
///
/// No range validation: negative and very large values are accepted and
/// forwarded to the patch as-is.
pub fn parse_target(raw: &str) -> Result<i32, InvalidInput> {
    let trimmed = raw.trim();
    trimmed.parse::<i32>().map_err(|_| InvalidInput {
        input: trimmed.to_string(),
    })
}

/// Prompt the operator once on stdout and read one line from stdin.
pub fn prompt_target() -> io::Result<String> {
    print!("Choose number of replicas for all deployments in the cluster (except `kube-system`): ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line)
}
