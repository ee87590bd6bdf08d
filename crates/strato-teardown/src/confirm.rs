//! Interactive confirmation before an irreversible teardown

use crate::error::{Result, TeardownError};
use std::io::{BufRead, Write};

/// Resource classes removed by a teardown, in deletion order
const AT_RISK: &[&str] = &[
    "affinity rules",
    "instances",
    "load balancers",
    "VPN services, endpoints and sessions",
    "routers, networks, IP addresses and NAT rules",
    "floating IPs",
    "volumes and volume groups",
    "hosts and host groups",
    "private images",
];

/// Ask the operator to re-type `vpc_id`
///
/// The answer is trimmed and must match exactly, case included. A failed or
/// empty read (closed input) is an error, not a refusal.
pub fn confirm<R: BufRead, W: Write>(vpc_id: &str, mut input: R, mut output: W) -> Result<bool> {
    writeln!(
        output,
        "WARNING: this permanently deletes VPC {} and every resource inside it:",
        vpc_id
    )
    .map_err(TeardownError::ConfirmationInput)?;
    for class in AT_RISK {
        writeln!(output, "  - {}", class).map_err(TeardownError::ConfirmationInput)?;
    }
    write!(output, "Type the VPC id to confirm: ").map_err(TeardownError::ConfirmationInput)?;
    output.flush().map_err(TeardownError::ConfirmationInput)?;

    let mut answer = String::new();
    let read = input
        .read_line(&mut answer)
        .map_err(TeardownError::ConfirmationInput)?;
    if read == 0 {
        return Err(TeardownError::ConfirmationInput(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            "input closed before an answer was given",
        )));
    }

    let confirmed = answer.trim() == vpc_id;
    tracing::debug!(vpc_id, confirmed, "confirmation answered");
    Ok(confirmed)
}

/// [`confirm`] against the process's stdin and stdout
pub fn confirm_stdin(vpc_id: &str) -> Result<bool> {
    let stdin = std::io::stdin();
    confirm(vpc_id, stdin.lock(), std::io::stdout())
}
