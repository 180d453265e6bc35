//! Verify command implementation.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use colored::Colorize;
use pixseal_core::{RegionOutcome, VerificationReport, Verdict};
use tracing::{debug, error, info};

use crate::utils;

/// Execute the verify command.
pub fn execute(
    image_path: PathBuf,
    metadata: Option<String>,
    metadata_file: Option<PathBuf>,
    json: bool,
    quiet: bool,
) -> Result<()> {
    let decoded = image::open(&image_path)
        .with_context(|| format!("Failed to decode image: {}", image_path.display()))?;
    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();

    info!(path = %image_path.display(), width, height, "Decoded image");

    let metadata_bytes = utils::load_metadata(metadata, metadata_file)?;
    let report = match &metadata_bytes {
        Some(bytes) => {
            debug!(bytes = bytes.len(), "Verifying against supplied metadata");
            pixseal_core::verify_image_against(&rgba, width, height, bytes.as_slice())?
        }
        None => pixseal_core::verify_image(&rgba, width, height)?,
    };

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to encode report JSON")?
        );
    } else if !quiet {
        render_report(&report);
    }

    match &report.verdict {
        Verdict::Verified | Verdict::VerifiedUnconfirmed => {
            info!(verdict = ?report.verdict, "Verification successful");
            Ok(())
        }
        Verdict::Unsigned => {
            info!("No signature found");
            bail!("no embedded signature found")
        }
        Verdict::Tampered {
            expected_digest,
            embedded_digest,
        } => {
            error!(
                expected = hex::encode(&expected_digest[..8]),
                embedded = hex::encode(&embedded_digest[..8]),
                "Metadata digest mismatch"
            );
            bail!("verification failed: metadata has been tampered with")
        }
    }
}

fn render_report(report: &VerificationReport) {
    println!();
    match &report.verdict {
        Verdict::Verified => {
            println!("{}", "╔════════════════════════════════════════╗".green());
            println!(
                "{}",
                "║              AUTHENTIC                 ║".green().bold()
            );
            println!("{}", "╚════════════════════════════════════════╝".green());
        }
        Verdict::VerifiedUnconfirmed => {
            println!("{}", "╔════════════════════════════════════════╗".green());
            println!(
                "{}",
                "║         SIGNED (UNCONFIRMED)           ║".green().bold()
            );
            println!("{}", "╚════════════════════════════════════════╝".green());
        }
        Verdict::Tampered { .. } => {
            println!("{}", "╔════════════════════════════════════════╗".red());
            println!(
                "{}",
                "║              TAMPERED                  ║".red().bold()
            );
            println!("{}", "╚════════════════════════════════════════╝".red());
        }
        Verdict::Unsigned => {
            println!("{}", "╔════════════════════════════════════════╗".yellow());
            println!(
                "{}",
                "║              UNSIGNED                  ║".yellow().bold()
            );
            println!("{}", "╚════════════════════════════════════════╝".yellow());
        }
    }
    println!();

    for entry in &report.regions {
        let status = match &entry.outcome {
            RegionOutcome::Valid { .. } => "valid".green(),
            RegionOutcome::Absent => "absent".yellow(),
            RegionOutcome::Unavailable => "unavailable".yellow(),
            RegionOutcome::Corrupted { .. } => "CORRUPTED".red().bold(),
        };
        println!("   {} {status}", format!("{}:", entry.region).dimmed());
    }

    if let Some(canonical) = &report.canonical {
        println!();
        println!(
            "   {} {}",
            "Signed at:".dimmed(),
            utils::format_timestamp(canonical.timestamp)
        );
        println!(
            "   {} {}",
            "Metadata digest:".dimmed(),
            hex::encode(canonical.metadata_digest)
        );
    }

    if report.timestamp_mismatch {
        println!();
        println!(
            "   {}",
            "Signature timestamps disagree across regions; possible splice or partial re-sign."
                .yellow()
        );
    }

    match &report.verdict {
        Verdict::Verified => {
            println!(
                "   {} {}",
                "Metadata:".dimmed(),
                "matches supplied payload".green()
            );
        }
        Verdict::VerifiedUnconfirmed => {
            println!(
                "   {}",
                "No metadata supplied; digest not confirmed against source.".yellow()
            );
        }
        Verdict::Tampered {
            expected_digest,
            embedded_digest,
        } => {
            println!(
                "   {} {}",
                "Expected:".dimmed(),
                hex::encode(expected_digest)
            );
            println!(
                "   {} {}",
                "Embedded:".dimmed(),
                hex::encode(embedded_digest)
            );
        }
        Verdict::Unsigned => {
            println!(
                "   {}",
                "No signature marker found in any region.".dimmed()
            );
        }
    }
}
